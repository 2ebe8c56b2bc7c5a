//! The set of known keyword embeddings.

use crate::Embedding;
use crate::error::{EmbeddingError, Result};

/// Every known keyword and its embedding, as two index-aligned sequences.
///
/// `keys[i]` is the keyword for `vectors[i]`, and all vectors share one
/// dimension. Both invariants are checked on construction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    keys: Vec<String>,
    vectors: Vec<Embedding>,
}

impl Catalog {
    /// Build a catalog from parallel key and vector sequences.
    pub fn from_parts(keys: Vec<String>, vectors: Vec<Embedding>) -> Result<Self> {
        if keys.len() != vectors.len() {
            return Err(EmbeddingError::CatalogMisaligned {
                keys: keys.len(),
                vectors: vectors.len(),
            });
        }

        if let Some(first) = vectors.first() {
            let expected = first.len();
            if let Some(bad) = vectors.iter().find(|v| v.len() != expected) {
                return Err(EmbeddingError::DimensionMismatch {
                    expected,
                    actual: bad.len(),
                });
            }
        }

        Ok(Self { keys, vectors })
    }

    /// Build a catalog from `(keyword, embedding)` pairs.
    pub fn from_entries(entries: Vec<(String, Embedding)>) -> Result<Self> {
        let (keys, vectors) = entries.into_iter().unzip();
        Self::from_parts(keys, vectors)
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    pub fn vectors(&self) -> &[Embedding] {
        &self.vectors
    }

    /// Shared dimension, or `None` for an empty catalog.
    pub fn dimension(&self) -> Option<usize> {
        self.vectors.first().map(Vec::len)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Iterate `(keyword, embedding)` pairs in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Embedding)> {
        self.keys
            .iter()
            .map(String::as_str)
            .zip(self.vectors.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_from_parts_aligned() {
        let catalog = Catalog::from_parts(
            vec!["a".to_string(), "b".to_string()],
            vec![vec![1.0, 0.0], vec![0.0, 1.0]],
        )
        .unwrap();

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.dimension(), Some(2));
        assert_eq!(catalog.iter().next(), Some(("a", &vec![1.0, 0.0])));
    }

    #[test]
    fn test_from_parts_misaligned() {
        let err = Catalog::from_parts(vec!["a".to_string()], vec![]).unwrap_err();
        assert!(matches!(
            err,
            EmbeddingError::CatalogMisaligned {
                keys: 1,
                vectors: 0
            }
        ));
    }

    #[test]
    fn test_inconsistent_dimension() {
        let err = Catalog::from_entries(vec![
            ("a".to_string(), vec![1.0, 0.0]),
            ("b".to_string(), vec![1.0, 0.0, 0.0]),
        ])
        .unwrap_err();
        assert!(matches!(
            err,
            EmbeddingError::DimensionMismatch {
                expected: 2,
                actual: 3
            }
        ));
    }

    #[test]
    fn test_empty_catalog() {
        let catalog = Catalog::default();
        assert!(catalog.is_empty());
        assert_eq!(catalog.dimension(), None);
    }
}
