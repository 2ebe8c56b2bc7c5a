//! Text encoding of stored vectors.
//!
//! Vectors are written by the ingestion side as the string form of a numpy
//! array: optional square brackets around whitespace-separated decimals, which
//! may wrap across several lines.

use crate::Embedding;
use crate::error::{EmbeddingError, Result};

/// Decode a stored vector.
///
/// Every `[` and `]` is removed, the rest is split on whitespace and each
/// non-empty token is parsed as an `f32`. A token that is not a finite number,
/// or an encoding that holds no numbers at all, is rejected.
pub fn parse_embedding(text: &str) -> Result<Embedding> {
    let stripped = text.replace(['[', ']'], " ");

    let embedding = stripped
        .split_whitespace()
        .map(|token| match token.parse::<f32>() {
            Ok(value) if value.is_finite() => Ok(value),
            _ => Err(EmbeddingError::MalformedVector(format!(
                "invalid component {token:?}"
            ))),
        })
        .collect::<Result<Embedding>>()?;

    if embedding.is_empty() {
        return Err(EmbeddingError::MalformedVector("no components".to_string()));
    }

    Ok(embedding)
}

/// Encode a vector in the bracketed form accepted by [`parse_embedding`].
pub fn format_embedding(embedding: &[f32]) -> String {
    let components: Vec<String> = embedding.iter().map(f32::to_string).collect();
    format!("[{}]", components.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_bracketed() {
        let v = parse_embedding("[0.1 0.2 0.3]").unwrap();
        assert_eq!(v, vec![0.1, 0.2, 0.3]);
    }

    #[test]
    fn test_parse_numpy_layout() {
        // numpy pads inside the brackets and wraps long arrays
        let text = "[ 1.2345e-01 -4.5e-01  3.0\n  7.5e-02 ]";
        let v = parse_embedding(text).unwrap();
        assert_eq!(v, vec![0.12345, -0.45, 3.0, 0.075]);
    }

    #[test]
    fn test_parse_without_brackets() {
        let v = parse_embedding("1 2\t3").unwrap();
        assert_eq!(v, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_parse_rejects_garbage_token() {
        let err = parse_embedding("[0.1 abc 0.3]").unwrap_err();
        assert!(matches!(err, EmbeddingError::MalformedVector(_)));
    }

    #[test]
    fn test_parse_rejects_non_finite() {
        assert!(parse_embedding("[0.1 NaN]").is_err());
        assert!(parse_embedding("[inf 0.1]").is_err());
    }

    #[test]
    fn test_parse_rejects_empty() {
        assert!(parse_embedding("[]").is_err());
        assert!(parse_embedding("   ").is_err());
    }

    #[test]
    fn test_format_is_parseable() {
        let v = vec![0.99, -0.14, 0.0];
        assert_eq!(format_embedding(&v), "[0.99 -0.14 0]");
        assert_eq!(parse_embedding(&format_embedding(&v)).unwrap(), v);
    }
}
