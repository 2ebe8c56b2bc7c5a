//! Typed access to stored embeddings.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::Embedding;
use crate::cache::CatalogCache;
use crate::catalog::Catalog;
use crate::codec::parse_embedding;
use crate::error::Result;
use crate::store::EmbeddingStore;

/// Decodes raw store entries into embeddings and catalogs.
///
/// Unknown keywords and undecodable entries are not errors here: both come
/// back as absent. Only store failures and catalog integrity problems are
/// reported as `Err`.
pub struct EmbeddingAccessor<S> {
    store: S,
    cache: CatalogCache,
}

impl<S: EmbeddingStore> EmbeddingAccessor<S> {
    /// Create an accessor that reads the catalog fresh on every call.
    pub fn new(store: S) -> Self {
        Self {
            store,
            cache: CatalogCache::new(Duration::ZERO),
        }
    }

    /// Keep decoded catalogs for `ttl` between calls.
    pub fn with_catalog_ttl(mut self, ttl: Duration) -> Self {
        self.cache = CatalogCache::new(ttl);
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Look up the embedding for a single keyword.
    pub async fn get_embedding(&self, keyword: &str) -> Result<Option<Embedding>> {
        let keyword = keyword.to_lowercase();

        let Some(raw) = self.store.get(&keyword).await? else {
            debug!("No embedding stored for {keyword:?}");
            return Ok(None);
        };

        match parse_embedding(&raw) {
            Ok(embedding) => Ok(Some(embedding)),
            Err(e) => {
                warn!("Ignoring embedding for {keyword:?}: {e}");
                Ok(None)
            }
        }
    }

    /// Load every decodable embedding as a catalog.
    ///
    /// Entries that fail to decode are skipped. Entries that decode to a
    /// different dimension than the rest fail the load.
    pub async fn get_all_embeddings(&self) -> Result<Arc<Catalog>> {
        if let Some(catalog) = self.cache.get().await {
            return Ok(catalog);
        }

        let raw = self.store.get_all().await?;
        let total = raw.len();

        let mut keys = Vec::with_capacity(total);
        let mut vectors = Vec::with_capacity(total);
        for (keyword, encoded) in raw {
            match parse_embedding(&encoded) {
                Ok(embedding) => {
                    keys.push(keyword);
                    vectors.push(embedding);
                }
                Err(e) => warn!("Skipping catalog entry {keyword:?}: {e}"),
            }
        }

        let catalog = Arc::new(Catalog::from_parts(keys, vectors)?);
        info!(
            "Loaded {} of {total} catalog entries (dimension {:?})",
            catalog.len(),
            catalog.dimension()
        );

        self.cache.put(Arc::clone(&catalog)).await;
        Ok(catalog)
    }

    /// Drop any cached catalog so the next load reads the store.
    pub async fn invalidate_catalog(&self) {
        self.cache.invalidate().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EmbeddingError;
    use crate::store::InMemoryEmbeddingStore;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;

    fn store() -> InMemoryEmbeddingStore {
        InMemoryEmbeddingStore::new()
            .with_raw("dog", "[1 0]")
            .with_raw("puppy", "[0.99 0.14]")
            .with_raw("car", "[0 1]")
    }

    #[tokio::test]
    async fn test_get_embedding_normalizes_case() {
        let accessor = EmbeddingAccessor::new(store());
        let v = accessor.get_embedding("DoG").await.unwrap();
        assert_eq!(v, Some(vec![1.0, 0.0]));
    }

    #[tokio::test]
    async fn test_get_embedding_unknown() {
        let accessor = EmbeddingAccessor::new(store());
        assert_eq!(accessor.get_embedding("cat").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_get_embedding_malformed_is_absent() {
        let accessor = EmbeddingAccessor::new(store().with_raw("bad", "[0.1 x]"));
        assert_eq!(accessor.get_embedding("bad").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_get_all_embeddings_aligned() {
        let accessor = EmbeddingAccessor::new(store());
        let catalog = accessor.get_all_embeddings().await.unwrap();

        assert_eq!(catalog.keys(), ["car", "dog", "puppy"]);
        assert_eq!(catalog.vectors()[1], vec![1.0, 0.0]);
        assert_eq!(catalog.keys().len(), catalog.vectors().len());
    }

    #[tokio::test]
    async fn test_get_all_embeddings_skips_malformed() {
        let accessor = EmbeddingAccessor::new(store().with_raw("bad", "not a vector"));
        let catalog = accessor.get_all_embeddings().await.unwrap();

        assert_eq!(catalog.len(), 3);
        assert!(!catalog.keys().contains(&"bad".to_string()));
    }

    #[tokio::test]
    async fn test_get_all_embeddings_rejects_mixed_dimensions() {
        let accessor = EmbeddingAccessor::new(store().with_raw("truck", "[0 1 0]"));
        let err = accessor.get_all_embeddings().await.unwrap_err();
        assert!(matches!(err, EmbeddingError::DimensionMismatch { .. }));
    }

    #[tokio::test]
    async fn test_catalog_ttl_reuses_decoded_catalog() {
        let shared = Arc::new(store());
        let accessor = EmbeddingAccessor::new(Arc::clone(&shared))
            .with_catalog_ttl(Duration::from_secs(60));

        let first = accessor.get_all_embeddings().await.unwrap();
        shared.insert("truck", "[0.5 0.5]").await;
        let second = accessor.get_all_embeddings().await.unwrap();
        assert!(Arc::ptr_eq(&first, &second));

        accessor.invalidate_catalog().await;
        let third = accessor.get_all_embeddings().await.unwrap();
        assert_eq!(third.len(), 4);
    }

    struct DownStore;

    #[async_trait]
    impl EmbeddingStore for DownStore {
        async fn get(&self, _keyword: &str) -> Result<Option<String>> {
            Err(EmbeddingError::StoreUnavailable("connection refused".to_string()))
        }

        async fn get_all(&self) -> Result<Vec<(String, String)>> {
            Err(EmbeddingError::StoreUnavailable("connection refused".to_string()))
        }
    }

    #[tokio::test]
    async fn test_store_failure_propagates() {
        let accessor = EmbeddingAccessor::new(DownStore);
        assert!(matches!(
            accessor.get_embedding("dog").await,
            Err(EmbeddingError::StoreUnavailable(_))
        ));
        assert!(matches!(
            accessor.get_all_embeddings().await,
            Err(EmbeddingError::StoreUnavailable(_))
        ));
    }
}
