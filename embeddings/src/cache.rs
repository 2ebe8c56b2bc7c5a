//! Time-bounded cache for a decoded catalog.
//!
//! Keeps the last decoded catalog for a fixed TTL. A zero TTL disables it.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::debug;

use crate::catalog::Catalog;

struct CachedCatalog {
    catalog: Arc<Catalog>,
    loaded_at: Instant,
}

/// Holds at most one decoded catalog until it expires.
pub struct CatalogCache {
    slot: RwLock<Option<CachedCatalog>>,
    ttl: Duration,
}

impl CatalogCache {
    /// Create a cache whose entries live for `ttl`.
    pub fn new(ttl: Duration) -> Self {
        Self {
            slot: RwLock::new(None),
            ttl,
        }
    }

    pub fn is_enabled(&self) -> bool {
        !self.ttl.is_zero()
    }

    /// Get the cached catalog if it has not expired.
    pub async fn get(&self) -> Option<Arc<Catalog>> {
        if !self.is_enabled() {
            return None;
        }

        let slot = self.slot.read().await;
        match slot.as_ref() {
            Some(cached) if cached.loaded_at.elapsed() < self.ttl => {
                debug!("Catalog cache hit ({} entries)", cached.catalog.len());
                Some(Arc::clone(&cached.catalog))
            }
            _ => None,
        }
    }

    /// Replace the cached catalog.
    pub async fn put(&self, catalog: Arc<Catalog>) {
        if !self.is_enabled() {
            return;
        }

        *self.slot.write().await = Some(CachedCatalog {
            catalog,
            loaded_at: Instant::now(),
        });
    }

    /// Drop the cached catalog.
    pub async fn invalidate(&self) {
        *self.slot.write().await = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Arc<Catalog> {
        Arc::new(Catalog::from_entries(vec![("dog".to_string(), vec![1.0, 0.0])]).unwrap())
    }

    #[tokio::test(start_paused = true)]
    async fn test_cache_hit_then_expiry() {
        let cache = CatalogCache::new(Duration::from_secs(30));
        cache.put(catalog()).await;

        assert!(cache.get().await.is_some());

        tokio::time::advance(Duration::from_secs(31)).await;
        assert!(cache.get().await.is_none());
    }

    #[tokio::test]
    async fn test_zero_ttl_disables_cache() {
        let cache = CatalogCache::new(Duration::ZERO);
        cache.put(catalog()).await;

        assert!(!cache.is_enabled());
        assert!(cache.get().await.is_none());
    }

    #[tokio::test]
    async fn test_invalidate() {
        let cache = CatalogCache::new(Duration::from_secs(30));
        cache.put(catalog()).await;
        cache.invalidate().await;

        assert!(cache.get().await.is_none());
    }
}
