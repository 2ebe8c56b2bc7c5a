//! Key-value stores that hold serialized keyword embeddings.
//!
//! The store only moves raw text; decoding happens in the accessor so that a
//! single bad entry can be dropped without failing the whole read.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use redis::AsyncCommands;
use redis::aio::ConnectionManager;
use tokio::sync::RwLock;
use tracing::debug;

use crate::DEFAULT_EMBEDDINGS_KEY;
use crate::codec::format_embedding;
use crate::error::Result;

/// Read access to a keyword → serialized vector namespace.
#[async_trait]
pub trait EmbeddingStore: Send + Sync {
    /// Get the raw encoding stored for `keyword`, if any.
    async fn get(&self, keyword: &str) -> Result<Option<String>>;

    /// Get every raw `(keyword, encoding)` pair in the namespace.
    async fn get_all(&self) -> Result<Vec<(String, String)>>;
}

#[async_trait]
impl<T: EmbeddingStore + ?Sized> EmbeddingStore for Arc<T> {
    async fn get(&self, keyword: &str) -> Result<Option<String>> {
        (**self).get(keyword).await
    }

    async fn get_all(&self) -> Result<Vec<(String, String)>> {
        (**self).get_all().await
    }
}

/// Redis-backed store reading from a single hash.
#[derive(Clone)]
pub struct RedisEmbeddingStore {
    conn: ConnectionManager,
    hash_key: String,
}

impl RedisEmbeddingStore {
    /// Wrap an existing connection, reading from the default `embeddings` hash.
    pub fn new(conn: ConnectionManager) -> Self {
        Self {
            conn,
            hash_key: DEFAULT_EMBEDDINGS_KEY.to_string(),
        }
    }

    /// Read from a different hash.
    pub fn with_hash_key(mut self, key: impl Into<String>) -> Self {
        self.hash_key = key.into();
        self
    }
}

#[async_trait]
impl EmbeddingStore for RedisEmbeddingStore {
    async fn get(&self, keyword: &str) -> Result<Option<String>> {
        let mut conn = self.conn.clone();
        let value: Option<String> = conn.hget(&self.hash_key, keyword).await?;
        debug!("HGET {} {keyword}: found={}", self.hash_key, value.is_some());
        Ok(value)
    }

    async fn get_all(&self) -> Result<Vec<(String, String)>> {
        let mut conn = self.conn.clone();
        let entries: BTreeMap<String, String> = conn.hgetall(&self.hash_key).await?;
        debug!("HGETALL {}: {} entries", self.hash_key, entries.len());
        Ok(entries.into_iter().collect())
    }
}

/// In-memory store, ordered by keyword.
#[derive(Debug, Default)]
pub struct InMemoryEmbeddingStore {
    entries: RwLock<BTreeMap<String, String>>,
}

impl InMemoryEmbeddingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an already-encoded entry.
    pub fn with_raw(mut self, keyword: impl Into<String>, encoded: impl Into<String>) -> Self {
        self.entries
            .get_mut()
            .insert(keyword.into(), encoded.into());
        self
    }

    /// Add a vector, encoding it the way the ingestion side does.
    pub fn with_vector(self, keyword: impl Into<String>, embedding: &[f32]) -> Self {
        self.with_raw(keyword, format_embedding(embedding))
    }

    /// Insert or replace an encoded entry.
    pub async fn insert(&self, keyword: impl Into<String>, encoded: impl Into<String>) {
        self.entries
            .write()
            .await
            .insert(keyword.into(), encoded.into());
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for InMemoryEmbeddingStore
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: RwLock::new(
                iter.into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }
}

#[async_trait]
impl EmbeddingStore for InMemoryEmbeddingStore {
    async fn get(&self, keyword: &str) -> Result<Option<String>> {
        Ok(self.entries.read().await.get(keyword).cloned())
    }

    async fn get_all(&self) -> Result<Vec<(String, String)>> {
        Ok(self
            .entries
            .read()
            .await
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }
}
