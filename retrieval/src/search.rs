//! Keyword and similar-keyword headline search.

use std::collections::BTreeMap;

use headlines_embeddings::{EmbeddingStore, RedisEmbeddingStore};
use redis::aio::ConnectionManager;
use tracing::{info, warn};

use crate::config::SearchConfig;
use crate::error::Result;
use crate::headlines::{HeadlineResolver, HeadlineStore, RedisHeadlineStore};
use crate::ranker::SimilarityRanker;

/// Headline search over a ranker and a headline resolver.
pub struct SearchService<E, H> {
    ranker: SimilarityRanker<E>,
    resolver: HeadlineResolver<H>,
}

impl SearchService<RedisEmbeddingStore, RedisHeadlineStore> {
    /// Connect both stores to the redis instance named in `config`.
    pub async fn connect(config: &SearchConfig) -> Result<Self> {
        config.validate()?;

        let client = redis::Client::open(config.store.redis_url.as_str())?;
        let conn = ConnectionManager::new(client).await?;
        info!("Connected to {}", config.store.redis_url);

        let embeddings =
            RedisEmbeddingStore::new(conn.clone()).with_hash_key(&config.store.embeddings_key);
        let headlines = RedisHeadlineStore::new(conn, &config.store);

        Ok(Self::new(
            SimilarityRanker::with_config(embeddings, config.ranker.clone()),
            HeadlineResolver::new(headlines),
        ))
    }
}

impl<E: EmbeddingStore, H: HeadlineStore> SearchService<E, H> {
    pub fn new(ranker: SimilarityRanker<E>, resolver: HeadlineResolver<H>) -> Self {
        Self { ranker, resolver }
    }

    pub fn ranker(&self) -> &SimilarityRanker<E> {
        &self.ranker
    }

    pub fn resolver(&self) -> &HeadlineResolver<H> {
        &self.resolver
    }

    /// Headlines filed under any of `keywords`.
    pub async fn search<K: AsRef<str>>(
        &self,
        keywords: &[K],
    ) -> Result<BTreeMap<String, String>> {
        self.resolver.resolve(keywords).await
    }

    /// Headlines filed under keywords similar to `keywords`.
    ///
    /// An unreachable embedding store gives an empty result rather than an
    /// error; the caller shows "no similar headlines".
    pub async fn similar<K: AsRef<str>>(
        &self,
        keywords: &[K],
    ) -> Result<BTreeMap<String, String>> {
        if keywords.is_empty() {
            return Ok(BTreeMap::new());
        }

        let similar = match self.ranker.rank(keywords).await {
            Ok(similar) => similar,
            Err(e) if e.is_store_unavailable() => {
                warn!("Similar keyword ranking unavailable: {e}");
                return Ok(BTreeMap::new());
            }
            Err(e) => return Err(e),
        };

        info!("Most similar keywords: {similar:?}");
        self.resolver.resolve(&similar).await
    }

    /// Every stored headline.
    pub async fn all(&self) -> Result<BTreeMap<String, String>> {
        self.resolver.all().await
    }

    /// Unix time of the last ingestion run.
    pub async fn last_updated(&self) -> Result<Option<i64>> {
        self.resolver.store().last_updated().await
    }
}
