//! Headline lookup by keyword.
//!
//! The ingestion side keeps a list of headline titles per keyword and one hash
//! of title → serialized record. Records are passed through untouched.

use std::collections::{BTreeMap, HashSet};

use async_trait::async_trait;
use futures::future::{join_all, try_join_all};
use redis::AsyncCommands;
use redis::aio::ConnectionManager;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::config::StoreConfig;
use crate::error::Result;

/// Read access to stored headlines.
#[async_trait]
pub trait HeadlineStore: Send + Sync {
    /// Titles filed under `keyword`, in insertion order, possibly repeated.
    async fn headlines_for_keyword(&self, keyword: &str) -> Result<Vec<String>>;

    /// The serialized record for a title.
    async fn headline_record(&self, headline: &str) -> Result<Option<String>>;

    /// Every `(title, record)` pair.
    async fn all_headlines(&self) -> Result<Vec<(String, String)>>;

    /// Unix time of the last ingestion run.
    async fn last_updated(&self) -> Result<Option<i64>>;
}

/// Title as shown to clients: first `:` becomes `-`, first `'` is dropped.
pub fn display_key(headline: &str) -> String {
    headline.replacen(':', "-", 1).replacen('\'', "", 1)
}

/// Resolves keywords to headline records.
pub struct HeadlineResolver<H> {
    store: H,
}

impl<H: HeadlineStore> HeadlineResolver<H> {
    pub fn new(store: H) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &H {
        &self.store
    }

    /// Records for every headline filed under any of `keywords`, keyed by
    /// display key. Keywords are resolved concurrently.
    pub async fn resolve<K: AsRef<str>>(
        &self,
        keywords: &[K],
    ) -> Result<BTreeMap<String, String>> {
        let per_keyword =
            try_join_all(keywords.iter().map(|k| self.resolve_keyword(k.as_ref()))).await?;

        let headlines: BTreeMap<String, String> = per_keyword.into_iter().flatten().collect();
        debug!(
            "Resolved {} headlines for {} keywords",
            headlines.len(),
            keywords.len()
        );
        Ok(headlines)
    }

    /// Every stored headline, keyed by display key.
    pub async fn all(&self) -> Result<BTreeMap<String, String>> {
        Ok(self
            .store
            .all_headlines()
            .await?
            .into_iter()
            .map(|(title, record)| (display_key(&title), record))
            .collect())
    }

    async fn resolve_keyword(&self, keyword: &str) -> Result<Vec<(String, String)>> {
        let keyword = keyword.to_lowercase();
        let mut seen = HashSet::new();
        let titles: Vec<String> = self
            .store
            .headlines_for_keyword(&keyword)
            .await?
            .into_iter()
            .filter(|t| seen.insert(t.clone()))
            .collect();

        let records = join_all(titles.iter().map(|t| self.record_or_skip(t))).await;

        Ok(titles
            .iter()
            .zip(records)
            .filter_map(|(title, record)| record.map(|r| (display_key(title), r)))
            .collect())
    }

    /// A failed read drops only that headline.
    async fn record_or_skip(&self, title: &str) -> Option<String> {
        match self.store.headline_record(title).await {
            Ok(record) => record,
            Err(e) => {
                warn!("Reading headline {title:?} failed: {e}");
                None
            }
        }
    }
}

/// Redis-backed headline store.
#[derive(Clone)]
pub struct RedisHeadlineStore {
    conn: ConnectionManager,
    headlines_key: String,
    keyword_prefix: String,
    last_updated_key: String,
}

impl RedisHeadlineStore {
    /// Use the key layout from `config`.
    pub fn new(conn: ConnectionManager, config: &StoreConfig) -> Self {
        Self {
            conn,
            headlines_key: config.headlines_key.clone(),
            keyword_prefix: config.keyword_prefix.clone(),
            last_updated_key: config.last_updated_key.clone(),
        }
    }

    fn keyword_key(&self, keyword: &str) -> String {
        format!("{}{keyword}", self.keyword_prefix)
    }
}

#[async_trait]
impl HeadlineStore for RedisHeadlineStore {
    async fn headlines_for_keyword(&self, keyword: &str) -> Result<Vec<String>> {
        let mut conn = self.conn.clone();
        Ok(conn.lrange(self.keyword_key(keyword), 0, -1).await?)
    }

    async fn headline_record(&self, headline: &str) -> Result<Option<String>> {
        let mut conn = self.conn.clone();
        Ok(conn.hget(&self.headlines_key, headline).await?)
    }

    async fn all_headlines(&self) -> Result<Vec<(String, String)>> {
        let mut conn = self.conn.clone();
        let all: BTreeMap<String, String> = conn.hgetall(&self.headlines_key).await?;
        Ok(all.into_iter().collect())
    }

    async fn last_updated(&self) -> Result<Option<i64>> {
        let mut conn = self.conn.clone();
        Ok(conn.get(&self.last_updated_key).await?)
    }
}

/// In-memory headline store.
#[derive(Debug, Default)]
pub struct InMemoryHeadlineStore {
    inner: RwLock<InMemoryHeadlines>,
}

#[derive(Debug, Default)]
struct InMemoryHeadlines {
    by_keyword: BTreeMap<String, Vec<String>>,
    records: BTreeMap<String, String>,
    last_updated: Option<i64>,
}

impl InMemoryHeadlineStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a headline and file it under each keyword (lowercased).
    pub fn with_headline<K: AsRef<str>>(
        mut self,
        title: impl Into<String>,
        record: impl Into<String>,
        keywords: &[K],
    ) -> Self {
        let title = title.into();
        let inner = self.inner.get_mut();
        for keyword in keywords {
            inner
                .by_keyword
                .entry(keyword.as_ref().to_lowercase())
                .or_default()
                .push(title.clone());
        }
        inner.records.insert(title, record.into());
        self
    }

    /// File a title under a keyword without storing a record for it.
    pub fn with_dangling(mut self, keyword: &str, title: impl Into<String>) -> Self {
        self.inner
            .get_mut()
            .by_keyword
            .entry(keyword.to_lowercase())
            .or_default()
            .push(title.into());
        self
    }

    pub fn with_last_updated(mut self, timestamp: i64) -> Self {
        self.inner.get_mut().last_updated = Some(timestamp);
        self
    }
}

#[async_trait]
impl HeadlineStore for InMemoryHeadlineStore {
    async fn headlines_for_keyword(&self, keyword: &str) -> Result<Vec<String>> {
        Ok(self
            .inner
            .read()
            .await
            .by_keyword
            .get(keyword)
            .cloned()
            .unwrap_or_default())
    }

    async fn headline_record(&self, headline: &str) -> Result<Option<String>> {
        Ok(self.inner.read().await.records.get(headline).cloned())
    }

    async fn all_headlines(&self) -> Result<Vec<(String, String)>> {
        Ok(self
            .inner
            .read()
            .await
            .records
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }

    async fn last_updated(&self) -> Result<Option<i64>> {
        Ok(self.inner.read().await.last_updated)
    }
}
