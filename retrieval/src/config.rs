//! Configuration for ranking and the backing stores.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Result, RetrievalError};
use crate::ranker::DEFAULT_TOP_N;

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Where embeddings and headlines live.
    pub store: StoreConfig,

    /// Ranking behaviour.
    pub ranker: RankerConfig,
}

impl SearchConfig {
    /// Parse a TOML document. Missing fields take their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a TOML configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&text)
    }

    /// Apply `REDIS_URL`, or `REDIS_HOST` and `REDIS_PORT`, from the process
    /// environment.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|name| std::env::var(name).ok())
    }

    /// Apply redis overrides using `lookup` to read variables.
    pub fn with_overrides_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(url) = lookup("REDIS_URL").filter(|u| !u.is_empty()) {
            self.store.redis_url = url;
        } else if let Some(host) = lookup("REDIS_HOST").filter(|h| !h.is_empty()) {
            let port = lookup("REDIS_PORT")
                .filter(|p| !p.is_empty())
                .unwrap_or_else(|| DEFAULT_REDIS_PORT.to_string());
            self.store.redis_url = format!("redis://{host}:{port}");
        }
        self
    }

    /// Set the redis connection URL.
    pub fn with_redis_url(mut self, url: impl Into<String>) -> Self {
        self.store.redis_url = url.into();
        self
    }

    /// Check values that serde cannot.
    pub fn validate(&self) -> Result<()> {
        if self.store.redis_url.trim().is_empty() {
            return Err(RetrievalError::Config("store.redis_url is empty".to_string()));
        }
        if self.store.embeddings_key.is_empty() || self.store.headlines_key.is_empty() {
            return Err(RetrievalError::Config(
                "store hash keys must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

const DEFAULT_REDIS_PORT: u16 = 6379;

/// Redis layout shared with the ingestion side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Connection URL.
    pub redis_url: String,

    /// Hash of keyword → serialized embedding.
    pub embeddings_key: String,

    /// Hash of headline title → serialized record.
    pub headlines_key: String,

    /// Prefix of the per-keyword headline lists.
    pub keyword_prefix: String,

    /// Key holding the unix time of the last ingestion run.
    pub last_updated_key: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            redis_url: format!("redis://127.0.0.1:{DEFAULT_REDIS_PORT}"),
            embeddings_key: "embeddings".to_string(),
            headlines_key: "headlines".to_string(),
            keyword_prefix: "keywords:".to_string(),
            last_updated_key: "last_updated".to_string(),
        }
    }
}

/// Configuration for similar-keyword ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankerConfig {
    /// Number of keywords returned by a ranking call.
    pub top_n: usize,

    /// Keep only the best-scoring occurrence of each matched keyword.
    pub deduplicate: bool,

    /// Seconds a decoded catalog is reused across calls (0 = reload every call).
    pub catalog_ttl_secs: u64,
}

impl RankerConfig {
    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    pub fn with_deduplicate(mut self, deduplicate: bool) -> Self {
        self.deduplicate = deduplicate;
        self
    }

    pub fn with_catalog_ttl_secs(mut self, secs: u64) -> Self {
        self.catalog_ttl_secs = secs;
        self
    }

    pub fn catalog_ttl(&self) -> Duration {
        Duration::from_secs(self.catalog_ttl_secs)
    }
}

impl Default for RankerConfig {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
            deduplicate: false,
            catalog_ttl_secs: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = SearchConfig::default();
        assert_eq!(config.ranker.top_n, 25);
        assert!(!config.ranker.deduplicate);
        assert_eq!(config.ranker.catalog_ttl(), Duration::ZERO);
        assert_eq!(config.store.redis_url, "redis://127.0.0.1:6379");
        assert_eq!(config.store.keyword_prefix, "keywords:");
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = SearchConfig::from_toml_str(
            r#"
            [ranker]
            top_n = 10
            deduplicate = true
            "#,
        )
        .unwrap();

        assert_eq!(config.ranker.top_n, 10);
        assert!(config.ranker.deduplicate);
        assert_eq!(config.store, StoreConfig::default());
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[store]\nredis_url = \"redis://cache:6380\"\n\n[ranker]\ncatalog_ttl_secs = 30"
        )
        .unwrap();

        let config = SearchConfig::from_file(file.path()).unwrap();
        assert_eq!(config.store.redis_url, "redis://cache:6380");
        assert_eq!(config.ranker.catalog_ttl(), Duration::from_secs(30));
    }

    #[test]
    fn test_invalid_toml() {
        let err = SearchConfig::from_toml_str("[ranker]\ntop_n = \"many\"").unwrap_err();
        assert!(matches!(err, RetrievalError::Toml(_)));
    }

    #[test]
    fn test_empty_redis_url_rejected() {
        let err = SearchConfig::from_toml_str("[store]\nredis_url = \"\"").unwrap_err();
        assert!(matches!(err, RetrievalError::Config(_)));
    }

    #[test]
    fn test_env_overrides_host_and_port() {
        let env: HashMap<&str, &str> = [("REDIS_HOST", "redis.internal"), ("REDIS_PORT", "7000")]
            .into_iter()
            .collect();
        let config = SearchConfig::default()
            .with_overrides_from(|name| env.get(name).map(ToString::to_string));

        assert_eq!(config.store.redis_url, "redis://redis.internal:7000");
    }

    #[test]
    fn test_env_overrides_prefer_url() {
        let env: HashMap<&str, &str> = [("REDIS_URL", "redis://a:1"), ("REDIS_HOST", "b")]
            .into_iter()
            .collect();
        let config = SearchConfig::default()
            .with_overrides_from(|name| env.get(name).map(ToString::to_string));

        assert_eq!(config.store.redis_url, "redis://a:1");
    }

    #[test]
    fn test_env_overrides_default_port() {
        let config = SearchConfig::default().with_overrides_from(|name| {
            (name == "REDIS_HOST").then(|| "localhost".to_string())
        });
        assert_eq!(config.store.redis_url, "redis://localhost:6379");
    }
}
