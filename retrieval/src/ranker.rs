//! Similar-keyword ranking.
//!
//! Each query keyword is compared against the full catalog by cosine
//! similarity. The per-keyword lists are concatenated, sorted once and cut to
//! the requested size, so a catalog keyword that scores well against several
//! query keywords can appear more than once.

use std::collections::HashSet;

use futures::future::join_all;
use headlines_embeddings::{
    Catalog, EmbeddingAccessor, EmbeddingStore, ScoredMatch, score_catalog,
    similarity::sort_descending,
};
use tracing::{debug, warn};

use crate::config::RankerConfig;
use crate::error::Result;

/// Number of keywords returned when the caller does not say otherwise.
pub const DEFAULT_TOP_N: usize = 25;

/// Outcome of looking up one query keyword.
#[derive(Debug, Clone, PartialEq)]
pub enum KeywordLookup {
    /// The keyword has an embedding; catalog matches, highest first.
    Resolved(Vec<ScoredMatch>),

    /// No usable embedding is stored for the keyword.
    Unknown,

    /// Reading the keyword's embedding failed.
    Unavailable(String),
}

/// A query keyword that contributed no candidates.
#[derive(Debug, Clone, PartialEq)]
pub struct UnresolvedKeyword {
    pub keyword: String,
    pub reason: UnresolvedReason,
}

#[derive(Debug, Clone, PartialEq)]
pub enum UnresolvedReason {
    Unknown,
    Unavailable(String),
}

/// Result of a batch ranking call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RankReport {
    /// Matched keywords, best first, at most `top_n`.
    pub matches: Vec<String>,

    /// Query keywords that were skipped, in query order.
    pub unresolved: Vec<UnresolvedKeyword>,
}

/// Ranks catalog keywords by similarity to a batch of query keywords.
pub struct SimilarityRanker<S> {
    accessor: EmbeddingAccessor<S>,
    config: RankerConfig,
}

impl<S: EmbeddingStore> SimilarityRanker<S> {
    /// Create a ranker over `store` with default settings.
    pub fn new(store: S) -> Self {
        Self::with_config(store, RankerConfig::default())
    }

    /// Create a ranker over `store`.
    pub fn with_config(store: S, config: RankerConfig) -> Self {
        let accessor = EmbeddingAccessor::new(store).with_catalog_ttl(config.catalog_ttl());
        Self { accessor, config }
    }

    pub fn config(&self) -> &RankerConfig {
        &self.config
    }

    pub fn accessor(&self) -> &EmbeddingAccessor<S> {
        &self.accessor
    }

    /// Every catalog keyword scored against `word`, highest first.
    ///
    /// An unknown word or an empty catalog gives an empty list.
    pub async fn top_similar_vectors(&self, word: &str) -> Result<Vec<ScoredMatch>> {
        let word = word.to_lowercase();
        let catalog = self.accessor.get_all_embeddings().await?;
        let target = self.accessor.get_embedding(&word).await?;

        match target {
            Some(target) if !catalog.is_empty() => {
                score_catalog(&target, &catalog).map_err(Into::into)
            }
            _ => Ok(Vec::new()),
        }
    }

    /// Rank catalog keywords against every keyword in `keywords`.
    ///
    /// The catalog is read once for the whole batch. Embedding lookups for
    /// the query keywords run concurrently. A keyword that is unknown or whose
    /// lookup fails is reported in [`RankReport::unresolved`] and otherwise
    /// ignored. Catalog read failures and dimension mismatches fail the call.
    pub async fn top_matches_for_keywords<K: AsRef<str>>(
        &self,
        keywords: &[K],
        top_n: usize,
    ) -> Result<RankReport> {
        let keywords: Vec<String> = keywords
            .iter()
            .map(|k| k.as_ref().to_lowercase())
            .collect();
        if keywords.is_empty() {
            return Ok(RankReport::default());
        }

        let catalog = self.accessor.get_all_embeddings().await?;
        let lookups = self.lookup_all(&keywords, &catalog).await?;

        let mut merged = Vec::new();
        let mut unresolved = Vec::new();
        for (keyword, lookup) in keywords.into_iter().zip(lookups) {
            match lookup {
                KeywordLookup::Resolved(matches) => merged.extend(matches),
                KeywordLookup::Unknown => unresolved.push(UnresolvedKeyword {
                    keyword,
                    reason: UnresolvedReason::Unknown,
                }),
                KeywordLookup::Unavailable(reason) => unresolved.push(UnresolvedKeyword {
                    keyword,
                    reason: UnresolvedReason::Unavailable(reason),
                }),
            }
        }

        sort_descending(&mut merged);
        if self.config.deduplicate {
            let mut seen = HashSet::new();
            merged.retain(|m| seen.insert(m.keyword.clone()));
        }

        let matches: Vec<String> = merged
            .into_iter()
            .take(top_n)
            .map(|m| m.keyword)
            .collect();

        debug!(
            "Ranked {} matches, {} query keywords unresolved",
            matches.len(),
            unresolved.len()
        );
        Ok(RankReport {
            matches,
            unresolved,
        })
    }

    /// The `top_n` catalog keywords most similar to `keywords`.
    pub async fn rank_similar_keywords<K: AsRef<str>>(
        &self,
        keywords: &[K],
        top_n: usize,
    ) -> Result<Vec<String>> {
        let report = self.top_matches_for_keywords(keywords, top_n).await?;
        for skipped in &report.unresolved {
            debug!("Skipped query keyword {:?}: {:?}", skipped.keyword, skipped.reason);
        }
        Ok(report.matches)
    }

    /// [`Self::rank_similar_keywords`] with the configured `top_n`.
    pub async fn rank<K: AsRef<str>>(&self, keywords: &[K]) -> Result<Vec<String>> {
        self.rank_similar_keywords(keywords, self.config.top_n).await
    }

    /// Fetch the query embeddings concurrently, then score each one.
    async fn lookup_all(
        &self,
        keywords: &[String],
        catalog: &Catalog,
    ) -> Result<Vec<KeywordLookup>> {
        let targets = join_all(keywords.iter().map(|k| self.accessor.get_embedding(k))).await;

        let mut lookups = Vec::with_capacity(targets.len());
        for (keyword, target) in keywords.iter().zip(targets) {
            let lookup = match target {
                Ok(Some(target)) => KeywordLookup::Resolved(score_catalog(&target, catalog)?),
                Ok(None) => KeywordLookup::Unknown,
                Err(e) => {
                    warn!("Embedding lookup for {keyword:?} failed: {e}");
                    KeywordLookup::Unavailable(e.to_string())
                }
            };
            lookups.push(lookup);
        }
        Ok(lookups)
    }
}
