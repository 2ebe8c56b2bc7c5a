//! # Retrieval
//!
//! Similar-keyword ranking and headline lookup for the headline search
//! service.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                       Search Service                            │
//! ├─────────────────────────────────────────────────────────────────┤
//! │                                                                  │
//! │  ┌──────────────────┐              ┌──────────────────┐         │
//! │  │ SimilarityRanker │   keywords   │ HeadlineResolver │         │
//! │  │ (embeddings)     │ ───────────► │ (headline store) │         │
//! │  └──────────────────┘              └──────────────────┘         │
//! │           │                                 │                   │
//! │           ▼                                 ▼                   │
//! │    EmbeddingStore                     HeadlineStore             │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use headlines_retrieval::{SearchConfig, SearchService};
//!
//! let config = SearchConfig::default().with_env_overrides();
//! let service = SearchService::connect(&config).await?;
//!
//! let headlines = service.similar(&["election"]).await?;
//! ```

pub mod config;
pub mod error;
pub mod headlines;
pub mod ranker;
pub mod search;

pub use config::{RankerConfig, SearchConfig, StoreConfig};
pub use error::{Result, RetrievalError};
pub use headlines::{HeadlineResolver, HeadlineStore, InMemoryHeadlineStore, RedisHeadlineStore};
pub use ranker::{
    DEFAULT_TOP_N, KeywordLookup, RankReport, SimilarityRanker, UnresolvedKeyword,
    UnresolvedReason,
};
pub use search::SearchService;

// Re-export from dependencies for convenience
pub use headlines_embeddings::{
    EmbeddingStore, InMemoryEmbeddingStore, RedisEmbeddingStore, ScoredMatch,
};
