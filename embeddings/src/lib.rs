//! # Embeddings
//!
//! This crate provides read access to precomputed keyword embeddings and the
//! vector math used to compare them.
//!
//! ## Features
//!
//! - **Store Access**: Read serialized vectors from Redis or an in-memory map
//! - **Decoding**: Turn bracketed, whitespace-separated text into `f32` vectors
//! - **Catalog**: Index-aligned keyword and vector sequences with a shared dimension
//! - **Similarity**: Cosine similarity and descending candidate ranking
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    Embeddings System                            │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  EmbeddingStore ──► EmbeddingAccessor ──► Catalog               │
//! │       │                    │                 │                  │
//! │       ▼                    ▼                 ▼                  │
//! │  Redis/InMemory       codec::parse      score_catalog           │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod accessor;
pub mod cache;
pub mod catalog;
pub mod codec;
pub mod error;
pub mod similarity;
pub mod store;

pub use accessor::EmbeddingAccessor;
pub use cache::CatalogCache;
pub use catalog::Catalog;
pub use codec::{format_embedding, parse_embedding};
pub use error::{EmbeddingError, Result};
pub use similarity::{ScoredMatch, cosine_similarity, score_catalog};
pub use store::{EmbeddingStore, InMemoryEmbeddingStore, RedisEmbeddingStore};

/// A dense vector embedding.
pub type Embedding = Vec<f32>;

/// Redis hash that holds keyword embeddings.
pub const DEFAULT_EMBEDDINGS_KEY: &str = "embeddings";
