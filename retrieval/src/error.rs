//! Error types for ranking and headline retrieval.

use headlines_embeddings::EmbeddingError;
use thiserror::Error;

/// Result type alias for retrieval operations.
pub type Result<T> = std::result::Result<T, RetrievalError>;

/// Errors that can occur while ranking keywords or resolving headlines.
#[derive(Error, Debug)]
pub enum RetrievalError {
    /// Embedding access or comparison error.
    #[error("embedding error: {0}")]
    Embedding(#[from] EmbeddingError),

    /// The headline store could not be read.
    #[error("headline store unavailable: {0}")]
    StoreUnavailable(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Configuration file could not be parsed.
    #[error("invalid configuration file: {0}")]
    Toml(#[from] toml::de::Error),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl RetrievalError {
    /// Whether the error means a backing store could not be reached.
    pub fn is_store_unavailable(&self) -> bool {
        matches!(
            self,
            Self::StoreUnavailable(_) | Self::Embedding(EmbeddingError::StoreUnavailable(_))
        )
    }
}

impl From<redis::RedisError> for RetrievalError {
    fn from(err: redis::RedisError) -> Self {
        Self::StoreUnavailable(err.to_string())
    }
}
