//! Error types for the embeddings system.

use thiserror::Error;

/// Result type alias for embedding operations.
pub type Result<T> = std::result::Result<T, EmbeddingError>;

/// Errors that can occur in the embeddings system.
#[derive(Error, Debug)]
pub enum EmbeddingError {
    /// Two vectors, or a vector and a catalog, disagree on dimension.
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Keys and vectors of a catalog are not index-aligned.
    #[error("catalog misaligned: {keys} keys but {vectors} vectors")]
    CatalogMisaligned { keys: usize, vectors: usize },

    /// A stored vector could not be decoded.
    #[error("malformed vector encoding: {0}")]
    MalformedVector(String),

    /// The backing store could not be read.
    #[error("embedding store unavailable: {0}")]
    StoreUnavailable(String),
}

impl From<redis::RedisError> for EmbeddingError {
    fn from(err: redis::RedisError) -> Self {
        Self::StoreUnavailable(err.to_string())
    }
}
