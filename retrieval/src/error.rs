//! Error types for retrieval and answering.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for index construction.
pub type Result<T> = std::result::Result<T, RetrievalError>;

/// Errors raised while loading documents or building the index.
///
/// Every variant is an initialization failure: the service must not start.
#[derive(Error, Debug)]
pub enum RetrievalError {
    /// The document collection could not be read.
    #[error("failed to read document collection {}: {source}", .path.display())]
    CollectionRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The document collection is not a JSON array of `{ id, text }`.
    #[error("malformed document collection {}: {source}", .path.display())]
    CollectionParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// Two documents share an id.
    #[error("duplicate document id: {0}")]
    DuplicateDocument(String),

    /// The embedder returned a different number of vectors than requested.
    #[error("embedder returned {actual} embeddings for {expected} documents")]
    EmbeddingCount { expected: usize, actual: usize },

    /// Embedding error.
    #[error("embedding error: {0}")]
    Embedding(#[from] raglite_embeddings::EmbeddingError),
}

/// Errors raised while answering a single query.
#[derive(Error, Debug)]
pub enum AnswerError {
    /// Augmented mode was requested but no completion provider exists.
    #[error("completion API key not configured")]
    CompletionNotConfigured,

    /// The index is empty or no document produced a usable score.
    #[error("no matching document found")]
    NoMatch,

    /// An external call exceeded the request timeout.
    #[error("{operation} timed out")]
    Timeout { operation: &'static str },

    /// Embedding error.
    #[error("embedding error: {0}")]
    Embedding(raglite_embeddings::EmbeddingError),

    /// Completion error.
    #[error("completion error: {0}")]
    Completion(raglite_completion::CompletionError),
}

impl From<raglite_embeddings::EmbeddingError> for AnswerError {
    fn from(err: raglite_embeddings::EmbeddingError) -> Self {
        match err {
            raglite_embeddings::EmbeddingError::Timeout => Self::Timeout {
                operation: "embedding request",
            },
            other => Self::Embedding(other),
        }
    }
}

impl From<raglite_completion::CompletionError> for AnswerError {
    fn from(err: raglite_completion::CompletionError) -> Self {
        match err {
            raglite_completion::CompletionError::Timeout => Self::Timeout {
                operation: "completion request",
            },
            other => Self::Completion(other),
        }
    }
}
