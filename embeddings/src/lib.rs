//! # Embeddings
//!
//! This crate provides embedding generation and similarity scoring for the
//! raglite answering service.
//!
//! ## Features
//!
//! - **Embedding Generation**: Convert text to dense vectors with an
//!   in-process MiniLM model (`local` feature) or through any
//!   OpenAI-compatible `/embeddings` endpoint
//! - **Similarity**: Cosine similarity with a documented `NaN` policy for
//!   zero-norm vectors
//! - **Index**: An insertion-ordered index whose best-match scan keeps the
//!   first entry on ties
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    Embeddings System                            │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  EmbeddingProvider ──► Embedding ──► SimilarityIndex            │
//! │       │                                   │                     │
//! │       ▼                                   ▼                     │
//! │  local MiniLM / OpenAI API        cosine_similarity             │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod error;
pub mod index;
#[cfg(feature = "local")]
pub mod local;
pub mod provider;
pub mod similarity;

pub use error::{EmbeddingError, Result};
pub use index::SimilarityIndex;
#[cfg(feature = "local")]
pub use local::LocalProvider;
pub use provider::{EmbeddingProvider, EmbeddingRequest, EmbeddingResponse, OpenAIProvider};
pub use similarity::{SimilarityResult, cosine_similarity, is_valid_score};

/// A dense vector embedding.
pub type Embedding = Vec<f32>;
