//! # Retrieval
//!
//! This crate turns a static document collection into answers:
//!
//! - **Documents**: the `[{ id, text }]` collection loaded at startup
//! - **Document Index**: each document with its precomputed embedding
//! - **Retriever**: linear nearest-document scan by cosine similarity
//! - **Answering Service**: direct or completion-augmented answers
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      Answering Service                          │
//! ├─────────────────────────────────────────────────────────────────┤
//! │                                                                 │
//! │   query ──► EmbeddingProvider ──► find_best ──► DocumentIndex   │
//! │                                       │                         │
//! │                     ┌─────────────────┴──────────┐              │
//! │                     ▼                            ▼              │
//! │               direct: text              augmented: prompt ──►   │
//! │                                           CompletionProvider    │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use raglite_retrieval::{AnsweringService, load_collection};
//!
//! let documents = load_collection("data/documents.json").await?;
//! let service = AnsweringService::builder(embedder)
//!     .with_completion(completion)
//!     .build(documents)
//!     .await?;
//!
//! let answer = service.answer_direct("What is the capital of France?").await?;
//! ```

pub mod answer;
pub mod config;
pub mod document;
pub mod error;
pub mod index;
pub mod retriever;

pub use answer::{Answer, AnsweringService, AnsweringServiceBuilder};
pub use config::AnswerConfig;
pub use document::{Document, load_collection, parse_collection};
pub use error::{AnswerError, Result, RetrievalError};
pub use index::DocumentIndex;
pub use retriever::{Match, find_best};
