//! The answering service: direct and augmented answers over the index.

use std::future::Future;
use std::sync::Arc;

use raglite_completion::{CompletionProvider, GroundedPrompt};
use raglite_embeddings::{Embedding, EmbeddingProvider};
use tracing::{debug, info};

use crate::config::AnswerConfig;
use crate::document::Document;
use crate::error::{AnswerError, Result};
use crate::index::DocumentIndex;
use crate::retriever::{Match, find_best};

/// An answer together with the document it was drawn from.
#[derive(Debug, Clone, PartialEq)]
pub struct Answer {
    /// Text returned to the caller.
    pub message: String,

    /// Id of the best-matching document.
    pub document_id: String,

    /// Similarity between the query and that document.
    pub score: f64,
}

/// Orchestrates embedding, retrieval and completion for a single query.
///
/// Immutable once built; share it behind an `Arc` across requests.
pub struct AnsweringService {
    index: DocumentIndex,
    embedder: Arc<dyn EmbeddingProvider>,
    completion: Option<Arc<dyn CompletionProvider>>,
    config: AnswerConfig,
}

impl AnsweringService {
    /// Start building a service around an embedding provider.
    pub fn builder(embedder: Arc<dyn EmbeddingProvider>) -> AnsweringServiceBuilder {
        AnsweringServiceBuilder::new(embedder)
    }

    /// The document index.
    pub fn index(&self) -> &DocumentIndex {
        &self.index
    }

    /// Whether augmented answers are available.
    pub fn has_completion(&self) -> bool {
        self.completion.is_some()
    }

    /// Return the best-matching document's text verbatim.
    pub async fn answer_direct(&self, query: &str) -> std::result::Result<Answer, AnswerError> {
        let best = self.retrieve(query).await?;
        debug!(
            "Direct answer from document {} (score {:.4})",
            best.document.id, best.score
        );

        Ok(Answer {
            message: best.document.text.clone(),
            document_id: best.document.id.clone(),
            score: best.score,
        })
    }

    /// Ask the completion provider to answer using only the best-matching
    /// document as context.
    ///
    /// Fails with [`AnswerError::CompletionNotConfigured`] before any
    /// embedding or network call when no completion provider is set.
    pub async fn answer_augmented(&self, query: &str) -> std::result::Result<Answer, AnswerError> {
        let completion = self
            .completion
            .as_ref()
            .ok_or(AnswerError::CompletionNotConfigured)?;

        let best = self.retrieve(query).await?;
        debug!(
            "Augmenting with document {} (score {:.4}) via {}",
            best.document.id,
            best.score,
            completion.name()
        );

        let prompt = GroundedPrompt::new(&best.document.text, query);
        let message = self
            .bounded(
                "completion request",
                completion.complete(&prompt.system, &prompt.user),
            )
            .await??;

        Ok(Answer {
            message,
            document_id: best.document.id.clone(),
            score: best.score,
        })
    }

    async fn retrieve(&self, query: &str) -> std::result::Result<Match<'_>, AnswerError> {
        let query_embedding: Embedding = self
            .bounded("embedding request", self.embedder.embed_text(query))
            .await??;

        find_best(&query_embedding, &self.index)?.ok_or(AnswerError::NoMatch)
    }

    /// Run an external call under the configured timeout.
    async fn bounded<T>(
        &self,
        operation: &'static str,
        call: impl Future<Output = T>,
    ) -> std::result::Result<T, AnswerError> {
        tokio::time::timeout(self.config.request_timeout(), call)
            .await
            .map_err(|_| AnswerError::Timeout { operation })
    }
}

/// Builder for [`AnsweringService`].
pub struct AnsweringServiceBuilder {
    embedder: Arc<dyn EmbeddingProvider>,
    completion: Option<Arc<dyn CompletionProvider>>,
    config: AnswerConfig,
}

impl AnsweringServiceBuilder {
    pub fn new(embedder: Arc<dyn EmbeddingProvider>) -> Self {
        Self {
            embedder,
            completion: None,
            config: AnswerConfig::default(),
        }
    }

    /// Enable augmented answers through `completion`.
    pub fn with_completion(mut self, completion: Arc<dyn CompletionProvider>) -> Self {
        self.completion = Some(completion);
        self
    }

    /// Set the service configuration.
    pub fn with_config(mut self, config: AnswerConfig) -> Self {
        self.config = config;
        self
    }

    /// Embed `documents` and build the service.
    pub async fn build(self, documents: Vec<Document>) -> Result<AnsweringService> {
        let index = DocumentIndex::build(documents, self.embedder.as_ref()).await?;
        Ok(self.build_with_index(index))
    }

    /// Build the service around an existing index.
    pub fn build_with_index(self, index: DocumentIndex) -> AnsweringService {
        info!(
            "Answering service ready: {} documents, augmented mode {}",
            index.len(),
            if self.completion.is_some() {
                "enabled"
            } else {
                "disabled"
            }
        );

        AnsweringService {
            index,
            embedder: self.embedder,
            completion: self.completion,
            config: self.config,
        }
    }
}
