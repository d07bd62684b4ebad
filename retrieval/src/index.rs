//! The document index: every document with its precomputed embedding.

use indexmap::IndexMap;
use raglite_embeddings::{Embedding, EmbeddingProvider, EmbeddingRequest, SimilarityIndex};
use tracing::{debug, info};

use crate::document::Document;
use crate::error::{Result, RetrievalError};

/// Number of documents sent to the embedder per batch.
const EMBED_BATCH_SIZE: usize = 64;

/// Mapping from document id to (document, embedding), in collection order.
///
/// Built once at startup and read-only afterwards, so it can be shared
/// across concurrent requests without locking.
#[derive(Debug, Clone, Default)]
pub struct DocumentIndex {
    documents: IndexMap<String, Document>,
    embeddings: SimilarityIndex,
}

impl DocumentIndex {
    /// Embed every document and index it.
    pub async fn build(documents: Vec<Document>, embedder: &dyn EmbeddingProvider) -> Result<Self> {
        info!(
            "Embedding {} documents with {} ({})",
            documents.len(),
            embedder.name(),
            embedder.default_model()
        );

        let mut index = Self::default();
        let mut pending = documents.into_iter().peekable();

        while pending.peek().is_some() {
            let batch: Vec<Document> = pending.by_ref().take(EMBED_BATCH_SIZE).collect();
            let requests = batch
                .iter()
                .map(|doc| EmbeddingRequest::new(doc.text.as_str()))
                .collect();

            let responses = embedder.embed_batch(requests).await?;
            if responses.len() != batch.len() {
                return Err(RetrievalError::EmbeddingCount {
                    expected: batch.len(),
                    actual: responses.len(),
                });
            }

            for (document, response) in batch.into_iter().zip(responses) {
                index.insert(document, response.embedding)?;
            }
        }

        info!(
            "Document index ready: {} documents, dimension {:?}",
            index.len(),
            index.dimension()
        );
        Ok(index)
    }

    /// Build an index from documents whose embeddings are already known.
    pub fn from_embedded(entries: impl IntoIterator<Item = (Document, Embedding)>) -> Result<Self> {
        let mut index = Self::default();
        for (document, embedding) in entries {
            index.insert(document, embedding)?;
        }
        Ok(index)
    }

    fn insert(&mut self, document: Document, embedding: Embedding) -> Result<()> {
        if self.documents.contains_key(&document.id) {
            return Err(RetrievalError::DuplicateDocument(document.id));
        }

        self.embeddings.insert(document.id.as_str(), embedding)?;
        debug!("Indexed document {}", document.id);
        self.documents.insert(document.id.clone(), document);
        Ok(())
    }

    /// Get a document by id.
    pub fn get(&self, id: &str) -> Option<&Document> {
        self.documents.get(id)
    }

    /// Get a document's embedding by id.
    pub fn embedding(&self, id: &str) -> Option<&Embedding> {
        self.embeddings.get(id)
    }

    /// Iterate documents in collection order.
    pub fn documents(&self) -> impl Iterator<Item = &Document> {
        self.documents.values()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Embedding dimension, unknown until the first document is indexed.
    pub fn dimension(&self) -> Option<usize> {
        self.embeddings.dimension()
    }

    pub(crate) fn similarity_index(&self) -> &SimilarityIndex {
        &self.embeddings
    }
}
