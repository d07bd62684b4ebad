//! Similarity index for nearest-neighbor lookups.
//!
//! Entries keep their insertion order, and [`SimilarityIndex::best_match`]
//! scans them in that order. A later entry replaces the current best only
//! with a strictly greater score, so ties go to the earliest entry.

use indexmap::IndexMap;
use tracing::debug;

use crate::Embedding;
use crate::error::{EmbeddingError, Result};
use crate::similarity::{SimilarityResult, cosine_similarity, is_valid_score};

/// An insertion-ordered, read-mostly index of embeddings.
#[derive(Debug, Clone, Default)]
pub struct SimilarityIndex {
    /// Stored embeddings, keyed by id.
    entries: IndexMap<String, Embedding>,

    /// Expected dimension. Fixed by the first insert when not given upfront.
    dimension: Option<usize>,
}

impl SimilarityIndex {
    /// Create an empty index that adopts the dimension of its first entry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty index with a fixed dimension.
    #[cfg(test)]
    fn with_dimension(dimension: usize) -> Self {
        Self {
            entries: IndexMap::new(),
            dimension: Some(dimension),
        }
    }

    /// Add an embedding to the index.
    ///
    /// Ids must be unique; re-inserting an id is an error rather than an
    /// overwrite, because overwriting would silently move the entry's
    /// position in the scan order.
    pub fn insert(&mut self, id: impl Into<String>, embedding: Embedding) -> Result<()> {
        let id = id.into();

        self.check_dimension(&embedding)?;
        if self.entries.contains_key(&id) {
            return Err(EmbeddingError::DuplicateEntry(id));
        }

        if self.dimension.is_none() {
            self.dimension = Some(embedding.len());
        }
        debug!("Added embedding to index: {id}");
        self.entries.insert(id, embedding);

        Ok(())
    }

    /// Get an embedding by ID.
    pub fn get(&self, id: &str) -> Option<&Embedding> {
        self.entries.get(id)
    }

    /// Check if an ID exists in the index.
    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    /// Get the number of entries in the index.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the index is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Dimension of the stored embeddings, if known yet.
    pub fn dimension(&self) -> Option<usize> {
        self.dimension
    }

    /// Iterate entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Embedding)> {
        self.entries.iter().map(|(id, e)| (id.as_str(), e))
    }

    /// Find the entry most similar to `query`.
    ///
    /// Returns `None` for an empty index, or when every score is `NaN`
    /// (zero-norm query or entries).
    pub fn best_match(&self, query: &[f32]) -> Result<Option<SimilarityResult>> {
        self.check_dimension(query)?;

        let mut best: Option<(&str, f64)> = None;
        let mut best_score = f64::NEG_INFINITY;

        for (id, embedding) in &self.entries {
            let score = cosine_similarity(query, embedding)?;
            if is_valid_score(score) && score > best_score {
                best_score = score;
                best = Some((id.as_str(), score));
            }
        }

        Ok(best.map(|(id, score)| SimilarityResult::new(id, score)))
    }

    fn check_dimension(&self, embedding: &[f32]) -> Result<()> {
        match self.dimension {
            Some(expected) if expected != embedding.len() => {
                Err(EmbeddingError::DimensionMismatch {
                    expected,
                    actual: embedding.len(),
                })
            }
            _ => Ok(()),
        }
    }
}
