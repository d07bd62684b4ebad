//! Nearest-document lookup.

use raglite_embeddings::EmbeddingError;

use crate::document::Document;
use crate::index::DocumentIndex;

/// The best-scoring document for a query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Match<'a> {
    pub document: &'a Document,
    pub score: f64,
}

/// Find the document whose embedding is most similar to `query_embedding`.
///
/// Scans in collection order and only replaces the current best on a
/// strictly greater score, so the earliest document wins ties. `NaN` scores
/// (zero-norm vectors) never match. Returns `None` for an empty index.
pub fn find_best<'a>(
    query_embedding: &[f32],
    index: &'a DocumentIndex,
) -> Result<Option<Match<'a>>, EmbeddingError> {
    let Some(best) = index.similarity_index().best_match(query_embedding)? else {
        return Ok(None);
    };

    Ok(index.get(&best.id).map(|document| Match {
        document,
        score: best.score,
    }))
}
