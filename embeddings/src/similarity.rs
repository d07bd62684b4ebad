//! Similarity computation for embeddings.

use serde::{Deserialize, Serialize};

use crate::error::{EmbeddingError, Result};

/// Compute the cosine similarity between two embeddings.
///
/// Returns a value between -1.0 and 1.0, where:
/// - 1.0 means identical direction
/// - 0.0 means orthogonal vectors
/// - -1.0 means opposite vectors
///
/// Sums run in `f64` so that scores which differ only past `f32` precision
/// still rank apart.
///
/// If either vector has zero magnitude the result is `NaN`. Callers treat a
/// `NaN` score as "no match"; see [`is_valid_score`].
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f64> {
    if a.len() != b.len() {
        return Err(EmbeddingError::DimensionMismatch {
            expected: a.len(),
            actual: b.len(),
        });
    }

    let dot_product: f64 = a
        .iter()
        .zip(b.iter())
        .map(|(&x, &y)| f64::from(x) * f64::from(y))
        .sum();
    let magnitude_a = squared_norm(a).sqrt();
    let magnitude_b = squared_norm(b).sqrt();

    Ok(dot_product / (magnitude_a * magnitude_b))
}

fn squared_norm(v: &[f32]) -> f64 {
    v.iter().map(|&x| f64::from(x) * f64::from(x)).sum()
}

/// Whether a similarity score can take part in ranking.
pub fn is_valid_score(score: f64) -> bool {
    !score.is_nan()
}

/// A similarity search result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityResult {
    /// ID of the matched item.
    pub id: String,

    /// Similarity score.
    pub score: f64,
}

impl SimilarityResult {
    /// Create a new similarity result.
    pub fn new(id: impl Into<String>, score: f64) -> Self {
        Self {
            id: id.into(),
            score,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-6;

    #[test]
    fn test_cosine_similarity_identical() {
        let a = vec![1.0, 0.0, 0.0];
        let b = vec![1.0, 0.0, 0.0];
        let sim = cosine_similarity(&a, &b).unwrap();
        assert!((sim - 1.0).abs() < EPSILON);
    }

    #[test]
    fn test_cosine_similarity_orthogonal() {
        let a = vec![1.0, 0.0, 0.0];
        let b = vec![0.0, 1.0, 0.0];
        let sim = cosine_similarity(&a, &b).unwrap();
        assert!(sim.abs() < EPSILON);
    }

    #[test]
    fn test_cosine_similarity_opposite() {
        let a = vec![1.0, 0.0, 0.0];
        let b = vec![-1.0, 0.0, 0.0];
        let sim = cosine_similarity(&a, &b).unwrap();
        assert!((sim + 1.0).abs() < EPSILON);
    }

    #[test]
    fn test_cosine_similarity_ignores_magnitude() {
        let a = vec![1.0, 2.0, 3.0];
        let b = vec![10.0, 20.0, 30.0];
        let sim = cosine_similarity(&a, &b).unwrap();
        assert!((sim - 1.0).abs() < EPSILON);
    }

    #[test]
    fn test_cosine_similarity_is_symmetric() {
        let pairs: [(&[f32], &[f32]); 3] = [
            (&[0.3, -1.2, 4.0], &[2.5, 0.1, -0.7]),
            (&[1.0, 1.0], &[-3.0, 0.5]),
            (&[0.0, 0.0, 2.0, 1.0], &[7.0, -1.0, 0.25, 0.0]),
        ];

        for (a, b) in pairs {
            let ab = cosine_similarity(a, b).unwrap();
            let ba = cosine_similarity(b, a).unwrap();
            assert_eq!(ab.to_bits(), ba.to_bits(), "a={a:?} b={b:?}");
        }
    }

    #[test]
    fn test_self_similarity_is_one() {
        let vectors: [&[f32]; 4] = [
            &[0.5],
            &[3.0, -4.0],
            &[0.001, 0.002, 0.003],
            &[-12.0, 7.5, 0.25, 100.0],
        ];

        for v in vectors {
            let sim = cosine_similarity(v, v).unwrap();
            assert!((sim - 1.0).abs() < 1e-5, "v={v:?} sim={sim}");
        }
    }

    #[test]
    fn test_similarity_stays_in_range() {
        let vectors: [&[f32]; 5] = [
            &[1.0, 2.0, 3.0],
            &[-1.0, -2.0, -3.0],
            &[0.1, -0.9, 0.4],
            &[1e3, 1e-3, -5.0],
            &[0.0, 0.0, 1.0],
        ];

        for a in vectors {
            for b in vectors {
                let sim = cosine_similarity(a, b).unwrap();
                assert!(
                    (-1.0 - EPSILON..=1.0 + EPSILON).contains(&sim),
                    "a={a:?} b={b:?} sim={sim}"
                );
            }
        }
    }

    #[test]
    fn test_nearly_parallel_vectors_stay_distinct() {
        let query = [1.0, 0.0];
        let wider = cosine_similarity(&query, &[1.0, 1e-4]).unwrap();
        let narrower = cosine_similarity(&query, &[1.0, 0.5e-4]).unwrap();

        assert!(wider < 1.0, "wider={wider}");
        assert!(narrower > wider, "narrower={narrower} wider={wider}");
    }

    #[test]
    fn test_zero_norm_is_nan() {
        let zero = vec![0.0, 0.0, 0.0];
        let a = vec![1.0, 2.0, 3.0];

        let sim = cosine_similarity(&zero, &a).unwrap();
        assert!(sim.is_nan());
        assert!(!is_valid_score(sim));

        let sim = cosine_similarity(&zero, &zero).unwrap();
        assert!(sim.is_nan());
    }

    #[test]
    fn test_dimension_mismatch() {
        let a = vec![1.0, 0.0];
        let b = vec![1.0, 0.0, 0.0];
        assert!(matches!(
            cosine_similarity(&a, &b),
            Err(EmbeddingError::DimensionMismatch {
                expected: 2,
                actual: 3
            })
        ));
    }
}
