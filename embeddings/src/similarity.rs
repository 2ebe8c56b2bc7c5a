//! Similarity computation for embeddings.

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::error::{EmbeddingError, Result};

/// Compute the cosine similarity between two embeddings.
///
/// Returns a value between -1.0 and 1.0, where:
/// - 1.0 means identical direction
/// - 0.0 means orthogonal vectors
/// - -1.0 means opposite vectors
///
/// A zero vector has no direction, so any comparison involving one scores
/// 0.0, including a zero vector against itself.
///
/// Sums are accumulated in `f64` so that components near the limits of `f32`
/// neither overflow nor underflow.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f32> {
    if a.len() != b.len() {
        return Err(EmbeddingError::DimensionMismatch {
            expected: a.len(),
            actual: b.len(),
        });
    }

    let dot_product: f64 = a
        .iter()
        .zip(b.iter())
        .map(|(x, y)| f64::from(*x) * f64::from(*y))
        .sum();
    let magnitude_a = magnitude(a);
    let magnitude_b = magnitude(b);

    if magnitude_a == 0.0 || magnitude_b == 0.0 {
        return Ok(0.0);
    }

    let similarity = (dot_product / (magnitude_a * magnitude_b)).clamp(-1.0, 1.0);
    Ok(similarity as f32)
}

fn magnitude(v: &[f32]) -> f64 {
    v.iter()
        .map(|x| f64::from(*x) * f64::from(*x))
        .sum::<f64>()
        .sqrt()
}

/// A keyword paired with its similarity to a query vector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredMatch {
    /// Matched catalog keyword.
    pub keyword: String,

    /// Cosine similarity to the query.
    pub score: f32,
}

impl ScoredMatch {
    /// Create a new scored match.
    pub fn new(keyword: impl Into<String>, score: f32) -> Self {
        Self {
            keyword: keyword.into(),
            score,
        }
    }
}

/// Sort matches by score, highest first.
///
/// The sort is stable: equal scores keep their relative order.
pub fn sort_descending(matches: &mut [ScoredMatch]) {
    matches.sort_by_key(|m| std::cmp::Reverse(OrderedFloat(m.score)));
}

/// Score every catalog entry against `target`, highest first.
///
/// The target's own keyword is not excluded; when present it scores 1.0.
pub fn score_catalog(target: &[f32], catalog: &Catalog) -> Result<Vec<ScoredMatch>> {
    let mut scored = Vec::with_capacity(catalog.len());

    for (keyword, embedding) in catalog.iter() {
        let score = cosine_similarity(target, embedding)?;
        scored.push(ScoredMatch::new(keyword, score));
    }

    sort_descending(&mut scored);
    Ok(scored)
}
