//! The three per-generation retrieval indexes.
//!
//! Each index is built once per ingest over the full chunk set and exposes a
//! `search` returning `(chunk_id, score)` pairs ordered by descending
//! relevance, at most `k` of them. An empty corpus yields an empty result,
//! never an error.

mod dense;
mod diversity;
mod keyword;

pub use dense::DenseIndex;
pub use diversity::DiversityIndex;
pub use keyword::KeywordIndex;

use std::cmp::Ordering;

pub(crate) fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    let denom = norm_a * norm_b;

    if denom <= f32::EPSILON {
        0.0
    } else {
        dot / denom
    }
}

/// Rank all candidate rows against a query vector, highest similarity first.
/// Ties break toward the lower chunk id for determinism.
pub(crate) fn rank_by_cosine(query: &[f32], rows: &[Vec<f32>]) -> Vec<(usize, f32)> {
    let mut scored: Vec<(usize, f32)> = rows
        .iter()
        .enumerate()
        .map(|(idx, row)| (idx, cosine_similarity(query, row)))
        .collect();

    scored.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.0.cmp(&b.0))
    });
    scored
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cosine_is_one_for_identical_vectors() {
        let v = vec![1.0, 2.0, 3.0];
        assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-5);
    }

    #[test]
    fn cosine_is_zero_for_orthogonal_or_degenerate_input() {
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]), 0.0);
        assert_eq!(cosine_similarity(&[], &[]), 0.0);
        assert_eq!(cosine_similarity(&[1.0], &[1.0, 2.0]), 0.0);
    }

    #[test]
    fn ranking_puts_highest_similarity_first() {
        let rows = vec![vec![0.8, 0.2], vec![0.1, 0.9], vec![0.9, 0.0]];
        let ranked = rank_by_cosine(&[1.0, 0.0], &rows);
        assert_eq!(ranked[0].0, 2);
        assert_eq!(ranked[2].0, 1);
    }
}
