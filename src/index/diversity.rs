//! Diversity-maximizing index (maximal marginal relevance).
//!
//! Same embedding space as the dense index, but selection penalizes
//! redundancy with already-picked results, cutting down the near-duplicate
//! evidence that pure similarity ranking tends to return.

use std::sync::Arc;

use crate::errors::EngineError;
use crate::oracle::EmbeddingOracle;

use super::{cosine_similarity, rank_by_cosine};

/// Relevance/redundancy trade-off. 1.0 would collapse to pure similarity.
const MMR_LAMBDA: f32 = 0.5;
/// Candidate pool size as a multiple of k.
const POOL_FACTOR: usize = 3;

pub struct DiversityIndex {
    embeddings: Arc<Vec<Vec<f32>>>,
    embedder: Arc<dyn EmbeddingOracle>,
}

impl DiversityIndex {
    /// Shares the dense index's embedding matrix; nothing is re-embedded.
    pub fn new(embeddings: Arc<Vec<Vec<f32>>>, embedder: Arc<dyn EmbeddingOracle>) -> Self {
        Self {
            embeddings,
            embedder,
        }
    }

    /// Select k results by MMR from a pool of the `3×k` most relevant
    /// candidates: each step picks the candidate maximizing
    /// `λ·relevance − (1−λ)·max_similarity_to_selected`.
    pub async fn search(&self, query: &str, k: usize) -> Result<Vec<(usize, f32)>, EngineError> {
        if self.embeddings.is_empty() || k == 0 {
            return Ok(Vec::new());
        }

        let query_vec = self.embedder.embed_one(query).await?;
        let mut pool = rank_by_cosine(&query_vec, &self.embeddings);
        pool.truncate(k.saturating_mul(POOL_FACTOR));

        let mut selected: Vec<(usize, f32)> = Vec::with_capacity(k);
        while selected.len() < k && !pool.is_empty() {
            let mut best_pos = 0;
            let mut best_score = f32::NEG_INFINITY;
            for (pos, &(idx, relevance)) in pool.iter().enumerate() {
                let redundancy = selected
                    .iter()
                    .map(|&(sel_idx, _)| {
                        cosine_similarity(&self.embeddings[idx], &self.embeddings[sel_idx])
                    })
                    .fold(0.0f32, f32::max);
                let score = MMR_LAMBDA * relevance - (1.0 - MMR_LAMBDA) * redundancy;
                if score > best_score {
                    best_score = score;
                    best_pos = pos;
                }
            }
            let (idx, _) = pool.remove(best_pos);
            selected.push((idx, best_score));
        }

        Ok(selected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::StubEmbedder;

    #[tokio::test]
    async fn mmr_skips_near_duplicates() {
        // Chunks 0 and 1 are near-identical; 2 is distinct but still
        // relevant. Pure similarity would return [0, 1]; MMR prefers [0, 2].
        let embeddings = Arc::new(vec![
            vec![1.0, 0.0, 0.0],
            vec![1.0, 0.0, 0.0],
            vec![0.0, 1.0, 0.0],
        ]);
        let embedder = Arc::new(StubEmbedder::mapped(&[("q", &[1.0, 0.2, 0.0])]));
        let index = DiversityIndex::new(embeddings, embedder);

        let hits = index.search("q", 2).await.unwrap();
        let ids: Vec<usize> = hits.iter().map(|&(id, _)| id).collect();
        assert_eq!(ids, vec![0, 2]);
    }

    #[tokio::test]
    async fn returns_fewer_when_corpus_is_small() {
        let embeddings = Arc::new(vec![vec![1.0, 0.0]]);
        let embedder = Arc::new(StubEmbedder::mapped(&[("q", &[1.0, 0.0])]));
        let index = DiversityIndex::new(embeddings, embedder);

        let hits = index.search("q", 5).await.unwrap();
        assert_eq!(hits.len(), 1);
    }

    #[tokio::test]
    async fn empty_matrix_yields_empty_result() {
        let embedder = Arc::new(StubEmbedder::hashed(4));
        let index = DiversityIndex::new(Arc::new(Vec::new()), embedder);
        assert!(index.search("q", 3).await.unwrap().is_empty());
    }
}
