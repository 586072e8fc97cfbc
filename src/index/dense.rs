//! Dense semantic nearest-neighbor index.

use std::sync::Arc;

use crate::chunk::Chunk;
use crate::errors::EngineError;
use crate::oracle::EmbeddingOracle;

use super::rank_by_cosine;

/// Embeds every chunk once at build time; `search` embeds the query and
/// returns the k nearest chunks by cosine similarity.
pub struct DenseIndex {
    embeddings: Arc<Vec<Vec<f32>>>,
    embedder: Arc<dyn EmbeddingOracle>,
}

impl DenseIndex {
    pub async fn build(
        chunks: &[Chunk],
        embedder: Arc<dyn EmbeddingOracle>,
    ) -> Result<Self, EngineError> {
        let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
        let embeddings = if texts.is_empty() {
            Vec::new()
        } else {
            embedder.embed(&texts).await?
        };

        tracing::debug!(rows = embeddings.len(), "dense index built");
        Ok(Self {
            embeddings: Arc::new(embeddings),
            embedder,
        })
    }

    /// The chunk embedding matrix, shared with the diversity index.
    pub fn embeddings(&self) -> Arc<Vec<Vec<f32>>> {
        Arc::clone(&self.embeddings)
    }

    pub async fn search(&self, query: &str, k: usize) -> Result<Vec<(usize, f32)>, EngineError> {
        if self.embeddings.is_empty() || k == 0 {
            return Ok(Vec::new());
        }

        let query_vec = self.embedder.embed_one(query).await?;
        let mut ranked = rank_by_cosine(&query_vec, &self.embeddings);
        ranked.truncate(k);
        Ok(ranked)
    }
}
