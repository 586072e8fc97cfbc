//! The document question-answering engine.
//!
//! Holds at most one [`DocumentGeneration`] at a time. `ingest` builds the
//! next generation fully off-lock and swaps it in atomically; `ask`
//! snapshots the current generation, so a query observes the old or the new
//! document in full, never a mix.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;

use crate::chunk::{Chunk, Segment};
use crate::chunking::chunk_segments;
use crate::classify::classify;
use crate::config::EngineConfig;
use crate::errors::EngineError;
use crate::index::{DenseIndex, DiversityIndex, KeywordIndex};
use crate::oracle::{EmbeddingOracle, GenerationOracle, OpenAiCompatOracle};
use crate::{context, fusion, prompt};

/// Fixed response for `ask` against an empty engine. Not an error.
pub const NO_DOCUMENT_ANSWER: &str = "Please add a document first.";

/// One ingested document's chunk set and indexes, an atomic unit.
pub struct DocumentGeneration {
    chunks: Vec<Chunk>,
    dense: DenseIndex,
    diversity: DiversityIndex,
    keyword: Option<KeywordIndex>,
    ingested_at: DateTime<Utc>,
}

impl DocumentGeneration {
    async fn build(
        chunks: Vec<Chunk>,
        embedder: Arc<dyn EmbeddingOracle>,
    ) -> Result<Self, EngineError> {
        let dense = DenseIndex::build(&chunks, Arc::clone(&embedder)).await?;
        let diversity = DiversityIndex::new(dense.embeddings(), embedder);
        let keyword = KeywordIndex::build(&chunks);
        if keyword.is_none() {
            tracing::warn!("keyword index unavailable, fusion will use semantic strategies only");
        }

        Ok(Self {
            chunks,
            dense,
            diversity,
            keyword,
            ingested_at: Utc::now(),
        })
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }
}

/// Diagnostic snapshot of the engine.
#[derive(Debug, Clone, Serialize)]
pub struct EngineStatus {
    pub ready: bool,
    pub chunk_count: usize,
    pub keyword_index: bool,
    pub ingested_at: Option<DateTime<Utc>>,
}

pub struct RagEngine {
    config: EngineConfig,
    embedder: Arc<dyn EmbeddingOracle>,
    llm: Arc<dyn GenerationOracle>,
    current: RwLock<Option<Arc<DocumentGeneration>>>,
}

impl RagEngine {
    pub fn new(
        config: EngineConfig,
        embedder: Arc<dyn EmbeddingOracle>,
        llm: Arc<dyn GenerationOracle>,
    ) -> Self {
        Self {
            config,
            embedder,
            llm,
            current: RwLock::new(None),
        }
    }

    /// Wire both oracles to the configured OpenAI-compatible endpoints.
    pub fn from_config(config: EngineConfig) -> Result<Self, EngineError> {
        let oracle = OpenAiCompatOracle::new(&config.oracle)?;
        Ok(Self::new(
            config,
            Arc::new(oracle.clone()),
            Arc::new(oracle),
        ))
    }

    /// Ingest a parsed document: re-chunk, build the three indexes, swap the
    /// generation. Any failure leaves the previous generation current.
    ///
    /// Returns the number of chunks in the new generation.
    pub async fn ingest(&self, segments: &[Segment]) -> Result<usize, EngineError> {
        let chunks = chunk_segments(segments, &self.config.chunking)?;
        let generation =
            Arc::new(DocumentGeneration::build(chunks, Arc::clone(&self.embedder)).await?);
        let chunk_count = generation.chunk_count();

        let mut guard = self.current.write().await;
        *guard = Some(generation);
        drop(guard);

        tracing::info!(chunk_count, "document ingested, generation swapped");
        Ok(chunk_count)
    }

    /// Answer a question against the currently loaded document.
    pub async fn ask(&self, query: &str) -> Result<String, EngineError> {
        // Snapshot under shared access; a concurrent ingest cannot tear it.
        let generation = self.current.read().await.clone();
        let Some(generation) = generation else {
            tracing::warn!("ask with no document loaded");
            return Ok(NO_DOCUMENT_ANSWER.to_string());
        };

        let profile = classify(query);
        tracing::info!(
            class = profile.class.as_str(),
            target_count = profile.target_count,
            description = profile.description,
            "query classified"
        );

        let timeout = self.config.retrieval_timeout_secs.map(Duration::from_secs);
        let fused = fusion::retrieve(
            &generation.dense,
            &generation.diversity,
            generation.keyword.as_ref(),
            query,
            &profile,
            timeout,
        )
        .await?;

        let evidence: Vec<&Chunk> = fused
            .iter()
            .filter_map(|&id| generation.chunks.get(id))
            .collect();
        tracing::info!(
            retrieved = evidence.len(),
            class = profile.class.as_str(),
            "retrieved evidence chunks"
        );
        for (rank, chunk) in evidence.iter().enumerate() {
            tracing::debug!(rank, chunk_id = chunk.id, preview = %preview(&chunk.text), "evidence");
        }
        if let Some(source) = evidence.first().and_then(|chunk| chunk.source()) {
            tracing::info!(document = source, "answering against document");
        }

        let evidence_context = context::assemble(evidence.into_iter());
        let full_prompt = prompt::build_prompt(query, &evidence_context);
        self.llm.complete(&full_prompt).await
    }

    /// Drop the current generation; the engine returns to the empty state.
    pub async fn clear(&self) {
        let mut guard = self.current.write().await;
        *guard = None;
        drop(guard);
        tracing::info!("session cleared");
    }

    pub async fn status(&self) -> EngineStatus {
        let guard = self.current.read().await;
        match guard.as_ref() {
            Some(generation) => EngineStatus {
                ready: true,
                chunk_count: generation.chunk_count(),
                keyword_index: generation.keyword.is_some(),
                ingested_at: Some(generation.ingested_at),
            },
            None => EngineStatus {
                ready: false,
                chunk_count: 0,
                keyword_index: false,
                ingested_at: None,
            },
        }
    }
}

fn preview(text: &str) -> String {
    const PREVIEW_CHARS: usize = 120;
    if text.chars().count() <= PREVIEW_CHARS {
        text.to_string()
    } else {
        let cut: String = text.chars().take(PREVIEW_CHARS).collect();
        format!("{cut}...")
    }
}
