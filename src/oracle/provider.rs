use async_trait::async_trait;

use crate::errors::EngineError;

/// `embed(text) -> fixed-length vector`, assumed deterministic per model
/// version. Failures surface as [`EngineError::Embedding`].
#[async_trait]
pub trait EmbeddingOracle: Send + Sync {
    /// provider name for diagnostics (e.g. "openai-compat")
    fn name(&self) -> &str;

    /// embed a batch of texts, one vector per input, order preserved
    async fn embed(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>, EngineError>;

    /// embed a single query string
    async fn embed_one(&self, input: &str) -> Result<Vec<f32>, EngineError> {
        let mut vectors = self.embed(std::slice::from_ref(&input.to_string())).await?;
        vectors
            .pop()
            .ok_or_else(|| EngineError::Embedding("oracle returned no vector".to_string()))
    }
}

/// `complete(prompt) -> text`, no streaming. Failures surface as
/// [`EngineError::Generation`].
#[async_trait]
pub trait GenerationOracle: Send + Sync {
    fn name(&self) -> &str;

    async fn complete(&self, prompt: &str) -> Result<String, EngineError>;
}
