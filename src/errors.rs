use thiserror::Error;

/// Engine-level failure taxonomy.
///
/// Every variant is distinguishable so the embedding application can map it
/// to a transport status of its choosing. The engine never retries; transient
/// oracle failures are the caller's problem.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Malformed or empty segment input; the current generation is untouched.
    #[error("segmentation input error: {0}")]
    SegmentationInput(String),
    /// Embedding oracle failure during index build or query embedding.
    #[error("embedding error: {0}")]
    Embedding(String),
    /// Keyword index build or query failure.
    #[error("keyword index error: {0}")]
    KeywordIndex(String),
    /// Generation oracle failure; surfaced verbatim.
    #[error("generation error: {0}")]
    Generation(String),
    /// The joint fan-in barrier did not complete within the configured window.
    #[error("retrieval timed out")]
    RetrievalTimeout,
    #[error("internal error: {0}")]
    Internal(String),
}

impl EngineError {
    pub fn embedding<E: std::fmt::Display>(err: E) -> Self {
        EngineError::Embedding(err.to_string())
    }

    pub fn generation<E: std::fmt::Display>(err: E) -> Self {
        EngineError::Generation(err.to_string())
    }

    pub fn internal<E: std::fmt::Display>(err: E) -> Self {
        EngineError::Internal(err.to_string())
    }
}
