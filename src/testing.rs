//! Deterministic oracle stubs for unit tests.

use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::errors::EngineError;
use crate::oracle::{EmbeddingOracle, GenerationOracle};

/// Embedding stub. Texts with an explicit mapping get that vector; anything
/// else gets a hashed bag-of-words vector, so lexically similar texts land
/// near each other.
pub struct StubEmbedder {
    explicit: HashMap<String, Vec<f32>>,
    dim: usize,
    pub embed_calls: AtomicUsize,
    fail: AtomicBool,
}

impl StubEmbedder {
    pub fn hashed(dim: usize) -> Self {
        Self {
            explicit: HashMap::new(),
            dim,
            embed_calls: AtomicUsize::new(0),
            fail: AtomicBool::new(false),
        }
    }

    pub fn mapped(pairs: &[(&str, &[f32])]) -> Self {
        let explicit: HashMap<String, Vec<f32>> = pairs
            .iter()
            .map(|(text, vec)| (text.to_string(), vec.to_vec()))
            .collect();
        let dim = pairs.first().map_or(8, |(_, v)| v.len());
        Self {
            explicit,
            dim,
            embed_calls: AtomicUsize::new(0),
            fail: AtomicBool::new(false),
        }
    }

    pub fn calls(&self) -> usize {
        self.embed_calls.load(Ordering::SeqCst)
    }

    pub fn set_fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    fn vector_for(&self, text: &str) -> Vec<f32> {
        if let Some(vec) = self.explicit.get(text) {
            return vec.clone();
        }
        let mut vec = vec![0.0f32; self.dim];
        for token in text
            .to_lowercase()
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
        {
            let mut hasher = DefaultHasher::new();
            token.hash(&mut hasher);
            vec[(hasher.finish() as usize) % self.dim] += 1.0;
        }
        vec
    }
}

#[async_trait]
impl EmbeddingOracle for StubEmbedder {
    fn name(&self) -> &str {
        "stub-embedder"
    }

    async fn embed(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>, EngineError> {
        self.embed_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(EngineError::Embedding("stub failure".to_string()));
        }
        Ok(inputs.iter().map(|text| self.vector_for(text)).collect())
    }
}

/// Generation stub: records every prompt, replies with a canned answer.
pub struct StubLlm {
    pub reply: String,
    pub prompts: Mutex<Vec<String>>,
    pub fail: bool,
}

impl StubLlm {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
            prompts: Mutex::new(Vec::new()),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            reply: String::new(),
            prompts: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn prompt_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.prompts.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl GenerationOracle for StubLlm {
    fn name(&self) -> &str {
        "stub-llm"
    }

    async fn complete(&self, prompt: &str) -> Result<String, EngineError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        if self.fail {
            return Err(EngineError::Generation("oracle unreachable".to_string()));
        }
        Ok(self.reply.clone())
    }
}
