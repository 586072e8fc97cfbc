use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};

use crate::config::OracleConfig;
use crate::errors::EngineError;

use super::provider::{EmbeddingOracle, GenerationOracle};

/// OpenAI-compatible HTTP adapter implementing both oracles.
///
/// Chat completions and embeddings may live on different hosts (a hosted
/// chat endpoint plus a local embedding server is the usual deployment).
#[derive(Clone)]
pub struct OpenAiCompatOracle {
    chat_base_url: String,
    chat_model: String,
    embed_base_url: String,
    embed_model: String,
    api_key: Option<String>,
    client: Client,
}

impl OpenAiCompatOracle {
    pub fn new(config: &OracleConfig) -> Result<Self, EngineError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(EngineError::internal)?;

        Ok(Self {
            chat_base_url: config.chat_base_url.trim_end_matches('/').to_string(),
            chat_model: config.chat_model.clone(),
            embed_base_url: config.embed_base_url.trim_end_matches('/').to_string(),
            embed_model: config.embed_model.clone(),
            api_key: config.api_key.clone(),
            client,
        })
    }

    fn authorize(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(key) => req.bearer_auth(key),
            None => req,
        }
    }
}

#[async_trait]
impl EmbeddingOracle for OpenAiCompatOracle {
    fn name(&self) -> &str {
        "openai-compat"
    }

    async fn embed(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>, EngineError> {
        let url = format!("{}/embeddings", self.embed_base_url);
        let body = json!({
            "model": self.embed_model,
            "input": inputs,
        });

        let res = self
            .authorize(self.client.post(&url).json(&body))
            .send()
            .await
            .map_err(EngineError::embedding)?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            return Err(EngineError::Embedding(format!(
                "embeddings endpoint returned {status}: {text}"
            )));
        }

        let payload: Value = res.json().await.map_err(EngineError::embedding)?;
        let mut embeddings = Vec::with_capacity(inputs.len());
        if let Some(data) = payload["data"].as_array() {
            for item in data {
                if let Some(vals) = item["embedding"].as_array() {
                    let vec: Vec<f32> = vals
                        .iter()
                        .filter_map(|v| v.as_f64().map(|f| f as f32))
                        .collect();
                    embeddings.push(vec);
                }
            }
        }

        if embeddings.len() != inputs.len() {
            return Err(EngineError::Embedding(format!(
                "expected {} vectors, got {}",
                inputs.len(),
                embeddings.len()
            )));
        }

        Ok(embeddings)
    }
}

#[async_trait]
impl GenerationOracle for OpenAiCompatOracle {
    fn name(&self) -> &str {
        "openai-compat"
    }

    async fn complete(&self, prompt: &str) -> Result<String, EngineError> {
        let url = format!("{}/chat/completions", self.chat_base_url);
        let body = json!({
            "model": self.chat_model,
            "messages": [{ "role": "user", "content": prompt }],
            "stream": false,
        });

        let res = self
            .authorize(self.client.post(&url).json(&body))
            .send()
            .await
            .map_err(EngineError::generation)?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            return Err(EngineError::Generation(format!(
                "chat endpoint returned {status}: {text}"
            )));
        }

        let payload: Value = res.json().await.map_err(EngineError::generation)?;
        let content = payload["choices"][0]["message"]["content"]
            .as_str()
            .unwrap_or_default()
            .to_string();

        if content.is_empty() {
            return Err(EngineError::Generation(
                "chat endpoint returned an empty completion".to_string(),
            ));
        }

        Ok(content)
    }
}
