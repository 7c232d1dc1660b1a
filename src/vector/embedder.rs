use async_trait::async_trait;
use serde::Deserialize;

use super::VectorError;

/// Produces a dense embedding vector for a piece of text. Abstracted behind
/// a trait so the retriever and the chat client can share the same HTTP
/// client/timeout conventions while keeping the embedding model choice
/// swappable — the dimension is a constructor parameter, never hardcoded.
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, VectorError>;
}

/// Embeds queries via the same OpenAI-compatible HTTP API the chat client
/// talks to.
pub struct OpenAiEmbedder {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl OpenAiEmbedder {
    pub fn new(client: reqwest::Client, base_url: String, api_key: String) -> Self {
        Self {
            client,
            base_url,
            api_key,
            model: "text-embedding-3-small".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

#[async_trait]
impl Embedder for OpenAiEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, VectorError> {
        let response = self
            .client
            .post(format!("{}/embeddings", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&serde_json::json!({
                "model": self.model,
                "input": text,
            }))
            .send()
            .await
            .map_err(|e| VectorError::EmbeddingFailed(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(VectorError::EmbeddingFailed(format!("{status}: {body}")));
        }

        let parsed: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| VectorError::EmbeddingFailed(e.to_string()))?;

        parsed
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or_else(|| VectorError::EmbeddingFailed("empty embedding response".to_string()))
    }
}
