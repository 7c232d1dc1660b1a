//! Vector Retriever (C2): embeds text queries and returns top-K scored
//! knowledge-base passages over a Qdrant-compatible REST collection.

mod embedder;
mod error;

pub use embedder::{Embedder, OpenAiEmbedder};
pub use error::VectorError;

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

use crate::metrics;

pub const DEFAULT_SEARCH_LIMIT: usize = 5;
pub const DEFAULT_SCORE_THRESHOLD: f32 = 0.7;

/// One scored knowledge-base chunk, with its free-form payload intact so
/// callers can pull out whichever metadata fields they need (title,
/// content, audience, doc_type, category, url, ...).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeHit {
    pub id: serde_json::Value,
    pub score: f32,
    pub payload: serde_json::Value,
}

impl KnowledgeHit {
    pub fn payload_str(&self, field: &str) -> Option<&str> {
        self.payload.get(field).and_then(|v| v.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct CollectionInfo {
    pub status: ConnectionStatus,
    pub points_count: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
    Connected,
    Disconnected,
    Error,
}

/// Wraps a pooled `reqwest::Client` pointed at a Qdrant REST endpoint.
/// Absence of `QDRANT_URL`/`QDRANT_API_KEY` at construction yields a client
/// permanently in the disconnected state rather than failing startup — the
/// vector index is allowed to be absent.
pub struct VectorClient {
    http: reqwest::Client,
    base_url: Option<String>,
    api_key: Option<String>,
    collection: String,
    embedder: Option<Arc<dyn Embedder>>,
}

impl VectorClient {
    pub fn new(
        http: reqwest::Client,
        base_url: Option<String>,
        api_key: Option<String>,
        collection: String,
        embedder: Option<Arc<dyn Embedder>>,
    ) -> Self {
        Self {
            http,
            base_url,
            api_key,
            collection,
            embedder,
        }
    }

    fn is_connected(&self) -> bool {
        self.base_url.is_some() && self.api_key.is_some() && self.embedder.is_some()
    }

    /// Embeds `query` and issues a cosine-similarity search against the
    /// knowledge collection, dropping results below `score_threshold` when
    /// provided.
    pub async fn search_by_text(
        &self,
        query: &str,
        limit: usize,
        score_threshold: Option<f32>,
    ) -> Result<Vec<KnowledgeHit>, VectorError> {
        let (Some(base_url), Some(api_key), Some(embedder)) =
            (&self.base_url, &self.api_key, &self.embedder)
        else {
            return Err(VectorError::NotConnected);
        };

        let started = Instant::now();
        let vector = embedder.embed(query).await?;

        #[derive(Serialize)]
        struct SearchBody {
            vector: Vec<f32>,
            limit: usize,
            #[serde(skip_serializing_if = "Option::is_none")]
            score_threshold: Option<f32>,
            with_payload: bool,
        }

        #[derive(Deserialize)]
        struct SearchResponse {
            result: Vec<KnowledgeHit>,
        }

        let url = format!("{base_url}/collections/{}/points/search", self.collection);
        let response = self
            .http
            .post(&url)
            .header("api-key", api_key)
            .json(&SearchBody {
                vector,
                limit,
                score_threshold,
                with_payload: true,
            })
            .send()
            .await
            .map_err(|e| VectorError::SearchFailed(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(VectorError::SearchFailed(format!("{status}: {body}")));
        }

        let parsed: SearchResponse = response
            .json()
            .await
            .map_err(|e| VectorError::SearchFailed(e.to_string()))?;

        metrics::record_vector_search(started.elapsed().as_secs_f64());
        debug!(hits = parsed.result.len(), %query, "vector search completed");
        Ok(parsed.result)
    }

    pub async fn collection_info(&self) -> CollectionInfo {
        if !self.is_connected() {
            return CollectionInfo {
                status: ConnectionStatus::Disconnected,
                points_count: None,
            };
        }

        let base_url = self.base_url.as_ref().unwrap();
        let api_key = self.api_key.as_ref().unwrap();
        let url = format!("{base_url}/collections/{}", self.collection);

        #[derive(Deserialize)]
        struct InfoResult {
            points_count: Option<u64>,
        }
        #[derive(Deserialize)]
        struct InfoResponse {
            result: InfoResult,
        }

        match self.http.get(&url).header("api-key", api_key).send().await {
            Ok(response) if response.status().is_success() => {
                match response.json::<InfoResponse>().await {
                    Ok(parsed) => CollectionInfo {
                        status: ConnectionStatus::Connected,
                        points_count: parsed.result.points_count,
                    },
                    Err(e) => {
                        warn!(error = %e, "failed to parse collection info response");
                        CollectionInfo {
                            status: ConnectionStatus::Error,
                            points_count: None,
                        }
                    }
                }
            }
            Ok(response) => {
                warn!(status = %response.status(), "collection info request failed");
                CollectionInfo {
                    status: ConnectionStatus::Error,
                    points_count: None,
                }
            }
            Err(e) => {
                warn!(error = %e, "collection info request errored");
                CollectionInfo {
                    status: ConnectionStatus::Error,
                    points_count: None,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disconnected_client_reports_disconnected() {
        let client = VectorClient::new(
            reqwest::Client::new(),
            None,
            None,
            "knowledge_base".to_string(),
            None,
        );
        assert!(!client.is_connected());
    }
}
