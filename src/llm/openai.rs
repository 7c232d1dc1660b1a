use async_trait::async_trait;
use serde::Deserialize;

use super::{ChatCompleter, ChatMessage, ChatRequest, LlmError};

pub struct OpenAiChatCompleter {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl OpenAiChatCompleter {
    pub fn new(client: reqwest::Client, base_url: String, api_key: Option<String>) -> Self {
        Self {
            client,
            base_url,
            api_key,
        }
    }
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChatMessage,
}

#[async_trait]
impl ChatCompleter for OpenAiChatCompleter {
    async fn complete(&self, request: ChatRequest) -> Result<ChatMessage, LlmError> {
        let api_key = self.api_key.as_ref().ok_or(LlmError::NotConfigured)?;

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| LlmError::RequestFailed(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::RequestFailed(format!("{status}: {body}")));
        }

        let parsed: CompletionResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message)
            .ok_or_else(|| LlmError::InvalidResponse("no choices in completion response".to_string()))
    }
}
