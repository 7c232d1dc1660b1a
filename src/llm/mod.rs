//! LLM Client (C1): a thin, swappable seam over the chat-completions
//! provider. The orchestrator only ever talks to `ChatCompleter`.

mod error;
mod openai;
mod types;

pub use error::LlmError;
pub use openai::OpenAiChatCompleter;
pub use types::*;

use async_trait::async_trait;

#[async_trait]
pub trait ChatCompleter: Send + Sync {
    async fn complete(&self, request: ChatRequest) -> Result<ChatMessage, LlmError>;
}

#[cfg(test)]
pub mod test_support {
    use super::*;
    use std::sync::Mutex;

    /// Replays a fixed sequence of responses, one per call. Panics if asked
    /// for more calls than it was given responses — that's a test bug, not a
    /// production fallback.
    pub struct ScriptedCompleter {
        responses: Mutex<Vec<ChatMessage>>,
    }

    impl ScriptedCompleter {
        pub fn new(responses: Vec<ChatMessage>) -> Self {
            let mut responses = responses;
            responses.reverse();
            Self {
                responses: Mutex::new(responses),
            }
        }
    }

    #[async_trait]
    impl ChatCompleter for ScriptedCompleter {
        async fn complete(&self, _request: ChatRequest) -> Result<ChatMessage, LlmError> {
            self.responses
                .lock()
                .unwrap()
                .pop()
                .ok_or(LlmError::InvalidResponse("scripted completer exhausted".to_string()))
        }
    }
}
