//! Agent Orchestrator (C5): owns one session's transcript and SOP cache,
//! and runs the bounded LLM/tool-call loop for a single turn.

mod conversation;
mod prompt;

pub use conversation::Conversation;

use std::time::{Duration, Instant};

use serde::Serialize;
use serde_json::Value;
use tokio::time::timeout;
use tracing::{error, warn};

use crate::llm::{ChatCompleter, ChatMessage, ChatRequest};
use crate::metrics;
use crate::sop::{self, SopCache};
use crate::store::Store;
use crate::tools::{self, ToolContext, ToolResult};
use crate::vector::VectorClient;

#[derive(Debug, Clone, Serialize)]
pub struct ToolInvocation {
    pub tool: String,
    pub arguments: Value,
    pub result: ToolResult,
}

#[derive(Debug, Clone, Serialize)]
pub struct TurnResult {
    pub reply: String,
    pub trace: Vec<ToolInvocation>,
}

/// Per-turn bounds, sourced from `AppConfig`.
pub struct TurnLimits {
    pub max_iterations: usize,
    pub max_tool_calls_per_turn: usize,
    pub llm_timeout: Duration,
    pub tool_timeout: Duration,
    pub turn_deadline: Duration,
}

/// Owns exactly one session's conversation state. Constructed once per
/// session by the HTTP layer; never shared across sessions.
pub struct AgentOrchestrator {
    conversation: Conversation,
    sop_cache: SopCache,
}

impl Default for AgentOrchestrator {
    fn default() -> Self {
        Self::new()
    }
}

impl AgentOrchestrator {
    pub fn new() -> Self {
        Self {
            conversation: Conversation::new(),
            sop_cache: SopCache::new(),
        }
    }

    /// Runs one turn under an overall deadline; on expiry the in-progress
    /// tool future is dropped (transactional writes roll back on drop) and
    /// a timeout apology is returned with whatever trace accumulated.
    pub async fn handle_turn(
        &mut self,
        user_message: &str,
        llm: &dyn ChatCompleter,
        model: &str,
        store: &Store,
        vector: &VectorClient,
        limits: &TurnLimits,
    ) -> TurnResult {
        let started = Instant::now();
        let mut iterations = 0usize;
        let result = timeout(
            limits.turn_deadline,
            self.run_turn(user_message, llm, model, store, vector, limits, &mut iterations),
        )
        .await;

        match result {
            Ok(result) => {
                metrics::record_turn("completed", iterations as u32, started.elapsed().as_secs_f64());
                result
            }
            Err(_) => {
                warn!("turn deadline exceeded");
                metrics::record_turn_timeout();
                metrics::record_turn("timed_out", iterations as u32, started.elapsed().as_secs_f64());
                TurnResult {
                    reply: prompt::TIMEOUT_APOLOGY.to_string(),
                    trace: Vec::new(),
                }
            }
        }
    }

    async fn run_turn(
        &mut self,
        user_message: &str,
        llm: &dyn ChatCompleter,
        model: &str,
        store: &Store,
        vector: &VectorClient,
        limits: &TurnLimits,
        iterations: &mut usize,
    ) -> TurnResult {
        self.conversation.push(ChatMessage::user(user_message));

        let sop_injection = sop::relevant_procedures(vector, &mut self.sop_cache, user_message).await;

        let mut outgoing = Vec::with_capacity(self.conversation.history().len() + 2);
        outgoing.push(ChatMessage::system(prompt::SYSTEM_PROMPT));
        if let Some(sop_text) = sop_injection {
            outgoing.push(ChatMessage::system(sop_text));
        }
        outgoing.extend(self.conversation.history().iter().cloned());

        let tool_schemas = tools::schema::as_json_schemas();
        let ctx = ToolContext { store, vector };

        let mut trace = Vec::new();
        let mut tool_calls_this_turn = 0usize;

        for _ in 0..limits.max_iterations {
            *iterations += 1;
            let llm_started = Instant::now();
            let request = ChatRequest::new(model, outgoing.clone(), tool_schemas.clone());
            let response = match timeout(limits.llm_timeout, llm.complete(request)).await {
                Ok(Ok(message)) => {
                    metrics::record_llm_call(llm_started.elapsed().as_secs_f64());
                    message
                }
                Ok(Err(e)) => {
                    error!(error = %e, "LLM call failed");
                    metrics::record_llm_error("request_failed");
                    return TurnResult {
                        reply: format!("Error: {e}"),
                        trace,
                    };
                }
                Err(_) => {
                    warn!("LLM call timed out");
                    metrics::record_llm_error("timeout");
                    return TurnResult {
                        reply: "Error: the assistant took too long to respond".to_string(),
                        trace,
                    };
                }
            };

            let tool_calls = response.tool_calls.clone().filter(|calls| !calls.is_empty());

            let Some(tool_calls) = tool_calls else {
                let reply = response
                    .content
                    .clone()
                    .unwrap_or_else(|| prompt::EMPTY_REPLY_FALLBACK.to_string());
                self.conversation.push(response);
                return TurnResult { reply, trace };
            };

            outgoing.push(response.clone());
            self.conversation.push(response);

            for tool_call in &tool_calls {
                tool_calls_this_turn += 1;

                let arguments: Value = serde_json::from_str(&tool_call.function.arguments)
                    .unwrap_or_else(|_| Value::String(tool_call.function.arguments.clone()));

                let tool_started = Instant::now();
                let result = if tool_calls_this_turn > limits.max_iterations * limits.max_tool_calls_per_turn {
                    ToolResult::failure("tool call budget exhausted for this turn")
                } else {
                    match timeout(
                        limits.tool_timeout,
                        tools::dispatch(&tool_call.function.name, &tool_call.function.arguments, &ctx),
                    )
                    .await
                    {
                        Ok(result) => result,
                        Err(_) => ToolResult::failure("tool call timed out"),
                    }
                };
                metrics::record_tool_call(
                    &tool_call.function.name,
                    result.success,
                    tool_started.elapsed().as_secs_f64(),
                );

                let result_json = serde_json::to_string(&result).unwrap_or_else(|_| "{}".to_string());
                let tool_message = ChatMessage::tool_result(
                    tool_call.id.clone(),
                    tool_call.function.name.clone(),
                    result_json,
                );
                outgoing.push(tool_message.clone());
                self.conversation.push(tool_message);

                trace.push(ToolInvocation {
                    tool: tool_call.function.name.clone(),
                    arguments,
                    result,
                });
            }
        }

        TurnResult {
            reply: prompt::ITERATION_CAP_APOLOGY.to_string(),
            trace,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{FunctionCall, Role, ToolCall};

    fn limits() -> TurnLimits {
        TurnLimits {
            max_iterations: 5,
            max_tool_calls_per_turn: 10,
            llm_timeout: Duration::from_secs(5),
            tool_timeout: Duration::from_secs(5),
            turn_deadline: Duration::from_secs(10),
        }
    }

    #[test]
    fn tool_call_budget_matches_iterations_times_per_turn_cap() {
        let limits = limits();
        assert_eq!(limits.max_iterations * limits.max_tool_calls_per_turn, 50);
    }

    #[test]
    fn assistant_with_empty_tool_call_list_is_treated_as_plain_reply() {
        let msg = ChatMessage::assistant(Some("done".to_string()), Some(Vec::<ToolCall>::new()));
        assert!(msg.tool_calls.clone().filter(|c| !c.is_empty()).is_none());
    }

    #[test]
    fn tool_call_with_content_still_counts_as_a_tool_turn() {
        let call = ToolCall {
            id: "call_1".to_string(),
            r#type: "function".to_string(),
            function: FunctionCall {
                name: "order_status".to_string(),
                arguments: "{\"order_id\": 1}".to_string(),
            },
        };
        let msg = ChatMessage::assistant(None, Some(vec![call]));
        assert_eq!(msg.role, Role::Assistant);
        assert!(msg.tool_calls.clone().filter(|c| !c.is_empty()).is_some());
    }
}
