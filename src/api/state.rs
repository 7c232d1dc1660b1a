use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use tokio::sync::Mutex;

use crate::config::AppConfig;
use crate::llm::ChatCompleter;
use crate::orchestrator::{AgentOrchestrator, TurnLimits, TurnResult};
use crate::store::Store;
use crate::vector::VectorClient;

/// Everything a request handler needs: the two C1/C2 adapters, the LLM
/// seam, and one `AgentOrchestrator` per session id. Sessions are kept only
/// for the life of the process — nothing about a conversation is persisted.
pub struct AppState {
    pub config: AppConfig,
    pub store: Store,
    pub vector: VectorClient,
    pub llm: Arc<dyn ChatCompleter>,
    sessions: DashMap<String, Arc<Mutex<AgentOrchestrator>>>,
}

impl AppState {
    pub fn new(config: AppConfig, store: Store, vector: VectorClient, llm: Arc<dyn ChatCompleter>) -> Self {
        Self {
            config,
            store,
            vector,
            llm,
            sessions: DashMap::new(),
        }
    }

    fn turn_limits(&self) -> TurnLimits {
        TurnLimits {
            max_iterations: self.config.max_iterations as usize,
            max_tool_calls_per_turn: self.config.max_tool_calls_per_turn as usize,
            llm_timeout: Duration::from_secs(self.config.llm_timeout_secs),
            tool_timeout: Duration::from_secs(self.config.db_timeout_secs.max(self.config.vector_timeout_secs)),
            turn_deadline: Duration::from_secs(self.config.turn_deadline_secs),
        }
    }

    /// Runs one turn for `session_id`, creating a fresh orchestrator the
    /// first time a session id is seen. Holds the per-session lock for the
    /// duration of the turn, so a session processes at most one message at
    /// a time while unrelated sessions proceed in parallel. The DashMap
    /// shard guard is dropped before awaiting the per-session lock so a
    /// slow turn never blocks unrelated sessions hashed to the same shard.
    pub async fn handle_turn(&self, session_id: &str, message: &str) -> TurnResult {
        let limits = self.turn_limits();
        let session = self
            .sessions
            .entry(session_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(AgentOrchestrator::new())))
            .clone();
        let mut orchestrator = session.lock().await;
        orchestrator
            .handle_turn(
                message,
                self.llm.as_ref(),
                &self.config.openai_model,
                &self.store,
                &self.vector,
                &limits,
            )
            .await
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }
}
