use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::state::AppState;
use crate::orchestrator::ToolInvocation;
use crate::utils::response::AppError;
use crate::vector::ConnectionStatus;

#[derive(Debug, Deserialize)]
pub struct ChatRequestBody {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ChatResponseBody {
    pub reply: String,
    pub trace: Vec<ToolInvocation>,
}

/// `POST /chat/:session_id` — runs one turn of the agent loop for the given
/// session, creating the session if this is the first message seen for it.
pub async fn chat(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
    Json(body): Json<ChatRequestBody>,
) -> Result<Json<ChatResponseBody>, AppError> {
    if body.message.trim().is_empty() {
        return Err(AppError::bad_request("message must not be empty"));
    }

    let result = state.handle_turn(&session_id, &body.message).await;

    Ok(Json(ChatResponseBody {
        reply: result.reply,
        trace: result.trace,
    }))
}

#[derive(Debug, Serialize)]
pub struct HealthBody {
    pub status: &'static str,
    pub database: &'static str,
    pub vector_index: &'static str,
    pub active_sessions: usize,
}

/// `GET /health` — liveness/readiness probe. The database is required, so
/// its failure marks the whole service unhealthy; the vector index is
/// allowed to be absent or down without failing the probe, matching the
/// store/vector split the rest of the crate draws between a required and
/// an optional dependency.
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthBody> {
    let db_ok = state.store.is_healthy().await;
    let vector_status = state.vector.collection_info().await.status;

    Json(HealthBody {
        status: if db_ok { "ok" } else { "degraded" },
        database: if db_ok { "connected" } else { "unreachable" },
        vector_index: match vector_status {
            ConnectionStatus::Connected => "connected",
            ConnectionStatus::Disconnected => "disconnected",
            ConnectionStatus::Error => "error",
        },
        active_sessions: state.session_count(),
    })
}
