use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// HTTP error envelope for the chat API. Mirrors the `{success, error}`
/// shape `tools::ToolResult` uses for a failed tool call, so a client
/// sees the same failure shape whether the turn failed before dispatch
/// (bad request) or a tool inside the turn failed (reported in `trace`).
#[derive(Debug, Serialize)]
struct ErrorBody {
    success: bool,
    error: String,
}

#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    message: String,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            success: false,
            error: self.message,
        };
        (self.status, Json(body)).into_response()
    }
}
