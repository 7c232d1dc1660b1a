//! Tool Catalog (C3): declarative schemas for the nine customer-support
//! tools plus the executor that binds each tool name to a C1/C2 operation
//! and normalizes the result into a uniform envelope.

mod dispatch;
mod error;
mod handlers;
pub mod schema;

pub use dispatch::{dispatch, ToolContext};
pub use error::ToolError;

use serde::Serialize;
use serde_json::{Map, Value};

/// Uniform tool-result envelope: `{success, message?, error?, ...payload}`.
/// The payload fields are flattened alongside `success`/`message`/`error`
/// rather than nested, matching the reference tool implementations'
/// flat dictionaries.
#[derive(Debug, Clone, Serialize)]
pub struct ToolResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(flatten)]
    pub payload: Map<String, Value>,
}

impl ToolResult {
    pub fn success(message: impl Into<String>, payload: Map<String, Value>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            error: None,
            payload,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            message: None,
            error: Some(error.into()),
            payload: Map::new(),
        }
    }

    pub fn failure_with(error: impl Into<String>, payload: Map<String, Value>) -> Self {
        Self {
            success: false,
            message: None,
            error: Some(error.into()),
            payload,
        }
    }
}
