use serde_json::Value;
use tracing::{info, warn};

use crate::store::Store;
use crate::vector::VectorClient;

use super::{handlers, schema, ToolError, ToolResult};

/// Borrowed handles to everything a tool might need, assembled once per
/// turn by the orchestrator.
pub struct ToolContext<'a> {
    pub store: &'a Store,
    pub vector: &'a VectorClient,
}

/// Parses `arguments_json`, validates it against the tool's declared
/// required fields, dispatches to the bound handler, and catches every
/// error into the uniform failure envelope. Never panics, never returns an
/// `Err` — this is the authoritative boundary between the planner's
/// unvalidated tool calls and the side-effecting handlers.
pub async fn dispatch(name: &str, arguments_json: &str, ctx: &ToolContext<'_>) -> ToolResult {
    info!(tool = name, "dispatching tool call");
    match dispatch_inner(name, arguments_json, ctx).await {
        Ok(result) => {
            info!(tool = name, success = result.success, "tool call completed");
            result
        }
        Err(e) => {
            warn!(tool = name, error = %e, "tool call failed");
            ToolResult::failure(e.to_string())
        }
    }
}

async fn dispatch_inner(
    name: &str,
    arguments_json: &str,
    ctx: &ToolContext<'_>,
) -> Result<ToolResult, ToolError> {
    let spec = schema::find(name).ok_or_else(|| ToolError::UnknownTool(name.to_string()))?;

    let arguments: Value = serde_json::from_str(arguments_json)
        .map_err(|e| ToolError::InvalidArguments(format!("malformed JSON arguments: {e}")))?;

    validate_required(spec, &arguments)?;

    match name {
        "draft_order" => handlers::draft_order(ctx.store, &arguments).await,
        "create_order" => handlers::create_order(ctx.store, &arguments).await,
        "order_status" => handlers::order_status(ctx.store, &arguments).await,
        "product_catalog" => handlers::product_catalog(ctx.store, &arguments).await,
        "check_inventory" => handlers::check_inventory(ctx.store, &arguments).await,
        "estimate_shipping" => handlers::estimate_shipping(ctx.store, &arguments).await,
        "create_support_ticket" => handlers::create_support_ticket(ctx.store, &arguments).await,
        "initiate_return" => handlers::initiate_return(ctx.store, &arguments).await,
        "search_knowledge_base" => handlers::search_knowledge_base(ctx.vector, &arguments).await,
        other => Err(ToolError::UnknownTool(other.to_string())),
    }
}

fn validate_required(spec: &schema::ToolSpec, arguments: &Value) -> Result<(), ToolError> {
    let obj = arguments.as_object();
    for field in spec.required {
        let present = obj
            .and_then(|o| o.get(*field))
            .map_or(false, |v| !v.is_null());
        if !present {
            return Err(ToolError::InvalidArguments(format!(
                "missing required field: {field}"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_tool_name_has_no_schema() {
        assert!(schema::find("order_status").is_some());
        assert!(schema::find("teleport_package").is_none());
    }

    #[test]
    fn missing_required_field_is_rejected() {
        let spec = schema::find("order_status").unwrap();
        let args = serde_json::json!({});
        assert!(validate_required(spec, &args).is_err());
    }

    #[test]
    fn present_required_field_passes() {
        let spec = schema::find("order_status").unwrap();
        let args = serde_json::json!({"order_id": 42});
        assert!(validate_required(spec, &args).is_ok());
    }

    #[test]
    fn no_required_fields_always_passes() {
        let spec = schema::find("draft_order").unwrap();
        assert!(validate_required(spec, &serde_json::json!({})).is_ok());
    }
}
