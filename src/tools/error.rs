/// Errors a tool handler can return. Every variant is caught at the
/// dispatch boundary and turned into a `ToolResult::failure(...)` — nothing
/// here is ever allowed to propagate past `tools::dispatch`.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("unknown tool: {0}")]
    UnknownTool(String),

    #[error("invalid arguments: {0}")]
    InvalidArguments(String),

    #[error(transparent)]
    Store(#[from] crate::store::StoreError),

    #[error(transparent)]
    Vector(#[from] crate::vector::VectorError),
}
