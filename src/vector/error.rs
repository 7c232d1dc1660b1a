/// Errors raised by the vector retriever. All three are treated as
/// non-fatal by callers: the orchestrator and SOP injector proceed without
/// retrieved context, while `search_knowledge_base` surfaces the failure as
/// a tool result.
#[derive(Debug, thiserror::Error)]
pub enum VectorError {
    #[error("vector index not connected")]
    NotConnected,

    #[error("failed to embed query text: {0}")]
    EmbeddingFailed(String),

    #[error("vector search failed: {0}")]
    SearchFailed(String),
}
