/// Errors from the LLM provider boundary. All three are instances of
/// *upstream-unavailable*; a failure here aborts the current turn with a
/// user-visible apology.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("LLM provider not configured: missing API key")]
    NotConfigured,

    #[error("LLM request failed: {0}")]
    RequestFailed(String),

    #[error("LLM returned an unparseable response: {0}")]
    InvalidResponse(String),

    #[error("LLM call timed out")]
    Timeout,
}
