//! Thin HTTP front door over the Agent Orchestrator: one chat endpoint and
//! a health probe, both state-extracted off a shared `AppState`.

pub mod handlers;
pub mod routes;
pub mod state;

pub use routes::create_router;
pub use state::AppState;
