//! Agentic customer-support core.
//!
//! Mediates between an LLM chat endpoint, a relational order store, and a
//! vector knowledge-base retriever for a small e-commerce support domain.

pub mod api;
pub mod config;
pub mod llm;
pub mod metrics;
pub mod models;
pub mod orchestrator;
pub mod sop;
pub mod store;
pub mod tools;
pub mod utils;
pub mod vector;
