//! Metrics Module for the Support Agent Core
//!
//! Provides Prometheus-compatible metrics for monitoring:
//! - HTTP request metrics (latency, count, in-flight)
//! - Agent turn metrics (iterations, tool calls, timeouts)
//! - LLM call metrics (latency, errors)
//! - Tool dispatch metrics (count, latency, failures)
//! - Vector search metrics (latency, hits)
//! - Database query metrics (latency)

#![allow(dead_code)]

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use std::time::Instant;

/// Metric names as constants for consistency
pub mod names {
    // API Metrics
    pub const HTTP_REQUESTS_TOTAL: &str = "http_requests_total";
    pub const HTTP_REQUEST_DURATION_SECONDS: &str = "http_request_duration_seconds";
    pub const HTTP_REQUESTS_IN_FLIGHT: &str = "http_requests_in_flight";

    // Agent Turn Metrics
    pub const TURNS_TOTAL: &str = "agent_turns_total";
    pub const TURN_DURATION_SECONDS: &str = "agent_turn_duration_seconds";
    pub const TURN_ITERATIONS: &str = "agent_turn_iterations";
    pub const TURN_TIMEOUTS_TOTAL: &str = "agent_turn_timeouts_total";
    pub const ACTIVE_SESSIONS: &str = "agent_active_sessions";

    // LLM Metrics
    pub const LLM_CALLS_TOTAL: &str = "llm_calls_total";
    pub const LLM_CALL_DURATION_SECONDS: &str = "llm_call_duration_seconds";
    pub const LLM_ERRORS_TOTAL: &str = "llm_errors_total";

    // Tool Metrics
    pub const TOOL_CALLS_TOTAL: &str = "tool_calls_total";
    pub const TOOL_CALL_DURATION_SECONDS: &str = "tool_call_duration_seconds";
    pub const TOOL_CALL_FAILURES_TOTAL: &str = "tool_call_failures_total";

    // Vector Retriever Metrics
    pub const VECTOR_SEARCHES_TOTAL: &str = "vector_searches_total";
    pub const VECTOR_SEARCH_DURATION_SECONDS: &str = "vector_search_duration_seconds";
    pub const SOP_CACHE_HITS_TOTAL: &str = "sop_cache_hits_total";
    pub const SOP_CACHE_MISSES_TOTAL: &str = "sop_cache_misses_total";

    // Database Metrics
    pub const DB_QUERY_DURATION_SECONDS: &str = "db_query_duration_seconds";
    pub const DB_CONNECTIONS_ACTIVE: &str = "db_connections_active";
    pub const DB_CONNECTIONS_IDLE: &str = "db_connections_idle";
}

/// Label keys
pub mod labels {
    pub const METHOD: &str = "method";
    pub const ENDPOINT: &str = "endpoint";
    pub const STATUS: &str = "status";
    pub const TOOL_NAME: &str = "tool";
    pub const OUTCOME: &str = "outcome";
    pub const QUERY_TYPE: &str = "query_type";
}

/// Initialize Prometheus metrics exporter
///
/// Returns a handle that can be used to render metrics
pub fn init_metrics() -> PrometheusHandle {
    let builder = PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full(names::HTTP_REQUEST_DURATION_SECONDS.to_string()),
            &[0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0],
        )
        .unwrap()
        // Turns involve one or more LLM round trips, so the tail is long.
        .set_buckets_for_metric(
            Matcher::Full(names::TURN_DURATION_SECONDS.to_string()),
            &[0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 20.0, 40.0, 65.0],
        )
        .unwrap()
        .set_buckets_for_metric(
            Matcher::Full(names::LLM_CALL_DURATION_SECONDS.to_string()),
            &[0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 20.0, 60.0],
        )
        .unwrap()
        .set_buckets_for_metric(
            Matcher::Full(names::TOOL_CALL_DURATION_SECONDS.to_string()),
            &[0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.5, 1.0, 5.0, 10.0],
        )
        .unwrap()
        .set_buckets_for_metric(
            Matcher::Full(names::VECTOR_SEARCH_DURATION_SECONDS.to_string()),
            &[0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 5.0],
        )
        .unwrap()
        .set_buckets_for_metric(
            Matcher::Full(names::DB_QUERY_DURATION_SECONDS.to_string()),
            &[0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 5.0],
        )
        .unwrap();

    builder
        .install_recorder()
        .expect("Failed to install Prometheus recorder")
}

// ============================================================================
// HTTP Metrics
// ============================================================================

/// Record HTTP request
pub fn record_http_request(method: &str, endpoint: &str, status: u16, duration_secs: f64) {
    let status_str = status.to_string();
    counter!(
        names::HTTP_REQUESTS_TOTAL,
        labels::METHOD => method.to_string(),
        labels::ENDPOINT => endpoint.to_string(),
        labels::STATUS => status_str.clone()
    )
    .increment(1);

    histogram!(
        names::HTTP_REQUEST_DURATION_SECONDS,
        labels::METHOD => method.to_string(),
        labels::ENDPOINT => endpoint.to_string(),
        labels::STATUS => status_str
    )
    .record(duration_secs);
}

/// Track in-flight requests
pub fn set_http_requests_in_flight(count: i64) {
    gauge!(names::HTTP_REQUESTS_IN_FLIGHT).set(count as f64);
}

// ============================================================================
// Agent Turn Metrics
// ============================================================================

/// Record completion of one agent turn
pub fn record_turn(outcome: &str, iterations: u32, duration_secs: f64) {
    counter!(
        names::TURNS_TOTAL,
        labels::OUTCOME => outcome.to_string()
    )
    .increment(1);

    histogram!(names::TURN_DURATION_SECONDS).record(duration_secs);
    histogram!(names::TURN_ITERATIONS).record(iterations as f64);
}

/// Record a turn that hit the overall per-turn deadline
pub fn record_turn_timeout() {
    counter!(names::TURN_TIMEOUTS_TOTAL).increment(1);
}

/// Set the number of sessions currently held in memory
pub fn set_active_sessions(count: i64) {
    gauge!(names::ACTIVE_SESSIONS).set(count as f64);
}

// ============================================================================
// LLM Metrics
// ============================================================================

/// Record a chat-completion call
pub fn record_llm_call(duration_secs: f64) {
    counter!(names::LLM_CALLS_TOTAL).increment(1);
    histogram!(names::LLM_CALL_DURATION_SECONDS).record(duration_secs);
}

/// Record an LLM call that errored or timed out
pub fn record_llm_error(reason: &str) {
    counter!(
        names::LLM_ERRORS_TOTAL,
        labels::OUTCOME => reason.to_string()
    )
    .increment(1);
}

// ============================================================================
// Tool Metrics
// ============================================================================

/// Record one tool dispatch
pub fn record_tool_call(tool_name: &str, success: bool, duration_secs: f64) {
    counter!(
        names::TOOL_CALLS_TOTAL,
        labels::TOOL_NAME => tool_name.to_string()
    )
    .increment(1);

    histogram!(
        names::TOOL_CALL_DURATION_SECONDS,
        labels::TOOL_NAME => tool_name.to_string()
    )
    .record(duration_secs);

    if !success {
        counter!(
            names::TOOL_CALL_FAILURES_TOTAL,
            labels::TOOL_NAME => tool_name.to_string()
        )
        .increment(1);
    }
}

// ============================================================================
// Vector Retriever Metrics
// ============================================================================

/// Record a knowledge-base search
pub fn record_vector_search(duration_secs: f64) {
    counter!(names::VECTOR_SEARCHES_TOTAL).increment(1);
    histogram!(names::VECTOR_SEARCH_DURATION_SECONDS).record(duration_secs);
}

/// Record an SOP cache lookup outcome
pub fn record_sop_cache_lookup(hit: bool) {
    if hit {
        counter!(names::SOP_CACHE_HITS_TOTAL).increment(1);
    } else {
        counter!(names::SOP_CACHE_MISSES_TOTAL).increment(1);
    }
}

// ============================================================================
// Database Metrics
// ============================================================================

/// Record database query duration
pub fn record_db_query(query_type: &str, duration_secs: f64) {
    histogram!(
        names::DB_QUERY_DURATION_SECONDS,
        labels::QUERY_TYPE => query_type.to_string()
    )
    .record(duration_secs);
}

/// Set database connection pool stats
pub fn set_db_connections(active: i64, idle: i64) {
    gauge!(names::DB_CONNECTIONS_ACTIVE).set(active as f64);
    gauge!(names::DB_CONNECTIONS_IDLE).set(idle as f64);
}

// ============================================================================
// Timer Helper
// ============================================================================

/// Timer for measuring durations
pub struct Timer {
    start: Instant,
}

impl Timer {
    /// Create a new timer
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Get elapsed time in seconds
    pub fn elapsed_secs(&self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timer() {
        let timer = Timer::new();
        std::thread::sleep(std::time::Duration::from_millis(10));
        let elapsed = timer.elapsed_secs();
        assert!(elapsed >= 0.01);
        assert!(elapsed < 0.1);
    }

    #[test]
    fn test_metric_names() {
        assert_eq!(names::HTTP_REQUESTS_TOTAL, "http_requests_total");
        assert_eq!(names::LLM_CALLS_TOTAL, "llm_calls_total");
        assert_eq!(names::TOOL_CALLS_TOTAL, "tool_calls_total");
    }

    #[test]
    fn test_label_keys() {
        assert_eq!(labels::METHOD, "method");
        assert_eq!(labels::TOOL_NAME, "tool");
    }
}
