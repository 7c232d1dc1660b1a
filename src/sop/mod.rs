//! SOP Injector (C4): keyword-heuristic candidate-tool detection plus
//! knowledge-base lookup of the matching agent-facing procedure, injected
//! as a system message ahead of the LLM call.

use std::collections::HashMap;

use tracing::{info, warn};

use crate::metrics;
use crate::vector::{VectorClient, DEFAULT_SCORE_THRESHOLD};

/// Per-session cache of `tool name -> formatted SOP text`, owned by one
/// `AgentOrchestrator` instance. Never shared across sessions, so a cache
/// hit for one customer's conversation never leaks into another's.
#[derive(Debug, Default)]
pub struct SopCache {
    cache: HashMap<String, String>,
}

impl SopCache {
    pub fn new() -> Self {
        Self::default()
    }
}

const ORDER_KEYWORDS: &[&str] = &["order", "place order", "buy", "purchase", "want to order"];
const ORDER_STATUS_KEYWORDS: &[&str] = &["order status", "track", "where is my", "order #", "order number"];
const RETURN_KEYWORDS: &[&str] = &["return", "refund", "send back", "defective"];
const CATALOG_KEYWORDS: &[&str] = &["browse", "show me", "looking for", "available", "products", "catalog"];
const SHIPPING_KEYWORDS: &[&str] = &["shipping", "delivery", "ship to", "how much to ship"];

/// Scans the user's message for keyword groups and returns the tools whose
/// SOPs are likely relevant, in first-occurrence order with duplicates
/// removed.
pub fn detect_likely_tools(user_message: &str) -> Vec<&'static str> {
    let lower = user_message.to_lowercase();
    let mut likely = Vec::new();

    if ORDER_KEYWORDS.iter().any(|kw| lower.contains(kw)) {
        likely.push("draft_order");
        likely.push("create_order");
    }
    if ORDER_STATUS_KEYWORDS.iter().any(|kw| lower.contains(kw)) {
        likely.push("order_status");
    }
    if RETURN_KEYWORDS.iter().any(|kw| lower.contains(kw)) {
        likely.push("order_status");
        likely.push("initiate_return");
    }
    if CATALOG_KEYWORDS.iter().any(|kw| lower.contains(kw)) {
        likely.push("product_catalog");
    }
    if SHIPPING_KEYWORDS.iter().any(|kw| lower.contains(kw)) {
        likely.push("estimate_shipping");
    }

    dedup_preserve_order(likely)
}

fn dedup_preserve_order(tools: Vec<&'static str>) -> Vec<&'static str> {
    let mut seen = std::collections::HashSet::new();
    tools.into_iter().filter(|t| seen.insert(*t)).collect()
}

/// Looks up and formats the SOP for one tool, checking the per-session
/// cache first. Returns `None` if the knowledge base has no matching
/// agent-facing SOP — the caller proceeds without it rather than failing
/// the turn.
async fn lookup_sop(vector: &VectorClient, cache: &mut SopCache, tool_name: &str) -> Option<String> {
    if let Some(cached) = cache.cache.get(tool_name) {
        info!(tool = tool_name, "using cached SOP");
        metrics::record_sop_cache_lookup(true);
        return Some(cached.clone());
    }
    metrics::record_sop_cache_lookup(false);

    let query = format!("agent-sop-{tool_name}");
    let hits = match vector.search_by_text(&query, 1, Some(DEFAULT_SCORE_THRESHOLD)).await {
        Ok(hits) => hits,
        Err(e) => {
            warn!(tool = tool_name, error = %e, "could not retrieve SOP");
            return None;
        }
    };

    let hit = hits.first()?;
    let audience = hit.payload_str("audience");
    let doc_type = hit.payload_str("doc_type");
    if audience != Some("agent") || doc_type != Some("sop") {
        return None;
    }

    let title = hit
        .payload_str("title")
        .map(|s| s.to_string())
        .unwrap_or_else(|| format!("{tool_name} SOP"));
    let content = hit.payload_str("content").unwrap_or("").to_string();
    let formatted = format!("=== {title} ===\n{content}");

    cache.cache.insert(tool_name.to_string(), formatted.clone());
    info!(tool = tool_name, "found and cached SOP");
    Some(formatted)
}

/// Detects likely tools from `user_message`, fetches each one's SOP
/// (cache-first), and returns the combined "RELEVANT PROCEDURES" system
/// message text to inject — `None` if nothing was found.
pub async fn relevant_procedures(
    vector: &VectorClient,
    cache: &mut SopCache,
    user_message: &str,
) -> Option<String> {
    let likely_tools = detect_likely_tools(user_message);
    if likely_tools.is_empty() {
        return None;
    }

    let mut sop_contents = Vec::new();
    for tool_name in likely_tools {
        if let Some(sop) = lookup_sop(vector, cache, tool_name).await {
            sop_contents.push(sop);
        }
    }

    if sop_contents.is_empty() {
        return None;
    }

    info!(count = sop_contents.len(), "injecting SOPs into conversation");
    Some(format!("RELEVANT PROCEDURES:\n\n{}", sop_contents.join("\n\n")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_message_detects_draft_and_create() {
        let tools = detect_likely_tools("I want to place an order for a laptop");
        assert_eq!(tools, vec!["draft_order", "create_order"]);
    }

    #[test]
    fn return_message_detects_status_and_return_without_duplication() {
        let tools = detect_likely_tools("I want to return this defective item, order status please");
        assert_eq!(tools, vec!["order_status", "initiate_return"]);
    }

    #[test]
    fn dedup_keeps_first_occurrence_order() {
        let tools = dedup_preserve_order(vec!["a", "b", "a", "c", "b"]);
        assert_eq!(tools, vec!["a", "b", "c"]);
    }

    #[test]
    fn unrelated_message_detects_nothing() {
        let tools = detect_likely_tools("what's the weather like today");
        assert!(tools.is_empty());
    }

    #[test]
    fn shipping_and_catalog_keywords_both_fire() {
        let tools = detect_likely_tools("show me available products and shipping to Texas");
        assert_eq!(tools, vec!["product_catalog", "estimate_shipping"]);
    }
}
