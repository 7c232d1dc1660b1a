//! Typed application configuration, loaded from the environment (plus an
//! optional `.env` file) the way the platform's other services do.

use serde::Deserialize;

fn default_openai_model() -> String {
    "gpt-4".to_string()
}

fn default_openai_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_qdrant_collection() -> String {
    "knowledge_base".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    #[serde(default = "default_database_max_connections")]
    pub database_max_connections: u32,

    pub openai_api_key: Option<String>,
    #[serde(default = "default_openai_model")]
    pub openai_model: String,
    #[serde(default = "default_openai_base_url")]
    pub openai_base_url: String,

    pub qdrant_url: Option<String>,
    pub qdrant_api_key: Option<String>,
    #[serde(default = "default_qdrant_collection")]
    pub qdrant_collection: String,
    #[serde(default = "default_embedding_dimension")]
    pub embedding_dimension: usize,

    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,
    #[serde(default = "default_max_tool_calls_per_turn")]
    pub max_tool_calls_per_turn: u32,
    #[serde(default = "default_llm_timeout_secs")]
    pub llm_timeout_secs: u64,
    #[serde(default = "default_db_timeout_secs")]
    pub db_timeout_secs: u64,
    #[serde(default = "default_vector_timeout_secs")]
    pub vector_timeout_secs: u64,
    #[serde(default = "default_turn_deadline_secs")]
    pub turn_deadline_secs: u64,
}

fn default_database_max_connections() -> u32 {
    10
}
fn default_embedding_dimension() -> usize {
    1536
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_max_iterations() -> u32 {
    5
}
fn default_max_tool_calls_per_turn() -> u32 {
    10
}
fn default_llm_timeout_secs() -> u64 {
    60
}
fn default_db_timeout_secs() -> u64 {
    10
}
fn default_vector_timeout_secs() -> u64 {
    10
}
fn default_turn_deadline_secs() -> u64 {
    65
}

impl AppConfig {
    /// Load configuration from the process environment.
    ///
    /// `SUPADATABASE_URL` is the one fatal-configuration variable: the
    /// process is not meant to come up without a relational store.
    pub fn load() -> anyhow::Result<Self> {
        let database_url = std::env::var("SUPADATABASE_URL")
            .or_else(|_| std::env::var("DATABASE_URL"))
            .map_err(|_| {
                anyhow::anyhow!(
                    "SUPADATABASE_URL (or DATABASE_URL) must be set; the relational store is required at startup"
                )
            })?;

        let cfg = config::Config::builder()
            .set_default("database_url", database_url)?
            .set_default("database_max_connections", default_database_max_connections())?
            .set_default("openai_model", default_openai_model())?
            .set_default("openai_base_url", default_openai_base_url())?
            .set_default("qdrant_collection", default_qdrant_collection())?
            .set_default("embedding_dimension", default_embedding_dimension() as i64)?
            .set_default("log_level", default_log_level())?
            .set_default("port", default_port() as i64)?
            .set_default("max_iterations", default_max_iterations() as i64)?
            .set_default("max_tool_calls_per_turn", default_max_tool_calls_per_turn() as i64)?
            .set_default("llm_timeout_secs", default_llm_timeout_secs() as i64)?
            .set_default("db_timeout_secs", default_db_timeout_secs() as i64)?
            .set_default("vector_timeout_secs", default_vector_timeout_secs() as i64)?
            .set_default("turn_deadline_secs", default_turn_deadline_secs() as i64)?
            .add_source(
                config::Environment::default()
                    .try_parsing(true)
                    .separator("__"),
            )
            .set_override_option("openai_api_key", std::env::var("OPENAI_API_KEY").ok())?
            .set_override_option("qdrant_url", std::env::var("QDRANT_URL").ok())?
            .set_override_option("qdrant_api_key", std::env::var("QDRANT_API_KEY").ok())?
            .build()?;

        Ok(cfg.try_deserialize()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_database_url_is_fatal() {
        std::env::remove_var("SUPADATABASE_URL");
        std::env::remove_var("DATABASE_URL");
        assert!(AppConfig::load().is_err());
    }
}
