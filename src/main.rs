use std::net::SocketAddr;
use std::sync::Arc;

use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use support_agent_core::api::{self, AppState};
use support_agent_core::config::AppConfig;
use support_agent_core::llm::{ChatCompleter, OpenAiChatCompleter};
use support_agent_core::metrics;
use support_agent_core::store::Store;
use support_agent_core::vector::{Embedder, OpenAiEmbedder, VectorClient};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "support_agent_core=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenvy::dotenv().ok();
    let config = AppConfig::load()?;

    tracing::info!("Starting support-agent-core v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Log level: {}", config.log_level);

    let _prometheus_handle = metrics::init_metrics();
    tracing::info!("Prometheus metrics recorder installed");

    tracing::info!("Connecting to relational store");
    let store = Store::connect(&config.database_url, config.database_max_connections).await?;
    tracing::info!("Relational store connected");

    let http_client = reqwest::Client::new();

    let embedder: Option<Arc<dyn Embedder>> = match &config.openai_api_key {
        Some(api_key) => Some(Arc::new(OpenAiEmbedder::new(
            http_client.clone(),
            config.openai_base_url.clone(),
            api_key.clone(),
        ))),
        None => {
            tracing::warn!("OPENAI_API_KEY not set; knowledge-base search will be unavailable");
            None
        }
    };

    if config.qdrant_url.is_none() || config.qdrant_api_key.is_none() {
        tracing::warn!("QDRANT_URL/QDRANT_API_KEY not set; knowledge-base search will be unavailable");
    }

    let vector = VectorClient::new(
        http_client.clone(),
        config.qdrant_url.clone(),
        config.qdrant_api_key.clone(),
        config.qdrant_collection.clone(),
        embedder,
    );

    let llm: Arc<dyn ChatCompleter> = Arc::new(OpenAiChatCompleter::new(
        http_client,
        config.openai_base_url.clone(),
        config.openai_api_key.clone(),
    ));
    if config.openai_api_key.is_none() {
        tracing::warn!("OPENAI_API_KEY not set; chat completions will fail until it is configured");
    }

    let port = config.port;
    let state = Arc::new(AppState::new(config, store, vector, llm));

    let app = api::create_router(state).layer(
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
    )
    .layer(TraceLayer::new_for_http());

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
