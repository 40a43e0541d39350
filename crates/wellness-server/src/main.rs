//! HTTP server entry point.
//!
//! Loads configuration from the environment, builds one LLM-backed generator
//! per wellness domain, and serves the router.

use std::sync::Arc;

use anyhow::Result;
use tracing::{info, warn};
use wellness_config::{AppConfig, DomainRegistry};
use wellness_core::GuidanceGenerator;
use wellness_engine::{AgentSet, MemoryStore, WellnessOrchestrator};
use wellness_llm::LlmGenerator;
use wellness_server::{build_router, ServerState};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .compact()
        .init();

    let config = AppConfig::from_env()?;
    let state = Arc::new(init_server_state(&config));
    let app = build_router(state);

    let addr = config.bind_addr();
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Loads domain descriptors and wires generators, memory, and the orchestrator.
fn init_server_state(config: &AppConfig) -> ServerState {
    if config.llm_api_key.is_none() {
        warn!("No LLM_API_KEY or GROQ_API_KEY set; upstream calls will likely fail");
    }

    let mut registry = DomainRegistry::with_defaults();
    match registry.load_overrides_from_dir(&config.presets_dir) {
        Ok(0) => {}
        Ok(n) => info!("Applied {} descriptor override(s) from {}", n, config.presets_dir.display()),
        Err(e) => {
            warn!("Failed to load descriptor overrides, using defaults: {}", e);
            registry = DomainRegistry::with_defaults();
        }
    }

    for descriptor in registry.list() {
        info!(
            "  - {} ({}, model {}, temperature {})",
            descriptor.name,
            descriptor.domain,
            descriptor.model_or(&config.default_model),
            descriptor.temperature
        );
    }

    let agents = AgentSet::from_registry(&registry, |descriptor| {
        Arc::new(LlmGenerator::new(descriptor, config)) as Arc<dyn GuidanceGenerator>
    });
    let memory = Arc::new(MemoryStore::from_config(config));
    info!(
        "Memory: {} users x {} messages, context window {}",
        config.max_users, config.max_messages, config.context_window
    );

    let orchestrator = WellnessOrchestrator::new(agents, memory).with_dispatch_timeout(config.dispatch_timeout);
    ServerState::new(orchestrator)
}
