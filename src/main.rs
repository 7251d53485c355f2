use anyhow::Context;
use std::sync::Arc;
use walldefect::config::AppConfig;
use walldefect::llm::gateways::GeminiGateway;
use walldefect::llm::ImageAnalyzer;
use walldefect::web::{router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    // Missing credentials halt the process before anything binds
    let config = AppConfig::from_env().context("failed to load configuration")?;

    let gateway = Arc::new(
        GeminiGateway::with_config(config.gemini_config())
            .context("failed to build the Gemini HTTP client")?,
    );
    let analyzer = Arc::new(
        ImageAnalyzer::new(config.model.clone(), gateway).with_config(config.generation.clone()),
    );
    let state = Arc::new(AppState::new(analyzer, &config));

    tracing::info!(model = %config.model, "Listening on {}", config.bind_addr);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;
    axum::serve(listener, router(state)).await?;

    Ok(())
}
