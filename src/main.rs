use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use prompt_gateway::config::{Args, GatewayConfig};
use prompt_gateway::rate_limit::sweeper;
use prompt_gateway::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "prompt_gateway=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // parse cli arguments
    let args = Args::parse();
    let port = args.port;
    let config = GatewayConfig::from(args);

    if config.api_key.is_none() {
        tracing::warn!("No SERVICE_API_KEY set - API routes are open to everyone");
    }
    if config.llm_key.is_none() {
        tracing::warn!("No LLM_API_KEY set - /api/ask will answer 503");
    }

    tracing::info!(
        rate_limit = config.rate_limit,
        rate_window_secs = config.rate_window.as_secs(),
        cache_ttl_secs = config.cache_ttl.as_secs(),
        model = %config.model,
        llm_url = %config.llm_url,
        notify_webhook = config.notify_webhook.is_some(),
        image_webhook = config.image_webhook.is_some(),
        "Configuration loaded"
    );

    // creating shared state
    let sweep_every = config.sweep_interval;
    let state = Arc::new(AppState::new(config));

    // spawn the idle-key sweeper
    tokio::spawn(sweeper(state.rate_limiter.clone(), sweep_every));

    let app = prompt_gateway::build_router(state);

    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!(address = %listener.local_addr()?, "Gateway listening");

    // peer addresses feed the rate-limit key when no API key header is sent
    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>()).await?;
    Ok(())
}
