use anyhow::Context;
use tokio::net::TcpListener;
use tracing::{info, warn};

use metrics_query_resolver::app_state::build_app_state;
use metrics_query_resolver::config::AppConfig;
use metrics_query_resolver::logging::init_tracing;
use metrics_query_resolver::routes::app_router;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env()?;
    let _guard = init_tracing(&config.log_dir)?;

    let state = build_app_state(&config);
    if state.metrics_client.is_none() {
        warn!("METRICS_BACKEND_URL not set; /api/v1/query/range will answer 503");
    }

    let app = app_router().with_state(state);

    let addr = config.server.bind_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(%addr, "server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(?e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
