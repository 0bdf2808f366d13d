use anyhow::Context;
use conngate::{config::Config, AppState};
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env().inspect_err(|e| error!("{e}"))?;
    let state = AppState::new(config.clone());

    if config.mock_mode {
        warn!("Running in MOCK mode: /api/connections serves synthetic data");
    } else {
        info!("Checking upstream connectivity...");
        match state.upstream.check_connectivity().await {
            Ok(()) => info!("Upstream API is reachable"),
            Err(e) => {
                warn!("Could not reach the upstream API: {e}");
                warn!("Make sure the upstream is running, BASE_URL is correct and the credentials are valid,");
                warn!("or set MOCK_MODE=true to serve synthetic data");
            }
        }
    }

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    info!(port = config.port, base_url = %config.base_url, user = %config.auth_user, "Gateway listening");
    info!("  GET http://localhost:{}/api/connections?page=1&itemsPerPage=10", config.port);
    info!("  GET http://localhost:{}/api/debug", config.port);
    info!("  GET http://localhost:{}/health", config.port);
    if config.mock_mode {
        info!("Unset MOCK_MODE to query the live upstream");
    } else {
        info!("If the upstream is unavailable, set MOCK_MODE=true for synthetic data");
    }

    conngate::run(listener, state, shutdown_signal()).await?;
    info!("Gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl-C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("Shutdown signal received");
}
