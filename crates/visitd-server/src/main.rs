//! visitd: visit counter service.
//!
//! - `GET /` increments the counter in redis and greets with the new value
//! - Config from `VISITD_CONFIG` (optional YAML) plus `REDIS_HOST`/`REDIS_PORT`
//! - Graceful shutdown on Ctrl-C / SIGTERM, `/readyz` flips to 503 while draining

use std::sync::Arc;

use tracing_subscriber::{fmt, EnvFilter};

use visitd_core::error::{Result, VisitError};
use visitd_server::{app_state::AppState, config, router, store::RedisStore};

#[tokio::main]
async fn main() -> Result<()> {
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cfg = config::from_env()?;
    tracing::info!(host = %cfg.store.host, port = cfg.store.port, "using redis store");

    let store = Arc::new(RedisStore::new(&cfg.store)?);
    let state = AppState::new(cfg, store)?;
    let listen = state.cfg().server.listen_addr()?;
    let app = router::build_router(state.clone());

    tracing::info!(%listen, "visitd starting");
    let listener = tokio::net::TcpListener::bind(listen)
        .await
        .map_err(|e| VisitError::Internal(format!("bind {listen} failed: {e}")))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(state))
        .await
        .map_err(|e| VisitError::Internal(format!("server failed: {e}")))?;

    tracing::info!("visitd stopped");
    Ok(())
}

async fn shutdown_signal(state: AppState) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "ctrl-c handler failed");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "SIGTERM handler failed");
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

    state.set_draining();
    tracing::info!("shutdown signal received, draining");
}
