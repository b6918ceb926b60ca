use std::{net::SocketAddr, sync::Arc};

use axum::Router;
use configs::AppConfig;
use service::snapshot::SnapshotStore;
use tokio::net::TcpListener;
use tracing::info;

use crate::errors::StartupError;
use crate::routes::{self, ServerState};

/// Load the snapshot named by the config and build the router around it.
/// The snapshot's directory is created if missing.
pub async fn build_app(cfg: &AppConfig) -> Result<Router, StartupError> {
    let store = SnapshotStore::new(cfg.snapshot.path.clone()).await?;
    let state = ServerState { store: Arc::clone(&store) as _ };
    Ok(routes::build_router(state))
}

/// Serve `cfg` until `shutdown` resolves, letting in-flight requests finish.
pub async fn run_with<F>(cfg: AppConfig, shutdown: F) -> Result<(), StartupError>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    let app = build_app(&cfg).await?;
    let bind = cfg.server.bind_addr();
    let addr: SocketAddr = bind
        .parse()
        .map_err(|e| StartupError::InvalidConfig(format!("{bind}: {e}")))?;
    let listener = TcpListener::bind(addr).await.map_err(anyhow::Error::from)?;
    info!(%addr, snapshot = %cfg.snapshot.path.display(), "pvsave stub listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(anyhow::Error::from)?;
    Ok(())
}

/// Resolves on Ctrl+C.
pub async fn ctrl_c() {
    let _ = tokio::signal::ctrl_c().await;
    info!("received Ctrl+C, shutting down");
}
