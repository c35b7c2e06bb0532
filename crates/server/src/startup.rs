use axum::Router;
use configs::AppConfig;
use dotenvy::dotenv;
use tokio::net::TcpListener;
use tokio::signal::ctrl_c;
use tracing::{error, info};

use service::{coffee::repo, runtime};

use crate::routes;
use crate::state::AppState;

/// Open the configured store and build the router around it.
pub async fn build_app(cfg: &AppConfig) -> anyhow::Result<Router> {
    runtime::ensure_env(cfg).await?;
    let store = repo::open(&cfg.store).await?;
    Ok(routes::build_router(AppState::new(store), &cfg.server.static_dir))
}

/// Public entry: load configuration, build the app and serve until a shutdown signal.
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();
    common::utils::logging::init_logging_from_env();

    let cfg = AppConfig::load_and_validate()?;
    let app = build_app(&cfg).await?;

    let listener = TcpListener::bind((cfg.server.host.as_str(), cfg.server.port)).await?;
    let addr = listener.local_addr()?;
    info!(service = "server", event = "listening", %addr, backend = ?cfg.store.backend, "coffee vote server ready");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!(service = "server", event = "stopped", "server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = ctrl_c().await {
            error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
        info!("received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut s) => {
                s.recv().await;
                info!("received terminate signal, shutting down");
            }
            Err(e) => {
                error!(error = %e, "failed to install SIGTERM handler");
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
}
