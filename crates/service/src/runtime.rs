//! Runtime environment helpers
//!
//! Startup checks that depend on which store is configured.

use configs::{AppConfig, StoreBackend};

/// Warn about a missing static directory and create the SQLite data directory.
pub async fn ensure_env(cfg: &AppConfig) -> anyhow::Result<()> {
    common::env::check_static_dir(&cfg.server.static_dir).await;
    if cfg.store.backend == StoreBackend::Sqlite {
        common::env::ensure_parent_dir(&cfg.store.sqlite.path).await?;
    }
    Ok(())
}
