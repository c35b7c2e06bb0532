//! Environment/runtime helpers
//!
//! Sanity checks run once at startup, before the store is opened.

use std::path::Path;

use tracing::{debug, warn};

/// Warn when the static asset directory is missing; pages under it will 404.
pub async fn check_static_dir(static_dir: &str) {
    if tokio::fs::metadata(static_dir).await.is_err() {
        warn!(%static_dir, "static assets directory not found; pages and assets will 404");
    }
}

/// Create the parent directory of a file path (e.g. the SQLite database file).
pub async fn ensure_parent_dir(file_path: &str) -> anyhow::Result<()> {
    let Some(parent) = Path::new(file_path).parent() else { return Ok(()) };
    if parent.as_os_str().is_empty() {
        return Ok(());
    }
    tokio::fs::create_dir_all(parent)
        .await
        .map_err(|e| anyhow::anyhow!("cannot create {}: {e}", parent.display()))?;
    debug!(dir = %parent.display(), "data directory ready");
    Ok(())
}
