//! Record store implementations and startup selection.

pub mod seaorm;
pub mod airtable;

use std::sync::Arc;

use configs::{StoreBackend, StoreConfig};
use tracing::info;

use super::repository::CoffeeRepository;

/// Build the repository named by `cfg.backend`. For SQLite this also creates
/// the schema and seeds an empty table.
pub async fn open(cfg: &StoreConfig) -> anyhow::Result<Arc<dyn CoffeeRepository>> {
    match cfg.backend {
        StoreBackend::Sqlite => {
            let db = models::db::connect(&cfg.sqlite).await?;
            info!(path = %cfg.sqlite.path, "using sqlite coffee store");
            Ok(Arc::new(seaorm::SeaOrmCoffeeRepository { db }))
        }
        StoreBackend::Airtable => {
            let repo = airtable::AirtableCoffeeRepository::new(&cfg.airtable)?;
            info!(base_id = %cfg.airtable.base_id, table_id = %cfg.airtable.table_id, "using airtable coffee store");
            Ok(Arc::new(repo))
        }
    }
}
