use std::time::Duration;

use configs::SqliteConfig;
use migration::MigratorTrait;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tracing::info;

use crate::coffee;

/// Open a pooled connection to the SQLite file described by `cfg`.
pub async fn connect_with_config(cfg: &SqliteConfig) -> anyhow::Result<DatabaseConnection> {
    let mut opt = ConnectOptions::new(cfg.url());
    opt.max_connections(cfg.max_connections)
        .min_connections(1)
        .acquire_timeout(Duration::from_secs(10))
        .sqlx_logging(false);
    let db = Database::connect(opt).await?;
    Ok(db)
}

/// Create the schema if absent and insert the default row into an empty table.
pub async fn migrate_and_seed(db: &DatabaseConnection) -> anyhow::Result<()> {
    migration::Migrator::up(db, None).await?;
    if let Some(seeded) = coffee::seed_if_empty(db).await? {
        info!(id = seeded.id, name = %seeded.name, "seeded empty coffees table");
    }
    Ok(())
}

/// Connect, migrate and seed in one step.
pub async fn connect(cfg: &SqliteConfig) -> anyhow::Result<DatabaseConnection> {
    let db = connect_with_config(cfg).await?;
    migrate_and_seed(&db).await?;
    Ok(db)
}
