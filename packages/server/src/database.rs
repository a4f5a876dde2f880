use std::sync::Arc;
use std::time::Duration;

use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use tracing::{info, warn};

use crate::config::DatabaseConfig;
use crate::store::{EntityStore, MemoryStore, SeaOrmStore};

/// Connect the pool and bring the schema in line with the entities.
pub async fn init_db(config: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    let timeout = Duration::from_secs(config.timeout_secs);
    let mut opt = ConnectOptions::new(config.url.to_owned());

    opt.max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .connect_timeout(timeout)
        .acquire_timeout(timeout)
        .sqlx_logging(true);

    let db = Database::connect(opt).await?;
    db.get_schema_registry("course_api::entity::*")
        .sync(&db)
        .await?;

    Ok(db)
}

/// Build the entity store selected by `database.url`.
pub async fn connect_store(config: &DatabaseConfig) -> Result<Arc<dyn EntityStore>, DbErr> {
    if config.is_memory() {
        warn!("Using the in-memory entity store; data is lost on exit");
        return Ok(Arc::new(MemoryStore::new()));
    }

    let db = init_db(config).await?;
    info!("Database connected and schema synced");
    Ok(Arc::new(SeaOrmStore::new(db)))
}
