//! PostgreSQL adapters - Database implementations for repository ports.
//!
//! - `PostgresLinkRepository` - generated link records
//! - `PostgresReplyRepository` - generated replies
//! - `PostgresConfigurationRepository` - per-chat configuration

mod configuration_repository;
mod link_repository;
mod reply_repository;

pub use configuration_repository::PostgresConfigurationRepository;
pub use link_repository::PostgresLinkRepository;
pub use reply_repository::PostgresReplyRepository;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

use crate::config::DatabaseConfig;

/// Opens a connection pool and optionally applies the embedded migrations.
/// Opens the connection pool and applies embedded migrations when enabled.
pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    let url = config
        .connection_url()
        .ok_or_else(|| sqlx::Error::Configuration("database url is not set".into()))?;

    let pool = PgPoolOptions::new()
        .min_connections(config.min_connections)
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout())
        .idle_timeout(config.idle_timeout())
        .max_lifetime(config.max_lifetime())
        .connect(url)
        .await?;

    if config.run_migrations {
        sqlx::migrate!("./migrations").run(&pool).await?;
        info!("Database migrations applied");
    }

    Ok(pool)
}
