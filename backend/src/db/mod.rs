//! Database connection and pool management
//!
//! The pool is the only shared mutable resource in the process; every
//! credential store call borrows a connection from it.

use crate::config::DatabaseConfig;
use anyhow::Result;
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

/// Pool tuning beyond what `DatabaseConfig` exposes
pub struct PoolSettings {
    pub min_connections: u32,
    pub acquire_timeout_secs: u64,
    pub idle_timeout_secs: u64,
    pub max_lifetime_secs: u64,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            min_connections: 2,
            acquire_timeout_secs: 30,
            idle_timeout_secs: 600,  // 10 minutes
            max_lifetime_secs: 1800, // 30 minutes
        }
    }
}

/// Create a PostgreSQL connection pool with production-ready settings
pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool> {
    create_pool_with_settings(config, &PoolSettings::default()).await
}

pub async fn create_pool_with_settings(
    config: &DatabaseConfig,
    settings: &PoolSettings,
) -> Result<PgPool> {
    let connect_options =
        PgConnectOptions::from_str(&config.url)?.application_name("session-auth");

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(settings.min_connections.min(config.max_connections))
        .acquire_timeout(Duration::from_secs(settings.acquire_timeout_secs))
        .idle_timeout(Duration::from_secs(settings.idle_timeout_secs))
        .max_lifetime(Duration::from_secs(settings.max_lifetime_secs))
        .test_before_acquire(true)
        .connect_with(connect_options)
        .await?;

    info!(
        max = config.max_connections,
        min = settings.min_connections,
        "Database pool created"
    );

    Ok(pool)
}

/// Run database migrations
pub async fn run_migrations(pool: &PgPool) -> Result<()> {
    info!("Running database migrations...");
    sqlx::migrate!("./migrations").run(pool).await?;
    info!("Database migrations completed successfully");
    Ok(())
}
