//! PostgreSQL pool, migrations and error classification
//!
//! Repositories return `anyhow::Result`; [`is_unique_violation_any`] lets the
//! layers above recognise a uniqueness conflict through that wrapper.

use crate::config::DatabaseConfig;
use anyhow::{Context, Result};
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use std::str::FromStr;
use std::time::Duration;
use tracing::{info, warn};

const MIN_CONNECTIONS: u32 = 1;
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(30);
const IDLE_TIMEOUT: Duration = Duration::from_secs(600);
const MAX_LIFETIME: Duration = Duration::from_secs(1800);

fn pool_options(config: &DatabaseConfig) -> PgPoolOptions {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(MIN_CONNECTIONS.min(config.max_connections))
        .acquire_timeout(ACQUIRE_TIMEOUT)
        .idle_timeout(IDLE_TIMEOUT)
        .max_lifetime(MAX_LIFETIME)
        .test_before_acquire(true)
}

/// Connect the shared pool
pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool> {
    let connect_options = PgConnectOptions::from_str(&config.url)
        .context("Invalid database URL")?
        .application_name("wellness-tracker");

    let pool = pool_options(config)
        .connect_with(connect_options)
        .await
        .context("Failed to connect to database")?;

    info!(max_connections = config.max_connections, "Database pool created");
    Ok(pool)
}

pub async fn run_migrations(pool: &PgPool) -> Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    info!("Database migrations applied");
    Ok(())
}

/// Round-trip a trivial query; used by the readiness probe
pub async fn health_check(pool: &PgPool) -> Result<()> {
    if let Err(e) = sqlx::query("SELECT 1").execute(pool).await {
        warn!(error = %e, "Database health check failed");
        return Err(e.into());
    }
    Ok(())
}

/// True when the error is a unique-constraint violation
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db_err) if db_err.is_unique_violation())
}

/// Same as [`is_unique_violation`], looking through `anyhow`
pub fn is_unique_violation_any(err: &anyhow::Error) -> bool {
    err.downcast_ref::<sqlx::Error>()
        .is_some_and(is_unique_violation)
}

/// True when the error is a CHECK constraint violation, looking through `anyhow`
pub fn is_check_violation_any(err: &anyhow::Error) -> bool {
    err.downcast_ref::<sqlx::Error>().is_some_and(|err| {
        matches!(err, sqlx::Error::Database(db_err) if db_err.is_check_violation())
    })
}
