//! # Campus ERP DB
//!
//! PostgreSQL pool initialization and the mapping from database constraint
//! violations to client errors.
//!
//! ```ignore
//! use campus_erp_db::{init_db_pool, map_constraint_error};
//!
//! let pool = init_db_pool().await?;
//! sqlx::query("INSERT INTO departments (name, code) VALUES ($1, $2)")
//!     .bind("Physics")
//!     .bind("PHY")
//!     .execute(&pool)
//!     .await
//!     .map_err(|e| map_constraint_error(e, "A department with this code already exists"))?;
//! ```

use std::env;
use std::time::Duration;

use anyhow::{Context, anyhow};
use campus_erp_core::AppError;
use sqlx::postgres::PgPoolOptions;

pub use sqlx::PgPool;

const DEFAULT_MAX_CONNECTIONS: u32 = 10;

/// Initializes the PostgreSQL connection pool from `DATABASE_URL`.
///
/// `DATABASE_MAX_CONNECTIONS` caps the pool size (default 10).
///
/// Fails if `DATABASE_URL` is not set or the database is unreachable.
pub async fn init_db_pool() -> anyhow::Result<PgPool> {
    let database_url = env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    let max_connections = env::var("DATABASE_MAX_CONNECTIONS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_MAX_CONNECTIONS);

    PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(Duration::from_secs(5))
        .connect(&database_url)
        .await
        .context("Failed to connect to database")
}

/// Runs the embedded migrations against `pool`.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../migrations").run(pool).await
}

/// Maps a failed write to the error the client should see.
///
/// Unique violations answer with `duplicate_message`; foreign-key and check
/// violations become 400s; everything else stays a 500.
pub fn map_constraint_error(err: sqlx::Error, duplicate_message: &str) -> AppError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return AppError::bad_request(anyhow!("{}", duplicate_message));
        }
        if db_err.is_foreign_key_violation() {
            return AppError::bad_request(anyhow!("Referenced record does not exist"));
        }
        if db_err.is_check_violation() {
            let constraint = db_err.constraint().unwrap_or("check");
            return AppError::bad_request(anyhow!("Value violates constraint {}", constraint));
        }
    }
    tracing::error!(error = %err, "Database write failed");
    AppError::database(err)
}
