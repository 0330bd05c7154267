//! Database connection and bootstrap.

use std::time::Duration;

use migration::{migrate, MigrationCommand};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tracing::{info, warn};

use crate::config::db::{db_url, DbProfile};
use crate::error::AppError;

const CONNECT_ATTEMPTS: u32 = 5;
const CONNECT_INTERVAL_MS: u64 = 500;

/// Connect to the database at `url`.
///
/// SQLite in-memory pools are pinned to a single connection: every pooled
/// connection would otherwise get its own private empty database.
pub async fn connect_db(url: &str) -> Result<DatabaseConnection, AppError> {
    let mut opt = ConnectOptions::new(url);
    opt.acquire_timeout(Duration::from_secs(5)).sqlx_logging(false);

    if url.starts_with("sqlite::memory:") {
        opt.min_connections(1).max_connections(1);
    } else {
        opt.max_connections(10);
    }

    let is_postgres = url.starts_with("postgres");
    let mut last_error = None;

    for attempt in 1..=CONNECT_ATTEMPTS {
        match Database::connect(opt.clone()).await {
            Ok(conn) => {
                if attempt > 1 {
                    info!(attempt, "database connection established after retry");
                }
                return Ok(conn);
            }
            Err(e) => {
                last_error = Some(e);
                // Only a remote database is worth waiting for; an in-process
                // SQLite failure will not heal with time.
                if !is_postgres || attempt == CONNECT_ATTEMPTS {
                    break;
                }
                warn!(
                    attempt,
                    max_attempts = CONNECT_ATTEMPTS,
                    "database connection failed, retrying"
                );
                tokio::time::sleep(Duration::from_millis(CONNECT_INTERVAL_MS)).await;
            }
        }
    }

    Err(AppError::db_unavailable(format!(
        "failed to connect to database: {}",
        last_error.map(|e| e.to_string()).unwrap_or_default()
    )))
}

/// Single entrypoint used by `main` and tests: build the URL for the
/// profile, connect, and bring the schema up to date.
pub async fn bootstrap_db(profile: DbProfile) -> Result<DatabaseConnection, AppError> {
    let url = db_url(profile)?;
    let conn = connect_db(&url).await?;
    migrate(&conn, MigrationCommand::Up)
        .await
        .map_err(|e| AppError::db(format!("migration failed: {e}")))?;
    Ok(conn)
}
