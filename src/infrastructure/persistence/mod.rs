//! SQLite persistence: pool setup, migrations, and repository implementations.
//!
//! # Repositories
//!
//! - [`SqliteLinkRepository`] - Link storage, lookup, and click counting

pub mod sqlite_link_repository;

pub use sqlite_link_repository::SqliteLinkRepository;

use anyhow::{Context, Result};
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration;

/// How long a connection waits on a locked database before failing.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Opens the SQLite pool and applies embedded migrations.
///
/// The database file is created if missing. WAL journaling lets redirects
/// read while an insert is in flight.
///
/// # Errors
///
/// Returns an error if the URL is malformed, the file cannot be opened, or a
/// migration fails.
pub async fn connect(
    database_url: &str,
    max_connections: u32,
    connect_timeout: Duration,
) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(database_url)
        .with_context(|| format!("Invalid DATABASE_URL '{database_url}'"))?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .foreign_keys(true)
        .busy_timeout(BUSY_TIMEOUT);

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(connect_timeout)
        .connect_with(options)
        .await
        .context("Failed to open SQLite database")?;

    migrate(&pool).await?;

    Ok(pool)
}

/// Applies the migrations embedded from `./migrations`.
///
/// # Errors
///
/// Returns an error if any migration fails.
pub async fn migrate(pool: &SqlitePool) -> Result<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .context("Failed to migrate")?;

    Ok(())
}
