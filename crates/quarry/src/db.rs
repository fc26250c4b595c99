//! SQLite database connection management.
//!
//! Provides a connection pool to the SQLite database with WAL mode
//! enabled for concurrent read/write performance, and foreign keys on so
//! the documents→chunks cascade is enforced by the engine. The database
//! file and its parent directories are created automatically.
//!
//! # Write-Ahead Logging (WAL)
//!
//! WAL mode allows concurrent readers and a single writer without
//! blocking. Ingestion and query requests may overlap: a query's full
//! chunk scan runs against a consistent snapshot while chunk inserts
//! commit one at a time.

use anyhow::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::str::FromStr;

use crate::config::Config;

/// Create a connection pool to the configured SQLite database.
pub async fn connect(config: &Config) -> Result<SqlitePool> {
    connect_path(&config.db.path).await
}

/// Create a connection pool to a SQLite database at an explicit path.
///
/// - Creates the database file and parent directories if missing.
/// - Enables WAL journal mode and foreign-key enforcement.
/// - Returns a pool with up to 5 connections.
pub async fn connect_path(db_path: &Path) -> Result<SqlitePool> {
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let options = SqliteConnectOptions::from_str(&format!("sqlite:{}", db_path.display()))?
        .create_if_missing(true)
        .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    Ok(pool)
}
