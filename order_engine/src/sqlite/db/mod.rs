//! # SQLite Database methods
//!
//! This module contains "low-level" SQLite database interactions.
//!
//! All these interactions are simple functions (rather than stateful structs) that accept a `&mut SqliteConnection`
//! argument. Callers can obtain a connection from a pool, or open an atomic transaction as the need arises and call
//! through to the functions without any other changes.
use std::{env, str::FromStr, time::Duration};

use log::info;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions},
    Error as SqlxError,
    SqlitePool,
};

pub mod order_items;
pub mod orders;
pub mod receipts;

const SQLITE_DB_URL: &str = "sqlite://data/orders.db";
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

pub fn db_url() -> String {
    let result = env::var("OMS_DATABASE_URL").unwrap_or_else(|_| {
        info!("OMS_DATABASE_URL is not set. Using the default.");
        SQLITE_DB_URL.to_string()
    });
    info!("Using database URL: {result}");
    result
}

/// True for URLs that point at a private, in-memory database.
pub fn is_memory_url(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}

/// Opens a connection pool for `url`.
///
/// An in-memory database only lives as long as its connection, so for memory URLs the pool is pinned to exactly one
/// connection that is never recycled. File databases are created if missing and run in WAL mode.
pub async fn new_pool(url: &str, max_connections: u32) -> Result<SqlitePool, SqlxError> {
    let options = SqliteConnectOptions::from_str(url)?.foreign_keys(true).busy_timeout(BUSY_TIMEOUT);
    let pool = if is_memory_url(url) {
        SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?
    } else {
        let options = options.create_if_missing(true).journal_mode(SqliteJournalMode::Wal);
        SqlitePoolOptions::new().max_connections(max_connections.max(1)).connect_with(options).await?
    };
    Ok(pool)
}
