#![allow(clippy::pedantic)]
#![allow(clippy::nursery)]
#![deny(clippy::unwrap_used)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::needless_raw_string_hashes)]

extern crate sqlx_core as sqlx;

use sqlx_core::pool::{Pool, PoolOptions};
use sqlx_sqlite::{Sqlite, SqliteConnectOptions, SqliteJournalMode, SqliteSynchronous};
use std::str::FromStr;
use std::time::Duration;

pub mod repo;

pub type SqlitePool = Pool<Sqlite>;

pub async fn connect_sqlite(path: &str) -> Result<SqlitePool, sqlx_core::Error> {
    connect_sqlite_with_max(path, 10).await
}

pub async fn connect_sqlite_with_max(
    path: &str,
    max_connections: u32,
) -> Result<SqlitePool, sqlx_core::Error> {
    let options = SqliteConnectOptions::from_str(path)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .synchronous(SqliteSynchronous::Normal)
        .busy_timeout(Duration::from_secs(5));

    tracing::debug!(event = "db_pool_connect", max_connections, "Opening store pool");
    PoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await
}

pub async fn migrate(pool: &SqlitePool) -> Result<(), sqlx_core::migrate::MigrateError> {
    sqlx_macros::migrate!("./migrations").run(pool).await
}
