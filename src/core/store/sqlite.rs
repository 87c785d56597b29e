//! SQLite-backed database shared by the scan, domain and token stores.

use super::schema;
use crate::config::Config;
use crate::error::StoreError;
use chrono::{DateTime, Duration, Utc};
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use tracing::info;

/// Pool of connections to one SQLite database file
pub type DbPool = Pool<SqliteConnectionManager>;

/// One database, three stores
///
/// Each call checks out its own pooled connection, so concurrent callers are
/// serialized by SQLite's locking (WAL plus a busy timeout), not by a lock of
/// ours. Cloning is cheap: clones share the same pool.
#[derive(Clone)]
pub struct SqliteDatabase {
    pool: DbPool,
    db_path: PathBuf,
    token_ttl: Duration,
}

impl SqliteDatabase {
    /// Open or create the database described by `config`
    pub fn open(config: &Config) -> Result<Self, StoreError> {
        let db_path = config.db_path();
        info!("Opening STARTTLS store at {:?}", db_path);

        // Create parent directories if needed
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| StoreError::OpenFailed {
                path: db_path.clone(),
                reason: e.to_string(),
            })?;
        }

        let busy_timeout = config.busy_timeout;
        let manager = SqliteConnectionManager::file(&db_path).with_init(move |conn: &mut Connection| {
            conn.busy_timeout(busy_timeout)?;
            // WAL lets readers proceed while a writer holds the lock
            conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")
        });

        let pool = Pool::builder()
            .max_size(config.pool_size)
            .min_idle(Some(1))
            .build(manager)
            .map_err(|e| StoreError::OpenFailed {
                path: db_path.clone(),
                reason: e.to_string(),
            })?;

        schema::init_schema(&*pool.get()?)?;

        Ok(Self {
            pool,
            db_path,
            token_ttl: config.token_ttl,
        })
    }

    /// Truncate every table
    ///
    /// Only for test isolation and maintenance, never for request traffic.
    pub fn clear_tables(&self) -> Result<(), StoreError> {
        let mut conn = self.conn()?;
        schema::clear_tables(&mut conn)?;
        info!("Cleared all tables in {:?}", self.db_path);
        Ok(())
    }

    /// Path of the database file
    pub fn path(&self) -> &Path {
        &self.db_path
    }

    pub(super) fn conn(&self) -> Result<PooledConnection<SqliteConnectionManager>, StoreError> {
        Ok(self.pool.get()?)
    }

    /// Expiry of a token issued at `now`
    pub(super) fn token_expiry(&self, now: DateTime<Utc>) -> Result<DateTime<Utc>, StoreError> {
        now.checked_add_signed(self.token_ttl)
            .ok_or(StoreError::TokenTtlOverflow {
                hours: self.token_ttl.num_hours(),
            })
    }

    /// Convert a timestamp to microseconds since the Unix epoch
    pub(super) fn to_timestamp(time: DateTime<Utc>) -> i64 {
        time.timestamp_micros()
    }

    /// Convert stored microseconds back to a timestamp
    pub(super) fn from_timestamp(micros: i64) -> Result<DateTime<Utc>, StoreError> {
        DateTime::from_timestamp_micros(micros)
            .ok_or_else(|| StoreError::CorruptRecord(format!("timestamp out of range: {}", micros)))
    }
}
