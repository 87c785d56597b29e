//! # Config Module
//!
//! Connection and token settings, built once at startup and handed to
//! [`SqliteDatabase::open`](crate::core::store::SqliteDatabase::open).
//!
//! ## Environment
//! - `DB_DIR` (required) - directory holding the database file
//! - `DB_NAME` (required) - database name, the file is `<DB_DIR>/<DB_NAME>.db`
//! - `TOKEN_TTL_HOURS` - validation token lifetime (default 72)
//! - `DB_BUSY_TIMEOUT_MS` - how long a writer waits on a locked database (default 5000)
//! - `DB_POOL_SIZE` - maximum pooled connections (default 8)
//!
//! Every missing or malformed variable is collected before failing, so an
//! operator sees the whole list in one go.

use crate::error::{ConfigError, Result};
use chrono::{Duration as TokenTtl, Utc};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_TOKEN_TTL_HOURS: i64 = 72;
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;
pub const DEFAULT_POOL_SIZE: u32 = 8;

/// Immutable store configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Directory holding the database file
    pub db_dir: PathBuf,
    /// Database name (without extension)
    pub db_name: String,
    /// Lifetime of a freshly issued validation token
    pub token_ttl: TokenTtl,
    /// SQLite busy timeout applied to every pooled connection
    pub busy_timeout: Duration,
    /// Maximum connections held by the pool
    pub pool_size: u32,
}

impl Config {
    /// Config with default tuning for a database at `<db_dir>/<db_name>.db`
    pub fn new(db_dir: impl Into<PathBuf>, db_name: impl Into<String>) -> Self {
        Self {
            db_dir: db_dir.into(),
            db_name: db_name.into(),
            token_ttl: TokenTtl::hours(DEFAULT_TOKEN_TTL_HOURS),
            busy_timeout: Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS),
            pool_size: DEFAULT_POOL_SIZE,
        }
    }

    /// Load from process environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load using an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut errors = ConfigError::new();

        let db_dir = require(&lookup, "DB_DIR", &mut errors);
        let db_name = require(&lookup, "DB_NAME", &mut errors);
        let ttl_hours: i64 = optional(&lookup, "TOKEN_TTL_HOURS", DEFAULT_TOKEN_TTL_HOURS, &mut errors);
        let busy_ms: u64 = optional(&lookup, "DB_BUSY_TIMEOUT_MS", DEFAULT_BUSY_TIMEOUT_MS, &mut errors);
        let pool_size: u32 = optional(&lookup, "DB_POOL_SIZE", DEFAULT_POOL_SIZE, &mut errors);

        // Expiry is computed as now + ttl, which must stay a valid timestamp
        if pool_size == 0 {
            errors.push("expected DB_POOL_SIZE to be at least 1");
        }

        let token_ttl = match TokenTtl::try_hours(ttl_hours) {
            Some(ttl) if ttl_hours > 0 && Utc::now().checked_add_signed(ttl).is_some() => ttl,
            _ => {
                errors.push(format!(
                    "expected TOKEN_TTL_HOURS to be a positive number of hours, got {}",
                    ttl_hours
                ));
                TokenTtl::hours(DEFAULT_TOKEN_TTL_HOURS)
            }
        };

        errors.into_result(Self {
            db_dir: PathBuf::from(db_dir),
            db_name,
            token_ttl,
            busy_timeout: Duration::from_millis(busy_ms),
            pool_size,
        })
    }

    /// Same configuration pointed at `<db_name>_<suffix>`, e.g. a `_dev` database
    pub fn with_db_suffix(mut self, suffix: &str) -> Self {
        self.db_name = format!("{}_{}", self.db_name, suffix);
        self
    }

    pub fn with_token_ttl(mut self, ttl: TokenTtl) -> Self {
        self.token_ttl = ttl;
        self
    }

    /// Full path of the database file
    pub fn db_path(&self) -> PathBuf {
        self.db_dir.join(format!("{}.db", self.db_name))
    }
}

fn require<F>(lookup: &F, name: &str, errors: &mut ConfigError) -> String
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        Some(value) if !value.is_empty() => value,
        _ => {
            errors.push(format!("expected environment variable {} to be set", name));
            String::new()
        }
    }
}

fn optional<F, T>(lookup: &F, name: &str, default: T, errors: &mut ConfigError) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(name) {
        Some(raw) if !raw.is_empty() => match raw.trim().parse() {
            Ok(value) => value,
            Err(_) => {
                errors.push(format!(
                    "environment variable {} has invalid value {:?}",
                    name, raw
                ));
                default
            }
        },
        _ => default,
    }
}
