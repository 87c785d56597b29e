//! # Error Module
//!
//! Error types for the STARTTLS policy store.
//!
//! ## Design Principles
//! - **Expected outcomes are values** - a domain that was never scanned or a
//!   stale token are `NotFound` / `InvalidToken`, not storage failures
//! - **Include context** - keys, paths, what went wrong
//! - **No hidden retries** - storage failures surface unchanged to the caller
//! - **Report everything at once** - configuration problems are aggregated

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Top-level application error
#[derive(Error, Debug)]
pub enum StarttlsError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Errors returned by the scan, domain and token stores
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("No {kind} found for {key}")]
    NotFound { kind: &'static str, key: String },

    #[error("Token is unknown, expired, already used, or superseded")]
    InvalidToken,

    #[error("Invalid domain name: {name:?}")]
    InvalidDomain { name: String },

    #[error("Failed to open database at {path}: {reason}")]
    OpenFailed { path: PathBuf, reason: String },

    #[error("Database query failed: {0}")]
    QueryFailed(String),

    #[error("Failed to serialize scan data: {0}")]
    SerializationFailed(String),

    #[error("Stored record is corrupt: {0}")]
    CorruptRecord(String),

    #[error("Token lifetime of {hours} hours puts the expiry past the last representable date")]
    TokenTtlOverflow { hours: i64 },
}

impl StoreError {
    /// True for failures of the storage engine itself, as opposed to the
    /// expected outcomes (`NotFound`, `InvalidToken`, `InvalidDomain`).
    pub fn is_storage(&self) -> bool {
        matches!(
            self,
            Self::OpenFailed { .. }
                | Self::QueryFailed(_)
                | Self::SerializationFailed(_)
                | Self::CorruptRecord(_)
        )
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(error: rusqlite::Error) -> Self {
        Self::QueryFailed(error.to_string())
    }
}

impl From<r2d2::Error> for StoreError {
    fn from(error: r2d2::Error) -> Self {
        Self::QueryFailed(format!("connection pool: {}", error))
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(error: serde_json::Error) -> Self {
        Self::SerializationFailed(error.to_string())
    }
}

/// Every configuration problem found at startup, reported together
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigError {
    problems: Vec<String>,
}

impl ConfigError {
    /// Create an empty accumulator
    pub fn new() -> Self {
        Self::default()
    }

    /// Record another problem
    pub fn push(&mut self, problem: impl Into<String>) {
        self.problems.push(problem.into());
    }

    /// All recorded problems, in the order they were found
    pub fn problems(&self) -> &[String] {
        &self.problems
    }

    pub fn is_empty(&self) -> bool {
        self.problems.is_empty()
    }

    /// `Ok(value)` when nothing was recorded, otherwise the whole report
    pub fn into_result<T>(self, value: T) -> Result<T> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(StarttlsError::Config(self))
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.problems.as_slice() {
            [] => write!(f, "no configuration errors"),
            [single] => write!(f, "{}", single),
            many => {
                write!(f, "multiple errors:")?;
                for problem in many {
                    write!(f, "\n{}", problem)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Convenience Result type alias
pub type Result<T> = std::result::Result<T, StarttlsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_includes_key() {
        let error = StoreError::NotFound {
            kind: "scan",
            key: "example.com".to_string(),
        };
        let message = error.to_string();
        assert!(message.contains("scan"));
        assert!(message.contains("example.com"));
    }

    #[test]
    fn expected_outcomes_are_not_storage_failures() {
        assert!(!StoreError::InvalidToken.is_storage());
        assert!(!StoreError::NotFound {
            kind: "domain",
            key: "a.com".to_string()
        }
        .is_storage());
        assert!(StoreError::QueryFailed("disk I/O error".to_string()).is_storage());
    }

    #[test]
    fn single_config_problem_is_reported_verbatim() {
        let mut errors = ConfigError::new();
        errors.push("expected environment variable DB_DIR to be set");
        assert_eq!(
            errors.to_string(),
            "expected environment variable DB_DIR to be set"
        );
    }

    #[test]
    fn multiple_config_problems_are_listed_together() {
        let mut errors = ConfigError::new();
        errors.push("expected environment variable DB_DIR to be set");
        errors.push("expected environment variable DB_NAME to be set");

        let message = errors.to_string();
        assert!(message.starts_with("multiple errors:"));
        assert!(message.contains("\nexpected environment variable DB_DIR to be set"));
        assert!(message.contains("\nexpected environment variable DB_NAME to be set"));
    }

    #[test]
    fn empty_accumulator_yields_value() {
        let result = ConfigError::new().into_result(42);
        assert_eq!(result.unwrap(), 42);
    }
}
