//! Validation token operations.

use super::sqlite::SqliteDatabase;
use super::traits::TokenStore;
use crate::core::tokens::{generate_token, TokenRecord};
use crate::error::StoreError;
use chrono::Utc;
use rusqlite::{params, OptionalExtension, TransactionBehavior};
use tracing::debug;

impl TokenStore for SqliteDatabase {
    fn put_token(&self, domain: &str) -> Result<TokenRecord, StoreError> {
        let mut conn = self.conn()?;

        // IMMEDIATE takes the write lock up front, so the registration check
        // and the replacement cannot interleave with another writer.
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let registered: bool = tx.query_row(
            "SELECT EXISTS(SELECT 1 FROM domains WHERE name = ?1)",
            [domain],
            |row| row.get(0),
        )?;
        if !registered {
            return Err(StoreError::NotFound {
                kind: "domain",
                key: domain.to_string(),
            });
        }

        let expires = Self::from_timestamp(Self::to_timestamp(self.token_expiry(Utc::now())?))?;
        let record = TokenRecord {
            token: generate_token(),
            domain: domain.to_string(),
            expires,
            used: false,
        };

        tx.execute(
            "INSERT INTO tokens (token, domain, expires, used) VALUES (?1, ?2, ?3, 0)
             ON CONFLICT(domain) DO UPDATE SET
                 token = excluded.token,
                 expires = excluded.expires,
                 used = 0",
            params![record.token, record.domain, Self::to_timestamp(record.expires)],
        )?;
        tx.commit()?;

        debug!(domain = %domain, expires = %record.expires, "Issued token");
        Ok(record)
    }

    fn use_token(&self, token: &str) -> Result<String, StoreError> {
        let conn = self.conn()?;
        let now = Self::to_timestamp(Utc::now());

        // Check and mark in one statement: of two concurrent redemptions
        // only one can see used = 0.
        let domain: Option<String> = conn
            .query_row(
                "UPDATE tokens SET used = 1
                 WHERE token = ?1 AND used = 0 AND expires > ?2
                 RETURNING domain",
                params![token, now],
                |row| row.get(0),
            )
            .optional()?;

        match domain {
            Some(domain) => {
                debug!(domain = %domain, "Redeemed token");
                Ok(domain)
            }
            None => {
                debug!("Rejected invalid token");
                Err(StoreError::InvalidToken)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::core::domains::DomainData;
    use crate::core::store::DomainStore;
    use chrono::Duration;
    use tempfile::TempDir;

    fn open_db(temp_dir: &TempDir) -> SqliteDatabase {
        let db = SqliteDatabase::open(&Config::new(temp_dir.path(), "tokens")).unwrap();
        db.put_domain(&DomainData::new("testing.com").with_email("admin@testing.com"))
            .unwrap();
        db
    }

    #[test]
    fn test_put_use_token() {
        let temp_dir = TempDir::new().unwrap();
        let db = open_db(&temp_dir);

        let issued = db.put_token("testing.com").unwrap();
        assert_eq!(issued.domain, "testing.com");
        assert!(!issued.used);
        assert!(issued.expires > Utc::now());

        assert_eq!(db.use_token(&issued.token).unwrap(), "testing.com");
    }

    #[test]
    fn test_token_is_single_use() {
        let temp_dir = TempDir::new().unwrap();
        let db = open_db(&temp_dir);

        let issued = db.put_token("testing.com").unwrap();
        db.use_token(&issued.token).unwrap();

        let err = db.use_token(&issued.token).unwrap_err();
        assert!(matches!(err, StoreError::InvalidToken));
    }

    #[test]
    fn test_put_token_twice_supersedes_first() {
        let temp_dir = TempDir::new().unwrap();
        let db = open_db(&temp_dir);

        let first = db.put_token("testing.com").unwrap();
        let second = db.put_token("testing.com").unwrap();
        assert_ne!(first.token, second.token);

        assert!(matches!(db.use_token(&first.token), Err(StoreError::InvalidToken)));
        assert_eq!(db.use_token(&second.token).unwrap(), "testing.com");
    }

    #[test]
    fn test_reissue_after_use_gives_fresh_token() {
        let temp_dir = TempDir::new().unwrap();
        let db = open_db(&temp_dir);

        let first = db.put_token("testing.com").unwrap();
        db.use_token(&first.token).unwrap();

        let second = db.put_token("testing.com").unwrap();
        assert_eq!(db.use_token(&second.token).unwrap(), "testing.com");
    }

    #[test]
    fn test_unknown_token_is_invalid() {
        let temp_dir = TempDir::new().unwrap();
        let db = open_db(&temp_dir);

        assert!(matches!(db.use_token("nonsense"), Err(StoreError::InvalidToken)));
        assert!(matches!(db.use_token(""), Err(StoreError::InvalidToken)));
    }

    #[test]
    fn test_expired_token_is_invalid() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config::new(temp_dir.path(), "tokens").with_token_ttl(Duration::seconds(-1));
        let db = SqliteDatabase::open(&config).unwrap();
        db.put_domain(&DomainData::new("testing.com")).unwrap();

        let issued = db.put_token("testing.com").unwrap();
        assert!(matches!(db.use_token(&issued.token), Err(StoreError::InvalidToken)));
    }

    #[test]
    fn test_unregistered_domain_gets_no_token() {
        let temp_dir = TempDir::new().unwrap();
        let db = open_db(&temp_dir);

        let err = db.put_token("unknown.com").unwrap_err();
        assert!(matches!(err, StoreError::NotFound { kind: "domain", .. }));
    }

    #[test]
    fn test_overflowing_lifetime_fails_without_issuing() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config::new(temp_dir.path(), "tokens")
            .with_token_ttl(Duration::hours(2_000_000_000_000));
        let db = SqliteDatabase::open(&config).unwrap();
        db.put_domain(&DomainData::new("testing.com")).unwrap();

        let err = db.put_token("testing.com").unwrap_err();
        assert!(matches!(err, StoreError::TokenTtlOverflow { .. }));

        let stored: i64 = db
            .conn()
            .unwrap()
            .query_row("SELECT COUNT(*) FROM tokens", [], |row| row.get(0))
            .unwrap();
        assert_eq!(stored, 0);
    }
}
