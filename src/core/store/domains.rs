//! Domain workflow operations.

use super::sqlite::SqliteDatabase;
use super::traits::DomainStore;
use crate::core::domains::{valid_domain_name, DomainData, DomainRecord, DomainState};
use crate::error::StoreError;
use rusqlite::{params, OptionalExtension, Row};
use tracing::debug;

fn domain_from_row(row: &Row<'_>) -> rusqlite::Result<(String, String, String)> {
    Ok((row.get(0)?, row.get(1)?, row.get(2)?))
}

fn into_record((name, email, state): (String, String, String)) -> Result<DomainRecord, StoreError> {
    let state: DomainState = state
        .parse()
        .map_err(|e| StoreError::CorruptRecord(format!("{} for domain {}", e, name)))?;
    Ok(DomainRecord { name, email, state })
}

impl DomainStore for SqliteDatabase {
    fn put_domain(&self, data: &DomainData) -> Result<(), StoreError> {
        if !valid_domain_name(&data.name) {
            return Err(StoreError::InvalidDomain {
                name: data.name.clone(),
            });
        }

        let email = data.supplied_email();
        let state = data.state.map(|s| s.as_str());
        let conn = self.conn()?;

        // Unset fields fall back to the defaults on insert and to the stored
        // values on update.
        conn.execute(
            "INSERT INTO domains (name, email, state)
             VALUES (?1, COALESCE(?2, ''), COALESCE(?3, ?4))
             ON CONFLICT(name) DO UPDATE SET
                 email = COALESCE(?2, domains.email),
                 state = COALESCE(?3, domains.state)",
            params![data.name, email, state, DomainState::default().as_str()],
        )?;

        debug!(domain = %data.name, state = ?data.state, "Upserted domain");
        Ok(())
    }

    fn get_domain(&self, name: &str) -> Result<DomainRecord, StoreError> {
        let conn = self.conn()?;

        let row = conn
            .query_row(
                "SELECT name, email, state FROM domains WHERE name = ?1",
                [name],
                domain_from_row,
            )
            .optional()?;

        match row {
            Some(row) => into_record(row),
            None => Err(StoreError::NotFound {
                kind: "domain",
                key: name.to_string(),
            }),
        }
    }

    fn get_domains(&self, state: DomainState) -> Result<Vec<DomainRecord>, StoreError> {
        let conn = self.conn()?;

        let mut stmt = conn.prepare(
            "SELECT name, email, state FROM domains WHERE state = ?1 ORDER BY name",
        )?;

        let rows = stmt
            .query_map([state.as_str()], domain_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter().map(into_record).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use tempfile::TempDir;

    fn open_db(temp_dir: &TempDir) -> SqliteDatabase {
        SqliteDatabase::open(&Config::new(temp_dir.path(), "domains")).unwrap()
    }

    fn row_count(db: &SqliteDatabase, name: &str) -> i64 {
        db.conn()
            .unwrap()
            .query_row("SELECT COUNT(*) FROM domains WHERE name = ?1", [name], |row| row.get(0))
            .unwrap()
    }

    #[test]
    fn test_new_domain_defaults_to_unvalidated() {
        let temp_dir = TempDir::new().unwrap();
        let db = open_db(&temp_dir);

        db.put_domain(&DomainData::new("testing.com").with_email("admin@testing.com"))
            .unwrap();

        let record = db.get_domain("testing.com").unwrap();
        assert_eq!(record.name, "testing.com");
        assert_eq!(record.email, "admin@testing.com");
        assert_eq!(record.state, DomainState::Unvalidated);
    }

    #[test]
    fn test_partial_update_keeps_email_and_single_row() {
        let temp_dir = TempDir::new().unwrap();
        let db = open_db(&temp_dir);

        db.put_domain(&DomainData::new("testing.com").with_email("admin@testing.com"))
            .unwrap();
        db.put_domain(&DomainData::new("testing.com").with_state(DomainState::Queued))
            .unwrap();

        let record = db.get_domain("testing.com").unwrap();
        assert_eq!(record.state, DomainState::Queued);
        assert_eq!(record.email, "admin@testing.com");
        assert_eq!(row_count(&db, "testing.com"), 1);
    }

    #[test]
    fn test_update_without_state_keeps_state() {
        let temp_dir = TempDir::new().unwrap();
        let db = open_db(&temp_dir);

        db.put_domain(&DomainData::new("testing.com").with_state(DomainState::Validated))
            .unwrap();
        db.put_domain(&DomainData::new("testing.com").with_email("new@testing.com"))
            .unwrap();

        let record = db.get_domain("testing.com").unwrap();
        assert_eq!(record.state, DomainState::Validated);
        assert_eq!(record.email, "new@testing.com");
    }

    #[test]
    fn test_blank_email_does_not_erase() {
        let temp_dir = TempDir::new().unwrap();
        let db = open_db(&temp_dir);

        db.put_domain(&DomainData::new("testing.com").with_email("admin@testing.com"))
            .unwrap();
        db.put_domain(&DomainData::new("testing.com").with_email(""))
            .unwrap();

        assert_eq!(db.get_domain("testing.com").unwrap().email, "admin@testing.com");
    }

    #[test]
    fn test_get_unknown_domain() {
        let temp_dir = TempDir::new().unwrap();
        let db = open_db(&temp_dir);

        let err = db.get_domain("unknown.com").unwrap_err();
        assert!(matches!(err, StoreError::NotFound { kind: "domain", .. }));
    }

    #[test]
    fn test_get_domains_by_state() {
        let temp_dir = TempDir::new().unwrap();
        let db = open_db(&temp_dir);

        db.put_domain(&DomainData::new("b.com").with_state(DomainState::Queued)).unwrap();
        db.put_domain(&DomainData::new("a.com").with_state(DomainState::Queued)).unwrap();
        db.put_domain(&DomainData::new("c.com")).unwrap();

        let queued: Vec<String> = db
            .get_domains(DomainState::Queued)
            .unwrap()
            .into_iter()
            .map(|record| record.name)
            .collect();
        assert_eq!(queued, vec!["a.com", "b.com"]);
        assert_eq!(db.get_domains(DomainState::Failed).unwrap().len(), 0);
    }

    #[test]
    fn test_unknown_stored_state_is_corrupt() {
        let temp_dir = TempDir::new().unwrap();
        let db = open_db(&temp_dir);
        db.conn()
            .unwrap()
            .execute("INSERT INTO domains (name, state) VALUES ('old.com', 'added')", [])
            .unwrap();

        let err = db.get_domain("old.com").unwrap_err();
        assert!(matches!(err, StoreError::CorruptRecord(ref message) if message.contains("added")));
    }

    #[test]
    fn test_rejects_invalid_domain() {
        let temp_dir = TempDir::new().unwrap();
        let db = open_db(&temp_dir);

        let err = db.put_domain(&DomainData::new("localhost")).unwrap_err();
        assert!(matches!(err, StoreError::InvalidDomain { .. }));
    }
}
