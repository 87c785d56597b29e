//! Scan history operations.

use super::sqlite::SqliteDatabase;
use super::traits::ScanStore;
use crate::core::domains::valid_domain_name;
use crate::core::scans::ScanRecord;
use crate::error::StoreError;
use rusqlite::{params, OptionalExtension, Row};
use tracing::debug;

/// Raw columns of a `scans` row, decoded outside the rusqlite callback
struct ScanRow {
    domain: String,
    data: String,
    timestamp: i64,
}

impl ScanRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            domain: row.get(0)?,
            data: row.get(1)?,
            timestamp: row.get(2)?,
        })
    }

    fn into_record(self) -> Result<ScanRecord, StoreError> {
        Ok(ScanRecord {
            domain: self.domain,
            data: serde_json::from_str(&self.data)?,
            timestamp: SqliteDatabase::from_timestamp(self.timestamp)?,
        })
    }
}

impl ScanStore for SqliteDatabase {
    fn put_scan(&self, scan: &ScanRecord) -> Result<(), StoreError> {
        if !valid_domain_name(&scan.domain) {
            return Err(StoreError::InvalidDomain {
                name: scan.domain.clone(),
            });
        }

        let data = serde_json::to_string(&scan.data)?;
        let conn = self.conn()?;

        conn.execute(
            "INSERT INTO scans (domain, data, timestamp) VALUES (?1, ?2, ?3)",
            params![scan.domain, data, Self::to_timestamp(scan.timestamp)],
        )?;

        debug!(domain = %scan.domain, timestamp = %scan.timestamp, "Stored scan");
        Ok(())
    }

    fn get_latest_scan(&self, domain: &str) -> Result<ScanRecord, StoreError> {
        let conn = self.conn()?;

        let row = conn
            .query_row(
                "SELECT domain, data, timestamp FROM scans
                 WHERE domain = ?1
                 ORDER BY timestamp DESC, id DESC
                 LIMIT 1",
                [domain],
                ScanRow::from_row,
            )
            .optional()?;

        match row {
            Some(row) => row.into_record(),
            None => Err(StoreError::NotFound {
                kind: "scan",
                key: domain.to_string(),
            }),
        }
    }

    fn get_all_scans(&self, domain: &str) -> Result<Vec<ScanRecord>, StoreError> {
        let conn = self.conn()?;

        let mut stmt = conn.prepare(
            "SELECT domain, data, timestamp FROM scans
             WHERE domain = ?1
             ORDER BY timestamp ASC, id ASC",
        )?;

        let rows = stmt
            .query_map([domain], ScanRow::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter().map(ScanRow::into_record).collect()
    }
}
