//! Table definitions.

use rusqlite::Connection;

use crate::error::StoreError;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS domains (
    name TEXT PRIMARY KEY,
    email TEXT NOT NULL DEFAULT '',
    state TEXT NOT NULL DEFAULT 'unvalidated'
);

CREATE TABLE IF NOT EXISTS scans (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    domain TEXT NOT NULL,
    data TEXT NOT NULL,
    timestamp INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_scans_domain_time ON scans(domain, timestamp);

CREATE TABLE IF NOT EXISTS tokens (
    token TEXT PRIMARY KEY,
    domain TEXT NOT NULL UNIQUE REFERENCES domains(name) ON DELETE CASCADE,
    expires INTEGER NOT NULL,
    used INTEGER NOT NULL DEFAULT 0
);
";

/// Create all tables and indexes if they don't exist
pub fn init_schema(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch(SCHEMA)?;
    Ok(())
}

/// Delete every row from every table
pub fn clear_tables(conn: &mut Connection) -> Result<(), StoreError> {
    let tx = conn.transaction()?;
    tx.execute("DELETE FROM tokens", [])?;
    tx.execute("DELETE FROM scans", [])?;
    tx.execute("DELETE FROM domains", [])?;
    tx.commit()?;
    Ok(())
}
