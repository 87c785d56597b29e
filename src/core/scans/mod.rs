//! # Scans Module
//!
//! Append-only history of STARTTLS scan results per domain.
//!
//! The result payload is opaque to the store: whatever the scanner produces
//! is kept as JSON and handed back unchanged.

mod types;

pub use types::ScanRecord;
