//! # Core Module
//!
//! Record types and their persistence.
//!
//! ## Modules
//! - `scans` - Timestamped scan results
//! - `domains` - Per-domain workflow state and name validation
//! - `tokens` - Single-use proof-of-control tokens
//! - `store` - SQLite-backed stores enforcing the invariants

pub mod domains;
pub mod scans;
pub mod store;
pub mod tokens;

// Re-export commonly used types
pub use domains::{DomainData, DomainRecord, DomainState};
pub use scans::ScanRecord;
pub use store::{DomainStore, ScanStore, SqliteDatabase, TokenStore};
pub use tokens::TokenRecord;
