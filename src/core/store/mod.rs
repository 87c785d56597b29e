//! # Store Module
//!
//! SQLite persistence for scans, domains and validation tokens.
//!
//! ## Consistency
//! The database is the only source of truth. Every invariant is enforced
//! by a single statement or transaction:
//! - domains are upserted (`INSERT .. ON CONFLICT DO UPDATE`)
//! - tokens are upserted by domain, so a new token replaces the old one
//! - redemption is a compare-and-set on the `used` flag
//!
//! ## Backends
//! - `SqliteDatabase` - implements `ScanStore`, `DomainStore` and `TokenStore`

mod domains;
mod scans;
mod schema;
mod sqlite;
mod tokens;
mod traits;

pub use sqlite::{DbPool, SqliteDatabase};
pub use traits::{DomainStore, ScanStore, TokenStore};
