//! # STARTTLS Store
//!
//! Persistence for tracking adoption of STARTTLS policy across mail domains.
//!
//! ## What is stored
//! - **Scans** - append-only, timestamped scan results per domain
//! - **Domains** - one workflow record per domain, upserted over time
//! - **Tokens** - single-use tokens proving control of a domain via email
//!
//! ## Architecture
//! - `core` - Record types and the SQLite-backed stores
//! - `config` - Startup configuration, with aggregated error reporting
//! - `error` - Error types

pub mod config;
pub mod core;
pub mod error;

// Re-export commonly used types at the crate root
pub use config::Config;
pub use error::{Result, StarttlsError, StoreError};

/// Initialize tracing for the library
///
/// This should be called by the application entry point.
pub fn init_tracing() {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set global default tracing subscriber");
}
