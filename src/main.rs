//! # starttls-store CLI
//!
//! Maintenance command-line interface for the STARTTLS policy store.
//!
//! ## Usage
//! ```bash
//! DB_DIR=/var/lib/starttls DB_NAME=starttls starttls-store domain example.com
//! starttls-store register example.com --email postmaster@example.com
//! starttls-store history example.com --output json
//! ```

mod cli;

use starttls_store::Result;

fn main() -> Result<()> {
    cli::run()
}
