//! Store trait definitions.

use crate::core::domains::{DomainData, DomainRecord, DomainState};
use crate::core::scans::ScanRecord;
use crate::core::tokens::TokenRecord;
use crate::error::StoreError;

/// Time series of scan results
pub trait ScanStore: Send + Sync {
    /// Append a scan result. Identical records are all kept.
    fn put_scan(&self, scan: &ScanRecord) -> Result<(), StoreError>;

    /// The scan with the greatest timestamp for `domain`
    ///
    /// Equal timestamps resolve to the most recently inserted record.
    /// Returns `NotFound` if the domain was never scanned.
    fn get_latest_scan(&self, domain: &str) -> Result<ScanRecord, StoreError>;

    /// Every scan for `domain`, oldest first. Empty if never scanned.
    fn get_all_scans(&self, domain: &str) -> Result<Vec<ScanRecord>, StoreError>;
}

/// Current workflow state of each domain
pub trait DomainStore: Send + Sync {
    /// Create the domain or merge the supplied fields into the existing record
    ///
    /// New domains default to `Unvalidated` and an empty email. On update,
    /// only fields that are set (and non-empty) replace stored values.
    fn put_domain(&self, data: &DomainData) -> Result<(), StoreError>;

    /// Returns `NotFound` if the domain was never registered.
    fn get_domain(&self, name: &str) -> Result<DomainRecord, StoreError>;

    /// All domains currently in `state`, ordered by name
    fn get_domains(&self, state: DomainState) -> Result<Vec<DomainRecord>, StoreError>;
}

/// Single-use proof-of-control tokens
pub trait TokenStore: Send + Sync {
    /// Issue a new token for a registered domain, superseding any earlier one
    fn put_token(&self, domain: &str) -> Result<TokenRecord, StoreError>;

    /// Redeem a token and return its domain
    ///
    /// Fails with `InvalidToken` if the token is unknown, used, expired or
    /// superseded.
    fn use_token(&self, token: &str) -> Result<String, StoreError>;
}
