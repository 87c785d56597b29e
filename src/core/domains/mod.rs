//! # Domains Module
//!
//! Per-domain validation workflow records.
//!
//! ## Workflow
//! `Unvalidated -> Queued -> Validated` (or `Failed`). Transitions are driven
//! by callers through `DomainStore::put_domain`; the store never moves a
//! domain on its own.

mod types;
mod validate;

pub use types::{DomainData, DomainRecord, DomainState, UnknownDomainState};
pub use validate::valid_domain_name;
