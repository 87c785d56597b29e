//! # Tokens Module
//!
//! Single-use tokens proving control of a domain's contact address.
//!
//! A domain has at most one redeemable token: issuing a new one replaces
//! whatever was issued before, used or not.

mod types;

pub use types::{generate_token, TokenRecord};
