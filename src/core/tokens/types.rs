//! Types for validation token storage.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An issued validation token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRecord {
    pub token: String,
    pub domain: String,
    pub expires: DateTime<Utc>,
    pub used: bool,
}

/// Generate a fresh opaque token (32 lowercase hex characters)
pub fn generate_token() -> String {
    Uuid::new_v4().simple().to_string()
}
