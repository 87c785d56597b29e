//! Types for scan history storage.

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;

/// One scan of one domain at one instant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanRecord {
    pub domain: String,
    /// Scanner output, stored verbatim
    pub data: Value,
    /// When the scan ran. Persisted with microsecond precision.
    pub timestamp: DateTime<Utc>,
}

impl ScanRecord {
    pub fn new(domain: impl Into<String>, data: Value, timestamp: DateTime<Utc>) -> Self {
        Self {
            domain: domain.into(),
            data,
            timestamp,
        }
    }

    /// Build a record from any serializable scanner result
    pub fn from_result<T: Serialize>(
        domain: impl Into<String>,
        result: &T,
        timestamp: DateTime<Utc>,
    ) -> Result<Self, serde_json::Error> {
        Ok(Self::new(domain, serde_json::to_value(result)?, timestamp))
    }

    /// Decode the payload back into the scanner's result type
    pub fn result<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        T::deserialize(&self.data)
    }
}
