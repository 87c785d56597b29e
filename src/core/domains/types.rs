//! Types for domain workflow storage.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Stage of a domain in the onboarding process
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DomainState {
    #[default]
    Unvalidated,
    Queued,
    Validated,
    Failed,
}

impl DomainState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unvalidated => "unvalidated",
            Self::Queued => "queued",
            Self::Validated => "validated",
            Self::Failed => "failed",
        }
    }
}

/// Text that names no workflow state
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown domain state {0:?}")]
pub struct UnknownDomainState(pub String);

impl FromStr for DomainState {
    type Err = UnknownDomainState;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unvalidated" => Ok(Self::Unvalidated),
            "queued" => Ok(Self::Queued),
            "validated" => Ok(Self::Validated),
            "failed" => Ok(Self::Failed),
            _ => Err(UnknownDomainState(s.to_string())),
        }
    }
}

impl fmt::Display for DomainState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A registration or update request for a domain.
///
/// Unset fields are left alone when the domain already exists. An empty
/// email counts as unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainData {
    pub name: String,
    pub email: Option<String>,
    pub state: Option<DomainState>,
}

impl DomainData {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_state(mut self, state: DomainState) -> Self {
        self.state = Some(state);
        self
    }

    /// The email to write, `None` when the caller left it blank
    pub(crate) fn supplied_email(&self) -> Option<&str> {
        self.email.as_deref().filter(|email| !email.is_empty())
    }
}

/// The stored state of a domain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainRecord {
    pub name: String,
    /// Contact address that receives validation tokens
    pub email: String,
    pub state: DomainState,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_state_roundtrip() {
        for state in [
            DomainState::Unvalidated,
            DomainState::Queued,
            DomainState::Validated,
            DomainState::Failed,
        ] {
            assert_eq!(state.as_str().parse::<DomainState>(), Ok(state));
        }
        assert_eq!(
            "added".parse::<DomainState>(),
            Err(UnknownDomainState("added".to_string()))
        );
    }

    #[test]
    fn test_default_state_is_unvalidated() {
        assert_eq!(DomainState::default(), DomainState::Unvalidated);
    }

    #[test]
    fn test_blank_email_is_not_supplied() {
        let data = DomainData::new("a.com").with_email("");
        assert_eq!(data.supplied_email(), None);

        let data = DomainData::new("a.com").with_email("x@a.com");
        assert_eq!(data.supplied_email(), Some("x@a.com"));
    }
}
