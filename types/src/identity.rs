//! Voter identity type.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An opaque voter identity.
///
/// The ledger core assumes the host has already authenticated the caller;
/// an identity here is just a stable, comparable key. Structural validity
/// (non-empty) is checked by the registry at registration time.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VoterId(String);

impl VoterId {
    /// Create a voter identity from a raw string.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Return the raw identity string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this identity is well-formed (non-empty).
    pub fn is_valid(&self) -> bool {
        !self.0.is_empty()
    }
}

impl fmt::Display for VoterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for VoterId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for VoterId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_identity_is_invalid() {
        assert!(!VoterId::new("").is_valid());
        assert!(VoterId::new("alice").is_valid());
    }
}
