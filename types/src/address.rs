//! Account and denomination identifiers.
//!
//! Both are opaque to the request engine: the only operations it needs are
//! equality, ordering and a stable byte encoding for store keys.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::TypesError;

/// An opaque account identifier (bech32 address, module name, ...).
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AccountId(String);

impl AccountId {
    /// Create an account identifier, rejecting the empty string.
    pub fn new(raw: impl Into<String>) -> Result<Self, TypesError> {
        let s = raw.into();
        if s.is_empty() {
            return Err(TypesError::InvalidAccount("account must not be empty".into()));
        }
        Ok(Self(s))
    }

    /// Skip validation; for compile-time constants only.
    pub(crate) fn from_static(s: &'static str) -> Self {
        Self(s.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Bytes used as the account suffix of a store key.
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<&str> for AccountId {
    type Error = TypesError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

/// A coin denomination such as `uexp` or `ibc/27394FB0...`.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Denom(String);

impl Denom {
    /// Create a denomination after checking it against the denom grammar
    /// `[a-zA-Z][a-zA-Z0-9/:._-]{2,127}`.
    pub fn new(raw: impl Into<String>) -> Result<Self, TypesError> {
        let s = raw.into();
        if !Self::is_valid(&s) {
            return Err(TypesError::InvalidDenom(s));
        }
        Ok(Self(s))
    }

    pub(crate) fn from_static(s: &'static str) -> Self {
        Self(s.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the inner string still satisfies the denom grammar. Values
    /// built through serde bypass [`Denom::new`].
    pub fn validate(&self) -> Result<(), crate::TypesError> {
        if Self::is_valid(&self.0) {
            Ok(())
        } else {
            Err(crate::TypesError::InvalidDenom(self.0.clone()))
        }
    }

    fn is_valid(s: &str) -> bool {
        let mut chars = s.chars();
        let Some(first) = chars.next() else {
            return false;
        };
        if !first.is_ascii_alphabetic() || !(3..=128).contains(&s.len()) {
            return false;
        }
        chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '/' | ':' | '.' | '_' | '-'))
    }
}

impl fmt::Display for Denom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<&str> for Denom {
    type Error = TypesError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}
