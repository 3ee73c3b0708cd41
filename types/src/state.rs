//! Request status and its store-key byte.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of a burn or mint request.
///
/// `Pending` is the only non-terminal status. Each status owns a bucket of the
/// key space, selected by [`RequestStatus::as_byte`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RequestStatus {
    /// Accepted, not yet fully resolved.
    Pending,
    /// Fully settled.
    Complete,
    /// Closed without any value token available to mint.
    NoFunds,
    /// Closed with an unresolved remainder.
    Expired,
}

impl RequestStatus {
    pub const ALL: [RequestStatus; 4] = [
        RequestStatus::Pending,
        RequestStatus::Complete,
        RequestStatus::NoFunds,
        RequestStatus::Expired,
    ];

    /// Order in which account lookups search the buckets.
    pub const LOOKUP_ORDER: [RequestStatus; 4] = [
        RequestStatus::Complete,
        RequestStatus::NoFunds,
        RequestStatus::Pending,
        RequestStatus::Expired,
    ];

    pub fn as_byte(&self) -> u8 {
        match self {
            Self::Pending => 0x01,
            Self::Complete => 0x02,
            Self::NoFunds => 0x03,
            Self::Expired => 0x04,
        }
    }

    pub fn from_byte(b: u8) -> Option<Self> {
        match b {
            0x01 => Some(Self::Pending),
            0x02 => Some(Self::Complete),
            0x03 => Some(Self::NoFunds),
            0x04 => Some(Self::Expired),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }

    /// Whether the lifecycle allows moving from `self` to `next`.
    pub fn can_transition_to(&self, _next: RequestStatus) -> bool {
        matches!(self, Self::Pending)
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Pending => "pending",
            Self::Complete => "complete",
            Self::NoFunds => "no_funds",
            Self::Expired => "expired",
        };
        f.write_str(s)
    }
}
