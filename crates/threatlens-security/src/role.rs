//! Clearance roles.

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Requester clearance, strictly ordered by level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Level 1. Also the fallback for anything unrecognised.
    Observer = 1,
    Analyst = 2,
    Commander = 3,
    /// Level 4, the top tier.
    Operative = 4,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Observer, Role::Analyst, Role::Commander, Role::Operative];

    pub fn level(&self) -> u8 {
        *self as u8
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Observer  => "Observer",
            Role::Analyst   => "Analyst",
            Role::Commander => "Commander",
            Role::Operative => "Operative",
        }
    }

    /// Resolve a role name. Exact, case-sensitive match on the canonical
    /// names; anything else resolves to `Observer` (fail-closed).
    pub fn from_name(name: &str) -> Role {
        match name {
            "Observer"  => Role::Observer,
            "Analyst"   => Role::Analyst,
            "Commander" => Role::Commander,
            "Operative" => Role::Operative,
            other => {
                warn!(role = %other, "Unrecognised role, falling back to Observer");
                Role::Observer
            }
        }
    }

    /// Only the top tier has its analyses persisted and sees full log entries.
    pub fn is_top_tier(&self) -> bool {
        *self == Role::Operative
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
