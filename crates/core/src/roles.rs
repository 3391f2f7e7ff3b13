//! Well-known role names.
//!
//! These must match the `role` claim the account service writes into access
//! tokens.

use serde::{Deserialize, Serialize};

pub const ROLE_USER: &str = "USER";
pub const ROLE_ADMIN: &str = "ADMIN";

/// Role carried by an authenticated identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    /// Parse a role claim. Unknown values are rejected rather than
    /// defaulting to the least-privileged role.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            ROLE_USER => Some(Self::User),
            ROLE_ADMIN => Some(Self::Admin),
            _ => None,
        }
    }

    /// Claim value for this role.
    pub fn name(self) -> &'static str {
        match self {
            Self::User => ROLE_USER,
            Self::Admin => ROLE_ADMIN,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
