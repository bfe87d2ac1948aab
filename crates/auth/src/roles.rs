//! Role identifiers used for RBAC.

use core::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A role value outside the closed set.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid role: '{0}'")]
pub struct InvalidRoleError(pub String);

/// Directory role.
///
/// The set is closed: no other value may ever be persisted, and the
/// decision table in [`crate::authorize`] is total over it. Anything a
/// caller sends that is not one of these three fails to parse.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Member,
    Admin,
    Supervisor,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Member, Role::Admin, Role::Supervisor];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Member => "member",
            Role::Admin => "admin",
            Role::Supervisor => "supervisor",
        }
    }

    /// Roles allowed to hold a session at all.
    pub fn is_privileged(&self) -> bool {
        matches!(self, Role::Admin | Role::Supervisor)
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = InvalidRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "member" => Ok(Role::Member),
            "admin" => Ok(Role::Admin),
            "supervisor" => Ok(Role::Supervisor),
            other => Err(InvalidRoleError(other.to_string())),
        }
    }
}
