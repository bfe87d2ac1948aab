//! The authenticated caller's identity.

use serde::{Deserialize, Serialize};

use roster_core::MemberId;

use crate::Role;

/// A verified principal for authorization decisions.
///
/// Construction is decoupled from transport: the API layer derives this
/// from a verified token and passes it to every directory call as an
/// explicit argument. There is no ambient request identity.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub id: MemberId,
    pub role: Role,
}

impl Principal {
    pub fn new(id: MemberId, role: Role) -> Self {
        Self { id, role }
    }
}
