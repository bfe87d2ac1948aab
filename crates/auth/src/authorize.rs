//! Access decision engine.
//!
//! One table, one function: every handler routes its (principal, action)
//! pair through [`authorize`] before touching the directory, instead of
//! re-checking roles inline per endpoint.

use thiserror::Error;

use crate::{Action, Principal, Role};

/// Authorization failure.
///
/// The three variants are distinct on the wire: a plain role/ownership
/// denial, a supervisor touching sensitive fields, and an admin targeting
/// its own role.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AuthzError {
    #[error("unauthorized")]
    Denied,

    #[error("supervisors cannot change sensitive fields (role/password)")]
    SensitiveFields,

    #[error("you cannot change your own role")]
    SelfRoleChange,
}

/// Authorize a principal for one directory action.
///
/// - No IO
/// - No panics
/// - No business logic (pure policy check)
///
/// The match is total over [`Action`] and every arm names the roles it
/// admits; everything else is denied.
pub fn authorize(principal: &Principal, action: &Action) -> Result<(), AuthzError> {
    match *action {
        Action::ListActiveMembers => match principal.role {
            Role::Admin | Role::Supervisor => Ok(()),
            Role::Member => Err(AuthzError::Denied),
        },

        Action::ListInactiveMembers => match principal.role {
            Role::Admin => Ok(()),
            Role::Supervisor | Role::Member => Err(AuthzError::Denied),
        },

        Action::GetMember { target } => match principal.role {
            Role::Admin => Ok(()),
            Role::Supervisor if target == principal.id => Ok(()),
            Role::Supervisor | Role::Member => Err(AuthzError::Denied),
        },

        Action::CreateMember => match principal.role {
            Role::Admin => Ok(()),
            Role::Supervisor | Role::Member => Err(AuthzError::Denied),
        },

        Action::UpdateMember {
            target,
            includes_sensitive,
        } => match principal.role {
            Role::Admin => Ok(()),
            // Sensitive fields win over the ownership check: the request is
            // rejected for touching them even when everything else is valid.
            Role::Supervisor if includes_sensitive => Err(AuthzError::SensitiveFields),
            Role::Supervisor if target == principal.id => Ok(()),
            Role::Supervisor | Role::Member => Err(AuthzError::Denied),
        },

        Action::SoftDeleteMember { .. } => match principal.role {
            Role::Admin => Ok(()),
            Role::Supervisor | Role::Member => Err(AuthzError::Denied),
        },

        Action::RestoreMember { .. } => match principal.role {
            Role::Admin => Ok(()),
            Role::Supervisor | Role::Member => Err(AuthzError::Denied),
        },

        Action::ChangeRole { target } => match principal.role {
            Role::Admin if target == principal.id => Err(AuthzError::SelfRoleChange),
            Role::Admin => Ok(()),
            Role::Supervisor | Role::Member => Err(AuthzError::Denied),
        },
    }
}
