//! Directory error model.
//!
//! Every variant is a local, recoverable, user-facing outcome; none is
//! fatal to the process. Storage-level uniqueness races surface as
//! `DuplicateField`, never as a raw backend error.

use thiserror::Error;

use roster_auth::InvalidRoleError;

/// The uniqueness-constrained member attributes.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum UniqueField {
    Phone,
    Email,
}

impl core::fmt::Display for UniqueField {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            UniqueField::Phone => f.write_str("phone number"),
            UniqueField::Email => f.write_str("email"),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DirectoryError {
    /// A required field was missing or empty.
    #[error("validation failed: {0}")]
    Validation(String),

    /// No member exists with the requested id.
    #[error("member not found")]
    NotFound,

    /// A phone or email is already taken by another member (active or not).
    #[error("{0} already exists")]
    DuplicateField(UniqueField),

    /// A role value outside the closed set.
    #[error("invalid role: '{0}'")]
    InvalidRole(String),

    /// Restore attempted on a member that is already active.
    #[error("member is already active")]
    AlreadyActive,

    /// Soft delete attempted on a member that is already inactive.
    #[error("member is already soft-deleted")]
    AlreadyInactive,

    /// Storage backend failure (the only non-domain outcome).
    #[error("storage error: {0}")]
    Storage(String),
}

impl DirectoryError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }
}

impl From<InvalidRoleError> for DirectoryError {
    fn from(err: InvalidRoleError) -> Self {
        Self::InvalidRole(err.0)
    }
}
