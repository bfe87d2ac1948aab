//! Directory actions subject to authorization.

use roster_core::MemberId;

/// Everything a principal can ask the directory to do.
///
/// The enum is closed on purpose: there is no representable "unrecognized"
/// action, so the decision table in [`crate::authorize`] can be total
/// without a permissive fallthrough.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Action {
    ListActiveMembers,
    ListInactiveMembers,
    GetMember {
        target: MemberId,
    },
    CreateMember,
    UpdateMember {
        target: MemberId,
        /// Whether the request body carried `role` or `password` fields.
        /// Supervisors may not touch either.
        includes_sensitive: bool,
    },
    SoftDeleteMember {
        target: MemberId,
    },
    RestoreMember {
        target: MemberId,
    },
    ChangeRole {
        target: MemberId,
    },
}
