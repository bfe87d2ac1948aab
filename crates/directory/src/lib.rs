//! `roster-directory` — the member directory domain.
//!
//! CRUD with field uniqueness, the soft-delete/restore lifecycle, role
//! assignment, and credential-based session issuance. Authorization is
//! *not* here: handlers gate every call through `roster-auth::authorize`
//! first, passing the principal explicitly.

pub mod directory;
pub mod error;
pub mod member;
pub mod session;
pub mod store;

pub use directory::MemberDirectory;
pub use error::{DirectoryError, UniqueField};
pub use member::{Member, MemberPatch, MemberView, NewMember};
pub use session::{SessionError, SessionIssuer};
pub use store::{InMemoryMemberStore, MemberStore, StoreError};
