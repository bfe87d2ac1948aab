//! Member entity and its lifecycle.

use serde::Serialize;

use roster_auth::Role;
use roster_core::MemberId;

use crate::error::DirectoryError;

/// One directory entry.
///
/// # Invariants
/// - `phone` and `email` are unique across the entire member set,
///   regardless of active status (the store enforces this).
/// - `password_hash` is non-empty from creation onward.
/// - `is_active` is the sole lifecycle state; there is no intermediate.
///
/// The struct deliberately does not implement `Serialize`: everything that
/// leaves the directory goes through [`MemberView`], which has no hash
/// field to leak.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub id: MemberId,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub role: Role,
    pub password_hash: String,
    pub is_active: bool,
}

impl Member {
    /// Mark the member inactive.
    pub fn soft_delete(&mut self) -> Result<(), DirectoryError> {
        if !self.is_active {
            return Err(DirectoryError::AlreadyInactive);
        }
        self.is_active = false;
        Ok(())
    }

    /// Mark a soft-deleted member active again.
    pub fn restore(&mut self) -> Result<(), DirectoryError> {
        if self.is_active {
            return Err(DirectoryError::AlreadyActive);
        }
        self.is_active = true;
        Ok(())
    }

    /// Assign a new role.
    ///
    /// Validity is guaranteed by the type; self-role-change prevention is
    /// the decision engine's job and happens before this is reached.
    pub fn set_role(&mut self, role: Role) {
        self.role = role;
    }
}

/// Outward representation of a member. Never carries the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberView {
    pub id: MemberId,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub role: Role,
    pub is_active: bool,
}

impl From<&Member> for MemberView {
    fn from(member: &Member) -> Self {
        Self {
            id: member.id,
            name: member.name.clone(),
            phone: member.phone.clone(),
            email: member.email.clone(),
            role: member.role,
            is_active: member.is_active,
        }
    }
}

/// Input for member creation. All fields are required; `role` defaults to
/// `member` when absent.
#[derive(Debug, Clone)]
pub struct NewMember {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub password: String,
    pub role: Option<Role>,
}

/// Partial update of the non-sensitive fields.
///
/// Role and password are absent by design: `update` never applies them,
/// for any caller.
#[derive(Debug, Clone, Default)]
pub struct MemberPatch {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

impl MemberPatch {
    /// Collapse empty strings into "not provided".
    ///
    /// The original system used truthiness here, so `""` and an omitted
    /// field are indistinguishable. Preserved as a known quirk; this is
    /// the one place the normalization lives.
    pub fn normalize(self) -> Self {
        let non_empty = |v: Option<String>| v.filter(|s| !s.is_empty());
        Self {
            name: non_empty(self.name),
            phone: non_empty(self.phone),
            email: non_empty(self.email),
        }
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(active: bool) -> Member {
        Member {
            id: MemberId::new(),
            name: "Ana".to_string(),
            phone: "555".to_string(),
            email: "a@x.com".to_string(),
            role: Role::Member,
            password_hash: "$argon2$...".to_string(),
            is_active: active,
        }
    }

    #[test]
    fn soft_delete_then_restore() {
        let mut m = member(true);
        m.soft_delete().unwrap();
        assert!(!m.is_active);
        m.restore().unwrap();
        assert!(m.is_active);
    }

    #[test]
    fn repeated_transitions_are_rejected() {
        let mut m = member(false);
        assert_eq!(m.soft_delete(), Err(DirectoryError::AlreadyInactive));
        m.restore().unwrap();
        assert_eq!(m.restore(), Err(DirectoryError::AlreadyActive));
    }

    #[test]
    fn patch_normalization_drops_empty_strings() {
        let patch = MemberPatch {
            name: Some(String::new()),
            phone: Some("556".to_string()),
            email: None,
        }
        .normalize();

        assert_eq!(patch.name, None);
        assert_eq!(patch.phone.as_deref(), Some("556"));
        assert_eq!(patch.email, None);
    }

    #[test]
    fn view_carries_no_credential_material() {
        let m = member(true);
        let json = serde_json::to_value(MemberView::from(&m)).unwrap();
        let body = json.to_string();
        assert!(!body.contains("argon2"));
        assert!(json.get("password_hash").is_none());
    }
}
