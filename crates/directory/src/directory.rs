//! Member directory operations.

use roster_auth::{password, Role};
use roster_core::MemberId;

use crate::error::{DirectoryError, UniqueField};
use crate::member::{Member, MemberPatch, MemberView, NewMember};
use crate::store::MemberStore;

/// CRUD + lifecycle over a [`MemberStore`].
///
/// Each method is one unit of work: load, decide, write. Authorization has
/// already happened by the time any of these run.
#[derive(Debug, Clone)]
pub struct MemberDirectory<S> {
    store: S,
}

impl<S: MemberStore> MemberDirectory<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Create a member. The password is hashed here; the record is born
    /// active with role defaulting to `member`.
    pub async fn create(&self, new: NewMember) -> Result<MemberView, DirectoryError> {
        require("name", &new.name)?;
        require("phone", &new.phone)?;
        require("email", &new.email)?;
        require("password", &new.password)?;

        // Friendly-path pre-checks over the entire set (active or not).
        // The store repeats these atomically on insert.
        if self.store.find_by_phone(&new.phone).await?.is_some() {
            return Err(DirectoryError::DuplicateField(UniqueField::Phone));
        }
        if self.store.find_by_email(&new.email).await?.is_some() {
            return Err(DirectoryError::DuplicateField(UniqueField::Email));
        }

        let password_hash =
            password::hash(&new.password).map_err(|e| DirectoryError::storage(e.to_string()))?;

        let member = Member {
            id: MemberId::new(),
            name: new.name,
            phone: new.phone,
            email: new.email,
            role: new.role.unwrap_or(Role::Member),
            password_hash,
            is_active: true,
        };

        let view = MemberView::from(&member);
        self.store.insert(member).await?;
        tracing::info!(member_id = %view.id, role = %view.role, "member created");
        Ok(view)
    }

    /// Fetch one member by id. Inactive members are returned too: restore
    /// and role changes must be able to reach them.
    pub async fn get(&self, id: MemberId) -> Result<MemberView, DirectoryError> {
        let member = self.load(id).await?;
        Ok(MemberView::from(&member))
    }

    pub async fn list_active(&self) -> Result<Vec<MemberView>, DirectoryError> {
        let members = self.store.list(true).await?;
        Ok(members.iter().map(MemberView::from).collect())
    }

    pub async fn list_inactive(&self) -> Result<Vec<MemberView>, DirectoryError> {
        let members = self.store.list(false).await?;
        Ok(members.iter().map(MemberView::from).collect())
    }

    /// Apply a partial update to the non-sensitive fields.
    ///
    /// Uniqueness for a changed phone/email is checked against every other
    /// member; the record being updated is excluded so writing a field
    /// back unchanged is not a conflict.
    pub async fn update(
        &self,
        id: MemberId,
        patch: MemberPatch,
    ) -> Result<MemberView, DirectoryError> {
        let patch = patch.normalize();
        let mut member = self.load(id).await?;

        if let Some(phone) = &patch.phone {
            if let Some(existing) = self.store.find_by_phone(phone).await? {
                if existing.id != id {
                    return Err(DirectoryError::DuplicateField(UniqueField::Phone));
                }
            }
        }
        if let Some(email) = &patch.email {
            if let Some(existing) = self.store.find_by_email(email).await? {
                if existing.id != id {
                    return Err(DirectoryError::DuplicateField(UniqueField::Email));
                }
            }
        }

        if let Some(name) = patch.name {
            member.name = name;
        }
        if let Some(phone) = patch.phone {
            member.phone = phone;
        }
        if let Some(email) = patch.email {
            member.email = email;
        }

        self.store.update(&member).await?;
        Ok(MemberView::from(&member))
    }

    /// Mark a member inactive.
    pub async fn soft_delete(&self, id: MemberId) -> Result<(), DirectoryError> {
        let mut member = self.load(id).await?;
        member.soft_delete()?;
        self.store.update(&member).await?;
        tracing::info!(member_id = %id, "member soft-deleted");
        Ok(())
    }

    /// Bring a soft-deleted member back.
    pub async fn restore(&self, id: MemberId) -> Result<(), DirectoryError> {
        let mut member = self.load(id).await?;
        member.restore()?;
        self.store.update(&member).await?;
        tracing::info!(member_id = %id, "member restored");
        Ok(())
    }

    /// Assign a new role. Self-role-change prevention happened upstream in
    /// the decision engine.
    pub async fn change_role(&self, id: MemberId, role: Role) -> Result<(), DirectoryError> {
        let mut member = self.load(id).await?;
        member.set_role(role);
        self.store.update(&member).await?;
        tracing::info!(member_id = %id, role = %role, "role changed");
        Ok(())
    }

    async fn load(&self, id: MemberId) -> Result<Member, DirectoryError> {
        self.store.get(id).await?.ok_or(DirectoryError::NotFound)
    }
}

fn require(field: &str, value: &str) -> Result<(), DirectoryError> {
    if value.is_empty() {
        return Err(DirectoryError::validation(format!("'{field}' is required")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::store::InMemoryMemberStore;

    use super::*;

    fn directory() -> MemberDirectory<InMemoryMemberStore> {
        MemberDirectory::new(InMemoryMemberStore::new())
    }

    fn ana() -> NewMember {
        NewMember {
            name: "Ana".to_string(),
            phone: "555".to_string(),
            email: "a@x.com".to_string(),
            password: "pw".to_string(),
            role: None,
        }
    }

    #[tokio::test]
    async fn create_then_get_round_trips_the_view() {
        let dir = directory();
        let created = dir.create(ana()).await.unwrap();

        assert_eq!(created.role, Role::Member);
        assert!(created.is_active);

        let fetched = dir.get(created.id).await.unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn create_rejects_missing_fields() {
        let dir = directory();
        let mut new = ana();
        new.password = String::new();

        assert_eq!(
            dir.create(new).await,
            Err(DirectoryError::Validation("'password' is required".to_string()))
        );
    }

    #[tokio::test]
    async fn create_rejects_taken_phone_and_taken_email() {
        let dir = directory();
        dir.create(ana()).await.unwrap();

        // Same phone, different email.
        let mut second = ana();
        second.email = "b@x.com".to_string();
        assert_eq!(
            dir.create(second).await,
            Err(DirectoryError::DuplicateField(UniqueField::Phone))
        );

        // Same email, different phone.
        let mut third = ana();
        third.phone = "556".to_string();
        assert_eq!(
            dir.create(third).await,
            Err(DirectoryError::DuplicateField(UniqueField::Email))
        );
    }

    #[tokio::test]
    async fn duplicates_include_inactive_members() {
        let dir = directory();
        let created = dir.create(ana()).await.unwrap();
        dir.soft_delete(created.id).await.unwrap();

        let mut second = ana();
        second.email = "b@x.com".to_string();
        assert_eq!(
            dir.create(second).await,
            Err(DirectoryError::DuplicateField(UniqueField::Phone))
        );
    }

    #[tokio::test]
    async fn get_returns_inactive_members() {
        let dir = directory();
        let created = dir.create(ana()).await.unwrap();
        dir.soft_delete(created.id).await.unwrap();

        let fetched = dir.get(created.id).await.unwrap();
        assert!(!fetched.is_active);
    }

    #[tokio::test]
    async fn get_unknown_id_is_not_found() {
        assert_eq!(
            directory().get(MemberId::new()).await,
            Err(DirectoryError::NotFound)
        );
    }

    #[tokio::test]
    async fn update_applies_only_provided_fields() {
        let dir = directory();
        let created = dir.create(ana()).await.unwrap();

        let patch = MemberPatch {
            name: Some("Ana Maria".to_string()),
            phone: None,
            // Empty string behaves exactly like an omitted field.
            email: Some(String::new()),
        };
        let updated = dir.update(created.id, patch).await.unwrap();

        assert_eq!(updated.name, "Ana Maria");
        assert_eq!(updated.phone, created.phone);
        assert_eq!(updated.email, created.email);
    }

    #[tokio::test]
    async fn update_keeping_own_phone_is_not_a_conflict() {
        let dir = directory();
        let created = dir.create(ana()).await.unwrap();

        let patch = MemberPatch {
            phone: Some(created.phone.clone()),
            ..Default::default()
        };
        assert!(dir.update(created.id, patch).await.is_ok());
    }

    #[tokio::test]
    async fn update_rejects_another_members_email() {
        let dir = directory();
        dir.create(ana()).await.unwrap();

        let other = dir
            .create(NewMember {
                name: "Bo".to_string(),
                phone: "556".to_string(),
                email: "b@x.com".to_string(),
                password: "pw".to_string(),
                role: None,
            })
            .await
            .unwrap();

        let patch = MemberPatch {
            email: Some("a@x.com".to_string()),
            ..Default::default()
        };
        assert_eq!(
            dir.update(other.id, patch).await,
            Err(DirectoryError::DuplicateField(UniqueField::Email))
        );
    }

    #[tokio::test]
    async fn lifecycle_transitions_reject_no_ops() {
        let dir = directory();
        let created = dir.create(ana()).await.unwrap();

        dir.soft_delete(created.id).await.unwrap();
        assert_eq!(
            dir.soft_delete(created.id).await,
            Err(DirectoryError::AlreadyInactive)
        );

        dir.restore(created.id).await.unwrap();
        assert_eq!(
            dir.restore(created.id).await,
            Err(DirectoryError::AlreadyActive)
        );
    }

    #[tokio::test]
    async fn change_role_persists() {
        let dir = directory();
        let created = dir.create(ana()).await.unwrap();

        dir.change_role(created.id, Role::Supervisor).await.unwrap();
        assert_eq!(dir.get(created.id).await.unwrap().role, Role::Supervisor);
    }

    #[tokio::test]
    async fn lists_split_by_active_status() {
        let dir = directory();
        let a = dir.create(ana()).await.unwrap();
        let b = dir
            .create(NewMember {
                name: "Bo".to_string(),
                phone: "556".to_string(),
                email: "b@x.com".to_string(),
                password: "pw".to_string(),
                role: Some(Role::Admin),
            })
            .await
            .unwrap();
        dir.soft_delete(a.id).await.unwrap();

        let active = dir.list_active().await.unwrap();
        let inactive = dir.list_inactive().await.unwrap();
        assert_eq!(active.iter().map(|m| m.id).collect::<Vec<_>>(), vec![b.id]);
        assert_eq!(inactive.iter().map(|m| m.id).collect::<Vec<_>>(), vec![a.id]);
    }

    #[tokio::test]
    async fn concurrent_creates_with_same_email_commit_exactly_once() {
        let dir = directory();

        let mut second = ana();
        second.phone = "556".to_string();

        let (first, other) = tokio::join!(dir.create(ana()), dir.create(second));
        let outcomes = [first.is_ok(), other.is_ok()];
        assert_eq!(outcomes.iter().filter(|ok| **ok).count(), 1, "{outcomes:?}");

        // No duplicate record exists afterward.
        let all = dir.list_active().await.unwrap();
        assert_eq!(all.len(), 1);
    }
}
