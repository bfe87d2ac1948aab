//! Member storage abstraction.
//!
//! The store, not the caller, is the uniqueness authority: `insert` and
//! `update` reject phone/email collisions atomically, so two concurrent
//! writers can never both commit the same value. The directory layer's
//! own pre-checks exist only to produce the friendly error path.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use thiserror::Error;

use roster_core::MemberId;

use crate::error::UniqueField;
use crate::member::Member;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Uniqueness violation on insert/update.
    #[error("{0} already exists")]
    Duplicate(UniqueField),

    /// Update addressed a member that does not exist.
    #[error("no such member")]
    Missing,

    /// Backend failure (connection, lock poisoning, ...).
    #[error("storage backend error: {0}")]
    Backend(String),
}

impl From<StoreError> for crate::DirectoryError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Duplicate(field) => crate::DirectoryError::DuplicateField(field),
            StoreError::Missing => crate::DirectoryError::NotFound,
            StoreError::Backend(msg) => crate::DirectoryError::Storage(msg),
        }
    }
}

/// Key-by-id member store with uniqueness indexes on phone and email.
#[async_trait]
pub trait MemberStore: Send + Sync {
    /// Persist a new member. Fails with `Duplicate` if phone or email is
    /// taken by any member, active or inactive.
    async fn insert(&self, member: Member) -> Result<(), StoreError>;

    /// Point lookup, regardless of active status.
    async fn get(&self, id: MemberId) -> Result<Option<Member>, StoreError>;

    /// Lookup by exact email, regardless of active status.
    async fn find_by_email(&self, email: &str) -> Result<Option<Member>, StoreError>;

    /// Lookup by exact phone, regardless of active status.
    async fn find_by_phone(&self, phone: &str) -> Result<Option<Member>, StoreError>;

    /// Scan filtered by `is_active`, in creation order.
    async fn list(&self, active: bool) -> Result<Vec<Member>, StoreError>;

    /// Replace the stored record. Uniqueness checks exclude the member's
    /// own row.
    async fn update(&self, member: &Member) -> Result<(), StoreError>;
}

/// In-memory store for dev/tests.
///
/// A single `RwLock` over the whole map makes each write (including its
/// uniqueness check) one critical section, which is exactly the atomicity
/// the trait demands.
#[derive(Debug, Clone, Default)]
pub struct InMemoryMemberStore {
    inner: Arc<RwLock<HashMap<MemberId, Member>>>,
}

impl InMemoryMemberStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn conflict(
        map: &HashMap<MemberId, Member>,
        candidate: &Member,
    ) -> Result<(), StoreError> {
        for existing in map.values() {
            if existing.id == candidate.id {
                continue;
            }
            if existing.phone == candidate.phone {
                return Err(StoreError::Duplicate(UniqueField::Phone));
            }
            if existing.email == candidate.email {
                return Err(StoreError::Duplicate(UniqueField::Email));
            }
        }
        Ok(())
    }
}

#[async_trait]
impl MemberStore for InMemoryMemberStore {
    async fn insert(&self, member: Member) -> Result<(), StoreError> {
        let mut map = self
            .inner
            .write()
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        Self::conflict(&map, &member)?;
        map.insert(member.id, member);
        Ok(())
    }

    async fn get(&self, id: MemberId) -> Result<Option<Member>, StoreError> {
        let map = self
            .inner
            .read()
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        Ok(map.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Member>, StoreError> {
        let map = self
            .inner
            .read()
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        Ok(map.values().find(|m| m.email == email).cloned())
    }

    async fn find_by_phone(&self, phone: &str) -> Result<Option<Member>, StoreError> {
        let map = self
            .inner
            .read()
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        Ok(map.values().find(|m| m.phone == phone).cloned())
    }

    async fn list(&self, active: bool) -> Result<Vec<Member>, StoreError> {
        let map = self
            .inner
            .read()
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        let mut members: Vec<Member> = map
            .values()
            .filter(|m| m.is_active == active)
            .cloned()
            .collect();
        // UUIDv7 ids are time-ordered, so this is creation order.
        members.sort_by_key(|m| *m.id.as_uuid());
        Ok(members)
    }

    async fn update(&self, member: &Member) -> Result<(), StoreError> {
        let mut map = self
            .inner
            .write()
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        if !map.contains_key(&member.id) {
            return Err(StoreError::Missing);
        }
        Self::conflict(&map, member)?;
        map.insert(member.id, member.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use roster_auth::Role;

    use super::*;

    fn member(phone: &str, email: &str) -> Member {
        Member {
            id: MemberId::new(),
            name: "someone".to_string(),
            phone: phone.to_string(),
            email: email.to_string(),
            role: Role::Member,
            password_hash: "hash".to_string(),
            is_active: true,
        }
    }

    #[tokio::test]
    async fn insert_rejects_taken_phone_and_email() {
        let store = InMemoryMemberStore::new();
        store.insert(member("555", "a@x.com")).await.unwrap();

        assert_eq!(
            store.insert(member("555", "b@x.com")).await,
            Err(StoreError::Duplicate(UniqueField::Phone))
        );
        assert_eq!(
            store.insert(member("556", "a@x.com")).await,
            Err(StoreError::Duplicate(UniqueField::Email))
        );
    }

    #[tokio::test]
    async fn uniqueness_ignores_active_status() {
        let store = InMemoryMemberStore::new();
        let mut m = member("555", "a@x.com");
        m.is_active = false;
        store.insert(m).await.unwrap();

        assert_eq!(
            store.insert(member("555", "b@x.com")).await,
            Err(StoreError::Duplicate(UniqueField::Phone))
        );
    }

    #[tokio::test]
    async fn update_excludes_own_row_from_uniqueness() {
        let store = InMemoryMemberStore::new();
        let mut m = member("555", "a@x.com");
        store.insert(m.clone()).await.unwrap();
        store.insert(member("556", "b@x.com")).await.unwrap();

        // Writing back the same phone/email is not a conflict.
        m.name = "renamed".to_string();
        store.update(&m).await.unwrap();

        // Taking another member's phone is.
        m.phone = "556".to_string();
        assert_eq!(
            store.update(&m).await,
            Err(StoreError::Duplicate(UniqueField::Phone))
        );
    }

    #[tokio::test]
    async fn update_missing_member() {
        let store = InMemoryMemberStore::new();
        assert_eq!(
            store.update(&member("555", "a@x.com")).await,
            Err(StoreError::Missing)
        );
    }

    #[tokio::test]
    async fn list_filters_by_active_flag() {
        let store = InMemoryMemberStore::new();
        let mut inactive = member("1", "one@x.com");
        inactive.is_active = false;
        store.insert(inactive).await.unwrap();
        store.insert(member("2", "two@x.com")).await.unwrap();

        assert_eq!(store.list(true).await.unwrap().len(), 1);
        assert_eq!(store.list(false).await.unwrap().len(), 1);
    }
}
