//! Postgres-backed member store.
//!
//! The UNIQUE constraints on `phone` and `email` are the real uniqueness
//! guarantee: the directory's friendly pre-checks can race, but when two
//! concurrent writers collide, Postgres rejects one transaction and the
//! SQLSTATE 23505 error is mapped back to a `Duplicate` by constraint
//! name.

use core::str::FromStr;

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::Row;

use roster_auth::Role;
use roster_core::MemberId;
use roster_directory::{Member, MemberStore, StoreError, UniqueField};

const PHONE_CONSTRAINT: &str = "members_phone_key";
const EMAIL_CONSTRAINT: &str = "members_email_key";

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS members (
    id            UUID PRIMARY KEY,
    name          TEXT NOT NULL,
    phone         TEXT NOT NULL,
    email         TEXT NOT NULL,
    role          TEXT NOT NULL,
    password_hash TEXT NOT NULL,
    is_active     BOOLEAN NOT NULL,
    CONSTRAINT members_phone_key UNIQUE (phone),
    CONSTRAINT members_email_key UNIQUE (email)
)
"#;

/// Member store over a Postgres connection pool.
#[derive(Debug, Clone)]
pub struct PostgresMemberStore {
    pool: PgPool,
}

impl PostgresMemberStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect and make sure the members table and its uniqueness
    /// constraints exist.
    pub async fn connect(database_url: &str) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new().connect(database_url).await?;
        let store = Self::new(pool);
        store.ensure_schema().await?;
        Ok(store)
    }

    pub async fn ensure_schema(&self) -> Result<(), sqlx::Error> {
        sqlx::query(SCHEMA).execute(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl MemberStore for PostgresMemberStore {
    async fn insert(&self, member: Member) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO members (id, name, phone, email, role, password_hash, is_active)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(member.id.as_uuid())
        .bind(&member.name)
        .bind(&member.phone)
        .bind(&member.email)
        .bind(member.role.as_str())
        .bind(&member.password_hash)
        .bind(member.is_active)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;
        Ok(())
    }

    async fn get(&self, id: MemberId) -> Result<Option<Member>, StoreError> {
        let row = sqlx::query("SELECT * FROM members WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;
        row.as_ref().map(member_from_row).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Member>, StoreError> {
        let row = sqlx::query("SELECT * FROM members WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;
        row.as_ref().map(member_from_row).transpose()
    }

    async fn find_by_phone(&self, phone: &str) -> Result<Option<Member>, StoreError> {
        let row = sqlx::query("SELECT * FROM members WHERE phone = $1")
            .bind(phone)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;
        row.as_ref().map(member_from_row).transpose()
    }

    async fn list(&self, active: bool) -> Result<Vec<Member>, StoreError> {
        // UUIDv7 primary keys sort in creation order.
        let rows = sqlx::query("SELECT * FROM members WHERE is_active = $1 ORDER BY id")
            .bind(active)
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;
        rows.iter().map(member_from_row).collect()
    }

    async fn update(&self, member: &Member) -> Result<(), StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE members
            SET name = $2, phone = $3, email = $4, role = $5,
                password_hash = $6, is_active = $7
            WHERE id = $1
            "#,
        )
        .bind(member.id.as_uuid())
        .bind(&member.name)
        .bind(&member.phone)
        .bind(&member.email)
        .bind(member.role.as_str())
        .bind(&member.password_hash)
        .bind(member.is_active)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::Missing);
        }
        Ok(())
    }
}

fn member_from_row(row: &PgRow) -> Result<Member, StoreError> {
    let role: String = row.try_get("role").map_err(backend)?;
    let role = Role::from_str(&role)
        .map_err(|e| StoreError::Backend(format!("corrupt role column: {e}")))?;

    Ok(Member {
        id: MemberId::from_uuid(row.try_get("id").map_err(backend)?),
        name: row.try_get("name").map_err(backend)?,
        phone: row.try_get("phone").map_err(backend)?,
        email: row.try_get("email").map_err(backend)?,
        role,
        password_hash: row.try_get("password_hash").map_err(backend)?,
        is_active: row.try_get("is_active").map_err(backend)?,
    })
}

fn backend(e: sqlx::Error) -> StoreError {
    StoreError::Backend(e.to_string())
}

fn map_db_error(e: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db) = &e {
        if db.code().as_deref() == Some("23505") {
            if let Some(field) = constraint_field(db.constraint()) {
                return StoreError::Duplicate(field);
            }
            tracing::warn!(
                constraint = ?db.constraint(),
                "unique violation on unrecognized constraint"
            );
        }
    }
    backend(e)
}

fn constraint_field(constraint: Option<&str>) -> Option<UniqueField> {
    match constraint {
        Some(PHONE_CONSTRAINT) => Some(UniqueField::Phone),
        Some(EMAIL_CONSTRAINT) => Some(UniqueField::Email),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constraint_names_map_to_fields() {
        assert_eq!(
            constraint_field(Some("members_phone_key")),
            Some(UniqueField::Phone)
        );
        assert_eq!(
            constraint_field(Some("members_email_key")),
            Some(UniqueField::Email)
        );
        assert_eq!(constraint_field(Some("members_pkey")), None);
        assert_eq!(constraint_field(None), None);
    }
}
