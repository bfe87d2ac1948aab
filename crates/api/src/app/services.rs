//! Service wiring: store selection and the facade handlers call through.

use std::sync::Arc;

use roster_auth::{Role, TokenCodec};
use roster_core::MemberId;
use roster_directory::{
    DirectoryError, InMemoryMemberStore, MemberDirectory, MemberPatch, MemberStore, MemberView,
    NewMember, SessionError, SessionIssuer,
};
use roster_infra::PostgresMemberStore;

use crate::config::AppConfig;

/// Directory + session issuer over one shared store.
pub struct Services<S> {
    directory: MemberDirectory<S>,
    sessions: SessionIssuer<S>,
}

impl<S: MemberStore + Clone> Services<S> {
    fn new(store: S, tokens: Arc<dyn TokenCodec>) -> Self {
        Self {
            directory: MemberDirectory::new(store.clone()),
            sessions: SessionIssuer::new(store, tokens),
        }
    }
}

/// Runtime-selected backend: Postgres when `DATABASE_URL` is configured,
/// in-memory otherwise (dev/test).
pub enum AppServices {
    InMemory(Services<InMemoryMemberStore>),
    Postgres(Services<PostgresMemberStore>),
}

impl AppServices {
    pub async fn login(&self, email: &str, password: &str) -> Result<String, SessionError> {
        match self {
            AppServices::InMemory(s) => s.sessions.authenticate(email, password).await,
            AppServices::Postgres(s) => s.sessions.authenticate(email, password).await,
        }
    }

    pub async fn create_member(&self, new: NewMember) -> Result<MemberView, DirectoryError> {
        match self {
            AppServices::InMemory(s) => s.directory.create(new).await,
            AppServices::Postgres(s) => s.directory.create(new).await,
        }
    }

    pub async fn get_member(&self, id: MemberId) -> Result<MemberView, DirectoryError> {
        match self {
            AppServices::InMemory(s) => s.directory.get(id).await,
            AppServices::Postgres(s) => s.directory.get(id).await,
        }
    }

    pub async fn list_active(&self) -> Result<Vec<MemberView>, DirectoryError> {
        match self {
            AppServices::InMemory(s) => s.directory.list_active().await,
            AppServices::Postgres(s) => s.directory.list_active().await,
        }
    }

    pub async fn list_inactive(&self) -> Result<Vec<MemberView>, DirectoryError> {
        match self {
            AppServices::InMemory(s) => s.directory.list_inactive().await,
            AppServices::Postgres(s) => s.directory.list_inactive().await,
        }
    }

    pub async fn update_member(
        &self,
        id: MemberId,
        patch: MemberPatch,
    ) -> Result<MemberView, DirectoryError> {
        match self {
            AppServices::InMemory(s) => s.directory.update(id, patch).await,
            AppServices::Postgres(s) => s.directory.update(id, patch).await,
        }
    }

    pub async fn soft_delete_member(&self, id: MemberId) -> Result<(), DirectoryError> {
        match self {
            AppServices::InMemory(s) => s.directory.soft_delete(id).await,
            AppServices::Postgres(s) => s.directory.soft_delete(id).await,
        }
    }

    pub async fn restore_member(&self, id: MemberId) -> Result<(), DirectoryError> {
        match self {
            AppServices::InMemory(s) => s.directory.restore(id).await,
            AppServices::Postgres(s) => s.directory.restore(id).await,
        }
    }

    pub async fn change_role(&self, id: MemberId, role: Role) -> Result<(), DirectoryError> {
        match self {
            AppServices::InMemory(s) => s.directory.change_role(id, role).await,
            AppServices::Postgres(s) => s.directory.change_role(id, role).await,
        }
    }
}

pub async fn build_services(
    config: &AppConfig,
    tokens: Arc<dyn TokenCodec>,
) -> anyhow::Result<AppServices> {
    let services = match &config.database_url {
        Some(url) => {
            let store = PostgresMemberStore::connect(url).await?;
            tracing::info!("member store: postgres");
            AppServices::Postgres(Services::new(store, tokens))
        }
        None => {
            tracing::info!("member store: in-memory (set DATABASE_URL to persist)");
            AppServices::InMemory(Services::new(InMemoryMemberStore::new(), tokens))
        }
    };

    if let Some(admin) = &config.bootstrap {
        bootstrap_admin(&services, admin).await?;
    }

    Ok(services)
}

/// Seed the initial admin account. Idempotent: an existing account with
/// the same email or phone is left untouched.
async fn bootstrap_admin(
    services: &AppServices,
    admin: &crate::config::BootstrapAdmin,
) -> anyhow::Result<()> {
    let new = NewMember {
        name: admin.name.clone(),
        phone: admin.phone.clone(),
        email: admin.email.clone(),
        password: admin.password.clone(),
        role: Some(Role::Admin),
    };

    match services.create_member(new).await {
        Ok(view) => {
            tracing::info!(member_id = %view.id, email = %view.email, "bootstrap admin created");
            Ok(())
        }
        Err(DirectoryError::DuplicateField(_)) => {
            tracing::debug!("bootstrap admin already present");
            Ok(())
        }
        Err(e) => Err(anyhow::anyhow!("bootstrap admin failed: {e}")),
    }
}
