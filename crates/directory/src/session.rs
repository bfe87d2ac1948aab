//! Credential verification and session token issuance.

use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;

use roster_auth::{password, Principal, TokenCodec};

use crate::store::MemberStore;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// Unknown email, wrong password, or an unprivileged role. One
    /// undifferentiated variant so a caller cannot probe which it was.
    #[error("invalid credentials or access denied")]
    InvalidCredentials,

    /// Storage or signing failure; not a credential problem.
    #[error("session issuance failed: {0}")]
    Internal(String),
}

/// Verifies credentials and mints signed principal tokens.
pub struct SessionIssuer<S> {
    store: S,
    tokens: Arc<dyn TokenCodec>,
}

impl<S: MemberStore> SessionIssuer<S> {
    pub fn new(store: S, tokens: Arc<dyn TokenCodec>) -> Self {
        Self { store, tokens }
    }

    /// Authenticate by email and password.
    ///
    /// The lookup does not filter by active status, and only admins and
    /// supervisors receive a token; a member-role login with a correct
    /// password still fails as `InvalidCredentials`.
    pub async fn authenticate(&self, email: &str, pw: &str) -> Result<String, SessionError> {
        let member = self
            .store
            .find_by_email(email)
            .await
            .map_err(|e| SessionError::Internal(e.to_string()))?;

        let Some(member) = member else {
            tracing::debug!("login rejected: unknown email");
            return Err(SessionError::InvalidCredentials);
        };

        if !password::verify(pw, &member.password_hash) {
            tracing::debug!(member_id = %member.id, "login rejected: bad password");
            return Err(SessionError::InvalidCredentials);
        }

        if !member.role.is_privileged() {
            tracing::debug!(member_id = %member.id, "login rejected: unprivileged role");
            return Err(SessionError::InvalidCredentials);
        }

        self.tokens
            .issue(&Principal::new(member.id, member.role), Utc::now())
            .map_err(|e| SessionError::Internal(e.to_string()))
    }
}
