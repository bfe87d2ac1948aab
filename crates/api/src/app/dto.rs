//! Request DTOs.
//!
//! Required fields are `Option` so that a missing field surfaces as the
//! directory's validation error rather than a serde rejection; for partial
//! updates, `role`/`password` exist only so their *presence* can be
//! detected, since update never applies them.

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateMemberRequest {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateMemberRequest {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
    pub password: Option<String>,
}

impl UpdateMemberRequest {
    /// Whether the request tries to touch fields supervisors may not.
    pub fn includes_sensitive(&self) -> bool {
        self.role.is_some() || self.password.is_some()
    }
}

#[derive(Debug, Deserialize)]
pub struct ChangeRoleRequest {
    pub role: Option<String>,
}
