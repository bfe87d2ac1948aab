//! Member directory routes.
//!
//! Every handler follows the same shape: parse the target, build the
//! [`Action`], gate through `authorize`, then call the directory.

use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
    Json, Router,
};

use roster_auth::{authorize, Action, Principal, Role};
use roster_core::MemberId;
use roster_directory::{DirectoryError, MemberPatch, NewMember};

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_active).post(create))
        .route("/inactive", get(list_inactive))
        .route("/:id", get(get_member).put(update).delete(soft_delete))
        .route("/:id/restore", post(restore))
        .route("/:id/role", put(change_role))
}

pub async fn list_active(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<Principal>,
) -> axum::response::Response {
    if let Err(e) = authorize(&principal, &Action::ListActiveMembers) {
        return errors::authz_error_to_response(e);
    }

    match services.list_active().await {
        Ok(items) => (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response(),
        Err(e) => errors::directory_error_to_response(e),
    }
}

pub async fn list_inactive(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<Principal>,
) -> axum::response::Response {
    if let Err(e) = authorize(&principal, &Action::ListInactiveMembers) {
        return errors::authz_error_to_response(e);
    }

    match services.list_inactive().await {
        Ok(items) => (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response(),
        Err(e) => errors::directory_error_to_response(e),
    }
}

pub async fn create(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<Principal>,
    Json(body): Json<dto::CreateMemberRequest>,
) -> axum::response::Response {
    if let Err(e) = authorize(&principal, &Action::CreateMember) {
        return errors::authz_error_to_response(e);
    }

    let role = match body.role.as_deref() {
        Some(value) => match value.parse::<Role>() {
            Ok(role) => Some(role),
            Err(e) => return errors::directory_error_to_response(DirectoryError::from(e)),
        },
        None => None,
    };

    let new = NewMember {
        name: body.name.unwrap_or_default(),
        phone: body.phone.unwrap_or_default(),
        email: body.email.unwrap_or_default(),
        password: body.password.unwrap_or_default(),
        role,
    };

    match services.create_member(new).await {
        Ok(view) => (StatusCode::CREATED, Json(view)).into_response(),
        Err(e) => errors::directory_error_to_response(e),
    }
}

pub async fn get_member(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let target = match parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    if let Err(e) = authorize(&principal, &Action::GetMember { target }) {
        return errors::authz_error_to_response(e);
    }

    match services.get_member(target).await {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(e) => errors::directory_error_to_response(e),
    }
}

pub async fn update(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
    Json(body): Json<dto::UpdateMemberRequest>,
) -> axum::response::Response {
    let target = match parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    let action = Action::UpdateMember {
        target,
        includes_sensitive: body.includes_sensitive(),
    };
    if let Err(e) = authorize(&principal, &action) {
        return errors::authz_error_to_response(e);
    }

    let patch = MemberPatch {
        name: body.name,
        phone: body.phone,
        email: body.email,
    };

    match services.update_member(target, patch).await {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(e) => errors::directory_error_to_response(e),
    }
}

pub async fn soft_delete(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let target = match parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    if let Err(e) = authorize(&principal, &Action::SoftDeleteMember { target }) {
        return errors::authz_error_to_response(e);
    }

    match services.soft_delete_member(target).await {
        Ok(()) => confirmation("member soft-deleted"),
        Err(e) => errors::directory_error_to_response(e),
    }
}

pub async fn restore(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let target = match parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    if let Err(e) = authorize(&principal, &Action::RestoreMember { target }) {
        return errors::authz_error_to_response(e);
    }

    match services.restore_member(target).await {
        Ok(()) => confirmation("member restored"),
        Err(e) => errors::directory_error_to_response(e),
    }
}

pub async fn change_role(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
    Json(body): Json<dto::ChangeRoleRequest>,
) -> axum::response::Response {
    let target = match parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    // The gate runs before role parsing: a self-targeted request is
    // rejected as such no matter what role value it carries.
    if let Err(e) = authorize(&principal, &Action::ChangeRole { target }) {
        return errors::authz_error_to_response(e);
    }

    let role = match body.role.as_deref().unwrap_or_default().parse::<Role>() {
        Ok(role) => role,
        Err(e) => return errors::directory_error_to_response(DirectoryError::from(e)),
    };

    match services.change_role(target, role).await {
        Ok(()) => confirmation("role updated"),
        Err(e) => errors::directory_error_to_response(e),
    }
}

fn parse_id(raw: &str) -> Result<MemberId, axum::response::Response> {
    raw.parse::<MemberId>().map_err(|_| {
        errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid member id")
    })
}

fn confirmation(message: &str) -> axum::response::Response {
    (
        StatusCode::OK,
        Json(serde_json::json!({ "message": message })),
    )
        .into_response()
}
