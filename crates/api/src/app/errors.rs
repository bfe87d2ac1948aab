//! Consistent JSON error responses.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use roster_auth::AuthzError;
use roster_directory::{DirectoryError, SessionError};

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

pub fn directory_error_to_response(err: DirectoryError) -> axum::response::Response {
    let message = err.to_string();
    match err {
        DirectoryError::Validation(_) => {
            json_error(StatusCode::BAD_REQUEST, "validation_error", message)
        }
        DirectoryError::NotFound => json_error(StatusCode::NOT_FOUND, "not_found", message),
        DirectoryError::DuplicateField(_) => {
            json_error(StatusCode::BAD_REQUEST, "duplicate_field", message)
        }
        DirectoryError::InvalidRole(_) => {
            json_error(StatusCode::BAD_REQUEST, "invalid_role", message)
        }
        DirectoryError::AlreadyActive => {
            json_error(StatusCode::BAD_REQUEST, "already_active", message)
        }
        DirectoryError::AlreadyInactive => {
            json_error(StatusCode::BAD_REQUEST, "already_inactive", message)
        }
        DirectoryError::Storage(_) => {
            tracing::error!(error = %message, "storage failure");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "storage_error", message)
        }
    }
}

pub fn authz_error_to_response(err: AuthzError) -> axum::response::Response {
    let message = err.to_string();
    match err {
        AuthzError::Denied => json_error(StatusCode::FORBIDDEN, "forbidden", message),
        AuthzError::SensitiveFields => {
            json_error(StatusCode::FORBIDDEN, "sensitive_fields", message)
        }
        AuthzError::SelfRoleChange => {
            json_error(StatusCode::FORBIDDEN, "self_role_change", message)
        }
    }
}

pub fn session_error_to_response(err: SessionError) -> axum::response::Response {
    match err {
        SessionError::InvalidCredentials => json_error(
            StatusCode::UNAUTHORIZED,
            "invalid_credentials",
            err.to_string(),
        ),
        SessionError::Internal(msg) => {
            tracing::error!(error = %msg, "session issuance failure");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "session_error", msg)
        }
    }
}
