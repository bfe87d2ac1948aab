use std::sync::Arc;

use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};

use crate::app::{dto, errors};
use crate::app::services::AppServices;

pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::LoginRequest>,
) -> axum::response::Response {
    // A missing field authenticates as the empty string and fails the
    // same way as any other bad credential.
    let email = body.email.unwrap_or_default();
    let password = body.password.unwrap_or_default();

    match services.login(&email, &password).await {
        Ok(token) => (
            StatusCode::OK,
            Json(serde_json::json!({ "access_token": token })),
        )
            .into_response(),
        Err(e) => errors::session_error_to_response(e),
    }
}
