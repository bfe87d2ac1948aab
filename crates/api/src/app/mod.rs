//! HTTP application wiring (axum router + service wiring).
//!
//! - `services.rs`: store selection and the service facade handlers call
//! - `routes/`: HTTP routes + handlers (one file per area)
//! - `dto.rs`: request DTOs
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Extension, Router,
};
use chrono::Duration;

use roster_auth::{Hs256TokenCodec, TokenCodec};

use crate::config::AppConfig;
use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs` and the
/// black-box tests).
pub async fn build_app(config: AppConfig) -> anyhow::Result<Router> {
    let tokens: Arc<dyn TokenCodec> = Arc::new(Hs256TokenCodec::new(
        config.jwt_secret.as_bytes(),
        Duration::minutes(config.session_ttl_minutes),
    ));

    let services = Arc::new(services::build_services(&config, tokens.clone()).await?);
    let auth_state = middleware::AuthState { tokens };

    // Protected routes: require a verified bearer token.
    let protected = routes::router().layer(axum::middleware::from_fn_with_state(
        auth_state,
        middleware::auth_middleware,
    ));

    Ok(Router::new()
        .route("/health", get(routes::system::health))
        .route("/login", post(routes::session::login))
        .merge(protected)
        .layer(Extension(services)))
}
