//! Process configuration, read from the environment at the edge.

/// Initial admin account created at startup when the directory is empty.
///
/// Member creation is admin-only, so a fresh deployment needs one account
/// seeded out-of-band; this replaces a separate seeding script.
#[derive(Debug, Clone)]
pub struct BootstrapAdmin {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    pub jwt_secret: String,
    pub session_ttl_minutes: i64,
    /// When set, members are persisted in Postgres; otherwise the
    /// in-memory store is used (dev/test).
    pub database_url: Option<String>,
    pub bootstrap: Option<BootstrapAdmin>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let jwt_secret = std::env::var("JWT_SECRET").unwrap_or_else(|_| {
            tracing::warn!("JWT_SECRET not set; using insecure dev default");
            "dev-secret".to_string()
        });

        let session_ttl_minutes = std::env::var("ROSTER_SESSION_TTL_MINUTES")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(60);

        let bootstrap = match (
            std::env::var("ROSTER_BOOTSTRAP_EMAIL"),
            std::env::var("ROSTER_BOOTSTRAP_PASSWORD"),
        ) {
            (Ok(email), Ok(password)) => Some(BootstrapAdmin {
                name: std::env::var("ROSTER_BOOTSTRAP_NAME")
                    .unwrap_or_else(|_| "Administrator".to_string()),
                phone: std::env::var("ROSTER_BOOTSTRAP_PHONE")
                    .unwrap_or_else(|_| "+0000000000".to_string()),
                email,
                password,
            }),
            _ => {
                tracing::warn!(
                    "ROSTER_BOOTSTRAP_EMAIL/PASSWORD not set; no admin will be seeded"
                );
                None
            }
        };

        Self {
            bind_addr: std::env::var("ROSTER_BIND").unwrap_or_else(|_| "0.0.0.0:8080".to_string()),
            jwt_secret,
            session_ttl_minutes,
            database_url: std::env::var("DATABASE_URL").ok(),
            bootstrap,
        }
    }
}
