//! Signed principal tokens.
//!
//! Claims are the minimal set the directory needs once a token is decoded:
//! the member id and its role. Signing is HS256 behind the [`TokenCodec`]
//! trait so the transport layer never sees key material.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use roster_core::MemberId;

use crate::{Principal, Role};

/// JWT claims for an authenticated principal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwtClaims {
    /// Subject: the member id.
    pub sub: MemberId,

    /// Role granted at issuance time.
    pub role: Role,

    /// Issued-at, seconds since the epoch.
    pub iat: i64,

    /// Expiration, seconds since the epoch.
    pub exp: i64,
}

impl JwtClaims {
    pub fn principal(&self) -> Principal {
        Principal::new(self.sub, self.role)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("token has expired")]
    Expired,

    #[error("invalid token: {0}")]
    Invalid(String),

    #[error("token issuance failed: {0}")]
    Issuance(String),
}

/// Token mint/verify capability.
///
/// `issue` takes `now` explicitly so issuance is deterministic in tests;
/// `verify` checks the signature and the `exp` claim against the real
/// clock.
pub trait TokenCodec: Send + Sync {
    fn issue(&self, principal: &Principal, now: DateTime<Utc>) -> Result<String, TokenError>;
    fn verify(&self, token: &str) -> Result<Principal, TokenError>;
}

/// HS256 implementation backed by a shared secret.
pub struct Hs256TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl Hs256TokenCodec {
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            ttl,
        }
    }
}

impl TokenCodec for Hs256TokenCodec {
    fn issue(&self, principal: &Principal, now: DateTime<Utc>) -> Result<String, TokenError> {
        let claims = JwtClaims {
            sub: principal.id,
            role: principal.role,
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| TokenError::Issuance(e.to_string()))
    }

    fn verify(&self, token: &str) -> Result<Principal, TokenError> {
        let validation = Validation::new(Algorithm::HS256);

        let data = decode::<JwtClaims>(token, &self.decoding, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid(e.to_string()),
            }
        })?;

        Ok(data.claims.principal())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codec() -> Hs256TokenCodec {
        Hs256TokenCodec::new(b"test-secret-test-secret-32-bytes", Duration::minutes(10))
    }

    #[test]
    fn issue_then_verify_round_trips_the_principal() {
        let codec = codec();
        let principal = Principal::new(MemberId::new(), Role::Supervisor);

        let token = codec.issue(&principal, Utc::now()).unwrap();
        assert_eq!(codec.verify(&token).unwrap(), principal);
    }

    #[test]
    fn expired_token_is_rejected() {
        let codec = codec();
        let principal = Principal::new(MemberId::new(), Role::Admin);

        // Issued far enough in the past that iat + ttl is behind the
        // validation leeway.
        let issued = Utc::now() - Duration::hours(2);
        let token = codec.issue(&principal, issued).unwrap();
        assert_eq!(codec.verify(&token), Err(TokenError::Expired));
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let principal = Principal::new(MemberId::new(), Role::Admin);
        let token = codec().issue(&principal, Utc::now()).unwrap();

        let other = Hs256TokenCodec::new(b"another-secret-entirely-32-bytes", Duration::minutes(10));
        assert!(matches!(other.verify(&token), Err(TokenError::Invalid(_))));
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(matches!(
            codec().verify("not.a.jwt"),
            Err(TokenError::Invalid(_))
        ));
    }
}
