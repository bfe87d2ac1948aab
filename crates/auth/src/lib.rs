//! `roster-auth` — pure authentication/authorization boundary (zero-trust).
//!
//! This crate is intentionally decoupled from HTTP and storage. The one
//! exception to "pure" is [`password`], which wraps the argon2 primitive.

pub mod action;
pub mod authorize;
pub mod claims;
pub mod password;
pub mod principal;
pub mod roles;

pub use action::Action;
pub use authorize::{authorize, AuthzError};
pub use claims::{Hs256TokenCodec, JwtClaims, TokenCodec, TokenError};
pub use principal::Principal;
pub use roles::{InvalidRoleError, Role};
