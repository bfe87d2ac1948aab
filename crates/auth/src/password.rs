//! Password hashing capability (argon2, PHC string format).
//!
//! The stored hash is opaque to the rest of the system: the directory
//! persists whatever `hash` returns and feeds it back to `verify`.

use argon2::password_hash::{
    rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
};
use argon2::Argon2;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("password hashing failed: {0}")]
pub struct HashError(String);

/// Hash a plaintext password with a fresh random salt.
pub fn hash(plaintext: &str) -> Result<String, HashError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(plaintext.as_bytes(), &salt)
        .map_err(|e| HashError(e.to_string()))?;
    Ok(hash.to_string())
}

/// Verify a plaintext password against a stored PHC hash string.
///
/// A malformed stored hash verifies as false rather than erroring: at the
/// login boundary both cases collapse into "invalid credentials" anyway.
pub fn verify(plaintext: &str, stored: &str) -> bool {
    match PasswordHash::new(stored) {
        Ok(parsed) => Argon2::default()
            .verify_password(plaintext.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify() {
        let stored = hash("pw").unwrap();
        assert!(verify("pw", &stored));
        assert!(!verify("not-pw", &stored));
    }

    #[test]
    fn hashes_are_salted() {
        assert_ne!(hash("pw").unwrap(), hash("pw").unwrap());
    }

    #[test]
    fn malformed_stored_hash_never_verifies() {
        assert!(!verify("pw", "not-a-phc-string"));
        assert!(!verify("pw", ""));
    }
}
