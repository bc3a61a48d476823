//! Password hashing and verification using Argon2id.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::types::{AppError, Result};

/// A well-formed hash that no password matches. Verifying against it keeps
/// the unknown-user path as slow as the wrong-password path.
const DUMMY_HASH: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$c2lnbmluLWR1bW15LXNhbHQ$0Q4+fT3F2jxB0+g0bM6zv3m9r9zZkTq3mD0a3cZ1f5o";

/// Hashes a password with a fresh random salt.
///
/// Returns a PHC-formatted hash string.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))
}

/// Verifies a password against a stored PHC hash.
///
/// The final digest comparison is constant-time inside `argon2`. A malformed
/// stored hash is treated as a mismatch.
pub fn verify_password(password: &str, hash: &str) -> bool {
    let parsed_hash = match PasswordHash::new(hash) {
        Ok(parsed) => parsed,
        Err(e) => {
            tracing::warn!(error = %e, "stored password hash is malformed");
            return false;
        }
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

/// Burns the same work as a real verification and always fails.
pub fn verify_dummy(password: &str) -> bool {
    let _ = verify_password(password, DUMMY_HASH);
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hashing() {
        let password = "test_password_123";

        let hash = hash_password(password).expect("should hash password");

        assert_ne!(hash, password);
        assert!(hash.starts_with("$argon2id"), "hash should be in PHC format");
    }

    #[test]
    fn test_same_password_gets_fresh_salt() {
        let first = hash_password("pass").expect("should hash");
        let second = hash_password("pass").expect("should hash");

        assert_ne!(first, second, "each hash must use its own salt");
        assert!(verify_password("pass", &first));
        assert!(verify_password("pass", &second));
    }

    #[test]
    fn test_password_verification_failure() {
        let hash = hash_password("correct_password").expect("should hash password");

        assert!(!verify_password("wrong_password", &hash));
        assert!(!verify_password("", &hash));
    }

    #[test]
    fn test_malformed_hash_is_false_not_error() {
        assert!(!verify_password("pass", ""));
        assert!(!verify_password("pass", "not-a-phc-string"));
        assert!(!verify_password("pass", "$argon2id$v=19$garbage"));
    }

    #[test]
    fn test_dummy_hash_parses_and_never_matches() {
        assert!(PasswordHash::new(DUMMY_HASH).is_ok());
        assert!(!verify_dummy("pass"));
        assert!(!verify_dummy(""));
    }
}
