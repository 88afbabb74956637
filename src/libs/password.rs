//! Argon2id password hashing for stored user credentials.

use crate::libs::error::{CalendarError, CalendarResult};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

pub fn hash_password(password: &str) -> CalendarResult<String> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| CalendarError::PasswordHash(e.to_string()))
}

/// Checks a password against a PHC hash string.
pub fn verify_password(password: &str, hash: &str) -> CalendarResult<bool> {
    let parsed_hash = PasswordHash::new(hash).map_err(|e| CalendarError::PasswordHash(e.to_string()))?;

    Ok(Argon2::default().verify_password(password.as_bytes(), &parsed_hash).is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("s3cret").unwrap();
        assert_ne!(hash, "s3cret");
        assert!(verify_password("s3cret", &hash).unwrap());
        assert!(!verify_password("S3cret", &hash).unwrap());
    }

    #[test]
    fn test_salts_differ() {
        assert_ne!(hash_password("same").unwrap(), hash_password("same").unwrap());
    }

    #[test]
    fn test_malformed_hash() {
        assert!(verify_password("x", "not-a-hash").is_err());
    }
}
