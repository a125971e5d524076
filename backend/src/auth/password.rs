//! Password hashing using argon2
//!
//! New hashes are Argon2id PHC strings. Verification dispatches on the
//! algorithm tag so bcrypt hashes written by earlier deployments still verify.
//!
//! # Performance Considerations
//!
//! Argon2 is intentionally CPU-intensive. Request handlers go through
//! `hash_async` / `verify_async`, which run on the blocking thread pool.

use argon2::{
    password_hash::{self, rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use thiserror::Error;

/// Failures other than "password does not match"
#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("failed to hash password: {0}")]
    Hash(String),

    #[error("stored hash is malformed: {0}")]
    MalformedHash(String),

    #[error("unsupported hash algorithm")]
    UnsupportedAlgorithm,

    #[error("hashing task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Algorithm family, read from the hash prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HashScheme {
    Argon2,
    Bcrypt,
}

impl HashScheme {
    fn detect(hash: &str) -> Option<Self> {
        if hash.starts_with("$argon2") {
            Some(Self::Argon2)
        } else if ["$2a$", "$2b$", "$2y$"].iter().any(|p| hash.starts_with(p)) {
            Some(Self::Bcrypt)
        } else {
            None
        }
    }
}

/// Password hashing service
///
/// Uses Argon2id which is the recommended variant for password hashing.
pub struct PasswordService;

impl PasswordService {
    /// Hash a password using argon2 (blocking operation)
    pub fn hash(password: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| PasswordError::Hash(e.to_string()))?;
        Ok(hash.to_string())
    }

    /// Hash a password on the blocking thread pool
    pub async fn hash_async(password: String) -> Result<String, PasswordError> {
        tokio::task::spawn_blocking(move || Self::hash(&password)).await?
    }

    /// Verify a password against a stored hash (blocking operation)
    ///
    /// Returns `Ok(false)` when the password does not match. An `Err` means the
    /// stored hash itself could not be used.
    pub fn verify(password: &str, hash: &str) -> Result<bool, PasswordError> {
        match HashScheme::detect(hash) {
            Some(HashScheme::Argon2) => {
                let parsed = PasswordHash::new(hash)
                    .map_err(|e| PasswordError::MalformedHash(e.to_string()))?;
                match Argon2::default().verify_password(password.as_bytes(), &parsed) {
                    Ok(()) => Ok(true),
                    Err(password_hash::Error::Password) => Ok(false),
                    Err(e) => Err(PasswordError::MalformedHash(e.to_string())),
                }
            }
            Some(HashScheme::Bcrypt) => bcrypt::verify(password, hash)
                .map_err(|e| PasswordError::MalformedHash(e.to_string())),
            None => Err(PasswordError::UnsupportedAlgorithm),
        }
    }

    /// Verify a password on the blocking thread pool
    pub async fn verify_async(password: String, hash: String) -> Result<bool, PasswordError> {
        tokio::task::spawn_blocking(move || Self::verify(&password, &hash)).await?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_hash_and_verify() {
        let password = "secure_password_123";
        let hash = PasswordService::hash(password).unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(PasswordService::verify(password, &hash).unwrap());
        assert!(!PasswordService::verify("wrong_password", &hash).unwrap());
    }

    #[test]
    fn test_different_hashes_for_same_password() {
        let password = "test_password";
        let hash1 = PasswordService::hash(password).unwrap();
        let hash2 = PasswordService::hash(password).unwrap();

        // Random salt
        assert_ne!(hash1, hash2);
        assert!(PasswordService::verify(password, &hash1).unwrap());
        assert!(PasswordService::verify(password, &hash2).unwrap());
    }

    #[test]
    fn test_legacy_bcrypt_hash_verifies() {
        let hash = bcrypt::hash("pw1", 4).unwrap();

        assert!(PasswordService::verify("pw1", &hash).unwrap());
        assert!(!PasswordService::verify("pw2", &hash).unwrap());
    }

    #[test]
    fn test_unknown_scheme_is_an_error() {
        let result = PasswordService::verify("pw", "plaintext");
        assert!(matches!(result, Err(PasswordError::UnsupportedAlgorithm)));
    }

    #[test]
    fn test_malformed_argon2_hash_is_an_error() {
        let result = PasswordService::verify("pw", "$argon2id$v=19$m=19456,t=2,p=1$!!!!$!!!!");
        assert!(matches!(result, Err(PasswordError::MalformedHash(_))));
    }

    #[tokio::test]
    async fn test_async_hash_and_verify() {
        let password = "async_test_password".to_string();
        let hash = PasswordService::hash_async(password.clone()).await.unwrap();

        assert!(PasswordService::verify_async(password, hash.clone()).await.unwrap());
        assert!(!PasswordService::verify_async("wrong".to_string(), hash).await.unwrap());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(8))]

        #[test]
        fn prop_hash_verifies_only_its_own_password(
            p1 in "[a-zA-Z0-9!@#]{1,32}",
            p2 in "[a-zA-Z0-9!@#]{1,32}",
        ) {
            let hash = PasswordService::hash(&p1).unwrap();
            prop_assert!(PasswordService::verify(&p1, &hash).unwrap());
            if p1 != p2 {
                prop_assert!(!PasswordService::verify(&p2, &hash).unwrap());
            }
        }
    }
}
