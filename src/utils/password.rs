use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use rand::Rng;
use std::sync::LazyLock;

use crate::error::{AppError, AppResult};

/// Hash of a random password, verified against when the username does not
/// exist so both login failure paths do the same work.
static DECOY_HASH: LazyLock<String> = LazyLock::new(|| {
    let secret: String = rand::rng()
        .sample_iter(&rand::distr::Alphanumeric)
        .take(32)
        .map(char::from)
        .collect();
    hash_password(&secret).unwrap_or_default()
});

/// Hashes `password` with Argon2id (library default cost) into a PHC string.
pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal {
            source: anyhow::anyhow!("Failed to hash password: {}", e),
        })?;
    Ok(hash.to_string())
}

/// Constant-time comparison of `password` against a stored PHC hash.
///
/// A malformed stored hash is an error rather than a mismatch.
pub fn verify_password(password: &str, password_hash: &str) -> AppResult<bool> {
    let parsed = PasswordHash::new(password_hash).map_err(|e| AppError::Internal {
        source: anyhow::anyhow!("Stored password hash is malformed: {}", e),
    })?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// Spends one verification on a throwaway hash. The result is always ignored.
pub fn burn_verification(password: &str) {
    let _ = verify_password(password, &DECOY_HASH);
}
