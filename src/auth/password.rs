// Stockroom — Password hashing
//
// Argon2id with a random per-hash salt, stored as a PHC string. The stored
// value is never the plaintext and verification always goes through
// `verify_password` — there is no plaintext comparison anywhere.

use argon2::password_hash::{
    rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
};
use argon2::Argon2;

use super::AuthError;

/// Hash a plaintext password into a PHC-format Argon2id string.
/// Each call generates a fresh random salt, so equal passwords produce
/// different hashes.
pub fn hash_password(plain: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| AuthError::Hash(format!("failed to hash password: {}", e)))?;
    Ok(hash.to_string())
}

/// Verify a plaintext password against a stored PHC string.
/// Returns Ok(false) on mismatch; errors only on malformed stored hashes.
pub fn verify_password(plain: &str, stored: &str) -> Result<bool, AuthError> {
    let parsed = PasswordHash::new(stored)
        .map_err(|e| AuthError::Hash(format!("stored hash is malformed: {}", e)))?;

    match Argon2::default().verify_password(plain.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(AuthError::Hash(format!("verification failed: {}", e))),
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
