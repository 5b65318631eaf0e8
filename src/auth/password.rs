//! Argon2id password hashing and verification.
//!
//! Hashes are stored as PHC strings, so the algorithm parameters and salt
//! travel with the hash.

use anyhow::{anyhow, Result};
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

/// Hash a plaintext password with a fresh random salt.
pub fn hash_password(password: &str) -> Result<String> {
    // ---
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow!("failed to hash password: {e}"))?;
    Ok(hash.to_string())
}

/// Check a plaintext password against a stored PHC hash.
///
/// A mismatch is `Ok(false)`; only an unreadable hash is an error.
pub fn verify_password(password: &str, hash: &str) -> Result<bool> {
    // ---
    let parsed = PasswordHash::new(hash).map_err(|e| anyhow!("stored password hash is invalid: {e}"))?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(anyhow!("failed to verify password: {e}")),
    }
}
