//! Password hashing
//!
//! New hashes are Argon2id. Verification also understands bcrypt hashes
//! (`$2a$`, `$2b$`, `$2y$`) carried over from the previous credential
//! store. Both are CPU-heavy, so async callers go through the `*_async`
//! variants which run on the blocking pool.

use anyhow::Result;
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use once_cell::sync::Lazy;
use secrecy::{ExposeSecret, SecretString};

/// Hash verified against when the account does not exist, so an unknown
/// email costs as much as a wrong password.
static DUMMY_HASH: Lazy<Option<String>> =
    Lazy::new(|| PasswordService::hash("not-a-real-password").ok());

const BCRYPT_PREFIXES: [&str; 3] = ["$2a$", "$2b$", "$2y$"];

pub struct PasswordService;

impl PasswordService {
    /// Hash a password with Argon2id (blocking)
    pub fn hash(password: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?;
        Ok(hash.to_string())
    }

    pub async fn hash_async(password: SecretString) -> Result<String> {
        tokio::task::spawn_blocking(move || Self::hash(password.expose_secret()))
            .await
            .map_err(|e| anyhow::anyhow!("Task join error: {}", e))?
    }

    /// Verify a password against a stored hash (blocking)
    ///
    /// Returns `Ok(false)` on mismatch; `Err` only for an unreadable hash.
    pub fn verify(password: &str, hash: &str) -> Result<bool> {
        if is_bcrypt(hash) {
            return bcrypt::verify(password, hash)
                .map_err(|e| anyhow::anyhow!("Invalid bcrypt hash: {}", e));
        }

        let parsed =
            PasswordHash::new(hash).map_err(|e| anyhow::anyhow!("Invalid hash format: {}", e))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    }

    pub async fn verify_async(password: SecretString, hash: String) -> Result<bool> {
        tokio::task::spawn_blocking(move || Self::verify(password.expose_secret(), &hash))
            .await
            .map_err(|e| anyhow::anyhow!("Task join error: {}", e))?
    }

    /// Burn one verification's worth of work; the result is discarded.
    pub async fn verify_dummy(password: SecretString) {
        let result = tokio::task::spawn_blocking(move || match DUMMY_HASH.as_deref() {
            Some(hash) => Self::verify(password.expose_secret(), hash).map(|_| ()),
            None => Ok(()),
        })
        .await;

        if let Ok(Err(e)) = result {
            tracing::warn!("Dummy password verification failed: {}", e);
        }
    }
}

fn is_bcrypt(hash: &str) -> bool {
    BCRYPT_PREFIXES.iter().any(|p| hash.starts_with(p))
}
