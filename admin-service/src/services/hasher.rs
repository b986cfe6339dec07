//! Password hashing provider.
//!
//! Hashing is an external capability behind a narrow trait so algorithm and
//! parameters stay swappable without touching callers. Under no circumstance
//! does a failed hash fall back to storing plaintext; every failure path
//! surfaces as an error.

use std::time::Duration;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use async_trait::async_trait;

use service_core::error::AppError;

#[async_trait]
pub trait HashProvider: Send + Sync {
    /// Produce a self-describing PHC hash string for `plaintext`.
    async fn hash(&self, plaintext: &str) -> Result<String, AppError>;

    /// Check `plaintext` against a stored PHC hash string.
    async fn verify(&self, plaintext: &str, hash: &str) -> Result<bool, AppError>;
}

/// Argon2id-backed provider with secure defaults.
///
/// The work runs on the blocking pool, and every call carries a deadline: a
/// hung hashing backend must not wedge the serving request forever.
pub struct Argon2Hasher {
    timeout: Duration,
}

impl Argon2Hasher {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

#[async_trait]
impl HashProvider for Argon2Hasher {
    async fn hash(&self, plaintext: &str) -> Result<String, AppError> {
        let plaintext = plaintext.to_string();
        let work = tokio::task::spawn_blocking(move || {
            let salt = SaltString::generate(&mut OsRng);
            Argon2::default()
                .hash_password(plaintext.as_bytes(), &salt)
                .map(|hash| hash.to_string())
        });

        tokio::time::timeout(self.timeout, work)
            .await
            .map_err(|_| AppError::Hashing(anyhow::anyhow!("password hashing timed out")))?
            .map_err(|e| AppError::Hashing(anyhow::anyhow!("hashing task failed: {}", e)))?
            .map_err(|e| AppError::Hashing(anyhow::anyhow!("argon2 failure: {}", e)))
    }

    async fn verify(&self, plaintext: &str, hash: &str) -> Result<bool, AppError> {
        let plaintext = plaintext.to_string();
        let hash = hash.to_string();
        let work = tokio::task::spawn_blocking(move || {
            let parsed = PasswordHash::new(&hash)?;
            Ok::<_, argon2::password_hash::Error>(
                Argon2::default()
                    .verify_password(plaintext.as_bytes(), &parsed)
                    .is_ok(),
            )
        });

        tokio::time::timeout(self.timeout, work)
            .await
            .map_err(|_| AppError::Hashing(anyhow::anyhow!("password verification timed out")))?
            .map_err(|e| AppError::Hashing(anyhow::anyhow!("hashing task failed: {}", e)))?
            .map_err(|e: argon2::password_hash::Error| {
                AppError::Hashing(anyhow::anyhow!("stored hash is malformed: {}", e))
            })
    }
}
