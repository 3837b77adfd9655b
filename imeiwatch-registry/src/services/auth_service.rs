use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use sha2::{Digest, Sha256};

use imeiwatch_shared::errors::{AppError, ErrorCode};

use crate::config::AppConfig;

/// The single administrator's secret.
#[derive(Clone)]
pub enum AdminCredential {
    /// Argon2 PHC string.
    Hashed(String),
    /// Plaintext secret, compared in constant time.
    Plain(String),
    Unconfigured,
}

impl std::fmt::Debug for AdminCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match self {
            Self::Hashed(_) => "Hashed",
            Self::Plain(_) => "Plain",
            Self::Unconfigured => "Unconfigured",
        };
        f.debug_tuple(kind).finish()
    }
}

impl AdminCredential {
    /// The hash wins over the plaintext secret when both are set.
    pub fn from_config(config: &AppConfig) -> Self {
        if !config.admin_password_hash.is_empty() {
            Self::Hashed(config.admin_password_hash.clone())
        } else if !config.admin_password.is_empty() {
            Self::Plain(config.admin_password.clone())
        } else {
            Self::Unconfigured
        }
    }

    pub fn verify(&self, candidate: &str) -> Result<bool, AppError> {
        match self {
            Self::Hashed(hash) => verify_password(candidate, hash),
            Self::Plain(secret) => Ok(constant_time_eq(candidate, secret)),
            Self::Unconfigured => Err(AppError::new(
                ErrorCode::AdminNotConfigured,
                "admin password not configured",
            )),
        }
    }
}

pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AppError::internal(format!("password hashing failed: {e}")))
}

pub fn verify_password(password: &str, hash: &str) -> Result<bool, AppError> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| AppError::internal(format!("invalid admin password hash: {e}")))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// Compares fixed-size digests so neither length nor content leaks through timing.
fn constant_time_eq(a: &str, b: &str) -> bool {
    let da = Sha256::digest(a.as_bytes());
    let db = Sha256::digest(b.as_bytes());
    da.iter().zip(db.iter()).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
