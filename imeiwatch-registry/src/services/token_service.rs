use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use chrono::Utc;
use jsonwebtoken::{encode, EncodingKey, Header};
use uuid::Uuid;

use imeiwatch_shared::errors::AppError;
use imeiwatch_shared::types::auth::{SessionClaims, SESSION_COOKIE};

pub struct IssuedSession {
    pub token: String,
    pub claims: SessionClaims,
}

pub fn create_admin_session(secret: &[u8], ttl_secs: i64) -> Result<IssuedSession, AppError> {
    let claims = SessionClaims::admin(ttl_secs);
    let token = encode(&Header::default(), &claims, &EncodingKey::from_secret(secret))
        .map_err(|e| AppError::internal(format!("failed to sign session: {e}")))?;
    Ok(IssuedSession { token, claims })
}

pub fn session_cookie(token: &str, ttl_secs: i64, secure: bool) -> String {
    let mut cookie =
        format!("{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={ttl_secs}");
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

pub fn cleared_session_cookie(secure: bool) -> String {
    session_cookie("", 0, secure)
}

/// Token ids logged out before their expiry.
#[derive(Debug, Default)]
pub struct RevokedSessions {
    entries: Mutex<HashMap<Uuid, i64>>,
}

impl RevokedSessions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn revoke(&self, token_id: Uuid, expires_at: i64) {
        let now = Utc::now().timestamp();
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.retain(|_, exp| *exp >= now);
        entries.insert(token_id, expires_at);
    }

    pub fn contains(&self, token_id: &Uuid) -> bool {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(token_id)
    }
}
