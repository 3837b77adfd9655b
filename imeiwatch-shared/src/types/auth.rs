use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Subject carried by every administrator session. There is a single admin identity.
pub const ADMIN_SUBJECT: &str = "admin";

/// Name of the cookie holding the session token.
pub const SESSION_COOKIE: &str = "sid";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
    pub jti: Uuid,
}

impl SessionClaims {
    pub fn admin(duration_secs: i64) -> Self {
        let now = Utc::now().timestamp();
        Self {
            sub: ADMIN_SUBJECT.to_string(),
            iat: now,
            exp: now + duration_secs,
            jti: Uuid::new_v4(),
        }
    }

    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() > self.exp
    }

    pub fn is_admin(&self) -> bool {
        self.sub == ADMIN_SUBJECT
    }
}

/// A verified administrator session.
#[derive(Debug, Clone)]
pub struct AdminSession {
    pub token_id: Uuid,
    pub expires_at: i64,
}

impl From<SessionClaims> for AdminSession {
    fn from(claims: SessionClaims) -> Self {
        Self {
            token_id: claims.jti,
            expires_at: claims.exp,
        }
    }
}

/// Implemented by application state so the session extractors can verify tokens.
pub trait SessionAuthority: Send + Sync {
    fn session_secret(&self) -> &[u8];

    fn is_revoked(&self, token_id: &Uuid) -> bool;
}

impl<T: SessionAuthority> SessionAuthority for Arc<T> {
    fn session_secret(&self) -> &[u8] {
        (**self).session_secret()
    }

    fn is_revoked(&self, token_id: &Uuid) -> bool {
        (**self).is_revoked(token_id)
    }
}
