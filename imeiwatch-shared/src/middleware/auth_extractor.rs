use axum::extract::FromRequestParts;
use axum::http::header::{AUTHORIZATION, COOKIE};
use axum::http::request::Parts;
use axum::http::HeaderMap;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};

use crate::errors::AppError;
use crate::types::auth::{AdminSession, SessionAuthority, SessionClaims, SESSION_COOKIE};

#[axum::async_trait]
impl<S> FromRequestParts<S> for AdminSession
where
    S: SessionAuthority,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = extract_session_token(&parts.headers)
            .ok_or_else(|| AppError::unauthorized("unauthorized"))?;
        let claims = validate_session(&token, state.session_secret())?;

        if claims.is_expired() || !claims.is_admin() || state.is_revoked(&claims.jti) {
            return Err(AppError::unauthorized("unauthorized"));
        }

        Ok(AdminSession::from(claims))
    }
}

/// Session token from the `sid` cookie, falling back to a Bearer header.
pub fn extract_session_token(headers: &HeaderMap) -> Option<String> {
    cookie_value(headers, SESSION_COOKIE).or_else(|| bearer_token(headers))
}

fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(k, v)| *k == name && !v.is_empty())
        .map(|(_, v)| v.to_string())
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::to_string)
}

fn validate_session(token: &str, secret: &[u8]) -> Result<SessionClaims, AppError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;

    let token_data = decode::<SessionClaims>(token, &DecodingKey::from_secret(secret), &validation)
        .map_err(|e| {
            tracing::debug!(error = %e, "rejected session token");
            AppError::unauthorized("unauthorized")
        })?;

    Ok(token_data.claims)
}

/// Optional admin session; never rejects.
pub struct OptionalAdminSession(pub Option<AdminSession>);

#[axum::async_trait]
impl<S> FromRequestParts<S> for OptionalAdminSession
where
    S: SessionAuthority,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match AdminSession::from_request_parts(parts, state).await {
            Ok(session) => Ok(Self(Some(session))),
            Err(_) => Ok(Self(None)),
        }
    }
}
