use std::convert::Infallible;
use std::net::SocketAddr;

use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::request::Parts;

/// Caller origin used to key the login throttle: the first `X-Forwarded-For`
/// hop, else the peer address, else `"unknown"`.
///
/// Assumes the service sits behind a trusted reverse proxy that sets
/// `X-Forwarded-For`. Exposed directly, a client can pick a fresh origin per
/// attempt and sidestep the throttle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientOrigin(pub String);

#[axum::async_trait]
impl<S> FromRequestParts<S> for ClientOrigin
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let forwarded = parts
            .headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string);

        let origin = forwarded
            .or_else(|| {
                parts
                    .extensions
                    .get::<ConnectInfo<SocketAddr>>()
                    .map(|ConnectInfo(addr)| addr.ip().to_string())
            })
            .unwrap_or_else(|| "unknown".to_string());

        Ok(Self(origin))
    }
}
