//! Per-IP rate limiting for the credential endpoints.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::num::NonZeroU32;

use axum::{
    Json,
    extract::{ConnectInfo, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use governor::{Quota, RateLimiter, clock::DefaultClock, state::keyed::DefaultKeyedStateStore};
use tracing::warn;

use crate::states::AppState;

pub type CredentialLimiter = RateLimiter<IpAddr, DefaultKeyedStateStore<IpAddr>, DefaultClock>;

const ATTEMPTS_PER_MINUTE: NonZeroU32 = NonZeroU32::new(20).unwrap();

pub fn credential_limiter() -> CredentialLimiter {
    RateLimiter::keyed(Quota::per_minute(ATTEMPTS_PER_MINUTE))
}

/// Middleware applied to create-user and login-user only. Keyed by client
/// IP; requests without connect info (in-process tests) share one bucket.
pub async fn limit_credentials(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let ip = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|info| info.0.ip())
        .unwrap_or(IpAddr::V4(Ipv4Addr::LOCALHOST));

    if state.credential_limiter.check_key(&ip).is_err() {
        warn!("Rate limit hit for {}", ip);
        return (
            StatusCode::TOO_MANY_REQUESTS,
            Json(serde_json::json!({
              "ok": false,
              "message": "Too many attempts, slow down."
            })),
        )
            .into_response();
    }

    next.run(request).await
}
