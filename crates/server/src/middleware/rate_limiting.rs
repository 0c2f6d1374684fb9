use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use courier_core::middleware::RateLimiter;
use std::{net::SocketAddr, sync::Arc};

/// Rate limiting middleware that enforces per-IP request limits.
///
/// Denied requests are answered with `429` and a plain-text body; nothing
/// behind this layer runs for them.
pub async fn rate_limit_middleware(
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    State(rate_limiter): State<Arc<RateLimiter>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let key = addr.ip().to_string();

    if !rate_limiter.admit(&key) {
        tracing::warn!(client = %key, "rate limit exceeded");
        return (StatusCode::TOO_MANY_REQUESTS, "Too many requests. Try again later.")
            .into_response();
    }

    next.run(request).await
}
