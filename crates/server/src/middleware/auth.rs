use axum::{
    body::Body,
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use courier_core::auth::{AuthError, TokenAuthority};
use serde_json::json;
use std::sync::Arc;

/// Axum middleware that gates protected routes on a Bearer access token.
///
/// Extracts the token from the `Authorization: Bearer <token>` header and
/// verifies it against the access-token authority. On success, inserts the
/// verified `Claims` into request extensions for downstream handlers.
///
/// Rejections are answered with `401` and a `{"error": ...}` JSON body.
pub async fn bearer_auth_middleware(
    State(tokens): State<Arc<TokenAuthority>>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let header = request
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    let Some(header) = header else {
        return unauthorized(&AuthError::MissingAuthHeader);
    };

    let Some(token) = header.strip_prefix("Bearer ") else {
        return unauthorized(&AuthError::MalformedAuthHeader);
    };

    match tokens.verify_access(token) {
        Ok(claims) => {
            request.extensions_mut().insert(claims);
            next.run(request).await
        }
        Err(e) => {
            tracing::warn!(error = %e, "access token rejected");
            unauthorized(&e)
        }
    }
}

fn unauthorized(err: &AuthError) -> Response {
    (StatusCode::UNAUTHORIZED, Json(json!({ "error": err.to_string() }))).into_response()
}
