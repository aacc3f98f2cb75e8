use axum::{
    body::{Body, Bytes},
    extract::{Request, State},
    http::header::{AUTHORIZATION, COOKIE},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use serde_json::Value;
use tracing::debug;

use crate::error::{AppError, AUTH_FAILED_MSG};
use crate::state::AppState;

// Requests larger than this cannot carry a body token.
const MAX_BODY_BYTES: usize = 64 * 1024;

// ============================================================================
// Auth Gate Middleware
// ============================================================================

/// Locates a token in the request (cookie, then bearer header, then a
/// `token` field in a JSON body), verifies it, and attaches the decoded
/// [`Identity`](tickex_core::identity::Identity) to the request extensions
/// for downstream handlers.
pub async fn require_auth(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    // 1. Cookie and header carriers leave the body untouched
    let mut token = token_from_headers(req.headers());

    // 2. Fall back to the body carrier, restoring the body for the handler
    let mut req = req;
    if token.is_none() {
        let (parts, body) = req.into_parts();
        let bytes = axum::body::to_bytes(body, MAX_BODY_BYTES)
            .await
            .map_err(|_| auth_failed("request body unreadable"))?;
        token = token_from_body(&bytes);
        req = Request::from_parts(parts, Body::from(bytes));
    }

    let Some(token) = token else {
        return Err(auth_failed("no token in any carrier"));
    };

    // 3. Verify and attach the identity
    let identity = state.auth.verify(&token)?;
    req.extensions_mut().insert(identity);

    Ok(next.run(req).await)
}

fn auth_failed(reason: &str) -> AppError {
    debug!("Authentication rejected: {}", reason);
    AppError::AuthenticationError(AUTH_FAILED_MSG.to_string())
}

/// Carrier order: a `token` cookie wins over an `Authorization: Bearer`
/// header.
fn token_from_headers(headers: &HeaderMap) -> Option<String> {
    if let Some(cookie) = headers.get(COOKIE).and_then(|h| h.to_str().ok()) {
        for pair in cookie.split(';') {
            if let Some(value) = pair.trim().strip_prefix("token=") {
                if !value.is_empty() {
                    return Some(value.to_string());
                }
            }
        }
    }

    headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .filter(|t| !t.is_empty())
        .map(|t| t.to_string())
}

/// Last-resort carrier: a string `token` field in a JSON object body.
fn token_from_body(bytes: &Bytes) -> Option<String> {
    serde_json::from_slice::<Value>(bytes)
        .ok()?
        .get("token")?
        .as_str()
        .map(|t| t.to_string())
}
