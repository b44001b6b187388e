//! HTTP Basic authentication gate.
//!
//! One shared username/password pair, checked on every request. No
//! sessions, cookies, or rate limiting.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use tracing::debug;

use crate::state::AppState;

/// Middleware that enforces the shared Basic credentials.
///
/// - no (or malformed) `Authorization` header: 401 with a `Basic` challenge
/// - wrong username or password: 403
pub async fn basic_auth(State(state): State<Arc<AppState>>, req: Request, next: Next) -> Response {
    let Some((username, password)) = basic_credentials(req.headers()) else {
        return (StatusCode::UNAUTHORIZED, [(header::WWW_AUTHENTICATE, "Basic")]).into_response();
    };

    if !state.credentials.matches(&username, &password) {
        debug!(path = %req.uri().path(), "rejected basic credentials");
        return StatusCode::FORBIDDEN.into_response();
    }

    next.run(req).await
}

/// Decode `Authorization: Basic <base64(user:pass)>`.
///
/// The scheme is case-insensitive and the password may itself contain `:`.
pub fn basic_credentials(headers: &HeaderMap) -> Option<(String, String)> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, encoded) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return None;
    }

    let decoded = STANDARD.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (username, password) = decoded.split_once(':')?;
    Some((username.to_owned(), password.to_owned()))
}
