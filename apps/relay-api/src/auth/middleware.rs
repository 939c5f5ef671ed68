//! Session extraction: resolves a request to a verified identity.

use axum::extract::FromRequestParts;
use axum::http::header::{AUTHORIZATION, COOKIE};
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::auth::session;
use crate::relay::Identity;
use crate::AppState;

/// Name of the cookie carrying the session token.
pub const SESSION_COOKIE: &str = "relay_session";

/// Authenticated user extracted from `Authorization: Bearer <token>` or the
/// session cookie.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub identity: Identity,
    pub token: String,
}

/// Rejection returned when the session token is missing or invalid.
#[derive(Debug)]
pub struct AuthError {
    message: &'static str,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({
            "error": {
                "code": "UNAUTHORIZED",
                "message": self.message
            }
        });
        (StatusCode::UNAUTHORIZED, Json(body)).into_response()
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = session_token(parts).ok_or(AuthError {
            message: "Missing session token",
        })?;

        let data = session::lookup_session(state.kv.as_ref(), token)
            .await
            .map_err(|_| AuthError {
                message: "Session lookup failed",
            })?
            .ok_or(AuthError {
                message: "Invalid or expired session",
            })?;

        Ok(AuthUser {
            identity: Identity::new(data.username),
            token: token.to_string(),
        })
    }
}

/// Bearer header first, then the session cookie.
fn session_token(parts: &Parts) -> Option<&str> {
    if let Some(header) = parts.headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok()) {
        return header.strip_prefix("Bearer ").map(str::trim);
    }

    parts
        .headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value)
        .filter(|value| !value.is_empty())
}
