//! Auth routes: username login and logout.

use axum::extract::{Query, State};
use axum::http::header::SET_COOKIE;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use crate::auth::middleware::{AuthUser, SESSION_COOKIE};
use crate::auth::session;
use crate::error::{ApiError, FieldError};
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
}

// ---------------------------------------------------------------------------
// POST /api/v1/auth/login?username=<name>
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct LoginQuery {
    pub username: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub session_token: String,
    pub token_type: String,
    pub expires_in: u64,
    pub username: String,
}

pub async fn login(
    State(state): State<AppState>,
    Query(query): Query<LoginQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let username = query.username.as_deref().map(str::trim).unwrap_or_default();
    if username.is_empty() {
        return Err(ApiError::validation(vec![FieldError {
            field: "username".to_string(),
            message: "Username is required".to_string(),
        }]));
    }

    let token = session::generate_session_token();
    let ttl = state.config.session_ttl_secs;
    session::store_session(
        state.kv.as_ref(),
        &token,
        &session::SessionData {
            username: username.to_string(),
        },
        ttl,
    )
    .await?;

    tracing::info!(%username, "session opened");

    let cookie = format!("{SESSION_COOKIE}={token}; HttpOnly; Path=/; SameSite=Lax; Max-Age={ttl}");
    Ok((
        [(SET_COOKIE, cookie)],
        Json(LoginResponse {
            session_token: token,
            token_type: "Bearer".to_string(),
            expires_in: ttl,
            username: username.to_string(),
        }),
    ))
}

// ---------------------------------------------------------------------------
// POST /api/v1/auth/logout
// ---------------------------------------------------------------------------

pub async fn logout(
    user: AuthUser,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    session::revoke_session(state.kv.as_ref(), &user.token).await?;
    tracing::info!(username = %user.identity, "session closed");

    let cleared = format!("{SESSION_COOKIE}=; HttpOnly; Path=/; SameSite=Lax; Max-Age=0");
    Ok((StatusCode::OK, [(SET_COOKIE, cleared)]))
}
