//! Channel management endpoints.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::auth::middleware::AuthUser;
use crate::error::{ApiError, FieldError};
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/channels", get(list_channels))
        .route("/channels/{name}", post(create_channel).delete(delete_channel))
}

// ---------------------------------------------------------------------------
// GET /api/v1/channels
// ---------------------------------------------------------------------------

async fn list_channels(_user: AuthUser, State(state): State<AppState>) -> Json<Vec<String>> {
    Json(state.channels.list())
}

// ---------------------------------------------------------------------------
// POST /api/v1/channels/:name
// ---------------------------------------------------------------------------

async fn create_channel(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<StatusCode, ApiError> {
    if name.trim().is_empty() {
        return Err(ApiError::validation(vec![FieldError {
            field: "name".to_string(),
            message: "Channel name is required".to_string(),
        }]));
    }

    state.channels.create(&name);
    Ok(StatusCode::OK)
}

// ---------------------------------------------------------------------------
// DELETE /api/v1/channels/:name
// ---------------------------------------------------------------------------

async fn delete_channel(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.channels.delete(&name)?;
    Ok(StatusCode::OK)
}
