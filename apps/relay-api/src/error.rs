use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

/// Failures raised by the channel core.
///
/// Delivery failures to individual members are not represented here: the
/// fan-out handles them locally by removing the member.
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error("not authenticated")]
    Unauthenticated,
    #[error("channel `{0}` not found")]
    ChannelNotFound(String),
    #[error("missing or malformed channel name")]
    InvalidTarget,
    #[error("payload is not valid JSON")]
    MalformedMessage,
    #[error("channel `{0}` still has members")]
    ChannelNotEmpty(String),
    #[error("failed to encode frame: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Structured API error returned to clients.
#[derive(Debug, Serialize)]
pub struct ApiErrorBody {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ApiErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldError>>,
}

#[derive(Debug, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Application-level error type that converts into an HTTP response.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: String,
    pub message: String,
    pub details: Option<Vec<FieldError>>,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            code: "BAD_REQUEST".to_string(),
            message: message.into(),
            details: None,
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            code: "NOT_FOUND".to_string(),
            message: message.into(),
            details: None,
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            code: "UNAUTHORIZED".to_string(),
            message: message.into(),
            details: None,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            code: "INTERNAL_ERROR".to_string(),
            message: message.into(),
            details: None,
        }
    }

    pub fn validation(details: Vec<FieldError>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            code: "VALIDATION_ERROR".to_string(),
            message: "Validation failed".to_string(),
            details: Some(details),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ApiErrorBody {
            error: ApiErrorDetail {
                code: self.code,
                message: self.message,
                details: self.details,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<RelayError> for ApiError {
    fn from(err: RelayError) -> Self {
        match err {
            RelayError::Unauthenticated => Self::unauthorized("Not authenticated"),
            RelayError::ChannelNotFound(name) => {
                Self::not_found(format!("Channel `{name}` not found"))
            }
            RelayError::InvalidTarget => Self::bad_request("Missing or malformed channel name"),
            RelayError::ChannelNotEmpty(_) => Self {
                status: StatusCode::BAD_REQUEST,
                code: "CHANNEL_NOT_EMPTY".to_string(),
                message: "There are still users in the channel!".to_string(),
                details: None,
            },
            err @ (RelayError::MalformedMessage | RelayError::Encode(_)) => {
                tracing::error!(%err, "unexpected relay error");
                Self::internal("An internal error occurred")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_not_empty_maps_to_bad_request() {
        let err: ApiError = RelayError::ChannelNotEmpty("general".into()).into();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.code, "CHANNEL_NOT_EMPTY");
        assert_eq!(err.message, "There are still users in the channel!");
    }

    #[test]
    fn unauthenticated_maps_to_401() {
        let err: ApiError = RelayError::Unauthenticated.into();
        assert_eq!(err.status, StatusCode::UNAUTHORIZED);
        assert_eq!(err.code, "UNAUTHORIZED");
    }

    #[test]
    fn transport_only_errors_map_to_internal() {
        let err: ApiError = RelayError::MalformedMessage.into();
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn relay_error_messages_name_the_channel() {
        assert_eq!(
            RelayError::ChannelNotFound("dev".into()).to_string(),
            "channel `dev` not found"
        );
    }
}
