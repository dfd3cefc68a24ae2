//! HTTP-facing errors.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use derive_more::Display;
use knots_core::GameError;
use serde::Serialize;

/// A failed request: status code plus a message for the player.
#[derive(Debug, Clone, Display)]
#[display("{status}: {message}")]
pub struct ApiError {
    /// Status to respond with.
    pub status: StatusCode,
    /// Message for the caller.
    pub message: String,
}

impl ApiError {
    /// Creates an error with the given status.
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<GameError> for ApiError {
    fn from(err: GameError) -> Self {
        let status = match err {
            GameError::UnknownGame { .. } => StatusCode::NOT_FOUND,
            GameError::InvalidCoordinate { .. } => StatusCode::BAD_REQUEST,
            GameError::OccupiedCell { .. } | GameError::GameClosed | GameError::BoardFull => {
                StatusCode::CONFLICT
            }
        };
        Self::new(status, err.to_string())
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    message: &'a str,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            message: &self.message,
        };
        (self.status, Json(body)).into_response()
    }
}
