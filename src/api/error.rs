//! Error mapping from engine failures to HTTP responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::game::directory::DirectoryError;
use crate::game::session::GameError;

/// Errors surfaced by the control-plane handlers.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The requested game does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The operation is not valid for the game's current phase, or the
    /// id is already taken.
    #[error("conflict: {0}")]
    Conflict(String),

    /// The request referenced an unknown team or carried an invalid
    /// value.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// The write key did not match.
    #[error("forbidden: {0}")]
    Forbidden(String),
}

impl From<GameError> for ApiError {
    fn from(e: GameError) -> Self {
        match e {
            GameError::UnknownTeam(_) | GameError::DuplicateTeam | GameError::InvalidGameTime => {
                ApiError::BadRequest(e.to_string())
            }
            GameError::InvalidPhase { .. } => ApiError::Conflict(e.to_string()),
            GameError::WrongKey => ApiError::Forbidden(e.to_string()),
        }
    }
}

impl From<DirectoryError> for ApiError {
    fn from(e: DirectoryError) -> Self {
        match e {
            DirectoryError::NotFound(_) => ApiError::NotFound(e.to_string()),
            DirectoryError::DuplicateId(_) => ApiError::Conflict(e.to_string()),
            DirectoryError::Game(inner) => inner.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
        };

        let body = serde_json::json!({
            "error": self.to_string(),
            "status": status.as_u16(),
        });

        (status, axum::Json(body)).into_response()
    }
}
