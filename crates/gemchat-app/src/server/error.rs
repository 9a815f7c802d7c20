use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use gemchat_ai::ExchangeError;

use super::types::ErrorResponse;

pub(super) enum AppError {
    /// The request never reached the session.
    BadRequest(String),
    Internal(String),
}

impl From<ExchangeError> for AppError {
    fn from(err: ExchangeError) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(ErrorResponse::new(message));
        (status, body).into_response()
    }
}
