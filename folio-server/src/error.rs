/// HTTP error responses
///
/// Every failure is rendered as `{ "error": <message> }`. Storage detail is
/// logged where the error is created and never sent to the caller.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ApiError {
    #[error("Invalid URL (use http:// or https://)")]
    InvalidUrl,

    #[error("Invalid JSON body")]
    InvalidJson,

    #[error("Missing id")]
    MissingId,

    #[error("Not found")]
    NotFound,

    #[error("Too many requests")]
    RateLimited,

    #[error("Failed to shorten")]
    ShortenFailed,

    #[error("Failed to resolve")]
    ResolveFailed,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidUrl | ApiError::InvalidJson | ApiError::MissingId => {
                StatusCode::BAD_REQUEST
            }
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            ApiError::ShortenFailed | ApiError::ResolveFailed => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorResponse {
            error: self.to_string(),
        });
        (self.status(), body).into_response()
    }
}
