//! Application error handling
//!
//! This module provides unified error handling for the API,
//! converting internal errors to appropriate HTTP responses.
//!
//! Internal causes are logged where they are converted (see
//! `services::internal`); the response only ever carries a generic message.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use session_auth_shared::ErrorResponse;
use thiserror::Error;

/// Message returned for every internal failure
pub const RETRY_LATER: &str = "please try again later";

/// Message returned for every credential failure
pub const CHECK_CREDENTIALS: &str = "please check credentials";

/// API error type that can be converted to HTTP responses
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Unknown email or wrong password; deliberately indistinguishable
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Operation timed out")]
    Timeout,

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::InvalidCredentials | ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Timeout => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => "VALIDATION_ERROR",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::InvalidCredentials => "INVALID_CREDENTIALS",
            ApiError::Unauthorized(_) => "UNAUTHORIZED",
            ApiError::Conflict(_) => "CONFLICT",
            ApiError::Timeout => "TIMEOUT",
            ApiError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Text shown to the caller
    pub fn public_message(&self) -> String {
        match self {
            ApiError::Validation(msg)
            | ApiError::NotFound(msg)
            | ApiError::Unauthorized(msg)
            | ApiError::Conflict(msg) => msg.clone(),
            ApiError::InvalidCredentials => CHECK_CREDENTIALS.to_string(),
            ApiError::Timeout | ApiError::Internal(_) => RETRY_LATER.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(ErrorResponse {
            success: false,
            status: status.as_u16(),
            code: self.code().to_string(),
            error: self.public_message(),
        });

        (status, body).into_response()
    }
}

/// Result type alias for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(ApiError::Validation("bad".into()), StatusCode::BAD_REQUEST)]
    #[case(ApiError::NotFound("user".into()), StatusCode::NOT_FOUND)]
    #[case(ApiError::InvalidCredentials, StatusCode::UNAUTHORIZED)]
    #[case(ApiError::Unauthorized("token".into()), StatusCode::UNAUTHORIZED)]
    #[case(ApiError::Conflict("email".into()), StatusCode::CONFLICT)]
    #[case(ApiError::Timeout, StatusCode::SERVICE_UNAVAILABLE)]
    fn test_error_status(#[case] error: ApiError, #[case] expected: StatusCode) {
        assert_eq!(error.into_response().status(), expected);
    }

    #[test]
    fn test_internal_error_hides_cause() {
        let error = ApiError::Internal(anyhow::anyhow!("connection refused on 10.0.0.3"));
        assert_eq!(error.public_message(), RETRY_LATER);
        assert_eq!(error.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_invalid_credentials_is_generic() {
        assert_eq!(ApiError::InvalidCredentials.public_message(), CHECK_CREDENTIALS);
    }
}
