//! API request and response types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Success envelope wrapping every non-error response body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub status: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// Successful response carrying a payload
    pub fn with_data(status: u16, data: T) -> Self {
        Self {
            success: true,
            status,
            data: Some(data),
        }
    }
}

impl ApiResponse<()> {
    /// Successful response without a payload
    pub fn empty(status: u16) -> Self {
        Self {
            success: true,
            status,
            data: None,
        }
    }
}

/// API error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub status: u16,
    /// Machine-readable error kind, e.g. `INVALID_CREDENTIALS`
    pub code: String,
    /// Human-readable message; intentionally generic for credential and token failures
    pub error: String,
}

/// Authentication tokens response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthTokens {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    /// Access token lifetime in seconds
    pub expires_in: i64,
}

/// Signup and login request body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthRequest {
    pub email: String,
    pub password: String,
}

/// Current identity returned by `GET /auth/me`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: i64,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_response_omits_data() {
        let json = serde_json::to_value(ApiResponse::empty(200)).unwrap();
        assert_eq!(json, serde_json::json!({ "success": true, "status": 200 }));
    }

    #[test]
    fn test_error_response_shape() {
        let body = ErrorResponse {
            success: false,
            status: 401,
            code: "UNAUTHORIZED".to_string(),
            error: "please login again".to_string(),
        };
        let json = serde_json::to_value(body).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "please login again");
    }
}
