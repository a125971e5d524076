//! JWT token generation and validation
//!
//! Access and refresh tokens share one claim shape, one HS256 key and this
//! issuer; they differ only in expiry and in whether the caller also checks
//! server-side state.

use chrono::Utc;
use jsonwebtoken::{decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

/// JWT claims
///
/// Wire format: `{"userID": <int>, "exp": <unix-seconds>, "iat": ..., "jti": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    #[serde(rename = "userID")]
    pub user_id: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
    /// Unique token ID; keeps same-second tokens distinct
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("failed to sign token: {0}")]
    Signing(jsonwebtoken::errors::Error),

    #[error("token expired")]
    Expired,

    #[error("invalid token: {0}")]
    Invalid(jsonwebtoken::errors::Error),
}

/// Capability to mint and verify signed session tokens
pub trait TokenIssuer: Send + Sync {
    /// Sign `{userID, exp}` for `user_id`, expiring at `expires_at` (Unix seconds)
    fn issue(&self, user_id: i64, expires_at: i64) -> Result<String, TokenError>;

    /// Verify signature and expiry, returning the claims only if both hold
    fn parse(&self, token: &str) -> Result<Claims, TokenError>;
}

/// Pre-computed JWT keys
#[derive(Clone)]
pub struct JwtKeys {
    encoding: Arc<EncodingKey>,
    decoding: Arc<DecodingKey>,
}

impl JwtKeys {
    pub fn new(secret: &SecretString) -> Self {
        let bytes = secret.expose_secret().as_bytes();
        Self {
            encoding: Arc::new(EncodingKey::from_secret(bytes)),
            decoding: Arc::new(DecodingKey::from_secret(bytes)),
        }
    }
}

/// HS256 implementation of [`TokenIssuer`]
///
/// Build once at startup; cloning shares the keys.
#[derive(Clone)]
pub struct JwtService {
    keys: JwtKeys,
    validation: Arc<Validation>,
}

impl JwtService {
    pub fn new(secret: &SecretString) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is exact: a token is dead the second after `exp`
        validation.leeway = 0;
        validation.validate_exp = true;

        Self {
            keys: JwtKeys::new(secret),
            validation: Arc::new(validation),
        }
    }
}

impl TokenIssuer for JwtService {
    fn issue(&self, user_id: i64, expires_at: i64) -> Result<String, TokenError> {
        let claims = Claims {
            user_id,
            exp: expires_at,
            iat: Some(Utc::now().timestamp()),
            jti: Some(Uuid::new_v4().to_string()),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.keys.encoding)
            .map_err(TokenError::Signing)
    }

    fn parse(&self, token: &str) -> Result<Claims, TokenError> {
        decode::<Claims>(token, &self.keys.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid(e),
            })
    }
}
