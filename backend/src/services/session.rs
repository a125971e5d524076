//! Session service: login, refresh-token rotation and logout
//!
//! Each user has at most one live session record holding the refresh token
//! most recently handed out. Every login or refresh overwrites it, which is
//! what makes the previous refresh token unusable.
//!
//! Concurrent refreshes for the same user are not serialized: both may match
//! the stored token, and whichever upsert lands last wins.

use super::{internal, storage_failure};
use crate::auth::{PasswordService, TokenIssuer};
use crate::config::JwtConfig;
use crate::error::ApiError;
use crate::repositories::CredentialStore;
use chrono::{Duration, Utc};
use session_auth_shared::AuthTokens;
use std::sync::Arc;
use tracing::{debug, info};

/// Expiry horizons for the two token kinds
#[derive(Debug, Clone, Copy)]
pub struct TokenLifetimes {
    pub access: Duration,
    pub refresh: Duration,
}

impl From<&JwtConfig> for TokenLifetimes {
    fn from(config: &JwtConfig) -> Self {
        Self {
            access: Duration::seconds(config.access_token_expiry_secs),
            refresh: Duration::seconds(config.refresh_token_expiry_secs),
        }
    }
}

pub struct SessionService {
    store: Arc<dyn CredentialStore>,
    issuer: Arc<dyn TokenIssuer>,
    lifetimes: TokenLifetimes,
}

impl SessionService {
    pub fn new(
        store: Arc<dyn CredentialStore>,
        issuer: Arc<dyn TokenIssuer>,
        lifetimes: TokenLifetimes,
    ) -> Self {
        Self {
            store,
            issuer,
            lifetimes,
        }
    }

    /// Login with email and password
    ///
    /// Unknown email and wrong password both yield `InvalidCredentials`.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthTokens, ApiError> {
        let user = self
            .store
            .fetch_by_email(email)
            .await
            .map_err(|e| storage_failure("fetch_by_email", e))?
            .ok_or(ApiError::InvalidCredentials)?;

        let valid = PasswordService::verify_async(password.to_string(), user.password_hash)
            .await
            .map_err(|e| internal("verify_password", e))?;
        if !valid {
            debug!(user_id = user.id, "login rejected");
            return Err(ApiError::InvalidCredentials);
        }

        let tokens = self.issue_session_tokens(user.id).await?;
        info!(user_id = user.id, "user logged in");
        Ok(tokens)
    }

    /// Mint a fresh access/refresh pair and record the refresh token.
    ///
    /// Tokens are minted first and only returned once the upsert succeeded;
    /// a storage failure leaves the caller with nothing.
    pub async fn issue_session_tokens(&self, user_id: i64) -> Result<AuthTokens, ApiError> {
        let now = Utc::now();
        let refresh_expires_at = now + self.lifetimes.refresh;

        let access_token = self
            .issuer
            .issue(user_id, (now + self.lifetimes.access).timestamp())
            .map_err(|e| internal("issue_access_token", e))?;
        let refresh_token = self
            .issuer
            .issue(user_id, refresh_expires_at.timestamp())
            .map_err(|e| internal("issue_refresh_token", e))?;

        self.store
            .upsert_session_token(user_id, &refresh_token, refresh_expires_at)
            .await
            .map_err(|e| storage_failure("upsert_session_token", e))?;

        Ok(AuthTokens {
            access_token,
            refresh_token,
            token_type: "Bearer".to_string(),
            expires_in: self.lifetimes.access.num_seconds(),
        })
    }

    /// Rotate the session for an already-authenticated `user_id`.
    ///
    /// `user_id` comes from the claim gate and is trusted as given; the
    /// presented token must equal the stored one exactly.
    pub async fn refresh(&self, user_id: i64, presented: &str) -> Result<AuthTokens, ApiError> {
        let stored = self
            .store
            .fetch_session_token(user_id)
            .await
            .map_err(|e| storage_failure("fetch_session_token", e))?
            .ok_or_else(|| ApiError::Unauthorized("please login again".to_string()))?;

        if stored != presented {
            debug!(user_id, "refresh rejected: token does not match session");
            return Err(ApiError::Unauthorized(
                "invalid token, please login again".to_string(),
            ));
        }

        let tokens = self.issue_session_tokens(user_id).await?;
        debug!(user_id, "session rotated");
        Ok(tokens)
    }

    /// End the user's session. Idempotent.
    pub async fn logout(&self, user_id: i64) -> Result<(), ApiError> {
        self.store
            .delete_session_token(user_id)
            .await
            .map_err(|e| storage_failure("delete_session_token", e))?;

        info!(user_id, "user logged out");
        Ok(())
    }
}
