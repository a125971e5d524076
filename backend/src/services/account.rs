//! Account service: signup, profile lookup and deletion

use super::{internal, storage_failure};
use crate::auth::PasswordService;
use crate::error::ApiError;
use crate::repositories::CredentialStore;
use session_auth_shared::{validate_credentials, UserProfile};
use std::sync::Arc;
use tracing::{debug, info};

pub struct AccountService {
    store: Arc<dyn CredentialStore>,
}

impl AccountService {
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        Self { store }
    }

    /// Register a new identity. Does not log the user in.
    ///
    /// The email check and the insert are separate statements; two concurrent
    /// signups for one email can both pass the check, and the unique index then
    /// fails the second insert.
    pub async fn signup(&self, email: &str, password: &str) -> Result<i64, ApiError> {
        validate_credentials(email, password).map_err(ApiError::Validation)?;

        let existing = self
            .store
            .count_by_email(email)
            .await
            .map_err(|e| storage_failure("count_by_email", e))?;
        if existing != 0 {
            debug!("signup rejected: email already registered");
            return Err(ApiError::Conflict(
                "email already taken, please use different email".to_string(),
            ));
        }

        // CPU-intensive, runs on the blocking pool
        let password_hash = PasswordService::hash_async(password.to_string())
            .await
            .map_err(|e| internal("hash_password", e))?;

        let user_id = self
            .store
            .insert_user(email, &password_hash)
            .await
            .map_err(|e| storage_failure("insert_user", e))?;

        info!(user_id, "account created");
        Ok(user_id)
    }

    /// Get the profile of the authenticated user
    pub async fn get_profile(&self, user_id: i64) -> Result<UserProfile, ApiError> {
        let user = self
            .store
            .fetch_by_id(user_id)
            .await
            .map_err(|e| storage_failure("fetch_by_id", e))?
            .ok_or_else(|| ApiError::NotFound("user not found".to_string()))?;

        Ok(UserProfile {
            id: user.id,
            email: user.email,
            created_at: user.created_at,
        })
    }

    /// Delete the authenticated user's account and, with it, their session
    pub async fn delete_account(&self, user_id: i64) -> Result<(), ApiError> {
        self.store
            .delete_by_id(user_id)
            .await
            .map_err(|e| storage_failure("delete_by_id", e))?;

        info!(user_id, "account deleted");
        Ok(())
    }
}
