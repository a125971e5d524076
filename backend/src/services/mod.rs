//! Business logic services
//!
//! Services encapsulate business logic and coordinate between the credential
//! store, the password hasher and the token issuer. Component failures are
//! logged here, with the operation that failed, and leave as generic
//! [`ApiError`]s.

pub mod account;
pub mod session;

pub use account::AccountService;
pub use session::{SessionService, TokenLifetimes};

use crate::error::ApiError;
use crate::repositories::StoreError;
use tracing::{error, warn};

pub(crate) fn storage_failure(operation: &'static str, err: StoreError) -> ApiError {
    match err {
        StoreError::Timeout => {
            warn!(operation, "storage call timed out");
            ApiError::Timeout
        }
        StoreError::Database(e) => {
            error!(operation, error = %e, "storage call failed");
            ApiError::Internal(anyhow::Error::new(e).context(operation))
        }
    }
}

pub(crate) fn internal<E>(operation: &'static str, err: E) -> ApiError
where
    E: std::error::Error + Send + Sync + 'static,
{
    error!(operation, error = %err, "internal failure");
    ApiError::Internal(anyhow::Error::new(err).context(operation))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_timeout_maps_to_timeout() {
        assert!(matches!(
            storage_failure("fetch_by_id", StoreError::Timeout),
            ApiError::Timeout
        ));
    }

    #[test]
    fn test_database_error_maps_to_internal() {
        let err = storage_failure("fetch_by_id", StoreError::Database(sqlx::Error::RowNotFound));
        assert!(matches!(err, ApiError::Internal(_)));
    }
}
