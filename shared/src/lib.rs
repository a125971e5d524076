//! Session Auth Shared Library
//!
//! Wire types and input validation shared between the backend and any
//! client crates.

pub mod types;
pub mod validation;

// Re-export commonly used items
pub use types::*;
pub use validation::{validate_credentials, validate_email, validate_password};
