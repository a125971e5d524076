//! Authentication module
//!
//! Provides JWT issuance/verification, argon2 password hashing, the refresh
//! cookie helpers and the claim gate.

pub mod cookie;
mod jwt;
mod middleware;
mod password;

pub use cookie::CookieOptions;
pub use jwt::{Claims, JwtService, TokenError, TokenIssuer};
pub use middleware::{authenticate, claim_gate, AuthUser};
pub use password::{PasswordError, PasswordService};
