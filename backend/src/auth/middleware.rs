//! Claim gate
//!
//! Runs ahead of every protected route: finds the presented token, verifies
//! signature and expiry through the [`TokenIssuer`], and publishes the
//! verified [`AuthUser`] into request extensions. Protected handlers receive
//! the identity only as an `AuthUser` parameter and never parse tokens
//! themselves.
//!
//! Token lookup order: `Authorization: Bearer <token>`, then the `jwt`
//! cookie. A header with another scheme is ignored; a bearer token that fails
//! verification does not fall through to the cookie.

use super::cookie::{read_cookie, REFRESH_COOKIE};
use super::TokenIssuer;
use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    extract::{FromRef, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use tracing::debug;

const INVALID_TOKEN: &str = "invalid token, please login again";
const BEARER: &str = "Bearer ";

/// Verified identity of the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: i64,
}

fn rejected() -> ApiError {
    ApiError::Unauthorized(INVALID_TOKEN.to_string())
}

/// Token from a `Bearer` authorization header; the scheme is case-insensitive.
/// Any other header reads as no token at all.
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    if value.len() <= BEARER.len() || !value.is_char_boundary(BEARER.len()) {
        return None;
    }

    let (scheme, token) = value.split_at(BEARER.len());
    scheme.eq_ignore_ascii_case(BEARER).then_some(token)
}

fn presented_token(headers: &HeaderMap) -> Result<&str, ApiError> {
    bearer_token(headers)
        .or_else(|| read_cookie(headers, REFRESH_COOKIE))
        .ok_or_else(|| ApiError::Unauthorized("missing token, please login".to_string()))
}

/// Verify the request's token and extract the caller's identity.
///
/// Fails closed: any parse failure, or a non-positive `userID`, is
/// `Unauthorized`.
pub fn authenticate(issuer: &dyn TokenIssuer, headers: &HeaderMap) -> Result<AuthUser, ApiError> {
    let token = presented_token(headers)?;

    let claims = issuer.parse(token).map_err(|e| {
        debug!(error = %e, "token rejected");
        rejected()
    })?;

    if claims.user_id <= 0 {
        debug!(user_id = claims.user_id, "token carries no valid identity");
        return Err(rejected());
    }

    Ok(AuthUser {
        user_id: claims.user_id,
    })
}

/// Middleware guarding a group of routes
pub async fn claim_gate(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let user = authenticate(state.tokens(), request.headers())?;
    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

#[axum::async_trait]
impl<S> axum::extract::FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        // Published by `claim_gate` when the route sits behind it
        if let Some(user) = parts.extensions.get::<AuthUser>() {
            return Ok(*user);
        }

        let app_state = AppState::from_ref(state);
        authenticate(app_state.tokens(), &parts.headers)
    }
}
