//! Refresh token cookie helpers.
//!
//! The `jwt` cookie is a session cookie: no `Max-Age`, expiry is enforced by
//! the token's own `exp` claim and the stored session record.

use crate::config::CookieConfig;
use axum::http::{header::COOKIE, HeaderMap};

/// Name of the cookie carrying the current refresh token
pub const REFRESH_COOKIE: &str = "jwt";

/// Attributes applied to the refresh cookie.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CookieOptions {
    /// Not accessible to JS.
    pub http_only: bool,
    /// Send on HTTPS only.
    pub secure: bool,
}

impl From<&CookieConfig> for CookieOptions {
    fn from(config: &CookieConfig) -> Self {
        Self {
            http_only: config.http_only,
            secure: config.secure,
        }
    }
}

fn attributes(opts: &CookieOptions, parts: &mut Vec<String>) {
    parts.push("Path=/".to_string());
    if opts.secure {
        parts.push("Secure".to_string());
    }
    if opts.http_only {
        parts.push("HttpOnly".to_string());
    }
    parts.push("SameSite=Lax".to_string());
}

/// Build a `Set-Cookie` header value carrying `token`.
pub fn build_set_cookie(token: &str, opts: &CookieOptions) -> String {
    let mut parts = vec![format!("{REFRESH_COOKIE}={token}")];
    attributes(opts, &mut parts);
    parts.join("; ")
}

/// Build a `Set-Cookie` header value that clears the cookie.
pub fn build_clear_cookie(opts: &CookieOptions) -> String {
    let mut parts = vec![format!("{REFRESH_COOKIE}=")];
    attributes(opts, &mut parts);
    parts.push("Max-Age=0".to_string());
    parts.join("; ")
}

/// Read a cookie value from the request's `Cookie` headers.
///
/// Empty values are treated as absent.
pub fn read_cookie<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim())
        .filter(|value| !value.is_empty())
}
