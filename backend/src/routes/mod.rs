//! Route definitions for the session auth API
//!
//! This module organizes all API routes and applies middleware.

use crate::state::AppState;
use axum::{
    http::{header, HeaderValue, Method},
    routing::get,
    Router,
};
use tower_http::{
    catch_panic::CatchPanicLayer,
    compression::CompressionLayer,
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::warn;

mod auth;
mod health;


pub use auth::auth_routes;

/// Create the main application router with all middleware
pub fn create_router(state: AppState) -> Router {
    let request_timeout = state.config().request_timeout();
    let cors = cors_layer(&state.config().server.web_url);

    Router::new()
        .route("/ping", get(health::ping))
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
        .route("/health/live", get(health::liveness_check))
        .nest("/api/v1", api_routes(state.clone()))
        // Apply middleware layers
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(request_timeout))
        .layer(cors)
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::new())
        .with_state(state)
}

/// API v1 routes
fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(|| async { "Session Auth API v1" }))
        .nest("/auth", auth::auth_routes(state))
}

/// The refresh cookie only travels cross-origin with credentials, which
/// requires an exact origin rather than a wildcard.
fn cors_layer(web_url: &str) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    match HeaderValue::from_str(web_url) {
        Ok(origin) => cors.allow_origin(origin).allow_credentials(true),
        Err(_) => {
            warn!(web_url, "invalid server.web_url; cross-origin requests disabled");
            cors
        }
    }
}
