//! Operational endpoints
//!
//! `/ping` answers load balancer heartbeats. `/health` and `/health/live`
//! only prove the process is serving; `/health/ready` also round-trips the
//! credential store.

use crate::state::AppState;
use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use tracing::warn;

const STORE_UNREACHABLE: &str = "credential store unreachable";

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checks: Option<HealthChecks>,
}

#[derive(Serialize)]
pub struct HealthChecks {
    pub credential_store: CheckStatus,
}

#[derive(Serialize)]
pub struct CheckStatus {
    pub status: &'static str,
    /// Fixed text; the underlying storage error only goes to the log
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
}

impl HealthResponse {
    fn bare(status: &'static str) -> Self {
        Self {
            status,
            version: env!("CARGO_PKG_VERSION"),
            checks: None,
        }
    }
}

pub async fn ping() -> &'static str {
    "."
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse::bare("healthy"))
}

/// 503 while the credential store cannot answer a trivial query
pub async fn readiness_check(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let (ready, credential_store) = match state.store.health_check().await {
        Ok(()) => (
            true,
            CheckStatus {
                status: "healthy",
                message: None,
            },
        ),
        Err(e) => {
            warn!(error = %e, "readiness check failed");
            (
                false,
                CheckStatus {
                    status: "unhealthy",
                    message: Some(STORE_UNREACHABLE),
                },
            )
        }
    };

    let response = HealthResponse {
        status: if ready { "ready" } else { "not_ready" },
        version: env!("CARGO_PKG_VERSION"),
        checks: Some(HealthChecks { credential_store }),
    };

    if ready {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}

pub async fn liveness_check() -> Json<HealthResponse> {
    Json(HealthResponse::bare("alive"))
}
