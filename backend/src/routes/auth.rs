//! Authentication routes
//!
//! Signup and login are public. Everything else sits behind the claim gate
//! and receives the caller as an explicit [`AuthUser`].

use crate::auth::{
    claim_gate,
    cookie::{build_clear_cookie, build_set_cookie, read_cookie, REFRESH_COOKIE},
    AuthUser,
};
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header::SET_COOKIE, HeaderMap, StatusCode},
    middleware,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use session_auth_shared::{ApiResponse, AuthRequest, AuthTokens, UserProfile};
use tracing::debug;

/// Create auth routes
pub fn auth_routes(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/me", get(get_profile).delete(delete_account))
        .route("/logout", post(logout))
        .route("/refresh", post(refresh_token))
        .route_layer(middleware::from_fn_with_state(state, claim_gate));

    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
        .merge(protected)
}

fn request_body<T>(payload: Result<Json<T>, JsonRejection>) -> ApiResult<T> {
    payload.map(|Json(body)| body).map_err(|rejection| {
        debug!(reason = %rejection.body_text(), "rejected request body");
        ApiError::Validation("please provide valid input".to_string())
    })
}

/// POST /api/v1/auth/signup
async fn signup(
    State(state): State<AppState>,
    payload: Result<Json<AuthRequest>, JsonRejection>,
) -> ApiResult<Json<ApiResponse<()>>> {
    let req = request_body(payload)?;
    state.accounts.signup(&req.email, &req.password).await?;
    Ok(Json(ApiResponse::empty(StatusCode::OK.as_u16())))
}

/// POST /api/v1/auth/login
///
/// Returns both tokens and sets the `jwt` refresh cookie.
async fn login(
    State(state): State<AppState>,
    payload: Result<Json<AuthRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let req = request_body(payload)?;
    let tokens = state.sessions.login(&req.email, &req.password).await?;
    Ok(with_session_cookie(&state, tokens))
}

/// GET /api/v1/auth/me
async fn get_profile(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> ApiResult<Json<ApiResponse<UserProfile>>> {
    let profile = state.accounts.get_profile(auth_user.user_id).await?;
    Ok(Json(ApiResponse::with_data(StatusCode::OK.as_u16(), profile)))
}

/// POST /api/v1/auth/logout
async fn logout(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> ApiResult<impl IntoResponse> {
    state.sessions.logout(auth_user.user_id).await?;
    Ok((
        [(SET_COOKIE, build_clear_cookie(&state.cookies))],
        Json(ApiResponse::empty(StatusCode::OK.as_u16())),
    ))
}

/// DELETE /api/v1/auth/me
async fn delete_account(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> ApiResult<impl IntoResponse> {
    state.accounts.delete_account(auth_user.user_id).await?;
    Ok((
        StatusCode::ACCEPTED,
        [(SET_COOKIE, build_clear_cookie(&state.cookies))],
        Json(ApiResponse::empty(StatusCode::ACCEPTED.as_u16())),
    ))
}

/// POST /api/v1/auth/refresh
///
/// Exchanges the refresh token in the `jwt` cookie for a new pair.
async fn refresh_token(
    State(state): State<AppState>,
    auth_user: AuthUser,
    headers: HeaderMap,
) -> ApiResult<impl IntoResponse> {
    let presented = read_cookie(&headers, REFRESH_COOKIE)
        .ok_or_else(|| ApiError::Unauthorized("please login again".to_string()))?;

    let tokens = state.sessions.refresh(auth_user.user_id, presented).await?;
    Ok(with_session_cookie(&state, tokens))
}

fn with_session_cookie(state: &AppState, tokens: AuthTokens) -> impl IntoResponse {
    let cookie = build_set_cookie(&tokens.refresh_token, &state.cookies);
    (
        [(SET_COOKIE, cookie)],
        Json(ApiResponse::with_data(StatusCode::OK.as_u16(), tokens)),
    )
}
