use std::sync::Arc;

use axum::{Json, Router, extract::State, routing::post};
use serde::Deserialize;

use crate::{
    auth::{TokenBundle, UserSummary},
    error::AppError,
    middleware::AuthGuard,
    response::{ApiResult, JsonApiResponse},
    services::ServiceContext,
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    // Accepted for client compatibility; token lifetimes are fixed by config.
    #[serde(default)]
    pub remember_me: bool,
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
    pub confirm_new_password: String,
}

#[derive(Debug, serde::Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: &'static str,
    pub expires_in: usize,
    pub user: UserSummary,
}

impl From<TokenBundle> for TokenResponse {
    fn from(bundle: TokenBundle) -> Self {
        Self {
            access_token: bundle.access_token,
            refresh_token: bundle.refresh_token,
            token_type: bundle.token_type,
            expires_in: bundle.expires_in,
            user: bundle.user,
        }
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/refresh", post(refresh))
        .route("/logout", post(logout))
        .route("/revoke-all", post(revoke_all))
        .route("/change-password", post(change_password))
        .with_state(state)
}

async fn register(
    State(state): State<Arc<AppState>>,
    Json(body): Json<RegisterRequest>,
) -> ApiResult<TokenResponse> {
    if body.password != body.confirm_password {
        return Err(AppError::bad_request("Passwords do not match"));
    }

    let services = ServiceContext::from_state(state.as_ref());
    let tokens = services
        .auth(&state.auth_providers)
        .register(&body.name, &body.email, &body.password)
        .await?;
    JsonApiResponse::ok(tokens.into())
}

async fn login(
    State(state): State<Arc<AppState>>,
    Json(body): Json<LoginRequest>,
) -> ApiResult<TokenResponse> {
    let LoginRequest {
        email,
        password,
        remember_me: _,
    } = body;
    let services = ServiceContext::from_state(state.as_ref());
    let tokens = services
        .auth(&state.auth_providers)
        .login(&email, &password)
        .await?;
    JsonApiResponse::ok(tokens.into())
}

async fn refresh(
    State(state): State<Arc<AppState>>,
    Json(body): Json<RefreshRequest>,
) -> ApiResult<TokenResponse> {
    let services = ServiceContext::from_state(state.as_ref());
    let tokens = services
        .auth(&state.auth_providers)
        .refresh(&body.access_token, &body.refresh_token)
        .await?;
    JsonApiResponse::ok(tokens.into())
}

/// Revoke the session behind the presented access token.
async fn logout(
    State(state): State<Arc<AppState>>,
    claims: AuthGuard,
) -> ApiResult<serde_json::Value> {
    let principal = claims.principal()?;
    let services = ServiceContext::from_state(state.as_ref());
    services
        .auth(&state.auth_providers)
        .logout(&principal.user_id, Some(&principal.jti))
        .await?;
    JsonApiResponse::ok(serde_json::json!({ "ok": true }))
}

/// Revoke every session for the current user.
async fn revoke_all(
    State(state): State<Arc<AppState>>,
    claims: AuthGuard,
) -> ApiResult<serde_json::Value> {
    let principal = claims.principal()?;
    let services = ServiceContext::from_state(state.as_ref());
    services
        .auth(&state.auth_providers)
        .logout(&principal.user_id, None)
        .await?;
    JsonApiResponse::ok(serde_json::json!({ "ok": true }))
}

async fn change_password(
    State(state): State<Arc<AppState>>,
    claims: AuthGuard,
    Json(body): Json<ChangePasswordRequest>,
) -> ApiResult<serde_json::Value> {
    if body.new_password != body.confirm_new_password {
        return Err(AppError::bad_request("Passwords do not match"));
    }

    let principal = claims.principal()?;
    let services = ServiceContext::from_state(state.as_ref());
    services
        .auth(&state.auth_providers)
        .change_password(&principal.user_id, &body.current_password, &body.new_password)
        .await?;
    JsonApiResponse::ok(serde_json::json!({ "ok": true }))
}
