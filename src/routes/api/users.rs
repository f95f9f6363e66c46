use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, put},
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    auth::{AdminRole, Role, UserSummary},
    middleware::{AuthGuard, AuthRoleGuard},
    response::{ApiResult, JsonApiResponse},
    services::ServiceContext,
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct UpdateRoleRequest {
    pub role: Role,
}

#[derive(Debug, Deserialize)]
pub struct UpdateActiveRequest {
    pub is_active: bool,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/users", get(list_users))
        .route("/users/{id}", get(get_user))
        .route("/users/{id}/role", put(update_role))
        .route("/users/{id}/active", put(update_active))
        .with_state(state)
}

async fn list_users(
    State(state): State<Arc<AppState>>,
    claims: AuthGuard,
) -> ApiResult<Vec<UserSummary>> {
    let principal = claims.principal()?;
    let services = ServiceContext::from_state(state.as_ref());
    let users = services.user().list_users(&principal).await?;
    JsonApiResponse::ok(users)
}

async fn get_user(
    State(state): State<Arc<AppState>>,
    claims: AuthGuard,
    Path(id): Path<Uuid>,
) -> ApiResult<UserSummary> {
    let principal = claims.principal()?;
    let services = ServiceContext::from_state(state.as_ref());
    let user = services.user().get_user(&principal, &id).await?;
    JsonApiResponse::ok(user)
}

async fn update_role(
    State(state): State<Arc<AppState>>,
    guard: AuthRoleGuard<AdminRole>,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateRoleRequest>,
) -> ApiResult<UserSummary> {
    let principal = guard.claims.principal()?;
    let services = ServiceContext::from_state(state.as_ref());
    let user = services
        .user()
        .update_role(&principal, &id, body.role)
        .await?;
    JsonApiResponse::ok(user)
}

async fn update_active(
    State(state): State<Arc<AppState>>,
    guard: AuthRoleGuard<AdminRole>,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateActiveRequest>,
) -> ApiResult<UserSummary> {
    let principal = guard.claims.principal()?;
    let services = ServiceContext::from_state(state.as_ref());
    let user = services
        .user()
        .set_active(&principal, &id, body.is_active)
        .await?;
    JsonApiResponse::ok(user)
}
