use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{delete, get},
};
use uuid::Uuid;

use crate::{
    auth::{AdminRole, ManagerRole},
    middleware::{AuthGuard, AuthRoleGuard},
    response::{ApiResult, JsonApiResponse},
    services::ServiceContext,
    services::category_service::{CategoryView, CreateCategory},
    state::AppState,
};

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/categories", get(list_categories).post(create_category))
        .route("/categories/{id}", delete(delete_category))
        .with_state(state)
}

async fn list_categories(
    State(state): State<Arc<AppState>>,
    _claims: AuthGuard,
) -> ApiResult<Vec<CategoryView>> {
    let services = ServiceContext::from_state(state.as_ref());
    let categories = services.category().list().await?;
    JsonApiResponse::ok(categories)
}

async fn create_category(
    State(state): State<Arc<AppState>>,
    _guard: AuthRoleGuard<ManagerRole>,
    Json(body): Json<CreateCategory>,
) -> ApiResult<CategoryView> {
    let services = ServiceContext::from_state(state.as_ref());
    let category = services.category().create(body).await?;
    JsonApiResponse::ok(category)
}

async fn delete_category(
    State(state): State<Arc<AppState>>,
    _guard: AuthRoleGuard<AdminRole>,
    Path(id): Path<Uuid>,
) -> ApiResult<serde_json::Value> {
    let services = ServiceContext::from_state(state.as_ref());
    services.category().delete(&id).await?;
    JsonApiResponse::ok(serde_json::json!({ "ok": true }))
}
