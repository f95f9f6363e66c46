use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{delete, get, post},
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    db::dao::{PaginatedResponse, TaskStats},
    middleware::AuthGuard,
    response::{ApiResult, JsonApiResponse},
    services::ServiceContext,
    services::task_service::{CommentView, CreateTask, TaskFilter, TaskView, UpdateTask},
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct AddCommentRequest {
    pub content: String,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/tasks", get(list_tasks).post(create_task))
        .route("/tasks/stats", get(task_stats))
        .route(
            "/tasks/{id}",
            get(get_task).put(update_task).delete(delete_task),
        )
        .route("/tasks/{id}/complete", post(complete_task))
        .route("/tasks/{id}/comments", get(list_comments).post(add_comment))
        .route("/comments/{id}", delete(delete_comment))
        .with_state(state)
}

async fn list_tasks(
    State(state): State<Arc<AppState>>,
    claims: AuthGuard,
    Query(filter): Query<TaskFilter>,
) -> ApiResult<PaginatedResponse<TaskView>> {
    let principal = claims.principal()?;
    let services = ServiceContext::from_state(state.as_ref());
    let page = services.task().list(&principal, &filter).await?;
    JsonApiResponse::ok(page)
}

async fn task_stats(
    State(state): State<Arc<AppState>>,
    claims: AuthGuard,
) -> ApiResult<TaskStats> {
    let principal = claims.principal()?;
    let services = ServiceContext::from_state(state.as_ref());
    let stats = services.task().stats(&principal).await?;
    JsonApiResponse::ok(stats)
}

async fn get_task(
    State(state): State<Arc<AppState>>,
    claims: AuthGuard,
    Path(id): Path<Uuid>,
) -> ApiResult<TaskView> {
    let principal = claims.principal()?;
    let services = ServiceContext::from_state(state.as_ref());
    let task = services.task().get(&principal, &id).await?;
    JsonApiResponse::ok(task)
}

async fn create_task(
    State(state): State<Arc<AppState>>,
    claims: AuthGuard,
    Json(body): Json<CreateTask>,
) -> ApiResult<TaskView> {
    let principal = claims.principal()?;
    let services = ServiceContext::from_state(state.as_ref());
    let task = services.task().create(&principal, body).await?;
    JsonApiResponse::ok(task)
}

async fn update_task(
    State(state): State<Arc<AppState>>,
    claims: AuthGuard,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateTask>,
) -> ApiResult<TaskView> {
    let principal = claims.principal()?;
    let services = ServiceContext::from_state(state.as_ref());
    let task = services.task().update(&principal, &id, body).await?;
    JsonApiResponse::ok(task)
}

async fn delete_task(
    State(state): State<Arc<AppState>>,
    claims: AuthGuard,
    Path(id): Path<Uuid>,
) -> ApiResult<serde_json::Value> {
    let principal = claims.principal()?;
    let services = ServiceContext::from_state(state.as_ref());
    services.task().delete(&principal, &id).await?;
    JsonApiResponse::ok(serde_json::json!({ "ok": true }))
}

async fn complete_task(
    State(state): State<Arc<AppState>>,
    claims: AuthGuard,
    Path(id): Path<Uuid>,
) -> ApiResult<TaskView> {
    let principal = claims.principal()?;
    let services = ServiceContext::from_state(state.as_ref());
    let task = services.task().complete(&principal, &id).await?;
    JsonApiResponse::ok(task)
}

async fn list_comments(
    State(state): State<Arc<AppState>>,
    claims: AuthGuard,
    Path(id): Path<Uuid>,
) -> ApiResult<Vec<CommentView>> {
    let principal = claims.principal()?;
    let services = ServiceContext::from_state(state.as_ref());
    let comments = services.task().list_comments(&principal, &id).await?;
    JsonApiResponse::ok(comments)
}

async fn add_comment(
    State(state): State<Arc<AppState>>,
    claims: AuthGuard,
    Path(id): Path<Uuid>,
    Json(body): Json<AddCommentRequest>,
) -> ApiResult<CommentView> {
    let principal = claims.principal()?;
    let services = ServiceContext::from_state(state.as_ref());
    let comment = services
        .task()
        .add_comment(&principal, &id, &body.content)
        .await?;
    JsonApiResponse::ok(comment)
}

async fn delete_comment(
    State(state): State<Arc<AppState>>,
    claims: AuthGuard,
    Path(id): Path<Uuid>,
) -> ApiResult<serde_json::Value> {
    let principal = claims.principal()?;
    let services = ServiceContext::from_state(state.as_ref());
    services.task().delete_comment(&principal, &id).await?;
    JsonApiResponse::ok(serde_json::json!({ "ok": true }))
}
