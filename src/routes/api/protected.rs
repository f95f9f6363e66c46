use std::sync::Arc;

use axum::{Router, extract::State, routing::get};

use crate::{
    auth::UserSummary,
    middleware::AuthGuard,
    response::{ApiResult, JsonApiResponse},
    services::ServiceContext,
    state::AppState,
};

pub fn router(state: Arc<AppState>) -> Router {
    Router::new().route("/me", get(me)).with_state(state)
}

async fn me(State(state): State<Arc<AppState>>, claims: AuthGuard) -> ApiResult<UserSummary> {
    let principal = claims.principal()?;
    let services = ServiceContext::from_state(state.as_ref());
    let user = services
        .user()
        .get_user(&principal, &principal.user_id)
        .await?;
    JsonApiResponse::ok(user)
}
