use std::sync::Arc;

use axum::Router;

use crate::state::AppState;

use super::{auth, categories, protected, public, tasks, users};

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(public::router())
        .merge(auth::router(state.clone()))
        .merge(protected::router(state.clone()))
        .merge(tasks::router(state.clone()))
        .merge(categories::router(state.clone()))
        .merge(users::router(state))
}
