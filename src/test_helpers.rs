use std::sync::Arc;

use axum::Router;
use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase};

use crate::{
    auth::bootstrap::build_providers,
    auth::providers::AuthProviderId,
    config::{AppConfig, AuthConfig},
    routes::router,
    state::AppState,
    services::ServiceContext,
};

pub fn test_auth_config(jwt_secret: &str) -> AuthConfig {
    AuthConfig {
        provider: AuthProviderId::Local,
        jwt_secret: jwt_secret.to_string(),
        access_token_minutes: 15,
        refresh_token_days: 30,
        admin_name: "Administrator".to_string(),
        admin_email: "admin@example.com".to_string(),
        admin_password: "adminpassword".to_string(),
    }
}

pub fn build_test_state(cfg: AppConfig, db: DatabaseConnection) -> Arc<AppState> {
    let services = ServiceContext::new(&db);
    let providers = build_providers(
        cfg.auth.as_ref().expect("auth config should be present"),
        &services,
    )
    .expect("create auth providers");
    AppState::new(cfg, db, providers)
}

/// Router over an empty mock store: enough for guard and envelope tests.
pub fn test_router(secret: &[u8]) -> Router {
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
    let mut cfg = AppConfig::default();
    cfg.auth = Some(test_auth_config(&String::from_utf8_lossy(secret)));
    router(build_test_state(cfg, db))
}
