use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::{Router, middleware};
use tower_http::trace::TraceLayer;

use taskman::{
    auth::bootstrap::init_providers,
    config::AppConfig,
    db::connection,
    logging::init_tracing,
    middleware::{catch_panic_layer, json_error_middleware},
    routes::router,
    services::ServiceContext,
    state::AppState,
};

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        tracing::error!("server failed: {err:?}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cfg = AppConfig::from_env().context("failed to load config")?;
    init_tracing(&cfg.logging.rust_log);

    let db_cfg = cfg
        .database
        .as_ref()
        .context("database config missing (set APP_DATABASE__URL)")?;
    let db = connection::connect(db_cfg).await?;
    let services = ServiceContext::new(&db);

    let auth_cfg = cfg
        .auth
        .as_ref()
        .context("auth config missing (set APP_AUTH__JWT_SECRET)")?;
    let providers = init_providers(auth_cfg, &services).await?;

    let state = AppState::new(cfg, db, providers);

    let app = Router::new()
        .merge(router(Arc::clone(&state)))
        .layer(middleware::from_fn(json_error_middleware))
        .layer(catch_panic_layer())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!(
        "{}:{}",
        state.config.general.host.as_str(),
        state.config.general.port
    )
    .parse()
    .context("invalid host/port")?;
    tracing::info!("listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
