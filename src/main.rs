use std::net::SocketAddr;

use anyhow::Context;
use pipeline_board::{
    config::{get_config, init_config},
    models::application::Application,
    routes, AppState,
};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    init_config()?;
    let config = get_config();

    let app_state = AppState::new();

    if let Some(path) = config.seed_path.as_deref() {
        let raw = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("reading seed file {}", path))?;
        let applications: Vec<Application> =
            serde_json::from_str(&raw).with_context(|| format!("parsing seed file {}", path))?;
        let count = app_state.application_service.seed(applications).await;
        info!("Seeded {} applications from {}", count, path);
    }

    let app = routes::router(app_state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = config.server_address.parse()?;
    info!(
        "Applications API listening on {} (revert policy: {})",
        addr, config.revert_policy
    );
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
