use std::sync::Arc;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use reviewhub_server::api::{self, AppState};
use reviewhub_server::auth::TokenService;
use reviewhub_server::config::AppConfig;
use reviewhub_server::db;
use reviewhub_server::media::HttpVideoStorage;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing()?;

    info!("starting reviewhub server");
    info!("loading config from reviewhub.toml");
    let config =
        AppConfig::from_file("reviewhub.toml").context("failed to load server config")?;

    let database_url = config.database_url()?;
    let db = db::init_pool_and_migrate(&database_url)
        .await
        .context("failed to connect to the database")?;
    info!("database ready, migrations applied");

    let tokens = TokenService::new(&config.auth.jwt_secret, config.auth.token_ttl_minutes);
    let media = Arc::new(HttpVideoStorage::new(&config.media));

    let state = Arc::new(AppState::new(
        db,
        tokens,
        media,
        config.media.upload_folder.clone(),
    ));
    let app = api::create_router(state);

    let listener = tokio::net::TcpListener::bind(&config.server.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.server.bind_addr))?;
    info!(addr = %config.server.bind_addr, "server is ready, press Ctrl+C to shut down");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("shutdown signal received, stopping server");
}

fn init_tracing() -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("info"))?;

    tracing_subscriber::fmt().with_env_filter(env_filter).init();
    Ok(())
}
