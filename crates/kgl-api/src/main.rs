//! # kgl-api: Binary Entry Point
//!
//! Starts the Axum HTTP server for the produce ledger.
//! Binds to `PORT` (default 3000).

use kgl_api::auth::AuthConfig;
use kgl_api::config::AppConfig;
use kgl_api::db::{self, RecordStore};
use kgl_api::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::from_env()?;

    kgl_api::init_tracing(config.log_format);
    tracing::debug!(?config, "configuration loaded");

    let pool = db::connect(&config.database_uri).await.map_err(|e| {
        tracing::error!("Database connection failed: {e}");
        e
    })?;

    let state = AppState::new(
        RecordStore::Postgres(pool),
        AuthConfig::new(config.jwt_secret.as_str()),
    );
    let app = kgl_api::app(state);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("KGL API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
