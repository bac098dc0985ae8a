//! # kgl-api: HTTP Service for the KGL Produce Ledger
//!
//! Records produce procurements and sales behind a JWT auth gate and a
//! per-endpoint role gate.
//!
//! ## API Surface
//!
//! | Path                 | Auth        | Module                   |
//! |----------------------|-------------|--------------------------|
//! | `POST /procurement`  | `manager`   | [`routes::procurement`]  |
//! | `POST /sales/cash`   | `SalesAgent`| [`routes::sales`]        |
//! | `POST /sales/credit` | `SalesAgent`| [`routes::sales`]        |
//! | `GET /api-docs`      | none        | [`openapi`]              |
//! | `GET /health/*`      | none        | this module              |
//!
//! ## Request Lifecycle
//!
//! ```text
//! TraceLayer → AuthMiddleware → Handler: role gate → request checks
//!            → record schema → store → 201
//! ```
//!
//! Each stage exits early with its own error body (see [`error`]).

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod extractors;
pub mod openapi;
pub mod routes;
pub mod state;

use axum::extract::{DefaultBodyLimit, State};
use axum::http::StatusCode;
use axum::middleware::from_fn;
use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::config::LogFormat;
use crate::state::AppState;

/// Largest accepted request body.
const BODY_LIMIT_BYTES: usize = 100 * 1024;

/// Assemble the full application router with all routes and middleware.
///
/// Health probes and `/api-docs` are mounted outside the auth middleware
/// so they remain accessible without credentials.
pub fn app(state: AppState) -> Router {
    // Authenticated write routes.
    let api = Router::new()
        .merge(routes::procurement::router())
        .merge(routes::sales::router())
        .layer(from_fn(auth::auth_middleware))
        .layer(axum::Extension(state.auth.clone()));

    // Unauthenticated probes and docs.
    let public = Router::new()
        .route("/health/liveness", get(liveness))
        .route("/health/readiness", get(readiness))
        .merge(openapi::router());

    Router::new()
        .merge(public)
        .merge(api)
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Install the global tracing subscriber.
///
/// The filter comes from `RUST_LOG`, defaulting to `info`.
pub fn init_tracing(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

/// Liveness probe: 200 while the process is running.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe: 200 when the record store answers.
async fn readiness(State(state): State<AppState>) -> (StatusCode, &'static str) {
    match state.store.ping().await {
        Ok(()) => (StatusCode::OK, "ready"),
        Err(e) => {
            tracing::warn!(error = %e, "readiness check failed");
            (StatusCode::SERVICE_UNAVAILABLE, "database unavailable")
        }
    }
}
