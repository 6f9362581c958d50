//! Formcast API Server
//!
//! Serves the configured demo predictors over HTTP: form metadata out,
//! one prediction per submission back.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use tower_governor::GovernorLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

pub mod config;
mod rate_limit;
mod routes;

use crate::config::ServerConfig;
use predictor::{ArtifactError, Predictor};

/// One loaded prediction app
pub struct AppEntry {
    /// Human-readable title
    pub title: String,
    /// Paired schema + model
    pub predictor: Predictor,
}

/// Application state shared across handlers.
///
/// Built once at startup and immutable afterwards, so it is shared as a
/// plain `Arc` without locking.
pub struct AppState {
    /// Loaded apps by name
    pub apps: HashMap<String, AppEntry>,
    /// Version string
    pub version: String,
    /// Start time
    pub start_time: std::time::Instant,
}

impl AppState {
    /// Load every configured app's artifacts.
    ///
    /// Any artifact failure aborts startup: a missing or corrupt artifact is
    /// fatal to the session, not something to retry.
    pub fn from_config(config: &ServerConfig) -> Result<Self, ArtifactError> {
        let mut apps = HashMap::new();
        for app in &config.apps {
            info!("Loading app {:?} ({})", app.name, app.title);
            let predictor = Predictor::load(&app.schema, &app.model)?;
            apps.insert(
                app.name.clone(),
                AppEntry {
                    title: app.title.clone(),
                    predictor,
                },
            );
        }

        Ok(Self {
            apps,
            version: env!("CARGO_PKG_VERSION").to_string(),
            start_time: std::time::Instant::now(),
        })
    }
}

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: u64,
    pub version: String,
    pub uptime_seconds: u64,
    pub apps: Vec<String>,
}

/// Create the application router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/v1/health", get(health_handler))
        .route("/api/v1/apps", get(routes::apps::list))
        .route("/api/v1/apps/:name", get(routes::apps::describe))
        .route("/api/v1/apps/:name/predict", post(routes::predict::predict))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check handler
async fn health_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let timestamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);

    let mut apps: Vec<String> = state.apps.keys().cloned().collect();
    apps.sort();

    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp,
        version: state.version.clone(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        apps,
    })
}

/// Initialize logging
pub fn init_logging() {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");
}

/// Run the server until shutdown
pub async fn run_server(config: ServerConfig) -> anyhow::Result<()> {
    let state = Arc::new(AppState::from_config(&config)?);
    info!("Loaded {} app(s)", state.apps.len());

    let governor = rate_limit::create_governor_config(&config.rate_limit);
    let app = create_router(state).layer(GovernorLayer { config: governor });

    info!("Starting API server on {}", config.listen_addr);
    let listener = tokio::net::TcpListener::bind(&config.listen_addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
