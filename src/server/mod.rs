//! HTTP API over the scanner and the sidecar tag store.
//!
//! All request and response paths are user-visible paths; handlers translate
//! them before touching the filesystem. Blocking filesystem work runs on the
//! blocking thread pool.

pub mod error;
pub mod handlers;
pub mod state;

use anyhow::{Context, Result};
use axum::routing::{get, post};
use axum::Router;
use std::path::Path;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::config::Config;

pub use error::ApiError;
pub use state::AppState;

pub fn router(state: AppState, static_dir: Option<&Path>) -> Router {
    let api = Router::new()
        .route("/api/health", get(handlers::health))
        .route("/api/list-directory", post(handlers::list_directory))
        .route("/api/scan-directory", post(handlers::scan_directory))
        .route("/api/image/{*encoded_path}", get(handlers::serve_image))
        .route("/api/update-tags", post(handlers::update_tags))
        .route("/api/tag-analysis", post(handlers::tag_analysis))
        .route("/api/multi-update-tags", post(handlers::multi_update_tags))
        .with_state(state);

    let app = match static_dir {
        Some(dir) => api.fallback_service(ServeDir::new(dir)),
        None => api,
    };

    app.layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Bind and serve until Ctrl-C.
pub async fn serve(config: Config) -> Result<()> {
    let state = AppState::from_config(&config);
    let app = router(state, config.server.static_dir.as_deref());

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;

    tracing::info!("Server is running on http://{}", address);
    match &config.paths.user_home {
        Some(user_home) => tracing::info!(
            "Translating {:?} to host home mounted at {:?}",
            user_home,
            config.paths.service_home
        ),
        None => tracing::info!("Path translation disabled"),
    }
    if let Some(dir) = &config.server.static_dir {
        tracing::info!("Serving front end from {:?}", dir);
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Could not listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown requested");
}
