// Web server — Axum backend for the detection API and dashboard pages.
//
// All /api/* routes serve JSON. The dashboard HTML and its static assets are
// read from the frontend directory on disk; the pages are optional and the
// API works without them.
//
// CORS is wide open (any origin, method, header) because the browser
// extension calls the API from arbitrary pages.

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::DefaultBodyLimit;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::Config;
use crate::db::Database;
use crate::feedback::{FeedbackLog, JsonFileFeedbackLog};
use crate::scoring::traits::Scorer;
use crate::scoring::{create_mock_scorer, create_scorer};

pub mod error;
pub mod handlers;

pub use error::ApiError;

/// Shared application state threaded through all Axum handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<dyn Database>,
    pub feedback: Arc<dyn FeedbackLog>,
    /// Scores URLs — remote or random, per config
    pub scorer: Arc<dyn Scorer>,
    /// Scores text and uploads, which the remote API can't take
    pub mock_scorer: Arc<dyn Scorer>,
    pub config: Arc<Config>,
}

impl AppState {
    /// Build every collaborator from the config.
    pub fn from_config(config: Config, db: Arc<dyn Database>) -> Result<Self> {
        let scorer = create_scorer(&config)?;
        let mock_scorer: Arc<dyn Scorer> = Arc::new(create_mock_scorer(&config));
        let feedback: Arc<dyn FeedbackLog> =
            Arc::new(JsonFileFeedbackLog::new(config.feedback_path.clone()));

        Ok(Self {
            db,
            feedback,
            scorer,
            mock_scorer,
            config: Arc::new(config),
        })
    }
}

/// Start the Axum web server and block until it exits.
pub async fn run_server(state: AppState, port: u16, bind: &str) -> Result<()> {
    tokio::fs::create_dir_all(&state.config.upload_dir)
        .await
        .with_context(|| {
            format!(
                "Failed to create upload directory {}",
                state.config.upload_dir.display()
            )
        })?;

    let app = build_router(state);

    let addr = format!("{bind}:{port}");
    info!("veriscan listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

pub fn build_router(state: AppState) -> Router {
    let static_dir = state.config.frontend_dir.join("static");
    let upload_limit = DefaultBodyLimit::max(state.config.max_upload_bytes);

    let api = Router::new()
        .route("/api/analyze", post(handlers::analyze::analyze))
        .route("/api/analyze_text", post(handlers::analyze::analyze_text))
        .route(
            "/api/upload",
            post(handlers::upload::upload).layer(upload_limit),
        )
        .route("/api/stats", get(handlers::stats::get_stats))
        .route("/api/feedback", post(handlers::feedback::save_feedback));

    let pages = Router::new()
        .route("/", get(handlers::pages::home))
        .route("/dashboard", get(handlers::pages::dashboard))
        .route("/health", get(health))
        .nest_service("/static", ServeDir::new(static_dir));

    Router::new()
        .merge(api)
        .merge(pages)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Liveness check — always returns 200 OK.
async fn health() -> impl IntoResponse {
    (
        StatusCode::OK,
        axum::Json(serde_json::json!({ "status": "ok" })),
    )
}

/// Typed JSON error response helper.
pub fn api_error(status: StatusCode, message: &str) -> Response {
    (status, axum::Json(serde_json::json!({ "error": message }))).into_response()
}
