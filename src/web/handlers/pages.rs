// GET /          — landing page (frontend/index.html)
// GET /dashboard — stats dashboard (frontend/dashboard.html)
//
// Pages are read from disk on every request so the frontend can be edited
// without restarting the server.

use axum::body::Body;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use tracing::warn;

use crate::web::AppState;

pub async fn home(State(state): State<AppState>) -> Response {
    serve_page(&state, "index.html").await
}

pub async fn dashboard(State(state): State<AppState>) -> Response {
    serve_page(&state, "dashboard.html").await
}

async fn serve_page(state: &AppState, file: &str) -> Response {
    let path = state.config.frontend_dir.join(file);
    match tokio::fs::read_to_string(&path).await {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            warn!(error = %e, path = %path.display(), "Frontend page unavailable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                [(header::CONTENT_TYPE, "text/plain")],
                Body::from(format!(
                    "Frontend page {file} not found. Set VERISCAN_FRONTEND_DIR to the frontend directory."
                )),
            )
                .into_response()
        }
    }
}
