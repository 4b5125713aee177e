// POST /api/analyze      — score an image URL and record the detection.
// POST /api/analyze_text — score a text snippet (mock only, not recorded).
//
// Scoring can't fail from the handler's point of view; only the store write
// can turn into an error response.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use tracing::info;

use super::text_subject;
use crate::web::{ApiError, AppState};

#[derive(Deserialize)]
pub struct AnalyzeRequest {
    pub url: String,
}

#[derive(Deserialize, Default)]
pub struct AnalyzeTextRequest {
    #[serde(default)]
    pub text: String,
}

/// POST /api/analyze — score via the configured scorer, then persist.
pub async fn analyze(
    State(state): State<AppState>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let Json(body) = payload.map_err(|e| ApiError::Validation(e.body_text()))?;
    if body.url.trim().is_empty() {
        return Err(ApiError::Validation("url must not be empty".to_string()));
    }

    let result = state.scorer.score(&body.url).await;
    info!(
        url = %body.url,
        probability = result.probability,
        scorer = state.scorer.name(),
        "Analysis done"
    );

    let record = state
        .db
        .append(&body.url, result.probability)
        .await
        .map_err(ApiError::Storage)?;
    info!(id = record.id, "Detection saved");

    Ok(Json(serde_json::json!({
        "url": body.url,
        "ai_probability": result.probability,
    })))
}

/// POST /api/analyze_text — mock score for a text snippet.
///
/// The text content doesn't influence the score, and nothing is written to
/// the detection store.
pub async fn analyze_text(
    State(state): State<AppState>,
    payload: Result<Json<AnalyzeTextRequest>, JsonRejection>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let Json(body) = payload.map_err(|e| ApiError::Validation(e.body_text()))?;

    let result = state.mock_scorer.score(&text_subject(&body.text)).await;

    Ok(Json(serde_json::json!({
        "ai_probability": result.probability,
        "category": result.category,
    })))
}
