// POST /api/feedback — record a user's false positive / false negative report.
//
// Any JSON object is accepted and stored as-is. Unlike the analyze endpoints,
// failures here are shown to the user: 500 with {"status": "error", "message"}.

use anyhow::Context;
use axum::body::Bytes;
use axum::extract::State;
use axum::Json;
use tracing::info;

use crate::feedback::FeedbackEntry;
use crate::web::{ApiError, AppState};

pub async fn save_feedback(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<serde_json::Value>, ApiError> {
    let entry = parse_entry(&body).map_err(ApiError::Feedback)?;
    let feedback_type = entry
        .get("feedback_type")
        .and_then(|v| v.as_str())
        .unwrap_or("unspecified")
        .to_string();

    state
        .feedback
        .append(entry)
        .await
        .map_err(ApiError::Feedback)?;
    info!(feedback_type = %feedback_type, "Feedback received");

    Ok(Json(serde_json::json!({
        "status": "ok",
        "message": "Feedback saved.",
    })))
}

fn parse_entry(body: &[u8]) -> anyhow::Result<FeedbackEntry> {
    let value: serde_json::Value =
        serde_json::from_slice(body).context("Feedback body is not valid JSON")?;
    match value {
        serde_json::Value::Object(entry) => Ok(entry),
        _ => anyhow::bail!("Feedback body must be a JSON object"),
    }
}
