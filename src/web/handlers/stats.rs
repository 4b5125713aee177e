// GET /api/stats — today's count and average probability, plus the most
// recent detections (newest first) for the dashboard table.

use axum::extract::State;
use axum::Json;

use crate::db::queries::DEFAULT_RECENT_LIMIT;
use crate::web::{ApiError, AppState};

pub async fn get_stats(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let daily = state.db.daily_stats().await.map_err(ApiError::Storage)?;
    let recent = state
        .db
        .recent(DEFAULT_RECENT_LIMIT)
        .await
        .map_err(ApiError::Storage)?;

    Ok(Json(serde_json::json!({
        "daily": daily,
        "recent": recent,
    })))
}
