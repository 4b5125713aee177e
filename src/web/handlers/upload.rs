// POST /api/upload — multipart upload of a file or a text snippet.
//
// Fields: `file` (a file part) and/or `text_input` (plain text). A file wins
// if both are present; neither is a 400. Empty file parts and blank text
// count as absent. Files land in the upload directory
// under their base name and are recorded as `/uploads/<name>`; text is
// recorded as `text:<snippet>...`. Uploads always use the mock scorer.

use std::path::Path;

use anyhow::Context;
use axum::body::Bytes;
use axum::extract::{Multipart, State};
use axum::Json;
use tracing::info;

use super::text_subject;
use crate::web::{ApiError, AppState};

/// URL prefix recorded for uploaded files.
pub const UPLOAD_URL_PREFIX: &str = "/uploads";

pub async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<serde_json::Value>, ApiError> {
    let mut file: Option<(String, Bytes)> = None;
    let mut text: Option<String> = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some("file") => {
                let file_name = field.file_name().and_then(sanitize_file_name);
                let data = field.bytes().await?;
                // Browsers send an empty, unnamed part when no file was picked
                if let Some(file_name) = file_name.filter(|_| !data.is_empty()) {
                    file = Some((file_name, data));
                }
            }
            Some("text_input") => {
                let value = field.text().await?;
                if !value.trim().is_empty() {
                    text = Some(value);
                }
            }
            _ => {}
        }
    }

    let subject = match (file, text) {
        (Some((file_name, data)), _) => {
            save_upload(&state.config.upload_dir, &file_name, &data)
                .await
                .map_err(ApiError::Storage)?;
            info!(file = %file_name, bytes = data.len(), "Upload saved");
            format!("{UPLOAD_URL_PREFIX}/{file_name}")
        }
        (None, Some(text)) => text_subject(&text),
        (None, None) => {
            return Err(ApiError::Validation(
                "Provide either a file or text_input".to_string(),
            ))
        }
    };

    let result = state.mock_scorer.score(&subject).await;
    state
        .db
        .append(&subject, result.probability)
        .await
        .map_err(ApiError::Storage)?;

    Ok(Json(serde_json::json!({
        "url": subject,
        "ai_probability": result.probability,
        "category": result.category,
    })))
}

/// Reduce a client-supplied file name to its last path component.
///
/// Returns None for names that are empty or would escape the upload
/// directory (`.`, `..`).
pub fn sanitize_file_name(raw: &str) -> Option<String> {
    let base = raw.rsplit(['/', '\\']).next().unwrap_or("").trim();
    if base.is_empty() || base == "." || base == ".." {
        return None;
    }
    Some(base.to_string())
}

async fn save_upload(dir: &Path, file_name: &str, data: &[u8]) -> anyhow::Result<()> {
    tokio::fs::create_dir_all(dir)
        .await
        .with_context(|| format!("Failed to create upload directory {}", dir.display()))?;
    let path = dir.join(file_name);
    tokio::fs::write(&path, data)
        .await
        .with_context(|| format!("Failed to write upload {}", path.display()))
}
