// External detection API scorer.
//
// Sends the subject URL to a third-party image detection endpoint and pulls a
// probability out of whatever JSON comes back. The provider's schema isn't
// fixed, so the response is classified into one of a few known shapes; an
// unrecognized shape is treated exactly like a network failure.
//
// Availability of the analyze endpoint wins over accuracy: every failure
// (timeout, transport, bad status, bad body, unknown shape) is logged and
// replaced by the configured fallback probability.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use super::traits::{ScoreResult, Scorer};
use crate::db::models::is_valid_probability;

/// Default hosted model, used when DETECTOR_API_URL is unset.
pub const DEFAULT_DETECTOR_URL: &str =
    "https://api-inference.huggingface.co/models/umm-maybe/AI-image-detector";
pub const DEFAULT_TIMEOUT_SECS: u64 = 20;
pub const DEFAULT_FALLBACK_PROBABILITY: f64 = 0.5;

/// Top-level fields checked in order before falling back to `data.score`.
const FLAT_FIELDS: [&str; 3] = ["ai_probability", "score", "probability"];

/// Why the upstream call didn't yield a probability. Never leaves this module
/// as an error; it only ends up in logs.
#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    #[error("detection API timed out")]
    Timeout,

    #[error("detection API request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("detection API returned {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("detection API returned an unreadable body: {0}")]
    InvalidBody(#[source] reqwest::Error),

    #[error("detection API response has no usable probability")]
    Unrecognized,
}

impl UpstreamError {
    fn from_send(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            UpstreamError::Timeout
        } else {
            UpstreamError::Transport(err)
        }
    }

    fn from_body(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            UpstreamError::Timeout
        } else {
            UpstreamError::InvalidBody(err)
        }
    }
}

/// The response shapes we know how to read.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RemoteResponse {
    /// `{"ai_probability": 0.82}`, `{"score": ...}` or `{"probability": ...}`
    Flat(f64),
    /// `{"data": {"score": 0.82}}`
    Nested(f64),
    Unrecognized,
}

impl RemoteResponse {
    /// Classify a decoded JSON body.
    ///
    /// Numbers and numeric strings are both accepted. A value outside [0, 1]
    /// makes the whole response unrecognized rather than trying the next field.
    pub fn classify(body: &Value) -> Self {
        let Some(object) = body.as_object() else {
            return RemoteResponse::Unrecognized;
        };

        if let Some(value) = FLAT_FIELDS.iter().find_map(|key| object.get(*key)) {
            return match as_probability(value) {
                Some(p) => RemoteResponse::Flat(p),
                None => RemoteResponse::Unrecognized,
            };
        }

        match object
            .get("data")
            .and_then(Value::as_object)
            .and_then(|data| data.get("score"))
            .and_then(as_probability)
        {
            Some(p) => RemoteResponse::Nested(p),
            None => RemoteResponse::Unrecognized,
        }
    }

    pub fn probability(&self) -> Option<f64> {
        match self {
            RemoteResponse::Flat(p) | RemoteResponse::Nested(p) => Some(*p),
            RemoteResponse::Unrecognized => None,
        }
    }
}

fn as_probability(value: &Value) -> Option<f64> {
    let p = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    is_valid_probability(p).then_some(p)
}

#[derive(Serialize)]
struct DetectionRequest<'a> {
    url: &'a str,
    version: &'a str,
}

/// Scorer backed by an external HTTP detection API.
pub struct RemoteScorer {
    client: Client,
    endpoint: String,
    api_key: String,
    fallback_probability: f64,
    threshold: f64,
}

impl RemoteScorer {
    /// Build a scorer with a bounded request timeout.
    pub fn new(
        endpoint: &str,
        api_key: &str,
        timeout: Duration,
        fallback_probability: f64,
        threshold: f64,
    ) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("veriscan/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
            api_key: api_key.to_string(),
            fallback_probability,
            threshold,
        })
    }

    /// One attempt against the API. No retries.
    async fn request(&self, subject: &str) -> std::result::Result<f64, UpstreamError> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&DetectionRequest {
                url: subject,
                version: "2.0",
            })
            .send()
            .await
            .map_err(UpstreamError::from_send)?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(UpstreamError::Status {
                status,
                body: truncate_error_body(&body),
            });
        }

        let body: Value = response.json().await.map_err(UpstreamError::from_body)?;
        let shape = RemoteResponse::classify(&body);
        debug!(?shape, "Detection API response");
        shape.probability().ok_or(UpstreamError::Unrecognized)
    }
}

/// Error bodies longer than this are cut before they reach the logs.
const MAX_ERROR_BODY_CHARS: usize = 300;

fn truncate_error_body(body: &str) -> String {
    let body = body.trim();
    match body.char_indices().nth(MAX_ERROR_BODY_CHARS) {
        Some((cut, _)) => format!("{}... ({} bytes total)", &body[..cut], body.len()),
        None => body.to_string(),
    }
}

#[async_trait]
impl Scorer for RemoteScorer {
    async fn score(&self, subject: &str) -> ScoreResult {
        let probability = match self.request(subject).await {
            Ok(p) => p,
            Err(e) => {
                warn!(
                    error = %e,
                    subject = %subject,
                    fallback = self.fallback_probability,
                    "Detection API unavailable, using fallback probability"
                );
                self.fallback_probability
            }
        };
        ScoreResult::new(probability, self.threshold)
    }

    fn name(&self) -> &'static str {
        "remote"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_flat_field_priority() {
        let body = json!({ "probability": 0.1, "score": 0.2, "ai_probability": 0.3 });
        assert_eq!(RemoteResponse::classify(&body), RemoteResponse::Flat(0.3));

        let body = json!({ "probability": 0.1, "score": 0.2 });
        assert_eq!(RemoteResponse::classify(&body), RemoteResponse::Flat(0.2));
    }

    #[test]
    fn test_flat_beats_nested() {
        let body = json!({ "score": 0.6, "data": { "score": 0.9 } });
        assert_eq!(RemoteResponse::classify(&body), RemoteResponse::Flat(0.6));
    }

    #[test]
    fn test_nested_score() {
        let body = json!({ "status": 200, "data": { "score": 0.82 } });
        assert_eq!(RemoteResponse::classify(&body), RemoteResponse::Nested(0.82));
    }

    #[test]
    fn test_numeric_string_accepted() {
        let body = json!({ "ai_probability": "0.42" });
        assert_eq!(RemoteResponse::classify(&body), RemoteResponse::Flat(0.42));
    }

    #[test]
    fn test_unrecognized_shapes() {
        for body in [
            json!({ "error": "Model is loading" }),
            json!([{ "label": "artificial", "score": 0.9 }]),
            json!({ "data": [0.5] }),
            json!({ "data": { "probability": 0.5 } }),
            json!({ "score": null }),
            json!("0.5"),
        ] {
            assert_eq!(
                RemoteResponse::classify(&body),
                RemoteResponse::Unrecognized,
                "{body}"
            );
        }
    }

    #[test]
    fn test_out_of_range_is_unrecognized() {
        assert_eq!(
            RemoteResponse::classify(&json!({ "score": 87 })),
            RemoteResponse::Unrecognized
        );
        assert_eq!(
            RemoteResponse::classify(&json!({ "data": { "score": -0.2 } })),
            RemoteResponse::Unrecognized
        );
    }

    #[test]
    fn test_error_body_truncated() {
        assert_eq!(truncate_error_body("  Model is loading \n"), "Model is loading");

        let page = "é".repeat(5_000);
        let cut = truncate_error_body(&page);
        assert!(cut.starts_with(&"é".repeat(MAX_ERROR_BODY_CHARS)));
        assert!(cut.ends_with("... (10000 bytes total)"));
        assert!(cut.chars().count() < MAX_ERROR_BODY_CHARS + 40);
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_falls_back() {
        let scorer = RemoteScorer::new(
            "http://127.0.0.1:9/detect",
            "key",
            Duration::from_secs(2),
            0.5,
            0.5,
        )
        .unwrap();
        let result = scorer.score("https://x/y.png").await;
        assert_eq!(result.probability, 0.5);
        assert_eq!(result.category, crate::scoring::traits::Category::Human);
    }
}
