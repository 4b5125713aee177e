use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};

use crate::scoring::random::{DEFAULT_MOCK_MAX, DEFAULT_MOCK_MIN};
use crate::scoring::remote::{
    DEFAULT_DETECTOR_URL, DEFAULT_FALLBACK_PROBABILITY, DEFAULT_TIMEOUT_SECS,
};
use crate::scoring::traits::DEFAULT_THRESHOLD;

/// Default request body limit for uploads (25 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

/// Which scorer handles URL analysis.
#[derive(Debug, Clone, PartialEq)]
pub enum ScorerBackend {
    /// Uniform random probability (default) — no API key needed
    Random,
    /// External detection API — falls back to a fixed probability on failure
    Remote,
}

/// Central configuration loaded from environment variables.
///
/// Secrets come from env vars (never hardcoded). The .env file is loaded
/// automatically at startup via dotenvy. `Default` matches an empty
/// environment, which is what tests build on.
#[derive(Debug, Clone)]
pub struct Config {
    pub db_path: String,
    /// JSON array file holding user feedback
    pub feedback_path: PathBuf,
    /// Where uploaded files are written
    pub upload_dir: PathBuf,
    /// Directory with index.html, dashboard.html and static/
    pub frontend_dir: PathBuf,
    pub scorer_backend: ScorerBackend,
    pub detector_api_url: String,
    pub detector_api_key: String,
    pub upstream_timeout_secs: u64,
    /// Probability reported when the detection API can't be used
    pub fallback_probability: f64,
    /// Probabilities strictly above this are AI-generated
    pub threshold: f64,
    pub mock_min: f64,
    pub mock_max: f64,
    pub max_upload_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: "./detections.db".to_string(),
            feedback_path: PathBuf::from("./feedback_log.json"),
            upload_dir: PathBuf::from("./uploads"),
            frontend_dir: PathBuf::from("./frontend"),
            scorer_backend: ScorerBackend::Random,
            detector_api_url: DEFAULT_DETECTOR_URL.to_string(),
            detector_api_key: String::new(),
            upstream_timeout_secs: DEFAULT_TIMEOUT_SECS,
            fallback_probability: DEFAULT_FALLBACK_PROBABILITY,
            threshold: DEFAULT_THRESHOLD,
            mock_min: DEFAULT_MOCK_MIN,
            mock_max: DEFAULT_MOCK_MAX,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl Config {
    /// Load configuration from environment variables, then validate it.
    pub fn load() -> Result<Self> {
        let defaults = Self::default();

        let scorer_backend = match env::var("VERISCAN_SCORER").as_deref() {
            Ok("remote") => ScorerBackend::Remote,
            Ok("random") | Err(_) => ScorerBackend::Random,
            Ok(other) => anyhow::bail!(
                "Unknown VERISCAN_SCORER value '{other}'. Use 'random' or 'remote'."
            ),
        };

        let config = Self {
            db_path: env::var("VERISCAN_DB_PATH").unwrap_or(defaults.db_path),
            feedback_path: env::var("VERISCAN_FEEDBACK_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.feedback_path),
            upload_dir: env::var("VERISCAN_UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.upload_dir),
            frontend_dir: env::var("VERISCAN_FRONTEND_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.frontend_dir),
            scorer_backend,
            detector_api_url: env::var("DETECTOR_API_URL").unwrap_or(defaults.detector_api_url),
            detector_api_key: env::var("DETECTOR_API_KEY").unwrap_or_default(),
            upstream_timeout_secs: env_parse(
                "VERISCAN_UPSTREAM_TIMEOUT_SECS",
                defaults.upstream_timeout_secs,
            )?,
            fallback_probability: env_parse(
                "VERISCAN_FALLBACK_PROBABILITY",
                defaults.fallback_probability,
            )?,
            threshold: env_parse("VERISCAN_THRESHOLD", defaults.threshold)?,
            mock_min: env_parse("VERISCAN_MOCK_MIN", defaults.mock_min)?,
            mock_max: env_parse("VERISCAN_MOCK_MAX", defaults.mock_max)?,
            max_upload_bytes: env_parse("VERISCAN_MAX_UPLOAD_BYTES", defaults.max_upload_bytes)?,
        };

        config.validate()?;
        Ok(config)
    }

    /// Check that numeric settings are usable.
    pub fn validate(&self) -> Result<()> {
        let unit = 0.0..=1.0;
        if !unit.contains(&self.threshold) {
            anyhow::bail!("VERISCAN_THRESHOLD must be in [0, 1], got {}", self.threshold);
        }
        if !unit.contains(&self.fallback_probability) {
            anyhow::bail!(
                "VERISCAN_FALLBACK_PROBABILITY must be in [0, 1], got {}",
                self.fallback_probability
            );
        }
        if !unit.contains(&self.mock_min)
            || !unit.contains(&self.mock_max)
            || self.mock_min > self.mock_max
        {
            anyhow::bail!(
                "Mock range must satisfy 0 <= VERISCAN_MOCK_MIN <= VERISCAN_MOCK_MAX <= 1, got [{}, {}]",
                self.mock_min,
                self.mock_max
            );
        }
        if self.upstream_timeout_secs == 0 {
            anyhow::bail!("VERISCAN_UPSTREAM_TIMEOUT_SECS must be at least 1");
        }
        Ok(())
    }

    /// Check that the remote backend has what it needs.
    /// Call this before serving with VERISCAN_SCORER=remote.
    pub fn require_scorer(&self) -> Result<()> {
        if self.scorer_backend == ScorerBackend::Remote && self.detector_api_key.is_empty() {
            anyhow::bail!(
                "DETECTOR_API_KEY not set. Add it to your .env file,\n\
                 or set VERISCAN_SCORER=random to use mock scoring."
            );
        }
        Ok(())
    }
}

/// Parse an optional env var, falling back to `default` when unset.
fn env_parse<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("Invalid value for {key}: '{raw}'")),
        Err(_) => Ok(default),
    }
}
