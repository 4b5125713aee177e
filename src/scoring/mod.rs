// Detection scoring — trait-based abstraction for swappable providers.
//
// The Scorer trait defines the interface. RandomScorer is the mock; RemoteScorer
// calls an external detection API and never fails outward. Which one handles
// URL analysis is decided once at startup from the config.

pub mod random;
pub mod remote;
pub mod traits;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tracing::info;

use crate::config::{Config, ScorerBackend};
use random::RandomScorer;
use remote::RemoteScorer;
use traits::Scorer;

/// Create the scorer used for URL analysis, based on the configured backend.
pub fn create_scorer(config: &Config) -> Result<Arc<dyn Scorer>> {
    match config.scorer_backend {
        ScorerBackend::Random => {
            info!("Using mock random scorer");
            Ok(Arc::new(create_mock_scorer(config)))
        }
        ScorerBackend::Remote => {
            info!(endpoint = %config.detector_api_url, "Using remote detection API scorer");
            let scorer = RemoteScorer::new(
                &config.detector_api_url,
                &config.detector_api_key,
                Duration::from_secs(config.upstream_timeout_secs),
                config.fallback_probability,
                config.threshold,
            )?;
            Ok(Arc::new(scorer))
        }
    }
}

/// The mock scorer for subjects the remote API can't take (text, uploads).
pub fn create_mock_scorer(config: &Config) -> RandomScorer {
    RandomScorer::new(config.mock_min, config.mock_max, config.threshold)
}
