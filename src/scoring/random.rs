// Mock scorer — uniform random probability in a configured range.
//
// Used when no detection API is configured, and always for text and upload
// subjects, which the external API can't take.

use async_trait::async_trait;
use rand::Rng;

use super::traits::{ScoreResult, Scorer};

/// Default mock range, shared by every endpoint.
pub const DEFAULT_MOCK_MIN: f64 = 0.1;
pub const DEFAULT_MOCK_MAX: f64 = 0.9;

pub struct RandomScorer {
    min: f64,
    max: f64,
    threshold: f64,
}

impl RandomScorer {
    /// `min` and `max` must satisfy `0 <= min <= max <= 1`; Config::validate
    /// checks this before a scorer is built.
    pub fn new(min: f64, max: f64, threshold: f64) -> Self {
        Self { min, max, threshold }
    }

    fn sample(&self) -> f64 {
        let raw = rand::rng().random_range(self.min..=self.max);
        // Three decimals, like the dashboard displays
        let rounded = (raw * 1000.0).round() / 1000.0;
        rounded.clamp(self.min, self.max)
    }
}

impl Default for RandomScorer {
    fn default() -> Self {
        Self::new(
            DEFAULT_MOCK_MIN,
            DEFAULT_MOCK_MAX,
            super::traits::DEFAULT_THRESHOLD,
        )
    }
}

#[async_trait]
impl Scorer for RandomScorer {
    async fn score(&self, _subject: &str) -> ScoreResult {
        ScoreResult::new(self.sample(), self.threshold)
    }

    fn name(&self) -> &'static str {
        "random"
    }
}
