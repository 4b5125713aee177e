// Scorer trait — the swap-ready abstraction over where probabilities come from.
//
// Two implementations exist: RandomScorer (mock) and RemoteScorer (external
// detection API). Unlike most traits in this crate, `score` is infallible:
// a scorer always produces a usable result, and any upstream failure is
// absorbed inside the implementation.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Probabilities strictly above this are labelled AI-generated.
pub const DEFAULT_THRESHOLD: f64 = 0.5;

/// Label derived from a probability and a fixed threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "AI-generated")]
    AiGenerated,
    #[serde(rename = "Human")]
    Human,
}

impl Category {
    /// `AiGenerated` iff `probability > threshold`.
    pub fn from_probability(probability: f64, threshold: f64) -> Self {
        if probability > threshold {
            Category::AiGenerated
        } else {
            Category::Human
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::AiGenerated => "AI-generated",
            Category::Human => "Human",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The result of scoring one subject.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreResult {
    /// 0.0 (human) to 1.0 (AI-generated)
    pub probability: f64,
    pub category: Category,
}

impl ScoreResult {
    pub fn new(probability: f64, threshold: f64) -> Self {
        Self {
            probability,
            category: Category::from_probability(probability, threshold),
        }
    }
}

/// Produces an AI-generated probability for a subject (URL, file reference
/// or text marker).
#[async_trait]
pub trait Scorer: Send + Sync {
    async fn score(&self, subject: &str) -> ScoreResult;

    /// Short backend name for logs.
    fn name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_at_threshold_is_human() {
        assert_eq!(Category::from_probability(0.5, 0.5), Category::Human);
    }

    #[test]
    fn test_category_just_above_threshold() {
        assert_eq!(
            Category::from_probability(0.500_001, 0.5),
            Category::AiGenerated
        );
    }

    #[test]
    fn test_category_just_below_threshold() {
        assert_eq!(Category::from_probability(0.499_999, 0.5), Category::Human);
    }

    #[test]
    fn test_category_extremes() {
        assert_eq!(Category::from_probability(0.0, 0.5), Category::Human);
        assert_eq!(Category::from_probability(1.0, 0.5), Category::AiGenerated);
    }

    #[test]
    fn test_category_serializes_as_label() {
        assert_eq!(
            serde_json::to_value(Category::AiGenerated).unwrap(),
            "AI-generated"
        );
        assert_eq!(serde_json::to_value(Category::Human).unwrap(), "Human");
        assert_eq!(Category::AiGenerated.to_string(), "AI-generated");
    }

    #[test]
    fn test_score_result_derives_category() {
        let result = ScoreResult::new(0.73, DEFAULT_THRESHOLD);
        assert_eq!(result.category, Category::AiGenerated);
        let result = ScoreResult::new(0.2, DEFAULT_THRESHOLD);
        assert_eq!(result.category, Category::Human);
    }
}
