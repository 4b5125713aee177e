// Data models — Rust structs that map to database rows.
//
// These are separate from the queries so the scoring and web layers can use
// them without depending on rusqlite. Serde names follow the JSON the
// dashboard already consumes (`url`, `ai_probability`, `today_count`, ...).

use serde::{Deserialize, Serialize};

/// One stored detection. Immutable once inserted; `id` is the ordering key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionRecord {
    pub id: i64,
    /// URL, `text:<snippet>...` marker, or `/uploads/<file>` reference.
    #[serde(rename = "url")]
    pub subject: String,
    #[serde(rename = "ai_probability")]
    pub probability: f64,
    /// RFC 3339 in UTC, assigned by the store.
    pub timestamp: String,
}

/// Aggregate over the detections recorded on one UTC calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DailyStats {
    #[serde(rename = "today_count")]
    pub count: u64,
    /// 0.0 when `count` is zero.
    pub average_probability: f64,
}

/// Returns true if `probability` is a finite value in [0, 1].
pub fn is_valid_probability(probability: f64) -> bool {
    probability.is_finite() && (0.0..=1.0).contains(&probability)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_serializes_with_dashboard_keys() {
        let record = DetectionRecord {
            id: 7,
            subject: "https://x/y.png".to_string(),
            probability: 0.73,
            timestamp: "2026-10-19T08:00:00.000000Z".to_string(),
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["url"], "https://x/y.png");
        assert_eq!(json["ai_probability"], 0.73);
        assert!(json.get("subject").is_none());
    }

    #[test]
    fn test_empty_daily_stats_serialize_as_zero() {
        let json = serde_json::to_value(DailyStats::default()).unwrap();
        assert_eq!(json["today_count"], 0);
        assert_eq!(json["average_probability"], 0.0);
    }

    #[test]
    fn test_probability_bounds() {
        assert!(is_valid_probability(0.0));
        assert!(is_valid_probability(1.0));
        assert!(is_valid_probability(0.5));
        assert!(!is_valid_probability(-0.01));
        assert!(!is_valid_probability(1.01));
        assert!(!is_valid_probability(f64::NAN));
        assert!(!is_valid_probability(f64::INFINITY));
    }
}
