// Database queries — every SQL statement the app runs lives here.
//
// Timestamps are written as RFC 3339 strings in UTC with a fixed width
// (`YYYY-MM-DDTHH:MM:SS.ffffffZ`), so lexical order matches time order and a
// day is a simple half-open string range.

use anyhow::{Context, Result};
use chrono::{DateTime, Days, NaiveDate, SecondsFormat, Utc};
use rusqlite::{params, Connection};

use super::models::{is_valid_probability, DailyStats, DetectionRecord};

/// How many records GET /api/stats returns.
pub const DEFAULT_RECENT_LIMIT: i64 = 20;

/// Current time in the store's timestamp format.
pub fn now_timestamp() -> String {
    format_timestamp(Utc::now())
}

fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

// --- Writes ---

/// Append a detection stamped with the current time and return the stored row.
pub fn insert_detection(
    conn: &Connection,
    subject: &str,
    probability: f64,
) -> Result<DetectionRecord> {
    insert_detection_at(conn, subject, probability, &now_timestamp())
}

/// Append a detection with an explicit RFC 3339 timestamp.
///
/// The timestamp is normalized to UTC before it is stored. Used for backfills
/// and for tests that need records on a specific day.
pub fn insert_detection_at(
    conn: &Connection,
    subject: &str,
    probability: f64,
    timestamp: &str,
) -> Result<DetectionRecord> {
    if !is_valid_probability(probability) {
        anyhow::bail!("Probability must be a finite value in [0, 1], got {probability}");
    }

    let timestamp = DateTime::parse_from_rfc3339(timestamp)
        .with_context(|| format!("Invalid detection timestamp: {timestamp}"))?;
    let timestamp = format_timestamp(timestamp.with_timezone(&Utc));

    conn.execute(
        "INSERT INTO detections (url, ai_probability, timestamp) VALUES (?1, ?2, ?3)",
        params![subject, probability, timestamp],
    )
    .context("Failed to insert detection")?;

    Ok(DetectionRecord {
        id: conn.last_insert_rowid(),
        subject: subject.to_string(),
        probability,
        timestamp,
    })
}

// --- Reads ---

/// The `limit` most recently inserted detections, newest first.
///
/// A non-positive limit returns nothing (SQLite would treat a negative
/// LIMIT as "no limit").
pub fn get_recent_detections(conn: &Connection, limit: i64) -> Result<Vec<DetectionRecord>> {
    if limit <= 0 {
        return Ok(Vec::new());
    }

    let mut stmt = conn.prepare(
        "SELECT id, url, ai_probability, timestamp
         FROM detections
         ORDER BY id DESC
         LIMIT ?1",
    )?;

    let rows = stmt.query_map(params![limit], |row| {
        Ok(DetectionRecord {
            id: row.get(0)?,
            subject: row.get(1)?,
            probability: row.get(2)?,
            timestamp: row.get(3)?,
        })
    })?;

    let mut records = Vec::new();
    for row in rows {
        records.push(row?);
    }
    Ok(records)
}

/// Count and mean probability of the detections recorded on `day` (UTC).
pub fn get_daily_stats(conn: &Connection, day: NaiveDate) -> Result<DailyStats> {
    let start = day.format("%Y-%m-%d").to_string();
    let end = day
        .checked_add_days(Days::new(1))
        .map(|next| next.format("%Y-%m-%d").to_string())
        .context("Date out of range")?;

    let (count, average): (i64, Option<f64>) = conn.query_row(
        "SELECT COUNT(*), AVG(ai_probability)
         FROM detections
         WHERE timestamp >= ?1 AND timestamp < ?2",
        params![start, end],
        |row| Ok((row.get(0)?, row.get(1)?)),
    )?;

    Ok(DailyStats {
        count: count.max(0) as u64,
        average_probability: average.unwrap_or(0.0),
    })
}

/// Total number of stored detections.
pub fn count_detections(conn: &Connection) -> Result<u64> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM detections", [], |row| row.get(0))?;
    Ok(count.max(0) as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::schema::create_tables;

    fn test_conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        create_tables(&conn).unwrap();
        conn
    }

    fn today() -> NaiveDate {
        Utc::now().date_naive()
    }

    #[test]
    fn test_insert_assigns_increasing_ids() {
        let conn = test_conn();
        let a = insert_detection(&conn, "https://a", 0.1).unwrap();
        let b = insert_detection(&conn, "https://b", 0.2).unwrap();
        assert!(b.id > a.id);
        assert!(a.timestamp.ends_with('Z'));
    }

    #[test]
    fn test_roundtrip_through_recent() {
        let conn = test_conn();
        let earlier = insert_detection(&conn, "https://x/first.png", 0.3).unwrap();
        let stored = insert_detection(&conn, "https://x/y.png", 0.73).unwrap();

        let recent = get_recent_detections(&conn, 1).unwrap();
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].subject, "https://x/y.png");
        assert!((recent[0].probability - 0.73).abs() < 1e-9);
        assert_eq!(recent[0].id, stored.id);
        assert!(recent[0].id > earlier.id);
        assert_eq!(recent[0], stored);
    }

    #[test]
    fn test_recent_is_newest_first() {
        let conn = test_conn();
        for i in 0..5 {
            insert_detection(&conn, &format!("https://x/{i}"), 0.5).unwrap();
        }
        let recent = get_recent_detections(&conn, 3).unwrap();
        let subjects: Vec<&str> = recent.iter().map(|r| r.subject.as_str()).collect();
        assert_eq!(subjects, vec!["https://x/4", "https://x/3", "https://x/2"]);
        assert!(recent.windows(2).all(|w| w[0].id > w[1].id));
    }

    #[test]
    fn test_recent_non_positive_limit_is_empty() {
        let conn = test_conn();
        insert_detection(&conn, "https://a", 0.5).unwrap();
        assert!(get_recent_detections(&conn, 0).unwrap().is_empty());
        assert!(get_recent_detections(&conn, -1).unwrap().is_empty());
    }

    #[test]
    fn test_recent_limit_larger_than_store() {
        let conn = test_conn();
        for i in 0..3 {
            insert_detection(&conn, &format!("https://x/{i}"), 0.5).unwrap();
        }
        assert_eq!(get_recent_detections(&conn, 5).unwrap().len(), 3);
    }

    #[test]
    fn test_daily_stats_empty_is_zero() {
        let conn = test_conn();
        let stats = get_daily_stats(&conn, today()).unwrap();
        assert_eq!(stats.count, 0);
        assert_eq!(stats.average_probability, 0.0);
    }

    #[test]
    fn test_daily_stats_mean() {
        let conn = test_conn();
        for p in [0.2, 0.4, 0.6] {
            insert_detection(&conn, "https://x", p).unwrap();
        }
        let stats = get_daily_stats(&conn, today()).unwrap();
        assert_eq!(stats.count, 3);
        assert!((stats.average_probability - 0.4).abs() < 1e-9);
    }

    #[test]
    fn test_daily_stats_excludes_other_days() {
        let conn = test_conn();
        insert_detection_at(&conn, "https://old", 0.9, "2026-03-01T23:59:59Z").unwrap();
        insert_detection_at(&conn, "https://day", 0.2, "2026-03-02T00:00:00Z").unwrap();
        insert_detection_at(&conn, "https://day", 0.4, "2026-03-02T23:59:59.999999Z").unwrap();
        insert_detection_at(&conn, "https://new", 0.9, "2026-03-03T00:00:00Z").unwrap();

        let day = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
        let stats = get_daily_stats(&conn, day).unwrap();
        assert_eq!(stats.count, 2);
        assert!((stats.average_probability - 0.3).abs() < 1e-9);
    }

    #[test]
    fn test_explicit_timestamp_normalized_to_utc() {
        let conn = test_conn();
        // 01:30 at +02:00 is still the previous day in UTC
        let record =
            insert_detection_at(&conn, "https://tz", 0.5, "2026-03-02T01:30:00+02:00").unwrap();
        assert_eq!(record.timestamp, "2026-03-01T23:30:00.000000Z");

        let day = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        assert_eq!(get_daily_stats(&conn, day).unwrap().count, 1);
    }

    #[test]
    fn test_invalid_probability_rejected() {
        let conn = test_conn();
        assert!(insert_detection(&conn, "https://x", 1.5).is_err());
        assert!(insert_detection(&conn, "https://x", -0.1).is_err());
        assert!(insert_detection(&conn, "https://x", f64::NAN).is_err());
        assert_eq!(count_detections(&conn).unwrap(), 0);
    }

    #[test]
    fn test_invalid_timestamp_rejected() {
        let conn = test_conn();
        assert!(insert_detection_at(&conn, "https://x", 0.5, "yesterday").is_err());
    }

    #[test]
    fn test_boundary_probabilities_accepted() {
        let conn = test_conn();
        insert_detection(&conn, "https://zero", 0.0).unwrap();
        insert_detection(&conn, "https://one", 1.0).unwrap();
        assert_eq!(count_detections(&conn).unwrap(), 2);
    }
}
