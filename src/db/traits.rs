// Database trait — backend-agnostic async interface for the detection store.
//
// Implementor: SqliteDatabase (wraps rusqlite). All methods are async so a
// natively async backend can slot in behind the same interface later.
//
// The trait mirrors the queries.rs function signatures; handlers hold an
// `Arc<dyn Database>` and never see a Connection.

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;

use super::models::{DailyStats, DetectionRecord};

#[async_trait]
pub trait Database: Send + Sync {
    // --- Lifecycle ---

    /// Count the number of user-created tables in the database.
    async fn table_count(&self) -> Result<i64>;

    // --- Detections ---

    /// Append a detection. The store assigns the id and timestamp.
    async fn append(&self, subject: &str, probability: f64) -> Result<DetectionRecord>;

    /// The `limit` most recent detections, newest first. `limit <= 0` is empty.
    async fn recent(&self, limit: i64) -> Result<Vec<DetectionRecord>>;

    /// Stats for the given UTC day.
    async fn daily_stats_for(&self, day: NaiveDate) -> Result<DailyStats>;

    /// Stats for the current UTC day.
    async fn daily_stats(&self) -> Result<DailyStats> {
        self.daily_stats_for(chrono::Utc::now().date_naive()).await
    }

    /// Total number of stored detections.
    async fn detection_count(&self) -> Result<u64>;
}
