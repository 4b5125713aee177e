// SqliteDatabase — rusqlite backend implementing the Database trait.
//
// The Connection is wrapped in tokio::sync::Mutex because Connection is !Sync.
// Trait methods lock the mutex, do synchronous rusqlite work, and return.
// Appends are a single INSERT, so id assignment is atomic and a reader never
// sees a half-written row.

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use rusqlite::Connection;
use tokio::sync::Mutex;

use super::models::{DailyStats, DetectionRecord};
use super::traits::Database;

pub struct SqliteDatabase {
    conn: Mutex<Connection>,
}

impl SqliteDatabase {
    /// Wrap an already-opened rusqlite Connection.
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }
}

#[async_trait]
impl Database for SqliteDatabase {
    async fn table_count(&self) -> Result<i64> {
        let conn = self.conn.lock().await;
        super::schema::table_count(&conn)
    }

    async fn append(&self, subject: &str, probability: f64) -> Result<DetectionRecord> {
        let conn = self.conn.lock().await;
        super::queries::insert_detection(&conn, subject, probability)
    }

    async fn recent(&self, limit: i64) -> Result<Vec<DetectionRecord>> {
        let conn = self.conn.lock().await;
        super::queries::get_recent_detections(&conn, limit)
    }

    async fn daily_stats_for(&self, day: NaiveDate) -> Result<DailyStats> {
        let conn = self.conn.lock().await;
        super::queries::get_daily_stats(&conn, day)
    }

    async fn detection_count(&self) -> Result<u64> {
        let conn = self.conn.lock().await;
        super::queries::count_detections(&conn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::schema::create_tables;
    use std::collections::HashSet;
    use std::sync::Arc;

    async fn test_db() -> SqliteDatabase {
        let conn = Connection::open_in_memory().unwrap();
        create_tables(&conn).unwrap();
        SqliteDatabase::new(conn)
    }

    #[tokio::test]
    async fn test_trait_append_and_recent() {
        let db = test_db().await;
        let record = db.append("https://x/y.png", 0.73).await.unwrap();
        let recent = db.recent(20).await.unwrap();
        assert_eq!(recent, vec![record]);
    }

    #[tokio::test]
    async fn test_trait_daily_stats_counts_todays_inserts() {
        let db = test_db().await;
        for p in [0.2, 0.4, 0.6] {
            db.append("https://x", p).await.unwrap();
        }
        let stats = db.daily_stats().await.unwrap();
        assert_eq!(stats.count, 3);
        assert!((stats.average_probability - 0.4).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_trait_daily_stats_empty() {
        let db = test_db().await;
        assert_eq!(db.daily_stats().await.unwrap(), DailyStats::default());
    }

    #[tokio::test]
    async fn test_trait_table_count() {
        let db = test_db().await;
        assert_eq!(db.table_count().await.unwrap(), 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_appends_get_unique_ids() {
        let db: Arc<dyn Database> = Arc::new(test_db().await);

        let handles: Vec<_> = (0..32)
            .map(|i| {
                let db = db.clone();
                tokio::spawn(async move {
                    db.append(&format!("https://x/{i}"), 0.5).await.unwrap().id
                })
            })
            .collect();

        let mut ids = HashSet::new();
        for handle in handles {
            assert!(ids.insert(handle.await.unwrap()));
        }
        assert_eq!(ids.len(), 32);
        assert_eq!(db.detection_count().await.unwrap(), 32);
    }
}
