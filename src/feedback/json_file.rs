// JsonFileFeedbackLog — feedback stored as one pretty-printed JSON array.
//
// Every append is a read-modify-write of the whole file. All of it happens
// under one tokio Mutex so concurrent handlers can't drop each other's
// entries, and the new contents go to a sibling temp file that is renamed
// over the original, so a crash mid-write leaves the previous array intact.

use std::path::PathBuf;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

use super::traits::{FeedbackEntry, FeedbackLog};

pub struct JsonFileFeedbackLog {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileFeedbackLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Read the current array. A missing file is an empty log.
    async fn load(&self) -> Result<Vec<FeedbackEntry>> {
        let raw = match tokio::fs::read(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Failed to read {}", self.path.display()));
            }
        };
        serde_json::from_slice(&raw).with_context(|| {
            format!(
                "Feedback log {} is not a JSON array of objects",
                self.path.display()
            )
        })
    }

    async fn store(&self, entries: &[FeedbackEntry]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await.with_context(|| {
                    format!("Failed to create directory for {}", self.path.display())
                })?;
            }
        }

        let json = serde_json::to_vec_pretty(entries)?;
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        tokio::fs::write(&tmp, json)
            .await
            .with_context(|| format!("Failed to write {}", tmp.display()))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .with_context(|| format!("Failed to replace {}", self.path.display()))?;
        Ok(())
    }
}

#[async_trait]
impl FeedbackLog for JsonFileFeedbackLog {
    async fn append(&self, entry: FeedbackEntry) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut entries = self.load().await?;
        entries.push(entry);
        self.store(&entries).await?;
        debug!(total = entries.len(), "Feedback appended");
        Ok(())
    }

    async fn all(&self) -> Result<Vec<FeedbackEntry>> {
        // Readers also take the lock so they never see the file mid-rename.
        let _guard = self.write_lock.lock().await;
        self.load().await
    }
}
