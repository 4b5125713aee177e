// Feedback log trait — durable, ordered record of user corrections.
//
// Payloads are arbitrary JSON objects (source, category, feedback_type, ...);
// no schema is enforced beyond "is an object".

use anyhow::Result;
use async_trait::async_trait;
use serde_json::{Map, Value};

/// One feedback payload, stored verbatim.
pub type FeedbackEntry = Map<String, Value>;

#[async_trait]
pub trait FeedbackLog: Send + Sync {
    /// Append one entry, preserving every earlier entry.
    async fn append(&self, entry: FeedbackEntry) -> Result<()>;

    /// All entries in the order they were appended.
    async fn all(&self) -> Result<Vec<FeedbackEntry>>;
}
