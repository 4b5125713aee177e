// System status display — DB size, today's stats, recent detections,
// feedback count.

use anyhow::Result;
use colored::Colorize;
use std::sync::Arc;

use crate::db::Database;
use crate::feedback::FeedbackLog;
use crate::scoring::traits::Category;

/// Display system status to the terminal.
pub async fn show(
    db: &Arc<dyn Database>,
    feedback: &Arc<dyn FeedbackLog>,
    db_display_path: &str,
    recent_limit: i64,
    threshold: f64,
) -> Result<()> {
    let file_size = std::fs::metadata(db_display_path)
        .map(|m| format_bytes(m.len()))
        .unwrap_or_else(|_| "unknown".to_string());
    println!("Database: {} ({})", db_display_path, file_size);

    let total = db.detection_count().await?;
    println!("Detections stored: {total}");

    let daily = db.daily_stats().await?;
    println!(
        "Today (UTC): {} detections, average AI probability {:.1}%",
        daily.count,
        daily.average_probability * 100.0
    );

    let recent = db.recent(recent_limit).await?;
    if recent.is_empty() {
        println!("Recent detections: none yet");
        println!("  Run `veriscan serve` and POST to /api/analyze");
    } else {
        println!("Recent detections ({} most recent):", recent.len());
        for record in &recent {
            let category = Category::from_probability(record.probability, threshold);
            let label = match category {
                Category::AiGenerated => category.as_str().red(),
                Category::Human => category.as_str().green(),
            };
            println!(
                "  #{} {:>5.1}% {} {} {}",
                record.id,
                record.probability * 100.0,
                label,
                record.subject,
                record.timestamp.dimmed()
            );
        }
    }

    let feedback_count = feedback.all().await.map(|all| all.len());
    match feedback_count {
        Ok(n) => println!("Feedback entries: {n}"),
        Err(e) => println!("Feedback entries: unreadable ({e:#})"),
    }

    Ok(())
}

fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(2048), "2.0 KB");
        assert_eq!(format_bytes(3 * 1024 * 1024), "3.0 MB");
    }
}
