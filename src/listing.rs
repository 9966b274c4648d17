//! Post listing projected for display
//!
//! Never carries post bodies; order is whatever the store reports.

use chrono::NaiveDate;

use crate::error::Result;
use crate::remote::{ContentStore, RemoteEntry};

/// Shown when the content directory holds no posts
pub const EMPTY_LISTING: &str = "No blog posts found.";

/// One row of the post list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentSummary {
    pub filename: String,
    pub size_display: String,
    pub last_modified: Option<NaiveDate>,
}

impl From<RemoteEntry> for ContentSummary {
    fn from(entry: RemoteEntry) -> Self {
        Self {
            size_display: human_size(entry.size),
            last_modified: entry.last_modified.map(|t| t.date_naive()),
            filename: entry.name,
        }
    }
}

/// Kilobytes with one decimal, e.g. `1.5 KB`
#[allow(clippy::cast_precision_loss)]
pub fn human_size(bytes: u64) -> String {
    format!("{:.1} KB", bytes as f64 / 1024.0)
}

/// Fetch the listing and project it into display rows
pub async fn list_content(store: &dyn ContentStore) -> Result<Vec<ContentSummary>> {
    let entries = store.list().await?;
    tracing::debug!(count = entries.len(), "listed posts");
    Ok(entries.into_iter().map(ContentSummary::from).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_human_size() {
        assert_eq!(human_size(0), "0.0 KB");
        assert_eq!(human_size(1536), "1.5 KB");
        assert_eq!(human_size(100), "0.1 KB");
    }

    #[test]
    fn test_summary_from_entry() {
        let modified = Utc
            .with_ymd_and_hms(2024, 3, 2, 10, 0, 0)
            .single()
            .expect("valid timestamp");
        let summary = ContentSummary::from(RemoteEntry {
            name: "a.md".to_string(),
            path: "blog/a.md".to_string(),
            size: 2048,
            last_modified: Some(modified),
        });
        assert_eq!(summary.filename, "a.md");
        assert_eq!(summary.size_display, "2.0 KB");
        assert_eq!(summary.last_modified, NaiveDate::from_ymd_opt(2024, 3, 2));
    }
}
