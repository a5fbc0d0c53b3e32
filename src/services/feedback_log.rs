use std::sync::Arc;

use tracing::{debug, info};

use crate::error::AppResult;
use crate::models::feedback::{FeedbackRecord, FEEDBACK_CSV_HEADER};
use crate::storage::KeyValueStore;

/// Storage slot holding the feedback CSV blob.
pub const FEEDBACK_SLOT_KEY: &str = "outputs/feedback.csv";

/// Fixed filename offered when the blob is exported.
pub const EXPORT_FILE_NAME: &str = "churn_feedback_export.csv";

/// Full feedback blob plus the filename it should be downloaded as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedbackExport {
    pub file_name: &'static str,
    pub content: String,
}

/// Append-only CSV log over an injected key-value store. Appends are
/// read-modify-write with no locking beyond what the store provides; the UI
/// serializes submissions behind a single-result-at-a-time flow.
pub struct FeedbackLog {
    store: Arc<dyn KeyValueStore>,
    slot_key: String,
}

impl FeedbackLog {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_slot_key(store, FEEDBACK_SLOT_KEY)
    }

    pub fn with_slot_key(store: Arc<dyn KeyValueStore>, slot_key: impl Into<String>) -> Self {
        Self {
            store,
            slot_key: slot_key.into(),
        }
    }

    /// Append one row. The header line is written only when the slot is
    /// empty; a pre-existing blob is never repaired.
    pub fn append(&self, record: &FeedbackRecord) -> AppResult<()> {
        let existing = self.store.get(&self.slot_key)?;
        let mut blob = match existing {
            Some(blob) if !blob.is_empty() => blob,
            _ => format!("{FEEDBACK_CSV_HEADER}\n"),
        };

        blob.push_str(&record.csv_row());
        blob.push('\n');
        self.store.set(&self.slot_key, &blob)?;

        info!(
            target: "app::feedback",
            rating = record.rating,
            risk_category = %record.risk_category,
            "appended feedback row"
        );

        Ok(())
    }

    /// The full blob for download, or `None` when nothing has been logged yet
    /// (the caller presents a "no data" notice rather than an empty file).
    pub fn export_all(&self) -> AppResult<Option<FeedbackExport>> {
        match self.store.get(&self.slot_key)? {
            Some(content) if !content.is_empty() => Ok(Some(FeedbackExport {
                file_name: EXPORT_FILE_NAME,
                content,
            })),
            _ => {
                debug!(target: "app::feedback", "no feedback data to export");
                Ok(None)
            }
        }
    }

    /// Number of data rows currently logged (blob line count minus header).
    pub fn row_count(&self) -> AppResult<usize> {
        match self.store.get(&self.slot_key)? {
            Some(content) if !content.trim().is_empty() => {
                Ok(content.trim().lines().count().saturating_sub(1))
            }
            _ => Ok(0),
        }
    }
}
