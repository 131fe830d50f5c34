//! Completion log records.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Composite key of the completion log: one record per owner, task and day.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CompletionKey {
    pub owner: String,
    pub task_id: String,
    pub day: NaiveDate,
}

impl CompletionKey {
    pub fn new(owner: impl Into<String>, task_id: impl Into<String>, day: NaiveDate) -> Self {
        Self {
            owner: owner.into(),
            task_id: task_id.into(),
            day,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionRecord {
    pub owner: String,
    pub task_id: String,
    /// Serialized as `YYYY-MM-DD`.
    #[serde(rename = "date")]
    pub day: NaiveDate,
    pub completed: bool,
}

impl CompletionRecord {
    pub fn new(key: CompletionKey, completed: bool) -> Self {
        Self {
            owner: key.owner,
            task_id: key.task_id,
            day: key.day,
            completed,
        }
    }

    pub fn key(&self) -> CompletionKey {
        CompletionKey::new(self.owner.clone(), self.task_id.clone(), self.day)
    }

    pub fn matches(&self, key: &CompletionKey) -> bool {
        self.day == key.day && self.task_id == key.task_id && self.owner == key.owner
    }
}
