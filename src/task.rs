//! Habit task model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ulid::Ulid;

use crate::error::{Error, Result};

/// Maximum title length, in characters, after trimming.
pub const TITLE_MAX_LEN: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub owner: String,
    pub title: String,
    /// `false` once soft-deleted; history stays queryable.
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Build a new active task with a fresh id. The title is normalized.
    pub fn new(owner: impl Into<String>, title: &str, created_at: DateTime<Utc>) -> Result<Self> {
        Ok(Self {
            id: generate_task_id(),
            owner: owner.into(),
            title: normalize_title(title)?,
            active: true,
            created_at,
        })
    }

    pub fn is_owned_by(&self, owner: &str) -> bool {
        self.owner == owner
    }
}

pub fn generate_task_id() -> String {
    Ulid::new().to_string().to_lowercase()
}

/// Trim a title and enforce the non-empty / max-length rules.
pub fn normalize_title(raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(Error::InvalidTitle("task title is required".to_string()));
    }
    let len = trimmed.chars().count();
    if len > TITLE_MAX_LEN {
        return Err(Error::InvalidTitle(format!(
            "task title is {len} characters (max {TITLE_MAX_LEN})"
        )));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_is_trimmed() {
        assert_eq!(normalize_title("  Read 20 pages \n").unwrap(), "Read 20 pages");
    }

    #[test]
    fn blank_title_rejected() {
        for raw in ["", "   ", "\t\n"] {
            assert!(matches!(normalize_title(raw), Err(Error::InvalidTitle(_))));
        }
    }

    #[test]
    fn title_length_counts_characters() {
        let at_limit = "é".repeat(TITLE_MAX_LEN);
        assert_eq!(normalize_title(&at_limit).unwrap(), at_limit);

        let over = "a".repeat(TITLE_MAX_LEN + 1);
        assert!(matches!(normalize_title(&over), Err(Error::InvalidTitle(_))));

        let padded = format!("  {}  ", "a".repeat(TITLE_MAX_LEN));
        assert!(normalize_title(&padded).is_ok());
    }

    #[test]
    fn new_task_is_active_with_unique_id() {
        let now = Utc::now();
        let first = Task::new("alice", "Meditate", now).unwrap();
        let second = Task::new("alice", "Meditate", now).unwrap();
        assert!(first.active);
        assert!(first.is_owned_by("alice"));
        assert!(!first.is_owned_by("bob"));
        assert_ne!(first.id, second.id);
        assert_eq!(first.id, first.id.to_lowercase());
    }

    #[test]
    fn serializes_camel_case() {
        let task = Task::new("alice", "Walk", Utc::now()).unwrap();
        let value = serde_json::to_value(&task).unwrap();
        assert!(value.get("createdAt").is_some());
        assert_eq!(value["active"], serde_json::Value::Bool(true));
    }
}
