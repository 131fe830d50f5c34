//! Completion toggle: the single write path on the completion log.

use chrono::NaiveDate;
use serde::Serialize;

use crate::completion::CompletionKey;
use crate::error::{Error, Result};
use crate::store::{CompletionLog, TaskRegistry};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleOutcome {
    pub task_id: String,
    pub date: NaiveDate,
    pub completed: bool,
}

/// Flip the completion state of `task_id` on `day`.
///
/// A missing record is created as completed. An existing record has its
/// flag inverted; records are never removed here. The lookup and write run
/// inside one keyed upsert on the store.
pub fn toggle_completion<S>(
    store: &S,
    owner: &str,
    task_id: &str,
    day: NaiveDate,
) -> Result<ToggleOutcome>
where
    S: TaskRegistry + CompletionLog,
{
    let task = store
        .find_task(owner, task_id)?
        .ok_or_else(|| Error::TaskNotFound(task_id.to_string()))?;

    let key = CompletionKey::new(owner, task.id, day);
    let record = store.upsert_completion(&key, |existing| {
        existing.map_or(true, |record| !record.completed)
    })?;

    tracing::debug!(
        owner,
        task_id = %record.task_id,
        date = %record.day,
        completed = record.completed,
        "toggled completion"
    );
    Ok(ToggleOutcome {
        task_id: record.task_id,
        date: record.day,
        completed: record.completed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::day::{parse_day, DayRange};
    use crate::store::MemoryStore;
    use crate::task::Task;
    use chrono::Utc;

    fn setup() -> (MemoryStore, Task) {
        let store = MemoryStore::new();
        let task = Task::new("alice", "Read", Utc::now()).unwrap();
        store.insert_task(task.clone()).unwrap();
        (store, task)
    }

    #[test]
    fn first_toggle_creates_completed_record() {
        let (store, task) = setup();
        let day = parse_day("2024-03-01").unwrap();

        let outcome = toggle_completion(&store, "alice", &task.id, day).unwrap();
        assert_eq!(
            outcome,
            ToggleOutcome {
                task_id: task.id.clone(),
                date: day,
                completed: true,
            }
        );
    }

    #[test]
    fn double_toggle_keeps_single_record() {
        let (store, task) = setup();
        let day = parse_day("2024-03-01").unwrap();

        assert!(toggle_completion(&store, "alice", &task.id, day).unwrap().completed);
        assert!(!toggle_completion(&store, "alice", &task.id, day).unwrap().completed);

        let records = store.completions_for_task(&task.id, DayRange::all()).unwrap();
        assert_eq!(records.len(), 1);
        let stored = store
            .find_completion(&CompletionKey::new("alice", &task.id, day))
            .unwrap();
        assert_eq!(stored.map(|record| record.completed), Some(false));

        assert!(toggle_completion(&store, "alice", &task.id, day).unwrap().completed);
        assert_eq!(store.snapshot().completions.len(), 1);
    }

    #[test]
    fn foreign_task_is_not_found() {
        let (store, task) = setup();
        let day = parse_day("2024-03-01").unwrap();

        let err = toggle_completion(&store, "bob", &task.id, day).unwrap_err();
        assert!(matches!(err, Error::TaskNotFound(_)));
        assert!(store.snapshot().completions.is_empty());
    }

    #[test]
    fn outcome_serializes_camel_case() {
        let outcome = ToggleOutcome {
            task_id: "t1".to_string(),
            date: parse_day("2024-03-01").unwrap(),
            completed: true,
        };
        let value = serde_json::to_value(outcome).unwrap();
        assert_eq!(value["taskId"], "t1");
        assert_eq!(value["date"], "2024-03-01");
        assert_eq!(value["completed"], true);
    }
}
