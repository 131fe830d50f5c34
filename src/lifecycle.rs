//! Task lifecycle: create, list, soft delete and hard delete.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::analytics::percentage;
use crate::day::DayRange;
use crate::error::{Error, Result};
use crate::store::HabitStore;
use crate::task::Task;

/// How `delete_task` treats a task's history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeleteMode {
    /// Deactivate; completion records stay and keep counting in history.
    #[default]
    Soft,
    /// Remove the task and every completion record of it.
    Hard,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteOutcome {
    pub task_id: String,
    pub purged: bool,
    /// Records removed by a hard delete; always 0 for a soft delete.
    pub removed_completions: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TodayTask {
    #[serde(flatten)]
    pub task: Task,
    pub completed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TodaySummary {
    pub completed: usize,
    pub total: usize,
    pub percentage: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TodayTasks {
    pub date: NaiveDate,
    pub tasks: Vec<TodayTask>,
    pub progress: TodaySummary,
}

/// Validate the title and store a new active task.
pub fn create_task<S: HabitStore>(
    store: &S,
    owner: &str,
    title: &str,
    now: DateTime<Utc>,
) -> Result<Task> {
    let task = Task::new(owner, title, now)?;
    store.insert_task(task.clone())?;
    tracing::info!(owner, task_id = %task.id, "created task");
    Ok(task)
}

pub fn soft_delete<S: HabitStore>(store: &S, owner: &str, task_id: &str) -> Result<Task> {
    let task = store
        .set_task_active(owner, task_id, false)?
        .ok_or_else(|| Error::TaskNotFound(task_id.to_string()))?;
    tracing::info!(owner, task_id, "deactivated task");
    Ok(task)
}

/// Remove the task and all of its records in one store operation.
/// Returns the number of removed completion records.
pub fn hard_delete<S: HabitStore>(store: &S, owner: &str, task_id: &str) -> Result<usize> {
    let removed = store
        .purge_task(owner, task_id)?
        .ok_or_else(|| Error::TaskNotFound(task_id.to_string()))?;
    tracing::info!(owner, task_id, removed, "purged task");
    Ok(removed)
}

pub fn delete_task<S: HabitStore>(
    store: &S,
    owner: &str,
    task_id: &str,
    mode: DeleteMode,
) -> Result<DeleteOutcome> {
    let removed_completions = match mode {
        DeleteMode::Soft => {
            soft_delete(store, owner, task_id)?;
            0
        }
        DeleteMode::Hard => hard_delete(store, owner, task_id)?,
    };
    Ok(DeleteOutcome {
        task_id: task_id.to_string(),
        purged: mode == DeleteMode::Hard,
        removed_completions,
    })
}

/// Owner's tasks, newest first. Inactive tasks only when asked for.
pub fn list_tasks<S: HabitStore>(
    store: &S,
    owner: &str,
    include_inactive: bool,
) -> Result<Vec<Task>> {
    let filter = if include_inactive { None } else { Some(true) };
    store.list_tasks(owner, filter)
}

/// Active tasks with their state on `today`, plus the day's summary.
pub fn todays_tasks<S: HabitStore>(store: &S, owner: &str, today: NaiveDate) -> Result<TodayTasks> {
    let active = store.list_tasks(owner, Some(true))?;
    let records = store.completions_for_owner(owner, DayRange::single(today))?;

    let tasks: Vec<TodayTask> = active
        .into_iter()
        .map(|task| {
            let completed = records
                .iter()
                .any(|record| record.task_id == task.id && record.completed);
            TodayTask { task, completed }
        })
        .collect();

    let completed = tasks.iter().filter(|entry| entry.completed).count();
    let total = tasks.len();
    Ok(TodayTasks {
        date: today,
        tasks,
        progress: TodaySummary {
            completed,
            total,
            percentage: percentage(completed, total),
        },
    })
}

/// Resolve user input to one of the owner's task ids.
///
/// Accepts an exact id or a unique case-insensitive id prefix.
pub fn resolve_task_id<S: HabitStore>(store: &S, owner: &str, input: &str) -> Result<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(Error::InvalidArgument("task id cannot be empty".to_string()));
    }
    let needle = trimmed.to_ascii_lowercase();

    let mut prefix = Vec::new();
    for task in store.list_tasks(owner, None)? {
        let id = task.id.to_ascii_lowercase();
        if id == needle {
            return Ok(task.id);
        }
        if id.starts_with(&needle) {
            prefix.push(task.id);
        }
    }

    prefix.sort();
    if prefix.len() > 1 {
        return Err(Error::InvalidArgument(format!(
            "ambiguous task id '{}': {}",
            trimmed,
            prefix.join(", ")
        )));
    }
    prefix
        .into_iter()
        .next()
        .ok_or_else(|| Error::TaskNotFound(trimmed.to_string()))
}
