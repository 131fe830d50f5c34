//! Aggregation engine: progress series, task heatmaps and stats.
//!
//! Every function takes the reference day explicitly and never reads a
//! clock. Windows are generated up front and filled from a single range
//! query per call.

use std::collections::{BTreeMap, HashSet};

use chrono::NaiveDate;
use serde::Serialize;

use crate::day::{self, DayRange};
use crate::error::{Error, Result};
use crate::range::ProgressRange;
use crate::store::{CompletionLog, TaskRegistry};

/// Upper bound on the streak walk; longer streaks report as this value.
pub const STREAK_LOOKBACK_DAYS: usize = 365;

/// Heatmap lookback in calendar months.
pub const HEATMAP_MONTHS: u32 = 6;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyProgress {
    pub date: NaiveDate,
    pub completed: usize,
    pub total: usize,
    pub percentage: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgressReport {
    pub progress: Vec<DailyProgress>,
    pub range: ProgressRange,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeatmapEntry {
    pub date: NaiveDate,
    pub completed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeatmapTask {
    pub id: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskHeatmap {
    pub task: HeatmapTask,
    pub heatmap: Vec<HeatmapEntry>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub total_tasks: usize,
    pub today_completions: usize,
    pub total_completions: usize,
    pub current_streak: usize,
}

/// `round(completed / total * 100)` with half-up rounding, `0` for an empty
/// task set, clamped to 100.
///
/// `completed` can exceed `total` because completions on deactivated tasks
/// still count while `total` only sees active tasks.
pub fn percentage(completed: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let completed = completed as u128;
    let total = total as u128;
    let rounded = (200 * completed + total) / (2 * total);
    rounded.min(100) as u8
}

/// One entry per calendar day of `range`, ending at `today`.
///
/// `total` is the owner's current active-task count for every day of the
/// window, not a historical snapshot.
pub fn compute_daily_progress<S>(
    store: &S,
    owner: &str,
    range: ProgressRange,
    today: NaiveDate,
) -> Result<ProgressReport>
where
    S: TaskRegistry + CompletionLog,
{
    let days = day::window(today, range.days());
    let total = store.list_tasks(owner, Some(true))?.len();

    let mut completed_by_day: BTreeMap<NaiveDate, usize> = BTreeMap::new();
    if let (Some(first), Some(last)) = (days.first(), days.last()) {
        for record in store.completions_for_owner(owner, DayRange::between(*first, *last))? {
            if record.completed {
                *completed_by_day.entry(record.day).or_insert(0) += 1;
            }
        }
    }

    let progress = days
        .into_iter()
        .map(|date| {
            let completed = completed_by_day.get(&date).copied().unwrap_or(0);
            DailyProgress {
                date,
                completed,
                total,
                percentage: percentage(completed, total),
            }
        })
        .collect();

    tracing::debug!(owner, range = %range, total, "computed daily progress");
    Ok(ProgressReport { progress, range })
}

/// Every recorded day of the task within the last six months, ascending.
/// Days without a record are left out rather than reported as missed.
pub fn compute_task_heatmap<S>(
    store: &S,
    owner: &str,
    task_id: &str,
    today: NaiveDate,
) -> Result<TaskHeatmap>
where
    S: TaskRegistry + CompletionLog,
{
    let task = store
        .find_task(owner, task_id)?
        .ok_or_else(|| Error::TaskNotFound(task_id.to_string()))?;

    let start = day::months_before(today, HEATMAP_MONTHS);
    let mut records = store.completions_for_task(&task.id, DayRange::between(start, today))?;
    records.sort_by_key(|record| record.day);

    let heatmap = records
        .into_iter()
        .map(|record| HeatmapEntry {
            date: record.day,
            completed: record.completed,
        })
        .collect();

    Ok(TaskHeatmap {
        task: HeatmapTask {
            id: task.id,
            title: task.title,
        },
        heatmap,
    })
}

pub fn compute_stats<S>(store: &S, owner: &str, today: NaiveDate) -> Result<Stats>
where
    S: TaskRegistry + CompletionLog,
{
    let total_tasks = store.list_tasks(owner, Some(true))?.len();
    let history = store.completions_for_owner(owner, DayRange::all())?;

    let total_completions = history.iter().filter(|record| record.completed).count();
    let today_completions = history
        .iter()
        .filter(|record| record.completed && record.day == today)
        .count();

    let lookback_start = day::days_before(today, (STREAK_LOOKBACK_DAYS - 1) as u64);
    let active_days: HashSet<NaiveDate> = history
        .iter()
        .filter(|record| record.completed && record.day >= lookback_start && record.day <= today)
        .map(|record| record.day)
        .collect();
    let current_streak = streak_from(&active_days, today);

    Ok(Stats {
        total_tasks,
        today_completions,
        total_completions,
        current_streak,
    })
}

/// Consecutive days ending at `today`, each with at least one completion
/// on any task, active or not.
pub fn current_streak<S>(store: &S, owner: &str, today: NaiveDate) -> Result<usize>
where
    S: CompletionLog,
{
    let lookback_start = day::days_before(today, (STREAK_LOOKBACK_DAYS - 1) as u64);
    let active_days: HashSet<NaiveDate> = store
        .completions_for_owner(owner, DayRange::between(lookback_start, today))?
        .into_iter()
        .filter(|record| record.completed)
        .map(|record| record.day)
        .collect();
    Ok(streak_from(&active_days, today))
}

fn streak_from(active_days: &HashSet<NaiveDate>, today: NaiveDate) -> usize {
    let mut streak = 0;
    let mut cursor = Some(today);
    while let Some(day) = cursor {
        if streak >= STREAK_LOOKBACK_DAYS || !active_days.contains(&day) {
            break;
        }
        streak += 1;
        cursor = day.pred_opt();
    }
    streak
}
