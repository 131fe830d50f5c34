//! Demo data: six habits with a few months of plausible history.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use crate::completion::{CompletionKey, CompletionRecord};
use crate::day;
use crate::error::{Error, Result};
use crate::store::HabitStore;
use crate::task::Task;

pub const DEFAULT_HISTORY_DAYS: u32 = 90;

/// Ceiling on the per-day completion chance.
const MAX_CHANCE: f64 = 0.97;

/// Extra chance gained linearly from the oldest day to today.
const RECENCY_BOOST: f64 = 0.1;

const DEMO_HABITS: [(&str, f64); 6] = [
    ("Exercise for 30 mins", 0.82),
    ("Read 20 pages", 0.70),
    ("Drink 8 glasses of water", 0.90),
    ("Meditate for 10 mins", 0.60),
    ("No social media before noon", 0.55),
    ("Journal before bed", 0.65),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedReport {
    pub owner: String,
    pub removed_tasks: usize,
    pub tasks: usize,
    pub completions: usize,
    pub days: u32,
}

/// Chance that a habit with `rate` was done `days_ago` days before today.
pub fn completion_chance(rate: f64, days_ago: u32, days: u32) -> f64 {
    let boost = f64::from(days.saturating_sub(days_ago)) / f64::from(days.max(1)) * RECENCY_BOOST;
    (rate + boost).min(MAX_CHANCE)
}

/// Replace the owner's tasks with the demo habits and `days` of history
/// ending at `today`, in one store write. The same `rng_seed` always yields
/// the same history.
pub fn seed<S: HabitStore>(
    store: &S,
    owner: &str,
    today: NaiveDate,
    now: DateTime<Utc>,
    days: u32,
    rng_seed: u64,
) -> Result<SeedReport> {
    if days == 0 {
        return Err(Error::InvalidArgument("days must be > 0".to_string()));
    }

    let mut rng = StdRng::seed_from_u64(rng_seed);
    let mut tasks = Vec::with_capacity(DEMO_HABITS.len());
    let mut completions = Vec::new();

    for (offset, (title, rate)) in DEMO_HABITS.iter().enumerate() {
        // first habit lists first under newest-first ordering
        let created_at = now - Duration::milliseconds(offset as i64);
        let task = Task::new(owner, title, created_at)?;

        for days_ago in (0..days).rev() {
            let chance = completion_chance(*rate, days_ago, days);
            if rng.gen::<f64>() < chance {
                let date = day::days_before(today, u64::from(days_ago));
                completions.push(CompletionRecord::new(
                    CompletionKey::new(owner, &task.id, date),
                    true,
                ));
            }
        }
        tasks.push(task);
    }

    let task_count = tasks.len();
    let completion_count = completions.len();
    let removed_tasks = store.replace_owner(owner, tasks, completions)?;
    let report = SeedReport {
        owner: owner.to_string(),
        removed_tasks,
        tasks: task_count,
        completions: completion_count,
        days,
    };

    tracing::info!(
        owner,
        tasks = report.tasks,
        completions = report.completions,
        "seeded demo data"
    );
    Ok(report)
}
