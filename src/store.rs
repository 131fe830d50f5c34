//! Store contracts consumed by the analytics engine and the toggle rule.
//!
//! `TaskRegistry` owns task identity and lifecycle, `CompletionLog` owns the
//! per-day completion records. Both are read through owner-scoped queries.
//! `StoreState` is the shared in-memory representation used by the
//! in-process [`MemoryStore`] and by the file-backed
//! [`Storage`](crate::storage::Storage).

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard};

use serde::{Deserialize, Serialize};

use crate::completion::{CompletionKey, CompletionRecord};
use crate::day::DayRange;
use crate::error::{Error, Result};
use crate::task::Task;

pub trait TaskRegistry {
    fn insert_task(&self, task: Task) -> Result<()>;

    /// Task lookup scoped to `owner`; a task owned by someone else is `None`.
    fn find_task(&self, owner: &str, task_id: &str) -> Result<Option<Task>>;

    /// Tasks of `owner`, newest first, optionally filtered on the active flag.
    fn list_tasks(&self, owner: &str, active: Option<bool>) -> Result<Vec<Task>>;

    /// Returns the updated task, or `None` when it is missing or not owned.
    fn set_task_active(&self, owner: &str, task_id: &str, active: bool) -> Result<Option<Task>>;
}

pub trait CompletionLog {
    fn find_completion(&self, key: &CompletionKey) -> Result<Option<CompletionRecord>>;

    /// Records of `owner` inside `range`, ordered by day.
    fn completions_for_owner(&self, owner: &str, range: DayRange)
        -> Result<Vec<CompletionRecord>>;

    /// Records of a task inside `range`, ordered by day.
    fn completions_for_task(&self, task_id: &str, range: DayRange)
        -> Result<Vec<CompletionRecord>>;

    /// Read-modify-write of the record at `key` as one atomic step.
    ///
    /// `apply` receives the current record (if any) and returns the new
    /// `completed` value. The stored record is returned.
    fn upsert_completion<F>(&self, key: &CompletionKey, apply: F) -> Result<CompletionRecord>
    where
        F: FnOnce(Option<&CompletionRecord>) -> bool;

    fn delete_completions_for_task(&self, task_id: &str) -> Result<usize>;
}

pub trait HabitStore: TaskRegistry + CompletionLog {
    /// Delete all completion records of the task, then the task, as one unit.
    ///
    /// Returns the number of removed records, or `None` when the task is
    /// missing or not owned by `owner` (nothing is removed in that case).
    fn purge_task(&self, owner: &str, task_id: &str) -> Result<Option<usize>>;

    /// Purge every task of `owner` with its history, then insert `tasks` and
    /// `completions`, as one unit. A record whose key already exists
    /// replaces the stored one. Returns the number of purged tasks.
    fn replace_owner(
        &self,
        owner: &str,
        tasks: Vec<Task>,
        completions: Vec<CompletionRecord>,
    ) -> Result<usize>;
}

/// Full contents of a store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreState {
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub completions: Vec<CompletionRecord>,
}

impl StoreState {
    pub fn insert_task(&mut self, task: Task) -> Result<()> {
        if self.tasks.iter().any(|existing| existing.id == task.id) {
            return Err(Error::InvalidArgument(format!(
                "task already exists: {}",
                task.id
            )));
        }
        self.tasks.push(task);
        Ok(())
    }

    pub fn find_task(&self, owner: &str, task_id: &str) -> Option<&Task> {
        self.tasks
            .iter()
            .find(|task| task.id == task_id && task.is_owned_by(owner))
    }

    pub fn list_tasks(&self, owner: &str, active: Option<bool>) -> Vec<Task> {
        let mut tasks: Vec<Task> = self
            .tasks
            .iter()
            .filter(|task| task.is_owned_by(owner))
            .filter(|task| active.map_or(true, |flag| task.active == flag))
            .cloned()
            .collect();
        tasks.sort_by(|left, right| {
            right
                .created_at
                .cmp(&left.created_at)
                .then_with(|| right.id.cmp(&left.id))
        });
        tasks
    }

    pub fn set_task_active(&mut self, owner: &str, task_id: &str, active: bool) -> Option<Task> {
        let task = self
            .tasks
            .iter_mut()
            .find(|task| task.id == task_id && task.is_owned_by(owner))?;
        task.active = active;
        Some(task.clone())
    }

    pub fn find_completion(&self, key: &CompletionKey) -> Option<&CompletionRecord> {
        self.completions.iter().find(|record| record.matches(key))
    }

    pub fn completions_for_owner(&self, owner: &str, range: DayRange) -> Vec<CompletionRecord> {
        let mut records: Vec<CompletionRecord> = self
            .completions
            .iter()
            .filter(|record| record.owner == owner && range.contains(record.day))
            .cloned()
            .collect();
        records.sort_by(|left, right| {
            left.day
                .cmp(&right.day)
                .then_with(|| left.task_id.cmp(&right.task_id))
        });
        records
    }

    pub fn completions_for_task(&self, task_id: &str, range: DayRange) -> Vec<CompletionRecord> {
        let mut records: Vec<CompletionRecord> = self
            .completions
            .iter()
            .filter(|record| record.task_id == task_id && range.contains(record.day))
            .cloned()
            .collect();
        records.sort_by(|left, right| {
            left.day
                .cmp(&right.day)
                .then_with(|| left.owner.cmp(&right.owner))
        });
        records
    }

    pub fn upsert_completion<F>(&mut self, key: &CompletionKey, apply: F) -> CompletionRecord
    where
        F: FnOnce(Option<&CompletionRecord>) -> bool,
    {
        if let Some(record) = self.completions.iter_mut().find(|record| record.matches(key)) {
            let completed = apply(Some(&*record));
            record.completed = completed;
            return record.clone();
        }

        let record = CompletionRecord::new(key.clone(), apply(None));
        self.completions.push(record.clone());
        record
    }

    pub fn delete_completions_for_task(&mut self, task_id: &str) -> usize {
        let before = self.completions.len();
        self.completions.retain(|record| record.task_id != task_id);
        before - self.completions.len()
    }

    pub fn purge_task(&mut self, owner: &str, task_id: &str) -> Option<usize> {
        let idx = self
            .tasks
            .iter()
            .position(|task| task.id == task_id && task.is_owned_by(owner))?;
        let removed = self.delete_completions_for_task(task_id);
        self.tasks.remove(idx);
        Some(removed)
    }

    pub fn replace_owner(
        &mut self,
        owner: &str,
        tasks: Vec<Task>,
        completions: Vec<CompletionRecord>,
    ) -> Result<usize> {
        let purged: Vec<String> = self
            .tasks
            .iter()
            .filter(|task| task.is_owned_by(owner))
            .map(|task| task.id.clone())
            .collect();
        for task_id in &purged {
            self.purge_task(owner, task_id);
        }

        for task in tasks {
            self.insert_task(task)?;
        }
        for record in completions {
            let completed = record.completed;
            self.upsert_completion(&record.key(), |_| completed);
        }
        Ok(purged.len())
    }

    /// Check the uniqueness invariants (task ids, completion keys).
    pub fn validate(&self) -> Result<()> {
        let mut ids = HashSet::new();
        for task in &self.tasks {
            if !ids.insert(task.id.as_str()) {
                return Err(Error::CorruptStore(format!("duplicate task id: {}", task.id)));
            }
        }

        let mut keys = HashSet::new();
        for record in &self.completions {
            if !keys.insert(record.key()) {
                return Err(Error::CorruptStore(format!(
                    "duplicate completion for task {} on {}",
                    record.task_id, record.day
                )));
            }
        }
        Ok(())
    }
}

/// In-process store guarded by a mutex.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<StoreState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_state(state: StoreState) -> Result<Self> {
        state.validate()?;
        Ok(Self {
            state: Mutex::new(state),
        })
    }

    pub fn snapshot(&self) -> StoreState {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, StoreState> {
        // a panicked writer leaves the state consistent: every mutation is a single step
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl TaskRegistry for MemoryStore {
    fn insert_task(&self, task: Task) -> Result<()> {
        self.lock().insert_task(task)
    }

    fn find_task(&self, owner: &str, task_id: &str) -> Result<Option<Task>> {
        Ok(self.lock().find_task(owner, task_id).cloned())
    }

    fn list_tasks(&self, owner: &str, active: Option<bool>) -> Result<Vec<Task>> {
        Ok(self.lock().list_tasks(owner, active))
    }

    fn set_task_active(&self, owner: &str, task_id: &str, active: bool) -> Result<Option<Task>> {
        Ok(self.lock().set_task_active(owner, task_id, active))
    }
}

impl CompletionLog for MemoryStore {
    fn find_completion(&self, key: &CompletionKey) -> Result<Option<CompletionRecord>> {
        Ok(self.lock().find_completion(key).cloned())
    }

    fn completions_for_owner(
        &self,
        owner: &str,
        range: DayRange,
    ) -> Result<Vec<CompletionRecord>> {
        Ok(self.lock().completions_for_owner(owner, range))
    }

    fn completions_for_task(
        &self,
        task_id: &str,
        range: DayRange,
    ) -> Result<Vec<CompletionRecord>> {
        Ok(self.lock().completions_for_task(task_id, range))
    }

    fn upsert_completion<F>(&self, key: &CompletionKey, apply: F) -> Result<CompletionRecord>
    where
        F: FnOnce(Option<&CompletionRecord>) -> bool,
    {
        Ok(self.lock().upsert_completion(key, apply))
    }

    fn delete_completions_for_task(&self, task_id: &str) -> Result<usize> {
        Ok(self.lock().delete_completions_for_task(task_id))
    }
}

impl HabitStore for MemoryStore {
    fn purge_task(&self, owner: &str, task_id: &str) -> Result<Option<usize>> {
        Ok(self.lock().purge_task(owner, task_id))
    }

    fn replace_owner(
        &self,
        owner: &str,
        tasks: Vec<Task>,
        completions: Vec<CompletionRecord>,
    ) -> Result<usize> {
        let mut state = self.lock();
        let mut next = state.clone();
        let purged = next.replace_owner(owner, tasks, completions)?;
        *state = next;
        Ok(purged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 4, d).unwrap()
    }

    fn task(owner: &str, id: &str, minute: u32) -> Task {
        Task {
            id: id.to_string(),
            owner: owner.to_string(),
            title: format!("task {id}"),
            active: true,
            created_at: Utc.with_ymd_and_hms(2024, 4, 1, 8, minute, 0).unwrap(),
        }
    }

    #[test]
    fn find_task_is_owner_scoped() {
        let store = MemoryStore::new();
        store.insert_task(task("alice", "t1", 0)).unwrap();

        assert!(store.find_task("alice", "t1").unwrap().is_some());
        assert!(store.find_task("bob", "t1").unwrap().is_none());
        assert!(store.find_task("alice", "t2").unwrap().is_none());
    }

    #[test]
    fn duplicate_task_id_rejected() {
        let store = MemoryStore::new();
        store.insert_task(task("alice", "t1", 0)).unwrap();
        let err = store.insert_task(task("alice", "t1", 1)).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn list_tasks_newest_first_with_active_filter() {
        let store = MemoryStore::new();
        store.insert_task(task("alice", "t1", 0)).unwrap();
        store.insert_task(task("alice", "t2", 5)).unwrap();
        store.insert_task(task("bob", "t3", 9)).unwrap();
        store.set_task_active("alice", "t1", false).unwrap();

        let all: Vec<String> = store
            .list_tasks("alice", None)
            .unwrap()
            .into_iter()
            .map(|task| task.id)
            .collect();
        assert_eq!(all, vec!["t2".to_string(), "t1".to_string()]);

        let active = store.list_tasks("alice", Some(true)).unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, "t2");
    }

    #[test]
    fn upsert_updates_in_place() {
        let store = MemoryStore::new();
        let key = CompletionKey::new("alice", "t1", day(3));

        let created = store.upsert_completion(&key, |existing| {
            assert!(existing.is_none());
            true
        });
        assert!(created.unwrap().completed);

        let flipped = store
            .upsert_completion(&key, |existing| !existing.map_or(false, |r| r.completed))
            .unwrap();
        assert!(!flipped.completed);
        assert_eq!(store.snapshot().completions.len(), 1);
    }

    #[test]
    fn range_queries_filter_and_sort() {
        let store = MemoryStore::new();
        for (task_id, d) in [("t2", 5), ("t1", 3), ("t1", 9), ("t1", 5)] {
            store
                .upsert_completion(&CompletionKey::new("alice", task_id, day(d)), |_| true)
                .unwrap();
        }
        store
            .upsert_completion(&CompletionKey::new("bob", "t9", day(5)), |_| true)
            .unwrap();

        let owner = store
            .completions_for_owner("alice", DayRange::between(day(4), day(9)))
            .unwrap();
        let keys: Vec<(NaiveDate, &str)> = owner
            .iter()
            .map(|record| (record.day, record.task_id.as_str()))
            .collect();
        assert_eq!(keys, vec![(day(5), "t1"), (day(5), "t2"), (day(9), "t1")]);

        let by_task = store.completions_for_task("t1", DayRange::all()).unwrap();
        let days: Vec<NaiveDate> = by_task.iter().map(|record| record.day).collect();
        assert_eq!(days, vec![day(3), day(5), day(9)]);
    }

    #[test]
    fn purge_removes_task_and_history() {
        let store = MemoryStore::new();
        store.insert_task(task("alice", "t1", 0)).unwrap();
        store.insert_task(task("alice", "t2", 1)).unwrap();
        for d in 1..=4 {
            store
                .upsert_completion(&CompletionKey::new("alice", "t1", day(d)), |_| true)
                .unwrap();
        }
        store
            .upsert_completion(&CompletionKey::new("alice", "t2", day(1)), |_| true)
            .unwrap();

        assert_eq!(store.purge_task("bob", "t1").unwrap(), None);
        assert_eq!(store.purge_task("alice", "t1").unwrap(), Some(4));

        let state = store.snapshot();
        assert_eq!(state.tasks.len(), 1);
        assert_eq!(state.completions.len(), 1);
        assert_eq!(state.completions[0].task_id, "t2");
    }

    #[test]
    fn replace_owner_swaps_only_that_owner() {
        let store = MemoryStore::new();
        store.insert_task(task("alice", "t1", 0)).unwrap();
        store.insert_task(task("bob", "t9", 0)).unwrap();
        for (owner, task_id) in [("alice", "t1"), ("bob", "t9")] {
            store
                .upsert_completion(&CompletionKey::new(owner, task_id, day(1)), |_| true)
                .unwrap();
        }
        let record = CompletionRecord::new(CompletionKey::new("alice", "t2", day(2)), true);

        let purged = store
            .replace_owner("alice", vec![task("alice", "t2", 1)], vec![record.clone(), record])
            .unwrap();
        assert_eq!(purged, 1);

        let state = store.snapshot();
        let ids: Vec<&str> = state.tasks.iter().map(|task| task.id.as_str()).collect();
        assert_eq!(ids, vec!["t9", "t2"]);
        let keys: Vec<(&str, NaiveDate)> = state
            .completions
            .iter()
            .map(|record| (record.task_id.as_str(), record.day))
            .collect();
        assert_eq!(keys, vec![("t9", day(1)), ("t2", day(2))]);
    }

    #[test]
    fn replace_owner_is_all_or_nothing() {
        let store = MemoryStore::new();
        store.insert_task(task("alice", "t1", 0)).unwrap();
        store.insert_task(task("bob", "t9", 0)).unwrap();
        store
            .upsert_completion(&CompletionKey::new("alice", "t1", day(1)), |_| true)
            .unwrap();
        let before = store.snapshot();

        // t9 collides with bob's task, so the whole replacement is rejected
        let err = store
            .replace_owner(
                "alice",
                vec![task("alice", "t2", 1), task("alice", "t9", 2)],
                Vec::new(),
            )
            .unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
        assert_eq!(store.snapshot(), before);
    }

    #[test]
    fn validate_rejects_duplicate_keys() {
        let key = CompletionKey::new("alice", "t1", day(1));
        let state = StoreState {
            tasks: Vec::new(),
            completions: vec![
                CompletionRecord::new(key.clone(), true),
                CompletionRecord::new(key, false),
            ],
        };
        assert!(matches!(
            MemoryStore::from_state(state),
            Err(Error::CorruptStore(_))
        ));
    }
}
