//! File-backed habit store
//!
//! All state lives in one data directory:
//!
//! ```text
//! <data_dir>/
//!   habit.toml          # Configuration (optional)
//!   owner               # Persisted owner identity (optional)
//!   habits.json         # Tasks and completion log
//!   habits.json.lock    # Lock file guarding habits.json
//! ```
//!
//! Every mutation runs as load → mutate → validate → atomic write while
//! holding the lock, so a toggle, a hard delete or a demo reseed is either
//! fully persisted or not at all, and two writers can never both create a record for the
//! same (owner, task, day) key.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::completion::{CompletionKey, CompletionRecord};
use crate::day::DayRange;
use crate::error::{Error, Result};
use crate::lock::{self, FileLock, DEFAULT_LOCK_TIMEOUT_MS};
use crate::store::{CompletionLog, HabitStore, StoreState, TaskRegistry};
use crate::task::Task;

/// Store file name inside the data directory
pub const STORE_FILE: &str = "habits.json";

/// Config file name inside the data directory
pub const CONFIG_FILE: &str = "habit.toml";

/// Persisted owner identity file name
pub const OWNER_FILE: &str = "owner";

/// Current on-disk schema version
pub const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct StoredHabits {
    schema_version: u32,
    #[serde(flatten)]
    state: StoreState,
}

/// Storage manager for a habit data directory
#[derive(Debug, Clone)]
pub struct Storage {
    data_dir: PathBuf,
    lock_timeout_ms: u64,
}

impl Storage {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            lock_timeout_ms: DEFAULT_LOCK_TIMEOUT_MS,
        }
    }

    pub fn with_lock_timeout(mut self, timeout_ms: u64) -> Self {
        self.lock_timeout_ms = timeout_ms;
        self
    }

    /// Platform data directory used when none is given explicitly
    pub fn default_data_dir() -> Result<PathBuf> {
        directories::ProjectDirs::from("app", "habitrabbit", "habit")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .ok_or_else(|| {
                Error::InvalidConfig(
                    "could not determine a home directory; pass --data-dir".to_string(),
                )
            })
    }

    // =========================================================================
    // Path accessors
    // =========================================================================

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn store_file(&self) -> PathBuf {
        self.data_dir.join(STORE_FILE)
    }

    pub fn lock_file(&self) -> PathBuf {
        lock::lock_path_for(&self.store_file())
    }

    pub fn config_file(&self) -> PathBuf {
        self.data_dir.join(CONFIG_FILE)
    }

    pub fn owner_file(&self) -> PathBuf {
        self.data_dir.join(OWNER_FILE)
    }

    // =========================================================================
    // Initialization
    // =========================================================================

    /// Check if the store file exists
    pub fn is_initialized(&self) -> bool {
        self.store_file().exists()
    }

    /// Create the data directory and an empty store. Returns `false` when a
    /// store was already present (it is left untouched).
    pub fn init(&self) -> Result<bool> {
        fs::create_dir_all(&self.data_dir)?;
        let _lock = FileLock::acquire(self.lock_file(), self.lock_timeout_ms)?;
        if self.is_initialized() {
            return Ok(false);
        }
        self.write_state(&StoreState::default())?;
        tracing::info!(path = %self.store_file().display(), "initialized habit store");
        Ok(true)
    }

    // =========================================================================
    // Locked state access
    // =========================================================================

    /// Read the whole store while holding the lock
    pub fn load_state(&self) -> Result<StoreState> {
        self.read_with(|state| state.clone())
    }

    fn read_with<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&StoreState) -> T,
    {
        let _lock = FileLock::acquire(self.lock_file(), self.lock_timeout_ms)?;
        let state = self.read_state()?;
        Ok(f(&state))
    }

    fn update_state<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut StoreState) -> Result<T>,
    {
        let _lock = FileLock::acquire(self.lock_file(), self.lock_timeout_ms)?;

        let mut state = self.read_state()?;
        let result = f(&mut state)?;
        state.validate()?;
        self.write_state(&state)?;

        Ok(result)
    }

    /// Caller holds the lock.
    fn read_state(&self) -> Result<StoreState> {
        let path = self.store_file();
        if !path.exists() {
            return Ok(StoreState::default());
        }

        let content = fs::read_to_string(&path)?;
        let stored: StoredHabits = serde_json::from_str(&content)?;
        if !(1..=SCHEMA_VERSION).contains(&stored.schema_version) {
            return Err(Error::CorruptStore(format!(
                "unsupported schema_version {} in {}",
                stored.schema_version,
                path.display()
            )));
        }
        stored.state.validate()?;

        tracing::debug!(
            tasks = stored.state.tasks.len(),
            completions = stored.state.completions.len(),
            "loaded habit store"
        );
        Ok(stored.state)
    }

    /// Caller holds the lock.
    fn write_state(&self, state: &StoreState) -> Result<()> {
        let stored = StoredHabits {
            schema_version: SCHEMA_VERSION,
            state: state.clone(),
        };
        let json = serde_json::to_string_pretty(&stored)?;
        lock::write_atomic(self.store_file(), json.as_bytes())
    }
}

impl TaskRegistry for Storage {
    fn insert_task(&self, task: Task) -> Result<()> {
        self.update_state(|state| state.insert_task(task))
    }

    fn find_task(&self, owner: &str, task_id: &str) -> Result<Option<Task>> {
        self.read_with(|state| state.find_task(owner, task_id).cloned())
    }

    fn list_tasks(&self, owner: &str, active: Option<bool>) -> Result<Vec<Task>> {
        self.read_with(|state| state.list_tasks(owner, active))
    }

    fn set_task_active(&self, owner: &str, task_id: &str, active: bool) -> Result<Option<Task>> {
        self.update_state(|state| Ok(state.set_task_active(owner, task_id, active)))
    }
}

impl CompletionLog for Storage {
    fn find_completion(&self, key: &CompletionKey) -> Result<Option<CompletionRecord>> {
        self.read_with(|state| state.find_completion(key).cloned())
    }

    fn completions_for_owner(
        &self,
        owner: &str,
        range: DayRange,
    ) -> Result<Vec<CompletionRecord>> {
        self.read_with(|state| state.completions_for_owner(owner, range))
    }

    fn completions_for_task(
        &self,
        task_id: &str,
        range: DayRange,
    ) -> Result<Vec<CompletionRecord>> {
        self.read_with(|state| state.completions_for_task(task_id, range))
    }

    fn upsert_completion<F>(&self, key: &CompletionKey, apply: F) -> Result<CompletionRecord>
    where
        F: FnOnce(Option<&CompletionRecord>) -> bool,
    {
        self.update_state(|state| Ok(state.upsert_completion(key, apply)))
    }

    fn delete_completions_for_task(&self, task_id: &str) -> Result<usize> {
        self.update_state(|state| Ok(state.delete_completions_for_task(task_id)))
    }
}

impl HabitStore for Storage {
    fn purge_task(&self, owner: &str, task_id: &str) -> Result<Option<usize>> {
        self.update_state(|state| Ok(state.purge_task(owner, task_id)))
    }

    fn replace_owner(
        &self,
        owner: &str,
        tasks: Vec<Task>,
        completions: Vec<CompletionRecord>,
    ) -> Result<usize> {
        self.update_state(|state| state.replace_owner(owner, tasks, completions))
    }
}
