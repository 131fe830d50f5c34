//! habit - Habit Tracking Library
//!
//! This library provides the core functionality for the habit CLI tool:
//! per-day completion tracking and the analytics derived from it.
//!
//! # Core Concepts
//!
//! - **Tasks**: Daily habits owned by one account; soft delete keeps history
//! - **Completion log**: At most one record per (owner, task, day)
//! - **Analytics**: Daily progress over 7d/30d/6m, per-task heatmaps, streaks
//!
//! # Module Organization
//!
//! - `analytics`: Progress series, heatmap series, stats and streak
//! - `toggle`: The completion toggle rule
//! - `lifecycle`: Task create/list/delete rules
//! - `store`: Store contracts and the in-memory store
//! - `storage`: File-backed store in the data directory
//! - `lock`: File locking and atomic writes for concurrency safety
//! - `account`: Owner identity resolution
//! - `config`: Configuration loading from `habit.toml`
//! - `seed`: Demo data generation
//! - `cli`: Command-line interface using clap
//! - `error`: Error types and result aliases

pub mod account;
pub mod analytics;
pub mod cli;
pub mod completion;
pub mod config;
pub mod day;
pub mod error;
pub mod lifecycle;
pub mod lock;
pub mod output;
pub mod range;
pub mod seed;
pub mod storage;
pub mod store;
pub mod task;
pub mod toggle;

pub use error::{Error, Result};
