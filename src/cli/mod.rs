//! Command-line interface for habit
//!
//! This module defines the CLI structure using clap derive macros.
//! Each command group is implemented in its own submodule.

use std::path::PathBuf;

use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};

use crate::account;
use crate::config::Config;
use crate::day;
use crate::error::Result;
use crate::output::OutputOptions;
use crate::storage::Storage;

mod analytics;
mod init;
mod owner;
mod seed;
mod task;

/// habit - daily habit tracking
///
/// Track daily habits, toggle completions per day, and inspect progress,
/// per-habit heatmaps and streaks.
#[derive(Parser, Debug)]
#[command(name = "habit")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Data directory (defaults to the platform data directory)
    #[arg(long, global = true, env = "HABIT_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Owner whose habits are read and written
    #[arg(long, global = true, env = "HABIT_OWNER")]
    pub owner: Option<String>,

    /// Reference day (YYYY-MM-DD); defaults to the current UTC date
    #[arg(long, global = true, env = "HABIT_TODAY")]
    pub today: Option<String>,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the data directory, an empty store and a default config
    Init,

    /// Add a habit
    Add {
        /// Habit title (1-100 characters after trimming)
        title: String,
    },

    /// List habits, newest first
    List {
        /// Include deleted (inactive) habits
        #[arg(long)]
        all: bool,
    },

    /// Show today's habits with their completion state
    Today,

    /// Toggle a habit's completion for a day
    Done {
        /// Habit id or unique id prefix
        task: String,

        /// Day to toggle (YYYY-MM-DD); defaults to the reference day
        #[arg(long)]
        date: Option<String>,
    },

    /// Delete a habit (keeps its history unless --purge)
    Rm {
        /// Habit id or unique id prefix
        task: String,

        /// Also delete every completion record of the habit
        #[arg(long)]
        purge: bool,
    },

    /// Daily progress over a range
    Progress {
        /// Range: 7d, 30d or 6m (unrecognized values fall back to 7d)
        #[arg(long)]
        range: Option<String>,
    },

    /// Six-month completion heatmap of one habit
    Heatmap {
        /// Habit id or unique id prefix
        task: String,
    },

    /// Totals and current streak
    Stats,

    /// Owner identity management
    #[command(subcommand)]
    Owner(OwnerCommands),

    /// Replace the owner's habits with demo data
    Seed {
        /// Days of history to generate
        #[arg(long, default_value_t = crate::seed::DEFAULT_HISTORY_DAYS)]
        days: u32,

        /// RNG seed for reproducible history (random when omitted)
        #[arg(long)]
        seed: Option<u64>,
    },
}

/// Owner subcommands
#[derive(Subcommand, Debug)]
pub enum OwnerCommands {
    /// Persist the default owner for this data directory
    Set {
        /// Owner name
        name: String,
    },

    /// Show the owner commands run as
    Show,
}

/// Resolved global state shared by every command.
pub struct Context {
    pub storage: Storage,
    pub config: Config,
    pub owner: String,
    pub today: NaiveDate,
    pub output: OutputOptions,
    pub verbose: bool,
}

impl Context {
    fn resolve(
        data_dir: Option<PathBuf>,
        owner: Option<&str>,
        today: Option<&str>,
        output: OutputOptions,
        verbose: bool,
    ) -> Result<Self> {
        let data_dir = match data_dir {
            Some(dir) => dir,
            None => Storage::default_data_dir()?,
        };
        let config = Config::load_from_dir(&data_dir);
        let owner = account::resolve_owner(&data_dir, owner, &config)?;
        let today = match today {
            Some(raw) => day::parse_day(raw)?,
            None => day::utc_day(Utc::now()),
        };
        let storage = Storage::new(data_dir).with_lock_timeout(config.storage.lock_timeout_ms);

        tracing::debug!(
            data_dir = %storage.data_dir().display(),
            owner = %owner,
            today = %today,
            "resolved context"
        );
        Ok(Self {
            storage,
            config,
            owner,
            today,
            output,
            verbose,
        })
    }
}

impl Cli {
    /// Execute the CLI command
    pub fn run(self) -> Result<()> {
        let ctx = Context::resolve(
            self.data_dir,
            self.owner.as_deref(),
            self.today.as_deref(),
            OutputOptions {
                json: self.json,
                quiet: self.quiet,
            },
            self.verbose,
        )?;

        match self.command {
            Commands::Init => init::run(&ctx),
            Commands::Add { title } => task::run_add(&ctx, task::AddOptions { title }),
            Commands::List { all } => task::run_list(&ctx, task::ListOptions { all }),
            Commands::Today => task::run_today(&ctx),
            Commands::Done { task, date } => {
                task::run_done(&ctx, task::DoneOptions { task, date })
            }
            Commands::Rm { task, purge } => task::run_rm(&ctx, task::RmOptions { task, purge }),
            Commands::Progress { range } => {
                analytics::run_progress(&ctx, analytics::ProgressOptions { range })
            }
            Commands::Heatmap { task } => {
                analytics::run_heatmap(&ctx, analytics::HeatmapOptions { task })
            }
            Commands::Stats => analytics::run_stats(&ctx),
            Commands::Owner(cmd) => match cmd {
                OwnerCommands::Set { name } => owner::run_set(&ctx, owner::SetOptions { name }),
                OwnerCommands::Show => owner::run_show(&ctx),
            },
            Commands::Seed { days, seed } => seed::run(&ctx, seed::SeedOptions { days, seed }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "habit",
            "done",
            "01ab",
            "--date",
            "2024-05-01",
            "--json",
            "--today",
            "2024-05-02",
        ])
        .unwrap();
        assert!(cli.json);
        assert_eq!(cli.today.as_deref(), Some("2024-05-02"));
        assert!(matches!(
            cli.command,
            Commands::Done { ref task, date: Some(ref date) } if task == "01ab" && date == "2024-05-01"
        ));
    }

    #[test]
    fn seed_days_default() {
        let cli = Cli::try_parse_from(["habit", "seed"]).unwrap();
        assert!(matches!(cli.command, Commands::Seed { days: 90, seed: None }));
    }
}
