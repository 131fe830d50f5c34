//! Habit commands: add, list, today, done and rm.

use chrono::Utc;
use serde::Serialize;

use super::Context;
use crate::day;
use crate::error::Result;
use crate::lifecycle::{self, DeleteMode};
use crate::output::{emit_success, HumanOutput};
use crate::task::Task;
use crate::toggle;

/// Options for `habit add`
pub struct AddOptions {
    pub title: String,
}

/// Options for `habit list`
pub struct ListOptions {
    pub all: bool,
}

/// Options for `habit done`
pub struct DoneOptions {
    pub task: String,
    pub date: Option<String>,
}

/// Options for `habit rm`
pub struct RmOptions {
    pub task: String,
    pub purge: bool,
}

#[derive(Serialize)]
struct TaskListReport {
    tasks: Vec<Task>,
    total: usize,
}

pub fn run_add(ctx: &Context, options: AddOptions) -> Result<()> {
    let task = lifecycle::create_task(&ctx.storage, &ctx.owner, &options.title, Utc::now())?;

    let mut human = HumanOutput::new(format!("habit add: {}", task.title));
    human.push_summary("id", task.id.clone());
    human.push_summary("owner", task.owner.clone());
    human.push_next_step(format!("habit done {}", task.id));

    emit_success(ctx.output, "add", &task, Some(&human))
}

pub fn run_list(ctx: &Context, options: ListOptions) -> Result<()> {
    let tasks = lifecycle::list_tasks(&ctx.storage, &ctx.owner, options.all)?;

    let mut human = HumanOutput::new(format!("habit list: {} habit(s)", tasks.len()));
    for task in &tasks {
        let mut line = format!("{}  {}", task.id, task.title);
        if !task.active {
            line.push_str("  (deleted)");
        }
        if ctx.verbose {
            line.push_str(&format!("  created {}", task.created_at.to_rfc3339()));
        }
        human.push_detail(line);
    }
    if tasks.is_empty() {
        human.push_next_step("habit add \"<habit>\"");
    }

    let report = TaskListReport {
        total: tasks.len(),
        tasks,
    };
    emit_success(ctx.output, "list", &report, Some(&human))
}

pub fn run_today(ctx: &Context) -> Result<()> {
    let view = lifecycle::todays_tasks(&ctx.storage, &ctx.owner, ctx.today)?;

    let mut human = HumanOutput::new(format!(
        "habit today: {} ({}/{} done, {}%)",
        view.date, view.progress.completed, view.progress.total, view.progress.percentage
    ));
    for entry in &view.tasks {
        let mark = if entry.completed { "[x]" } else { "[ ]" };
        human.push_detail(format!("{mark} {}  {}", entry.task.id, entry.task.title));
    }

    emit_success(ctx.output, "today", &view, Some(&human))
}

pub fn run_done(ctx: &Context, options: DoneOptions) -> Result<()> {
    let date = match options.date.as_deref() {
        Some(raw) => day::parse_day(raw)?,
        None => ctx.today,
    };
    let task_id = lifecycle::resolve_task_id(&ctx.storage, &ctx.owner, &options.task)?;
    let outcome = toggle::toggle_completion(&ctx.storage, &ctx.owner, &task_id, date)?;

    let state = if outcome.completed { "done" } else { "not done" };
    let mut human = HumanOutput::new(format!("habit done: {} marked {state}", outcome.date));
    human.push_summary("task", outcome.task_id.clone());

    emit_success(ctx.output, "done", &outcome, Some(&human))
}

pub fn run_rm(ctx: &Context, options: RmOptions) -> Result<()> {
    let task_id = lifecycle::resolve_task_id(&ctx.storage, &ctx.owner, &options.task)?;
    let mode = if options.purge {
        DeleteMode::Hard
    } else {
        DeleteMode::Soft
    };
    let outcome = lifecycle::delete_task(&ctx.storage, &ctx.owner, &task_id, mode)?;

    let header = if outcome.purged {
        format!(
            "habit rm: purged {} ({} record(s) removed)",
            outcome.task_id, outcome.removed_completions
        )
    } else {
        format!("habit rm: deleted {} (history kept)", outcome.task_id)
    };
    let human = HumanOutput::new(header);

    emit_success(ctx.output, "rm", &outcome, Some(&human))
}
