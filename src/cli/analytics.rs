//! Analytics commands: progress, heatmap and stats.

use super::Context;
use crate::analytics;
use crate::error::Result;
use crate::lifecycle;
use crate::output::{emit_success, HumanOutput};
use crate::range::ProgressRange;

/// Width of the bar drawn for a 100% day.
const BAR_WIDTH: usize = 20;

/// Options for `habit progress`
pub struct ProgressOptions {
    pub range: Option<String>,
}

/// Options for `habit heatmap`
pub struct HeatmapOptions {
    pub task: String,
}

pub fn run_progress(ctx: &Context, options: ProgressOptions) -> Result<()> {
    let mut warnings = Vec::new();
    let range = match options.range.as_deref() {
        Some(raw) => {
            let range = ProgressRange::parse_lenient(raw);
            if ProgressRange::from_label(raw).is_none() {
                warnings.push(format!("unrecognized range '{raw}', using {range}"));
            }
            range
        }
        None => ctx.config.analytics.range(),
    };

    let report = analytics::compute_daily_progress(&ctx.storage, &ctx.owner, range, ctx.today)?;

    let mut human = HumanOutput::new(format!("habit progress: last {range} to {}", ctx.today));
    for entry in &report.progress {
        human.push_detail(format!(
            "{}  {:>3}%  {}/{}  {}",
            entry.date,
            entry.percentage,
            entry.completed,
            entry.total,
            bar(entry.percentage)
        ));
    }
    for warning in warnings {
        human.push_warning(warning);
    }

    emit_success(ctx.output, "progress", &report, Some(&human))
}

pub fn run_heatmap(ctx: &Context, options: HeatmapOptions) -> Result<()> {
    let task_id = lifecycle::resolve_task_id(&ctx.storage, &ctx.owner, &options.task)?;
    let heatmap = analytics::compute_task_heatmap(&ctx.storage, &ctx.owner, &task_id, ctx.today)?;

    let done = heatmap.heatmap.iter().filter(|entry| entry.completed).count();
    let mut human = HumanOutput::new(format!("habit heatmap: {}", heatmap.task.title));
    human.push_summary("task", heatmap.task.id.clone());
    human.push_summary("recorded days", heatmap.heatmap.len().to_string());
    human.push_summary("completed days", done.to_string());
    if ctx.verbose {
        for entry in &heatmap.heatmap {
            let mark = if entry.completed { "x" } else { "." };
            human.push_detail(format!("{}  {mark}", entry.date));
        }
    }

    emit_success(ctx.output, "heatmap", &heatmap, Some(&human))
}

pub fn run_stats(ctx: &Context) -> Result<()> {
    let stats = analytics::compute_stats(&ctx.storage, &ctx.owner, ctx.today)?;

    let mut human = HumanOutput::new(format!("habit stats: {}", ctx.owner));
    human.push_summary("habits", stats.total_tasks.to_string());
    human.push_summary("completed today", stats.today_completions.to_string());
    human.push_summary("completed all time", stats.total_completions.to_string());
    human.push_summary("current streak", format!("{} day(s)", stats.current_streak));

    emit_success(ctx.output, "stats", &stats, Some(&human))
}

fn bar(percentage: u8) -> String {
    let filled = usize::from(percentage) * BAR_WIDTH / 100;
    format!("{}{}", "#".repeat(filled), ".".repeat(BAR_WIDTH - filled))
}
