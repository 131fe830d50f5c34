//! habit seed command implementation

use chrono::Utc;
use serde::Serialize;

use super::Context;
use crate::error::Result;
use crate::output::{emit_success, HumanOutput};
use crate::seed::{self, SeedReport};

/// Options for `habit seed`
pub struct SeedOptions {
    pub days: u32,
    pub seed: Option<u64>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SeedCommandReport {
    #[serde(flatten)]
    report: SeedReport,
    rng_seed: u64,
}

pub fn run(ctx: &Context, options: SeedOptions) -> Result<()> {
    let rng_seed = options.seed.unwrap_or_else(rand::random);
    let report = seed::seed(
        &ctx.storage,
        &ctx.owner,
        ctx.today,
        Utc::now(),
        options.days,
        rng_seed,
    )?;

    let mut human = HumanOutput::new(format!("habit seed: demo data for {}", report.owner));
    human.push_summary("habits", report.tasks.to_string());
    human.push_summary("completions", report.completions.to_string());
    human.push_summary("days", report.days.to_string());
    human.push_summary("seed", rng_seed.to_string());
    if report.removed_tasks > 0 {
        human.push_warning(format!("removed {} existing habit(s)", report.removed_tasks));
    }
    human.push_next_step("habit stats");

    let data = SeedCommandReport { report, rng_seed };
    emit_success(ctx.output, "seed", &data, Some(&human))
}
