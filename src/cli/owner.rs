//! habit owner command implementation
//!
//! Provides owner identity helpers (set/show).

use std::path::PathBuf;

use serde::Serialize;

use super::Context;
use crate::account;
use crate::error::Result;
use crate::output::{emit_success, HumanOutput};

/// Options for `habit owner set`
pub struct SetOptions {
    pub name: String,
}

#[derive(Serialize)]
struct OwnerSetReport {
    owner: String,
    path: PathBuf,
}

#[derive(Serialize)]
struct OwnerShowReport {
    owner: String,
}

pub fn run_set(ctx: &Context, options: SetOptions) -> Result<()> {
    let owner = account::persist_owner(ctx.storage.data_dir(), &options.name)?;
    let owner_path = ctx.storage.owner_file();

    let report = OwnerSetReport {
        owner: owner.clone(),
        path: owner_path.clone(),
    };

    let mut human = HumanOutput::new(format!("habit owner set: {owner}"));
    human.push_summary("owner", owner);
    human.push_summary("path", owner_path.display().to_string());
    human.push_next_step("habit today");

    emit_success(ctx.output, "owner set", &report, Some(&human))
}

pub fn run_show(ctx: &Context) -> Result<()> {
    let report = OwnerShowReport {
        owner: ctx.owner.clone(),
    };
    let human = HumanOutput::new(format!("habit owner: {}", ctx.owner));

    emit_success(ctx.output, "owner show", &report, Some(&human))
}
