//! habit init command implementation
//!
//! Creates the data directory, an empty store and a default `habit.toml`.

use std::path::PathBuf;

use serde::Serialize;

use super::Context;
use crate::config::Config;
use crate::error::Result;
use crate::output::{emit_success, HumanOutput};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InitReport {
    data_dir: PathBuf,
    created: InitCreated,
}

#[derive(Serialize)]
struct InitCreated {
    store: bool,
    config: bool,
}

pub fn run(ctx: &Context) -> Result<()> {
    let storage = &ctx.storage;
    let created_store = storage.init()?;

    let config_path = storage.config_file();
    let created_config = if config_path.exists() {
        false
    } else {
        Config::default().save(&config_path)?;
        true
    };

    let report = InitReport {
        data_dir: storage.data_dir().to_path_buf(),
        created: InitCreated {
            store: created_store,
            config: created_config,
        },
    };

    let mut created_items = Vec::new();
    if created_store {
        created_items.push(crate::storage::STORE_FILE);
    }
    if created_config {
        created_items.push(crate::storage::CONFIG_FILE);
    }

    let header = if created_items.is_empty() {
        "habit init: nothing to do".to_string()
    } else {
        "habit init: initialized data directory".to_string()
    };

    let mut human = HumanOutput::new(header);
    human.push_summary("data dir", storage.data_dir().display().to_string());
    human.push_summary(
        "created",
        if created_items.is_empty() {
            "none".to_string()
        } else {
            created_items.join(", ")
        },
    );
    human.push_next_step("habit owner set <name>");
    human.push_next_step("habit add \"<habit>\"");

    emit_success(ctx.output, "init", &report, Some(&human))
}
