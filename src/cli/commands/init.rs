use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};

use super::super::args::GlobalArgs;
use super::helper::{finish, start_dir};
use super::{CommandResult, CommandSummary, InitSummary};
use crate::config::{CONFIG_FILE_NAME, default_config_json};

pub fn init(global: &GlobalArgs) -> Result<CommandResult> {
    let path = start_dir(global)?.join(CONFIG_FILE_NAME);

    let error = if path.exists() {
        Some(format!("{} already exists", CONFIG_FILE_NAME))
    } else {
        fs::write(&path, format!("{}\n", default_config_json()?))
            .with_context(|| format!("Failed to write {}", path.display()))?;
        None
    };

    Ok(finish(
        CommandSummary::Init(InitSummary {
            path: PathBuf::from(CONFIG_FILE_NAME),
            error,
        }),
        Vec::new(),
    ))
}
