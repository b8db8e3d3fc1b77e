//! Command dispatch.
//!
//! Returns `Ok(CommandResult)` with issue counts, or `Err` when the command
//! could not run at all (bad config, missing source locale).

use anyhow::{Result, bail};

use super::{
    args::{Arguments, Command},
    commands::{
        CommandResult, clean::clean, extract::extract, init::init, translate::translate,
    },
};

pub fn run(Arguments { global, command }: Arguments) -> Result<CommandResult> {
    match command {
        Some(Command::Extract(cmd)) => extract(cmd, &global),
        Some(Command::Translate(cmd)) => translate(cmd, &global),
        Some(Command::Clean(cmd)) => clean(cmd, &global),
        Some(Command::Init) => init(&global),
        None => bail!("No command provided. Use --help to see available commands."),
    }
}
