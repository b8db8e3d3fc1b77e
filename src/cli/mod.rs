use anyhow::Result;

pub mod args;
pub mod commands;
mod exit_status;
pub mod logger;
pub mod report;
mod run;

pub use args::{Arguments, Command};
pub use exit_status::ExitStatus;

pub fn run_cli(args: Arguments) -> Result<ExitStatus> {
    let Some(args) = args.with_command_or_help() else {
        return Ok(ExitStatus::Success);
    };

    let global = args.global.clone();
    logger::init_logger(global.verbose, global.quiet, global.no_color);
    if global.no_color {
        colored::control::set_override(false);
    }

    let result = run::run(args)?;
    report::print(&result, global.verbose);

    if result.error_count > 0 {
        Ok(ExitStatus::Failure)
    } else {
        Ok(ExitStatus::Success)
    }
}
