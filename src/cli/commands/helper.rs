use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::debug;

use super::super::args::{GlobalArgs, LocaleArgs};
use super::{CommandResult, CommandSummary};
use crate::config::{ExtractionOptions, load_config};
use crate::issues::{Issue, Severity};

/// The directory the config search starts from.
pub fn start_dir(global: &GlobalArgs) -> Result<PathBuf> {
    let dir = match &global.root {
        Some(root) => root.clone(),
        None => env::current_dir().context("Failed to get current directory")?,
    };
    dir.canonicalize()
        .with_context(|| format!("Failed to read project root: {}", dir.display()))
}

/// Load the configuration and apply command-line overrides.
///
/// Returns the options and the project root (the directory holding the
/// config file).
pub fn load_options(global: &GlobalArgs, locale: &LocaleArgs) -> Result<(ExtractionOptions, PathBuf)> {
    let loaded = load_config(&start_dir(global)?)?;
    let mut options = loaded.config;
    if !loaded.from_file {
        debug!("no config file found, using defaults");
    }

    if let Some(from_lang) = &locale.from_lang {
        options.from_lang = from_lang.clone();
    }
    if !locale.to.is_empty() {
        options.translate_lang_keys = locale.to.clone();
    }
    if let Some(output_path) = &locale.output_path {
        options.output_path = output_path.clone();
    }
    options.validate()?;

    Ok((options, loaded.root))
}

pub fn finish(summary: CommandSummary, issues: Vec<Issue>) -> CommandResult {
    let mut error_count = issues
        .iter()
        .filter(|i| i.severity() == Severity::Error)
        .count();
    let warning_count = issues.len() - error_count;

    if let CommandSummary::Init(ref summary) = summary
        && summary.error.is_some()
    {
        error_count += 1;
    }

    CommandResult {
        summary,
        issues,
        error_count,
        warning_count,
    }
}
