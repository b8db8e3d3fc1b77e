use std::path::PathBuf;

use crate::core::store::PrunedLocale;
use crate::core::translate::TranslatedLocale;
use crate::issues::Issue;

#[derive(Debug)]
pub enum CommandSummary {
    Extract(ExtractSummary),
    Translate(TranslateSummary),
    Clean(CleanSummary),
    Init(InitSummary),
}

#[derive(Debug)]
pub struct ExtractSummary {
    pub files_scanned: usize,
    pub files_skipped: usize,
    pub key_count: usize,
    /// Rewritten files, relative to the project root.
    pub changed_files: Vec<PathBuf>,
    pub is_rewrite: bool,
    /// Source locale file, relative to the project root.
    pub source_path: PathBuf,
    /// Whether the source locale file changed; `None` if writing it failed.
    pub source_changed: Option<bool>,
    pub translate: Option<TranslateSummary>,
    pub clean: Option<CleanSummary>,
}

#[derive(Debug)]
pub struct TranslateSummary {
    pub translated: Vec<TranslatedLocale>,
    pub up_to_date: Vec<String>,
}

#[derive(Debug)]
pub struct CleanSummary {
    pub pruned: Vec<PrunedLocale>,
}

#[derive(Debug)]
pub struct InitSummary {
    pub path: PathBuf,
    /// Set when the file could not be created.
    pub error: Option<String>,
}

/// Result of running a command.
pub struct CommandResult {
    pub summary: CommandSummary,
    /// Problems recovered from during the run.
    pub issues: Vec<Issue>,
    pub error_count: usize,
    pub warning_count: usize,
}
