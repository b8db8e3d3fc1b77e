//! The extraction run.
//!
//! Scan the project, transform every file in parallel, write rewritten
//! sources, persist the source locale, then translate and prune target
//! locales as configured.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{Context, Result, bail};
use rayon::prelude::*;
use tracing::{debug, info, warn};

use super::aggregate::{Aggregator, I18nMap};
use super::engine::Engine;
use super::file_scanner::scan_files;
use super::store::{CleanReport, WriteResult, clean_locales, read_locale_or_default, write_source_locale};
use super::translate::{Orchestrator, TranslateReport};
use crate::config::ExtractionOptions;
use crate::issues::{Issue, PersistenceFailureIssue};

#[derive(Debug, Default)]
pub struct ExtractReport {
    pub files_scanned: usize,
    /// Files that could not be read.
    pub files_skipped: usize,
    pub changed_files: Vec<PathBuf>,
    /// Keys collected in this run.
    pub key_count: usize,
    /// Texts left untouched because they contain substitutions.
    pub dynamic_texts: usize,
    pub source_path: PathBuf,
    /// `None` when the source locale could not be written.
    pub source: Option<WriteResult>,
    pub post: PostReport,
    pub issues: Vec<Issue>,
}

/// Translation and pruning that follow persistence.
#[derive(Debug, Default)]
pub struct PostReport {
    pub translate: Option<TranslateReport>,
    pub clean: Option<CleanReport>,
}

impl PostReport {
    pub fn take_issues(&mut self) -> Vec<Issue> {
        let mut issues = Vec::new();
        if let Some(translate) = &mut self.translate {
            issues.append(&mut translate.issues);
        }
        if let Some(clean) = &mut self.clean {
            issues.append(&mut clean.issues);
        }
        issues
    }
}

struct FileResult {
    path: PathBuf,
    map: I18nMap,
    changed: bool,
    skipped: bool,
    dynamic_texts: usize,
    issues: Vec<Issue>,
}

impl FileResult {
    fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            map: I18nMap::new(),
            changed: false,
            skipped: false,
            dynamic_texts: 0,
            issues: Vec::new(),
        }
    }
}

/// Run a full extraction over the project at `root`.
///
/// Only configuration problems are returned as errors; everything that goes
/// wrong with a single file or locale ends up in [`ExtractReport::issues`].
pub fn extract(options: &ExtractionOptions, root: &Path, verbose: bool) -> Result<ExtractReport> {
    let scan = scan_files(root, options, verbose);
    let source_path = options.lang_json_path(root, &options.from_lang);
    let engine = Engine::new(options.clone())?.with_known_keys(read_locale_or_default(&source_path));

    let results: Vec<FileResult> = scan
        .files
        .par_iter()
        .map(|path| process_file(&engine, root, path))
        .collect();

    // Merged in scan order so the locale file order is stable between runs.
    let aggregator = Aggregator::new();
    let mut report = ExtractReport {
        files_scanned: results.len(),
        files_skipped: scan.skipped_count,
        source_path,
        ..Default::default()
    };
    for result in results {
        aggregator.merge(result.map);
        report.issues.extend(result.issues);
        report.dynamic_texts += result.dynamic_texts;
        if result.skipped {
            report.files_skipped += 1;
        }
        if result.changed {
            report.changed_files.push(result.path);
        }
    }

    let map = aggregator.flush();
    report.key_count = map.len();
    info!(
        files = report.files_scanned,
        changed = report.changed_files.len(),
        keys = report.key_count,
        dynamic = report.dynamic_texts,
        "extraction finished"
    );

    match write_source_locale(&map, &report.source_path, options.rewrite) {
        Ok(written) => report.source = Some(written),
        Err(err) => {
            warn!("{:#}", err);
            report
                .issues
                .push(Issue::PersistenceFailure(PersistenceFailureIssue {
                    path: report.source_path.display().to_string(),
                    lang: Some(options.from_lang.clone()),
                    error: format!("{:#}", err),
                }));
        }
    }

    if options.auto_translate || options.clean_translate {
        let source = report.source.as_ref().map_or(&map, |written| &written.data);
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .context("Failed to start the async runtime")?;
        report.post = runtime.block_on(translate_and_clean(options, root, source))?;
    }

    Ok(report)
}

/// Translate missing entries from `source` (when `autoTranslate` is on), then
/// prune target locales (when `cleanTranslate` is on).
pub async fn translate_and_clean(
    options: &ExtractionOptions,
    root: &Path,
    source: &I18nMap,
) -> Result<PostReport> {
    let mut post = PostReport::default();
    if options.auto_translate {
        if source.is_empty() {
            info!("source locale is empty, nothing to translate");
        } else {
            let orchestrator = Orchestrator::from_options(options)?;
            post.translate = Some(orchestrator.translate_locales(source, options, root).await);
        }
    }
    if options.clean_translate {
        post.clean = Some(clean_locales(options, root));
    }
    Ok(post)
}

/// Translate the persisted source locale into every target locale.
pub fn translate(options: &ExtractionOptions, root: &Path) -> Result<TranslateReport> {
    let source_path = options.lang_json_path(root, &options.from_lang);
    if !source_path.exists() {
        bail!(
            "Source locale not found: {} (run `extract` first)",
            source_path.display()
        );
    }
    let source = read_locale_or_default(&source_path);
    let orchestrator = Orchestrator::from_options(options)?;
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start the async runtime")?;
    Ok(runtime.block_on(orchestrator.translate_locales(&source, options, root)))
}

fn process_file(engine: &Engine, root: &Path, path: &Path) -> FileResult {
    let relative = path.strip_prefix(root).unwrap_or(path);
    let mut result = FileResult::new(relative);

    let code = match fs::read_to_string(path) {
        Ok(code) => code,
        Err(err) => {
            warn!(file = %relative.display(), "Failed to read file: {}", err);
            result.skipped = true;
            return result;
        }
    };
    if code.trim().is_empty() {
        return result;
    }

    let outcome = engine.transform_file(&code, relative);
    debug!(file = %relative.display(), keys = outcome.map.len(), "transformed");
    for unit in outcome.units.iter().filter(|unit| unit.is_dynamic) {
        debug!(file = %relative.display(), kind = ?unit.source_kind, "dynamic text skipped: {}", unit.raw_text);
        result.dynamic_texts += 1;
    }
    result.map = outcome.map;
    result.issues = outcome.issues;

    if let Some(rewritten) = outcome.code {
        match fs::write(path, rewritten) {
            Ok(()) => {
                result.changed = true;
                if let Some(command) = &engine.options().format_command
                    && let Err(err) = run_formatter(command, path)
                {
                    warn!(file = %relative.display(), "{:#}", err);
                }
            }
            Err(err) => {
                warn!(file = %relative.display(), "Failed to write file: {}", err);
                result
                    .issues
                    .push(Issue::PersistenceFailure(PersistenceFailureIssue {
                        path: relative.display().to_string(),
                        lang: None,
                        error: err.to_string(),
                    }));
            }
        }
    }

    result
}

/// Run `command` with `path` appended.
fn run_formatter(command: &[String], path: &Path) -> Result<()> {
    let Some((program, args)) = command.split_first() else {
        return Ok(());
    };
    let status = Command::new(program)
        .args(args)
        .arg(path)
        .status()
        .with_context(|| format!("Failed to run formatter '{}'", program))?;
    if !status.success() {
        bail!("Formatter '{}' exited with {}", program, status);
    }
    Ok(())
}
