//! Locale file persistence.
//!
//! Every locale is a flat JSON object `{ "<hash>": "<text>" }` written with
//! 2-space indentation and a trailing newline.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow, bail};
use serde_json::Value;
use tracing::{debug, warn};

use super::aggregate::I18nMap;
use crate::config::ExtractionOptions;
use crate::issues::{Issue, PersistenceFailureIssue};

/// Outcome of persisting the source-language map.
#[derive(Debug, Clone, PartialEq)]
pub struct WriteResult {
    /// Whether the computed map differs from what was on disk.
    pub has_diff: bool,
    /// The map as written.
    pub data: I18nMap,
}

/// Read a locale file.
pub fn read_locale(path: &Path) -> Result<I18nMap> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;
    if content.trim().is_empty() {
        return Ok(I18nMap::new());
    }
    let value: Value = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse JSON: {}", path.display()))?;
    let Value::Object(object) = value else {
        bail!("Root of JSON file must be an object: {}", path.display());
    };
    Ok(object
        .into_iter()
        .filter_map(|(key, value)| match value {
            Value::String(text) => Some((key, text)),
            other => {
                debug!(key = %key, "skipping non-string locale value: {}", other);
                None
            }
        })
        .collect())
}

/// Read a locale file, falling back to an empty map when it is missing or
/// unreadable.
pub fn read_locale_or_default(path: &Path) -> I18nMap {
    if !path.exists() {
        return I18nMap::new();
    }
    read_locale(path).unwrap_or_else(|err| {
        warn!("{:#}", err);
        I18nMap::new()
    })
}

pub fn write_locale(path: &Path, map: &I18nMap) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let content = serde_json::to_string_pretty(map).context("Failed to serialize JSON")?;

    fs::write(path, format!("{}\n", content))
        .with_context(|| format!("Failed to write file: {}", path.display()))?;

    Ok(())
}

/// Merge `map` into the persisted source-language record at `path`.
///
/// In rewrite mode the merge is purely additive, so keys from files that are
/// already rewritten (and no longer contain raw text) survive. Otherwise the
/// old record is first pruned to the keys still present in `map`.
pub fn write_source_locale(map: &I18nMap, path: &Path, rewrite: bool) -> Result<WriteResult> {
    let existed = path.exists();
    let old = read_locale_or_default(path);

    let mut data = if rewrite {
        old.clone()
    } else {
        prune_locale(map, &old)
    };
    data.extend(map.iter().map(|(k, v)| (k.clone(), v.clone())));

    let has_diff = data != old;
    if has_diff || !existed {
        write_locale(path, &data)?;
    }

    Ok(WriteResult { has_diff, data })
}

/// Subset of `target` whose keys still exist in `source`, in target order.
pub fn prune_locale(source: &I18nMap, target: &I18nMap) -> I18nMap {
    target
        .iter()
        .filter(|(key, _)| source.contains_key(*key))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}

/// Result of pruning one target locale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrunedLocale {
    pub lang: String,
    pub path: PathBuf,
    pub removed: usize,
}

#[derive(Debug, Default)]
pub struct CleanReport {
    pub pruned: Vec<PrunedLocale>,
    pub issues: Vec<Issue>,
}

impl CleanReport {
    pub fn removed_count(&self) -> usize {
        self.pruned.iter().map(|p| p.removed).sum()
    }
}

/// Drop keys absent from the source-language record from every target
/// locale file. Only files that change are rewritten.
///
/// A missing or unreadable source record leaves every target untouched and
/// is reported as a persistence failure.
pub fn clean_locales(options: &ExtractionOptions, root: &Path) -> CleanReport {
    let source_path = options.lang_json_path(root, &options.from_lang);
    let mut report = CleanReport::default();

    let loaded = if source_path.exists() {
        read_locale(&source_path)
    } else {
        Err(anyhow!("Source locale not found: {}", source_path.display()))
    };
    let source = match loaded {
        Ok(source) => source,
        Err(err) => {
            warn!(lang = %options.from_lang, "skipping clean: {:#}", err);
            report.issues.push(Issue::PersistenceFailure(PersistenceFailureIssue {
                path: source_path.display().to_string(),
                lang: Some(options.from_lang.clone()),
                error: format!("{:#}", err),
            }));
            return report;
        }
    };

    for lang in &options.translate_lang_keys {
        let path = options.lang_json_path(root, lang);
        if !path.exists() {
            continue;
        }
        let target = read_locale_or_default(&path);
        let pruned = prune_locale(&source, &target);
        let removed = target.len() - pruned.len();
        if removed == 0 {
            continue;
        }
        match write_locale(&path, &pruned) {
            Ok(()) => {
                debug!(lang = %lang, removed, "pruned locale");
                report.pruned.push(PrunedLocale {
                    lang: lang.clone(),
                    path,
                    removed,
                });
            }
            Err(err) => {
                warn!(lang = %lang, "{:#}", err);
                report.issues.push(Issue::PersistenceFailure(PersistenceFailureIssue {
                    path: path.display().to_string(),
                    lang: Some(lang.clone()),
                    error: format!("{:#}", err),
                }));
            }
        }
    }

    report
}
