//! Per-run extraction engine.
//!
//! Bundles the immutable options with the pluggable strategies (text
//! classifier, key generator) and dispatches each file to the script
//! rewriter or the Vue markup adapter.

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use tracing::{debug, warn};

use super::aggregate::I18nMap;
use super::classify::{LanguageClassifier, SharedClassifier};
use super::exclusion::ExclusionResolver;
use super::key::{HashKeyGenerator, SharedKeyGenerator};
use super::markup;
use super::parsers::script::{ScriptLang, ScriptParseError};
use super::patch::Patcher;
use super::rewrite::{self, TranslatableUnit};
use crate::config::ExtractionOptions;
use crate::issues::{Issue, ParseErrorIssue};
use crate::utils::line_col;

const SFC_EXTENSIONS: &[&str] = &["vue", "nvue", "uvue"];

/// Result of processing one file.
#[derive(Debug, Default)]
pub struct FileOutcome {
    /// Rewritten source, `None` when nothing changed.
    pub code: Option<String>,
    /// Keys found in this file.
    pub map: I18nMap,
    pub units: Vec<TranslatableUnit>,
    pub issues: Vec<Issue>,
}

impl FileOutcome {
    pub fn changed(&self) -> bool {
        self.code.is_some()
    }
}

pub struct Engine {
    options: Arc<ExtractionOptions>,
    classifier: SharedClassifier,
    key_generator: SharedKeyGenerator,
    exclusion: ExclusionResolver,
    known_keys: I18nMap,
    emit_code: bool,
}

impl Engine {
    /// Build an engine with the built-in strategies configured from `options`.
    pub fn new(options: ExtractionOptions) -> Result<Self> {
        let classifier = LanguageClassifier::with_patterns(&options.lang_patterns)?;
        let key_generator = HashKeyGenerator::new(options.key_length);
        let exclusion =
            ExclusionResolver::new(options.excluded_call.iter().cloned(), &options.translate_key);
        let emit_code = options.rewrite;
        Ok(Self {
            options: Arc::new(options),
            classifier: Arc::new(classifier),
            key_generator: Arc::new(key_generator),
            exclusion,
            known_keys: I18nMap::new(),
            emit_code,
        })
    }

    pub fn with_classifier(mut self, classifier: SharedClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn with_key_generator(mut self, key_generator: SharedKeyGenerator) -> Self {
        self.key_generator = key_generator;
        self
    }

    /// Keys already persisted for the source language. Translation calls whose
    /// argument is one of these keys are kept as-is and re-registered.
    pub fn with_known_keys(mut self, known_keys: I18nMap) -> Self {
        self.known_keys = known_keys;
        self
    }

    /// Return rewritten code even when `rewrite` is off. Host builds
    /// transform the code they are handed without touching files on disk.
    pub fn with_code_output(mut self, emit_code: bool) -> Self {
        self.emit_code = emit_code;
        self
    }

    pub fn options(&self) -> &ExtractionOptions {
        &self.options
    }

    pub fn exclusion(&self) -> &ExclusionResolver {
        &self.exclusion
    }

    pub fn should_extract(&self, text: &str) -> bool {
        !text.is_empty() && self.classifier.should_extract(text, &self.options.from_lang)
    }

    /// The map key for `text`.
    pub fn key_for(&self, text: &str) -> String {
        if self.options.keep_raw {
            text.to_string()
        } else {
            self.key_generator.generate(text)
        }
    }

    /// Source text recorded for an existing key.
    pub fn known_text(&self, key: &str) -> Option<&str> {
        self.known_keys.get(key).map(String::as_str)
    }

    fn finish(
        &self,
        original: &str,
        patcher: Patcher,
        map: I18nMap,
        units: Vec<TranslatableUnit>,
        issues: Vec<Issue>,
    ) -> FileOutcome {
        let code = if self.emit_code && !patcher.is_empty() {
            Some(patcher.apply(original)).filter(|rewritten| rewritten != original)
        } else {
            None
        };
        debug!(keys = map.len(), changed = code.is_some(), "file processed");
        FileOutcome {
            code,
            map,
            units,
            issues,
        }
    }

    pub fn is_sfc(path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| SFC_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
    }

    /// Extract and rewrite one file.
    ///
    /// Never fails: parse errors are reported as issues and leave the file
    /// unchanged. Without `rewrite` the keys are collected and the source is
    /// left as is.
    pub fn transform_file(&self, code: &str, path: &Path) -> FileOutcome {
        let file_path = path.display().to_string();

        if Self::is_sfc(path) {
            return match markup::rewrite_sfc(self, code, &file_path) {
                Ok(result) => {
                    self.finish(code, result.patcher, result.map, result.units, result.issues)
                }
                Err(err) => {
                    warn!(file = %file_path, "{}", err);
                    FileOutcome {
                        issues: vec![parse_issue(&file_path, code, err.position(), err.to_string())],
                        ..Default::default()
                    }
                }
            };
        }

        match rewrite::rewrite_script(self, code, &file_path, ScriptLang::from_path(path)) {
            Ok(result) => {
                let issues = result
                    .conflicts
                    .into_iter()
                    .map(Issue::ImportConflict)
                    .collect();
                self.finish(code, result.patcher, result.map, result.units, issues)
            }
            Err(err) => {
                warn!(file = %file_path, "{}", err);
                FileOutcome {
                    issues: vec![script_parse_issue(&file_path, code, &err, 0)],
                    ..Default::default()
                }
            }
        }
    }
}

/// Parse issue for an error in a script that starts at `block_offset` in `code`.
pub(crate) fn script_parse_issue(
    file_path: &str,
    code: &str,
    err: &ScriptParseError,
    block_offset: usize,
) -> Issue {
    parse_issue(
        file_path,
        code,
        Some(block_offset + err.offset),
        err.message.clone(),
    )
}

fn parse_issue(file_path: &str, code: &str, offset: Option<usize>, error: String) -> Issue {
    let (line, col, source_line) = match offset {
        Some(offset) => {
            let (line, col, text) = line_col(code, offset);
            (line, col, Some(text.to_string()))
        }
        None => (0, 0, None),
    };
    Issue::ParseError(ParseErrorIssue {
        file_path: file_path.to_string(),
        line,
        col,
        source_line,
        error,
    })
}
