//! Source-language detection for candidate text.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use anyhow::{Context, Result};
use regex::Regex;

/// Language used when a configured source language has no registered matcher.
pub const FALLBACK_LANG: &str = "zh-cn";

const BUILTIN_PATTERNS: &[(&str, &str)] = &[
    ("zh-cn", r"[\x{4e00}-\x{9fff}]"),
    ("en", r"[a-zA-Z]"),
    ("ja", r"[\x{3040}-\x{309f}\x{30a0}-\x{30ff}\x{4e00}-\x{9fff}]"),
    ("ko", r"[\x{ac00}-\x{d7a3}]"),
    ("ru", r"[а-яёА-ЯЁ][а-яёА-ЯЁ .-]*"),
];

/// Decides whether a piece of text should be extracted for translation.
pub trait TextClassifier: Send + Sync {
    fn should_extract(&self, text: &str, source_lang: &str) -> bool;
}

/// Regex-per-language classifier.
///
/// Matchers can be registered at runtime; lookups for an unknown language use
/// the Chinese matcher.
#[derive(Debug)]
pub struct LanguageClassifier {
    patterns: RwLock<HashMap<String, Regex>>,
}

impl LanguageClassifier {
    pub fn new() -> Self {
        let patterns = BUILTIN_PATTERNS
            .iter()
            .filter_map(|(lang, pattern)| Regex::new(pattern).ok().map(|re| (lang.to_string(), re)))
            .collect();
        Self {
            patterns: RwLock::new(patterns),
        }
    }

    /// Register (or replace) the matcher for `lang`.
    pub fn register(&self, lang: &str, pattern: &str) -> Result<()> {
        let regex = Regex::new(pattern)
            .with_context(|| format!("Invalid language pattern for '{}': {}", lang, pattern))?;
        if let Ok(mut patterns) = self.patterns.write() {
            patterns.insert(lang.to_lowercase(), regex);
        }
        Ok(())
    }

    pub fn with_patterns<'a>(
        patterns: impl IntoIterator<Item = (&'a String, &'a String)>,
    ) -> Result<Self> {
        let classifier = Self::new();
        for (lang, pattern) in patterns {
            classifier.register(lang, pattern)?;
        }
        Ok(classifier)
    }

    pub fn has_matcher(&self, lang: &str) -> bool {
        self.patterns
            .read()
            .map(|patterns| patterns.contains_key(&lang.to_lowercase()))
            .unwrap_or(false)
    }
}

impl Default for LanguageClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl TextClassifier for LanguageClassifier {
    fn should_extract(&self, text: &str, source_lang: &str) -> bool {
        if text.trim().is_empty() {
            return false;
        }
        let Ok(patterns) = self.patterns.read() else {
            return false;
        };
        patterns
            .get(&source_lang.to_lowercase())
            .or_else(|| patterns.get(FALLBACK_LANG))
            .is_some_and(|re| re.is_match(text))
    }
}

/// Adapter for closure-based predicates.
pub struct FnClassifier<F>(pub F);

impl<F> TextClassifier for FnClassifier<F>
where
    F: Fn(&str, &str) -> bool + Send + Sync,
{
    fn should_extract(&self, text: &str, source_lang: &str) -> bool {
        (self.0)(text, source_lang)
    }
}

pub type SharedClassifier = Arc<dyn TextClassifier>;
