//! Issue types for recovered problems.
//!
//! Nothing in the extraction core aborts a run on a single bad file,
//! translator call or locale write. Each such failure is recorded as an
//! [`Issue`] and surfaced to the user by the reporter.

use enum_dispatch::enum_dispatch;

// ============================================================
// Severity and Rule
// ============================================================

/// Severity level of an issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// Rule identifier for each issue type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Rule {
    ParseError,
    ImportConflict,
    TranslatorFailure,
    TranslationMismatch,
    PersistenceFailure,
}

impl std::fmt::Display for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rule::ParseError => write!(f, "parse-error"),
            Rule::ImportConflict => write!(f, "import-conflict"),
            Rule::TranslatorFailure => write!(f, "translator-failure"),
            Rule::TranslationMismatch => write!(f, "translation-mismatch"),
            Rule::PersistenceFailure => write!(f, "persistence-failure"),
        }
    }
}

// ============================================================
// Location
// ============================================================

/// Where an issue should be pointed at when reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportLocation<'a> {
    /// A position inside a source file, with the offending line if known.
    Source {
        file_path: &'a str,
        line: usize,
        col: usize,
        source_line: Option<&'a str>,
    },
    /// A whole file (source or locale).
    File(&'a str),
    /// A target locale, not tied to a file.
    Locale(&'a str),
}

// ============================================================
// Issue Types
// ============================================================

/// A source file or template expression that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseErrorIssue {
    pub file_path: String,
    /// 1-based line; 0 when the position is unknown.
    pub line: usize,
    /// 1-based column; 0 when the position is unknown.
    pub col: usize,
    pub source_line: Option<String>,
    pub error: String,
}

impl ParseErrorIssue {
    pub fn severity() -> Severity {
        Severity::Error
    }

    pub fn rule() -> Rule {
        Rule::ParseError
    }
}

/// The translation function name is already bound in a file, so no import
/// was injected. Rewritten call sites in that file reference the existing
/// binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportConflictIssue {
    pub file_path: String,
    pub name: String,
    /// Human-readable description of the conflicting binding.
    pub binding: String,
}

impl ImportConflictIssue {
    pub fn severity() -> Severity {
        Severity::Warning
    }

    pub fn rule() -> Rule {
        Rule::ImportConflict
    }
}

/// A translator back-end call failed; its batch was left untranslated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslatorFailureIssue {
    pub translator: String,
    pub lang: String,
    pub error: String,
}

impl TranslatorFailureIssue {
    pub fn severity() -> Severity {
        Severity::Warning
    }

    pub fn rule() -> Rule {
        Rule::TranslatorFailure
    }
}

/// A batch came back with a different number of entries than was sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationMismatchIssue {
    pub lang: String,
    pub expected: usize,
    pub actual: usize,
}

impl TranslationMismatchIssue {
    pub fn severity() -> Severity {
        Severity::Warning
    }

    pub fn rule() -> Rule {
        Rule::TranslationMismatch
    }
}

/// A locale file could not be read back or written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistenceFailureIssue {
    pub path: String,
    pub lang: Option<String>,
    pub error: String,
}

impl PersistenceFailureIssue {
    pub fn severity() -> Severity {
        Severity::Error
    }

    pub fn rule() -> Rule {
        Rule::PersistenceFailure
    }
}

// ============================================================
// Issue Enum
// ============================================================

#[enum_dispatch(Report)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Issue {
    ParseError(ParseErrorIssue),
    ImportConflict(ImportConflictIssue),
    TranslatorFailure(TranslatorFailureIssue),
    TranslationMismatch(TranslationMismatchIssue),
    PersistenceFailure(PersistenceFailureIssue),
}

impl Issue {
    pub fn severity(&self) -> Severity {
        match self {
            Issue::ParseError(_) => ParseErrorIssue::severity(),
            Issue::ImportConflict(_) => ImportConflictIssue::severity(),
            Issue::TranslatorFailure(_) => TranslatorFailureIssue::severity(),
            Issue::TranslationMismatch(_) => TranslationMismatchIssue::severity(),
            Issue::PersistenceFailure(_) => PersistenceFailureIssue::severity(),
        }
    }

    pub fn rule(&self) -> Rule {
        match self {
            Issue::ParseError(_) => ParseErrorIssue::rule(),
            Issue::ImportConflict(_) => ImportConflictIssue::rule(),
            Issue::TranslatorFailure(_) => TranslatorFailureIssue::rule(),
            Issue::TranslationMismatch(_) => TranslationMismatchIssue::rule(),
            Issue::PersistenceFailure(_) => PersistenceFailureIssue::rule(),
        }
    }
}

// ============================================================
// Report Trait
// ============================================================

/// Uniform reporting interface, dispatched over [`Issue`] with `enum_dispatch`.
#[enum_dispatch]
pub trait Report {
    fn location(&self) -> ReportLocation<'_>;

    fn message(&self) -> String;

    fn report_severity(&self) -> Severity;

    fn report_rule(&self) -> Rule;

    /// Optional details for the "= note:" line.
    fn details(&self) -> Option<String> {
        None
    }
}

impl Report for ParseErrorIssue {
    fn location(&self) -> ReportLocation<'_> {
        if self.line == 0 {
            return ReportLocation::File(&self.file_path);
        }
        ReportLocation::Source {
            file_path: &self.file_path,
            line: self.line,
            col: self.col,
            source_line: self.source_line.as_deref(),
        }
    }

    fn message(&self) -> String {
        self.error.clone()
    }

    fn report_severity(&self) -> Severity {
        Self::severity()
    }

    fn report_rule(&self) -> Rule {
        Self::rule()
    }

    fn details(&self) -> Option<String> {
        Some("file left unchanged".to_string())
    }
}

impl Report for ImportConflictIssue {
    fn location(&self) -> ReportLocation<'_> {
        ReportLocation::File(&self.file_path)
    }

    fn message(&self) -> String {
        format!("`{}` is already bound, import not added", self.name)
    }

    fn report_severity(&self) -> Severity {
        Self::severity()
    }

    fn report_rule(&self) -> Rule {
        Self::rule()
    }

    fn details(&self) -> Option<String> {
        Some(self.binding.clone())
    }
}

impl Report for TranslatorFailureIssue {
    fn location(&self) -> ReportLocation<'_> {
        ReportLocation::Locale(&self.lang)
    }

    fn message(&self) -> String {
        format!("{} translator failed", self.translator)
    }

    fn report_severity(&self) -> Severity {
        Self::severity()
    }

    fn report_rule(&self) -> Rule {
        Self::rule()
    }

    fn details(&self) -> Option<String> {
        Some(self.error.clone())
    }
}

impl Report for TranslationMismatchIssue {
    fn location(&self) -> ReportLocation<'_> {
        ReportLocation::Locale(&self.lang)
    }

    fn message(&self) -> String {
        format!(
            "expected {} translations, received {}",
            self.expected, self.actual
        )
    }

    fn report_severity(&self) -> Severity {
        Self::severity()
    }

    fn report_rule(&self) -> Rule {
        Self::rule()
    }
}

impl Report for PersistenceFailureIssue {
    fn location(&self) -> ReportLocation<'_> {
        ReportLocation::File(&self.path)
    }

    fn message(&self) -> String {
        match &self.lang {
            Some(lang) => format!("failed to persist locale '{}'", lang),
            None => "failed to persist file".to_string(),
        }
    }

    fn report_severity(&self) -> Severity {
        Self::severity()
    }

    fn report_rule(&self) -> Rule {
        Self::rule()
    }

    fn details(&self) -> Option<String> {
        Some(self.error.clone())
    }
}
