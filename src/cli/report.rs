//! Report formatting and printing utilities.
//!
//! Issues are displayed in cargo-style format, followed by a summary of
//! what the command did. Kept separate from the core so the engine can be
//! used as a library.

use std::io::{self, Write};

use colored::Colorize;
use unicode_width::UnicodeWidthStr;

use super::commands::{
    CleanSummary, CommandResult, CommandSummary, ExtractSummary, InitSummary, TranslateSummary,
};
use crate::issues::{Issue, Report, ReportLocation, Severity};

/// Success mark for consistent output formatting.
pub const SUCCESS_MARK: &str = "\u{2713}"; // ✓

/// Failure mark for consistent output formatting.
pub const FAILURE_MARK: &str = "\u{2718}"; // ✘

/// Print issues in cargo-style format to stdout.
pub fn report(issues: &[Issue]) {
    report_to(issues, &mut io::stdout().lock());
}

/// Print issues to a custom writer.
///
/// Issues are sorted by location and followed by a problem count.
pub fn report_to<W: Write>(issues: &[Issue], writer: &mut W) {
    if issues.is_empty() {
        return;
    }

    let mut sorted = issues.to_vec();
    sorted.sort_by(compare_issues);

    let max_line_width = calculate_max_line_width(&sorted);

    for issue in &sorted {
        print_issue(issue, writer, max_line_width);
    }

    print_summary(&sorted, writer);
}

/// Print the issues and the command summary to stdout.
pub fn print(result: &CommandResult, verbose: bool) {
    let mut stdout = io::stdout().lock();
    report_to(&result.issues, &mut stdout);
    print_command_output(result, &mut stdout);

    if let CommandSummary::Extract(summary) = &result.summary {
        print_skipped_warning_to(summary.files_skipped, verbose, &mut io::stderr().lock());
    }
}

/// Print the command summary to a custom writer.
pub fn print_command_output<W: Write>(result: &CommandResult, writer: &mut W) {
    match &result.summary {
        CommandSummary::Extract(summary) => print_extract(summary, writer),
        CommandSummary::Translate(summary) => print_translate(summary, writer),
        CommandSummary::Clean(summary) => print_clean(summary, writer),
        CommandSummary::Init(summary) => print_init(summary, writer),
    }
}

/// Print a warning about paths that could not be read.
pub fn print_skipped_warning_to<W: Write>(count: usize, verbose: bool, writer: &mut W) {
    if count > 0 && !verbose {
        let _ = writeln!(
            writer,
            "{} {} path(s) could not be read (use {} for details)",
            "warning:".bold().yellow(),
            count,
            "-v".cyan()
        );
    }
}

// ============================================================
// Internal Functions
// ============================================================

fn print_issue<W: Write>(issue: &Issue, writer: &mut W, max_line_width: usize) {
    let severity = issue.report_severity();
    let severity_str = match severity {
        Severity::Error => "error".bold().red(),
        Severity::Warning => "warning".bold().yellow(),
    };

    let _ = writeln!(
        writer,
        "{}: \"{}\"  {}",
        severity_str,
        issue.message(),
        issue.report_rule().to_string().dimmed().cyan()
    );

    match issue.location() {
        ReportLocation::Source {
            file_path,
            line,
            col,
            source_line,
        } => {
            let _ = writeln!(writer, "  {} {}:{}:{}", "-->".blue(), file_path, line, col);
            if let Some(source_line) = source_line {
                print_source_line(writer, severity, source_line, line, col, max_line_width);
            }
        }
        ReportLocation::File(path) => {
            let _ = writeln!(writer, "  {} {}", "-->".blue(), path);
        }
        ReportLocation::Locale(lang) => {
            let _ = writeln!(writer, "  {} locale {}", "-->".blue(), lang);
        }
    }

    if let Some(details) = issue.details() {
        let _ = writeln!(
            writer,
            "{:>width$} {} {} {}",
            "",
            "=".blue(),
            "note:".bold(),
            details,
            width = max_line_width
        );
    }

    let _ = writeln!(writer);
}

fn print_source_line<W: Write>(
    writer: &mut W,
    severity: Severity,
    source_line: &str,
    line: usize,
    col: usize,
    max_line_width: usize,
) {
    let caret_char = match severity {
        Severity::Error => "^".red(),
        Severity::Warning => "^".yellow(),
    };

    let _ = writeln!(
        writer,
        "{:>width$} {}",
        "",
        "|".blue(),
        width = max_line_width
    );
    let _ = writeln!(
        writer,
        "{:>width$} {} {}",
        line.to_string().blue(),
        "|".blue(),
        source_line,
        width = max_line_width
    );

    // col is 1-based
    let prefix: String = source_line.chars().take(col.saturating_sub(1)).collect();
    let caret_padding = UnicodeWidthStr::width(prefix.as_str());
    let _ = writeln!(
        writer,
        "{:>width$} {} {:>padding$}{}",
        "",
        "|".blue(),
        "",
        caret_char,
        width = max_line_width,
        padding = caret_padding
    );
}

fn print_summary<W: Write>(issues: &[Issue], writer: &mut W) {
    let total_errors = issues
        .iter()
        .filter(|i| i.report_severity() == Severity::Error)
        .count();
    let total_warnings = issues.len() - total_errors;

    let _ = writeln!(
        writer,
        "{} {} problems ({} {}, {} {})\n",
        FAILURE_MARK.red(),
        issues.len(),
        total_errors,
        if total_errors == 1 { "error" } else { "errors" }.red(),
        total_warnings,
        if total_warnings == 1 {
            "warning"
        } else {
            "warnings"
        }
        .yellow()
    );
}

fn location_key<'a>(loc: &ReportLocation<'a>) -> (u8, &'a str, usize, usize) {
    match *loc {
        ReportLocation::Source {
            file_path,
            line,
            col,
            ..
        } => (0, file_path, line, col),
        ReportLocation::File(path) => (0, path, 0, 0),
        ReportLocation::Locale(lang) => (1, lang, 0, 0),
    }
}

fn calculate_max_line_width(issues: &[Issue]) -> usize {
    issues
        .iter()
        .filter_map(|i| match i.location() {
            ReportLocation::Source { line, .. } => Some(line),
            _ => None,
        })
        .max()
        .map(|n| n.to_string().len())
        .unwrap_or(1)
}

fn compare_issues(a: &Issue, b: &Issue) -> std::cmp::Ordering {
    let a_loc = a.location();
    let b_loc = b.location();
    location_key(&a_loc)
        .cmp(&location_key(&b_loc))
        .then_with(|| a.report_rule().cmp(&b.report_rule()))
}

fn plural(count: usize, word: &str) -> String {
    if count == 1 {
        format!("{} {}", count, word)
    } else {
        format!("{} {}s", count, word)
    }
}

fn print_extract<W: Write>(summary: &ExtractSummary, writer: &mut W) {
    let _ = writeln!(
        writer,
        "{} {}",
        SUCCESS_MARK.green(),
        format!(
            "Extracted {} from {}",
            plural(summary.key_count, "key"),
            plural(summary.files_scanned, "file")
        )
        .green()
    );

    if summary.is_rewrite && !summary.changed_files.is_empty() {
        let _ = writeln!(
            writer,
            "{} {}:",
            "Rewrote".green().bold(),
            plural(summary.changed_files.len(), "file")
        );
        for file in &summary.changed_files {
            let _ = writeln!(writer, "  {}", file.display());
        }
    }

    match summary.source_changed {
        Some(true) => {
            let _ = writeln!(
                writer,
                "{} {}",
                "Updated".green().bold(),
                summary.source_path.display()
            );
        }
        Some(false) => {
            let _ = writeln!(writer, "{} is up to date", summary.source_path.display());
        }
        None => {}
    }

    if let Some(translate) = &summary.translate {
        print_translate_lines(translate, writer);
    }
    if let Some(clean) = &summary.clean {
        print_clean_lines(clean, writer);
    }
}

fn print_translate<W: Write>(summary: &TranslateSummary, writer: &mut W) {
    let total: usize = summary.translated.iter().map(|l| l.count).sum();
    let _ = writeln!(
        writer,
        "{} {}",
        SUCCESS_MARK.green(),
        format!(
            "Translated {} into {}",
            plural(total, "key"),
            plural(summary.translated.len(), "locale")
        )
        .green()
    );
    print_translate_lines(summary, writer);
}

fn print_translate_lines<W: Write>(summary: &TranslateSummary, writer: &mut W) {
    for locale in &summary.translated {
        let _ = writeln!(
            writer,
            "{} {} ({})",
            "Translated".green().bold(),
            format!("{} into {}", plural(locale.count, "key"), locale.lang),
            locale.path.display()
        );
    }
    if !summary.up_to_date.is_empty() {
        let _ = writeln!(writer, "Up to date: {}", summary.up_to_date.join(", "));
    }
}

fn print_clean<W: Write>(summary: &CleanSummary, writer: &mut W) {
    let total: usize = summary.pruned.iter().map(|l| l.removed).sum();
    let _ = writeln!(
        writer,
        "{} {}",
        SUCCESS_MARK.green(),
        format!(
            "Removed {} from {}",
            plural(total, "key"),
            plural(summary.pruned.len(), "locale")
        )
        .green()
    );
    print_clean_lines(summary, writer);
}

fn print_clean_lines<W: Write>(summary: &CleanSummary, writer: &mut W) {
    for locale in summary.pruned.iter().filter(|l| l.removed > 0) {
        let _ = writeln!(
            writer,
            "{} {} ({})",
            "Removed".green().bold(),
            format!("{} from {}", plural(locale.removed, "key"), locale.lang),
            locale.path.display()
        );
    }
}

fn print_init<W: Write>(summary: &InitSummary, writer: &mut W) {
    match &summary.error {
        None => {
            let _ = writeln!(
                writer,
                "{} {}",
                SUCCESS_MARK.green(),
                format!("Created {}", summary.path.display()).green()
            );
        }
        Some(error) => {
            let _ = writeln!(writer, "{} {}", FAILURE_MARK.red(), error.red());
        }
    }
}

// ============================================================
// Tests
// ============================================================
