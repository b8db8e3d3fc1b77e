use std::{
    collections::BTreeSet,
    path::{Component, Path, PathBuf},
};

use colored::Colorize;
use glob::{Pattern, glob};
use walkdir::{DirEntry, WalkDir};

use crate::config::ExtractionOptions;

/// Check if a pattern contains glob wildcards (* or ?).
/// Patterns without wildcards are treated as literal directory paths.
fn is_glob_pattern(pattern: &str) -> bool {
    pattern.contains('*') || pattern.contains('?') || pattern.contains('[')
}

/// Result of scanning files.
#[derive(Debug, Default)]
pub struct ScanResult {
    /// Matching files, sorted.
    pub files: BTreeSet<PathBuf>,
    pub skipped_count: usize,
}

/// Collect the source files under `includePath` that have an allowed
/// extension and are not excluded by `excludedPath`.
///
/// `node_modules` and hidden directories are never entered.
pub fn scan_files(root: &Path, options: &ExtractionOptions, verbose: bool) -> ScanResult {
    let mut result = ScanResult::default();

    let mut literal_ignore_paths: Vec<PathBuf> = Vec::new();
    let mut glob_patterns: Vec<Pattern> = Vec::new();
    for p in &options.excluded_path {
        if is_glob_pattern(p) {
            match Pattern::new(p) {
                Ok(pattern) => glob_patterns.push(pattern),
                Err(e) => warn(verbose, format_args!("Invalid excluded pattern '{}': {}", p, e)),
            }
        } else {
            literal_ignore_paths.push(root.join(p));
        }
    }

    let dirs_to_scan = include_dirs(root, &options.include_path, verbose);

    for dir in dirs_to_scan {
        let walker = WalkDir::new(&dir)
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || !is_skipped_dir(entry));
        for entry in walker {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    result.skipped_count += 1;
                    warn(verbose, format_args!("Cannot access path: {}", e));
                    continue;
                }
            };
            let path = entry.path();

            if literal_ignore_paths
                .iter()
                .any(|ignore_path| path.starts_with(ignore_path))
            {
                continue;
            }

            let relative = path.strip_prefix(root).unwrap_or(path);
            let relative_str = relative.to_string_lossy().replace('\\', "/");
            if glob_patterns.iter().any(|p| p.matches(&relative_str)) {
                continue;
            }

            if entry.file_type().is_file() && options.is_allowed_file(path) {
                result.files.insert(path.to_path_buf());
            }
        }
    }

    result
}

/// Whether a single file passes the same filters as [`scan_files`].
///
/// Used by the host hook, which sees files one at a time. Relative paths are
/// taken relative to `root`.
pub fn is_scannable(root: &Path, path: &Path, options: &ExtractionOptions) -> bool {
    let relative = path.strip_prefix(root).unwrap_or(path);
    if relative.is_absolute() || !options.is_allowed_file(relative) {
        return false;
    }

    let hidden = relative.components().any(|component| match component {
        Component::Normal(name) => name
            .to_str()
            .is_some_and(|name| name == "node_modules" || name.starts_with('.')),
        _ => false,
    });
    if hidden {
        return false;
    }

    let relative_str = relative.to_string_lossy().replace('\\', "/");
    let matches = |pattern: &str| {
        if is_glob_pattern(pattern) {
            Pattern::new(pattern).is_ok_and(|p| p.matches(&relative_str))
        } else {
            relative.starts_with(pattern.trim_end_matches('/'))
        }
    };

    let included = options.include_path.is_empty()
        || options.include_path.iter().any(|inc| {
            if is_glob_pattern(inc) {
                let dir_pattern = format!("{}/**/*", inc.trim_end_matches('/'));
                Pattern::new(&dir_pattern).is_ok_and(|p| p.matches(&relative_str))
            } else {
                matches(inc)
            }
        });

    included && !options.excluded_path.iter().any(|p| matches(p))
}

fn include_dirs(root: &Path, includes: &[String], verbose: bool) -> Vec<PathBuf> {
    if includes.is_empty() {
        return vec![root.to_path_buf()];
    }

    let mut paths = Vec::new();
    for inc in includes {
        if is_glob_pattern(inc) {
            let full_pattern = root.join(inc);
            match glob(&full_pattern.to_string_lossy()) {
                Ok(entries) => paths.extend(entries.flatten().filter(|entry| entry.is_dir())),
                Err(e) => warn(verbose, format_args!("Invalid glob pattern '{}': {}", inc, e)),
            }
        } else {
            let path = root.join(inc);
            if path.exists() {
                paths.push(path);
            } else {
                warn(
                    verbose,
                    format_args!("Include path does not exist: {}", path.display()),
                );
            }
        }
    }
    paths
}

fn is_skipped_dir(entry: &DirEntry) -> bool {
    entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| name == "node_modules" || name.starts_with('.'))
}

fn warn(verbose: bool, message: std::fmt::Arguments<'_>) {
    if verbose {
        eprintln!("{} {}", "warning:".bold().yellow(), message);
    }
}
