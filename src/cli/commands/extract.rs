use std::path::Path;

use anyhow::Result;

use super::super::args::{ExtractCommand, GlobalArgs};
use super::helper::{finish, load_options};
use super::{CleanSummary, CommandResult, CommandSummary, ExtractSummary, TranslateSummary};
use crate::core::pipeline;

pub fn extract(cmd: ExtractCommand, global: &GlobalArgs) -> Result<CommandResult> {
    let (mut options, root) = load_options(global, &cmd.locale)?;
    if cmd.rewrite {
        options.rewrite = true;
    }
    if cmd.no_translate {
        options.auto_translate = false;
    }
    if cmd.no_clean {
        options.clean_translate = false;
    }

    let mut report = pipeline::extract(&options, &root, global.verbose)?;
    let mut issues = std::mem::take(&mut report.issues);
    issues.extend(report.post.take_issues());

    let summary = ExtractSummary {
        files_scanned: report.files_scanned,
        files_skipped: report.files_skipped,
        key_count: report.key_count,
        changed_files: report.changed_files,
        is_rewrite: options.rewrite,
        source_path: relative_to(&report.source_path, &root),
        source_changed: report.source.map(|written| written.has_diff),
        translate: report.post.translate.map(|t| TranslateSummary {
            translated: t
                .translated
                .into_iter()
                .map(|mut locale| {
                    locale.path = relative_to(&locale.path, &root);
                    locale
                })
                .collect(),
            up_to_date: t.up_to_date,
        }),
        clean: report.post.clean.map(|c| CleanSummary {
            pruned: c
                .pruned
                .into_iter()
                .map(|mut locale| {
                    locale.path = relative_to(&locale.path, &root);
                    locale
                })
                .collect(),
        }),
    };

    Ok(finish(CommandSummary::Extract(summary), issues))
}

pub(super) fn relative_to(path: &Path, root: &Path) -> std::path::PathBuf {
    path.strip_prefix(root).unwrap_or(path).to_path_buf()
}
