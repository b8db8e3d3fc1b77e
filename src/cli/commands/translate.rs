use anyhow::Result;

use super::super::args::{GlobalArgs, TranslateCommand};
use super::extract::relative_to;
use super::helper::{finish, load_options};
use super::{CommandResult, CommandSummary, TranslateSummary};
use crate::core::pipeline;

pub fn translate(cmd: TranslateCommand, global: &GlobalArgs) -> Result<CommandResult> {
    let (options, root) = load_options(global, &cmd.locale)?;
    let mut report = pipeline::translate(&options, &root)?;

    for locale in &mut report.translated {
        locale.path = relative_to(&locale.path, &root);
    }

    Ok(finish(
        CommandSummary::Translate(TranslateSummary {
            translated: report.translated,
            up_to_date: report.up_to_date,
        }),
        report.issues,
    ))
}
