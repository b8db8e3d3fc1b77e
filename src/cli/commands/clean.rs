use anyhow::Result;

use super::super::args::{CleanCommand, GlobalArgs};
use super::extract::relative_to;
use super::helper::{finish, load_options};
use super::{CleanSummary, CommandResult, CommandSummary};
use crate::core::store::clean_locales;

pub fn clean(cmd: CleanCommand, global: &GlobalArgs) -> Result<CommandResult> {
    let (options, root) = load_options(global, &cmd.locale)?;
    let mut report = clean_locales(&options, &root);

    for locale in &mut report.pruned {
        locale.path = relative_to(&locale.path, &root);
    }

    Ok(finish(
        CommandSummary::Clean(CleanSummary {
            pruned: report.pruned,
        }),
        report.issues,
    ))
}
