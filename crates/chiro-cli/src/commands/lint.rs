//! `chiro lint` command implementations
//!
//! Every check reports all of its findings before the command fails.

use super::store;
use crate::error::{CliError, Result};
use crate::LintCommand;
use chiro_core::config::Config;
use chiro_core::lint::{check_identifiers, check_mappings, check_tabs, LintReport};
use chiro_core::registry::Registry;
use tracing::info;

/// Run one lint command, failing when any finding is reported
pub fn run(config: &Config, command: LintCommand) -> Result<()> {
    let paths = config.resources();
    let store = store(&paths)?;
    let registry = Registry::builtin()?;
    let mut report = LintReport::default();

    if matches!(command, LintCommand::Sort | LintCommand::All) {
        // A store that does not parse cannot be sorted; let the tab check
        // point at the bad lines instead.
        let tabs = check_tabs(store.path())?;
        if tabs.is_empty() {
            let count = store.sort_in_place(&registry)?;
            info!(relations = count, path = %store.path().display(), "Sorted curated store");
        } else {
            report.tabs = tabs;
        }
    }

    if matches!(command, LintCommand::Tabs | LintCommand::All) && report.tabs.is_empty() {
        report.tabs = check_tabs(store.path())?;
    }

    if matches!(command, LintCommand::Validate | LintCommand::All) {
        report.identifiers = check_identifiers(&store.read_raw()?, &registry);
    }

    if matches!(command, LintCommand::Mappings | LintCommand::All) && report.tabs.is_empty() {
        let relations = store.load(&registry)?;
        report.mappings = check_mappings(&relations);
    }

    for line in report.render() {
        println!("{}", line);
    }

    if report.is_clean() {
        info!(check = ?command, "Curated store is clean");
        Ok(())
    } else {
        Err(CliError::LintFailed(report.finding_count()))
    }
}
