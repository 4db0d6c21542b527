//! `plan`: print the mutations planned for one page.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow, ensure};

use crate::config::{Config, slash_path};
use crate::dom::parse_document;
use crate::inject::{Plan, plan};
use crate::log;

/// Plan `page` with the inputs of the configured crate `krate`.
///
/// `page` must be the crate's configured page, as for `inject`.
/// `Ok(None)` when the page has nothing to modify.
pub fn plan_page(config: &Config, page: &Path, krate: &str) -> Result<Option<Plan>> {
    let entry = config
        .pages
        .iter()
        .find(|p| p.krate == krate)
        .ok_or_else(|| anyhow!("crate `{krate}` is not configured"))?;
    ensure!(
        entry.matches(&slash_path(page)),
        "`{}` is not the page of crate `{krate}` (expected a path ending with `{}`)",
        page.display(),
        entry.suffix()
    );

    let html =
        fs::read_to_string(page).with_context(|| format!("failed to read `{}`", page.display()))?;
    let doc = parse_document(&html)
        .ok_or_else(|| anyhow!("failed to parse `{}`", page.display()))?;

    Ok(plan(&doc, &entry.inputs, &config.variant))
}

/// Print the plan as JSON on stdout.
pub fn print_plan(config: &Config, page: &Path, krate: &str, pretty: bool) -> Result<()> {
    let Some(plan) = plan_page(config, page, krate)? else {
        log!("plan"; "`{}` has no `.docblock` or `.fqn`, nothing to do", page.display());
        return Ok(());
    };

    let json = if pretty {
        serde_json::to_string_pretty(&plan)?
    } else {
        serde_json::to_string(&plan)?
    };
    println!("{json}");
    Ok(())
}
