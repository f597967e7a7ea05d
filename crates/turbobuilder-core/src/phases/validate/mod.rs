//! Project validation rules
//!
//! Rules never stop at the first problem: they collect errors and warnings into a
//! [`ValidationReport`] that is printed once every rule has run.

mod angular;
mod content;
mod integrity;
mod javascript;
mod php;
mod schema;
mod structure;
mod stylesheets;

use super::ProjectContext;
use crate::console;
use crate::fs_utils::{find_files, is_excluded, is_included, relative_slash_path};
use anyhow::Result;
use std::path::{Path, PathBuf};

/// Problems found by the validation rules
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationReport {
    pub fn error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    pub fn warning(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Run every rule and print the outcome. Fails when any rule reported an error
pub async fn validate(ctx: &ProjectContext, verbose: bool) -> Result<()> {
    if verbose {
        console::text("\nvalidate start");
    }

    let report = run_rules(ctx).await?;
    console::warnings(&report.warnings);

    if !report.is_ok() {
        anyhow::bail!(report.errors.join("\n"));
    }

    console::success("validate ok");
    Ok(())
}

/// Run every rule collecting its findings
pub async fn run_rules(ctx: &ProjectContext) -> Result<ValidationReport> {
    let mut report = ValidationReport::default();

    schema::validate_turbosite_setup(ctx, &mut report)?;
    structure::validate_project_structure(ctx, &mut report)?;
    content::validate_files_content(ctx, &mut report).await?;
    stylesheets::validate_style_sheets(ctx, &mut report)?;
    integrity::validate_package_json(ctx, &mut report)?;
    php::validate_site_php(ctx, &mut report)?;
    php::validate_php(ctx, &mut report)?;
    javascript::validate_javascript(ctx, &mut report)?;
    angular::validate_angular(ctx, &mut report).await?;

    tracing::debug!(
        errors = report.errors.len(),
        warnings = report.warnings.len(),
        "validation finished"
    );

    Ok(report)
}

/// Files below `dir` matching the includes and not matching the excludes. Exclusions are
/// matched against the path relative to the project root
pub(super) fn files_from_include_list(
    ctx: &ProjectContext,
    dir: &Path,
    includes: &[String],
    excludes: &[String],
) -> Vec<PathBuf> {
    find_files(dir)
        .into_iter()
        .filter(|file| is_included(file, includes))
        .filter(|file| !is_excluded(&relative_slash_path(file, ctx.paths.root()), excludes))
        .collect()
}
