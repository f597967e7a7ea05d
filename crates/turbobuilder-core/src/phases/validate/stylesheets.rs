//! Style sheet rules

use super::ValidationReport;
use crate::fs_utils::{find_files_with_extension, read_text_lossy};
use crate::phases::ProjectContext;
use crate::setup::ProjectType;
use anyhow::Result;
use regex::Regex;
use std::path::PathBuf;

fn view_folder(ctx: &ProjectContext) -> PathBuf {
    if ctx.project_type == ProjectType::LibAngular {
        ctx.angular_library_root().join("src/main/view")
    } else {
        ctx.paths.main().join("view")
    }
}

/// A declaration with a colour value that is not a `$variable` definition
fn has_hardcoded_color(contents: &str, color: &Regex) -> bool {
    contents
        .lines()
        .map(str::trim_start)
        .any(|line| !line.starts_with('$') && color.is_match(line))
}

pub(super) fn validate_style_sheets(
    ctx: &ProjectContext,
    report: &mut ValidationReport,
) -> Result<()> {
    let rules = &ctx.setup.validate.style_sheets;
    let view = view_folder(ctx);
    if !view.is_dir() {
        return Ok(());
    }

    if rules.only_scss {
        if let Some(css) = find_files_with_extension(&view, &["css"]).first() {
            report.error(format!("only scss files are allowed: {}", css.display()));
        }
    }

    if rules.css_hardcoded_color_forbid {
        let color = Regex::new(r"(?i):.*(#|rgb)")?;
        for file in find_files_with_extension(&view, &["css", "scss"]) {
            let contents = read_text_lossy(&file)?;
            if has_hardcoded_color(&contents, &color) {
                report.error(format!("File contains hardcoded css color: {}", file.display()));
            }
        }
    }

    Ok(())
}
