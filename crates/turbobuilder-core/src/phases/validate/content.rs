//! File content rules: tabulations, duplicated code and copyright headers

use super::{files_from_include_list, ValidationReport};
use crate::config::{Tool, SETUP_FILE};
use crate::console;
use crate::fs_utils::{find_files, is_excluded, read_text_lossy, relative_slash_path, remove_dir};
use crate::phases::ProjectContext;
use crate::runtime::{check_tools, ToolCommand};
use crate::setup::model::CopyPasteDetect;
use anyhow::Result;

/// Binary files never checked for tabulations
const BINARY_EXTENSIONS: [&str; 10] = [
    ".ico", ".jpg", ".jpeg", ".png", ".gif", ".ttf", ".phar", ".woff", ".woff2", ".eot",
];

const JSCPD_IGNORE: &str = "**/*.phar,**/*.min.js,**/*.map,**/libs/**";

pub(super) async fn validate_files_content(
    ctx: &ProjectContext,
    report: &mut ValidationReport,
) -> Result<()> {
    validate_no_tabulations(ctx, report)?;
    validate_copy_paste_detect(ctx, report).await?;
    validate_copyright_headers(ctx, report)?;
    Ok(())
}

fn validate_no_tabulations(ctx: &ProjectContext, report: &mut ValidationReport) -> Result<()> {
    let rule = &ctx.setup.validate.files_content.tabs_forbidden;
    if !rule.enabled {
        return Ok(());
    }

    let mut excludes = rule.excludes.clone();
    excludes.extend(BINARY_EXTENSIONS.iter().map(|ext| ext.to_string()));

    for affected_path in &rule.affected_paths {
        for file in find_files(&ctx.paths.root().join(affected_path)) {
            let relative = relative_slash_path(&file, ctx.paths.root());
            if relative.contains("libs/") || is_excluded(&relative, &excludes) {
                continue;
            }
            if std::fs::read(&file)?.contains(&b'\t') {
                report.error(format!("File contains tabulations: {}", file.display()));
            }
        }
    }

    Ok(())
}

/// Read the duplicated lines percentage from a jscpd summary such as
/// `Found 3 clones with 12 (4.5%) duplicated lines`
fn parse_duplicate_percentage(output: &str) -> Option<f64> {
    let end = output.find("%)")?;
    let start = output[..end].rfind('(')? + 1;
    output[start..end].trim().parse().ok()
}

fn jscpd_command(ctx: &ProjectContext, entry: &CopyPasteDetect) -> ToolCommand {
    let mut reporters = "console".to_string();
    let mut command = ToolCommand::for_tool(&ctx.toolchain, Tool::Jscpd)
        .current_dir(ctx.paths.root())
        .args(["--ignore", JSCPD_IGNORE])
        .args(["--max-size", "250kb", "--max-lines", "8000"]);

    let mut output_dir = None;
    if !entry.report.is_empty() {
        reporters.push(',');
        reporters.push_str(&entry.report);
        output_dir = Some(
            ctx.target_folder()
                .join("reports")
                .join("copypaste")
                .join(entry.path.replace(['/', '\\'], "-")),
        );
    }

    command = command.args(["--reporters", reporters.as_str()]);
    if let Some(dir) = output_dir {
        command = command.arg("-o").arg(dir);
    }

    command
        .arg(&entry.path)
        .arg("--threshold")
        .arg(entry.max_percent_error_level.to_string())
}

async fn validate_copy_paste_detect(
    ctx: &ProjectContext,
    report: &mut ValidationReport,
) -> Result<()> {
    let entries: Vec<&CopyPasteDetect> = ctx
        .setup
        .validate
        .files_content
        .copy_paste_detect
        .iter()
        .filter(|entry| entry.max_percent_error_level >= 0.0)
        .collect();

    if entries.is_empty() {
        return Ok(());
    }

    check_tools(&ctx.toolchain, &[Tool::Jscpd])?;

    for entry in entries {
        console::text(format!("Looking for duplicate code on {}", entry.path));

        let command = jscpd_command(ctx, entry);
        let output = command.clone().arg("--silent").output()?;
        let text = format!("{}{}", output.stdout, output.stderr);

        if text.contains("ERROR") {
            console::error("Found too much duplicate code. Generating report...");
            command.stream().await?;
            report.error(format!(
                "Found too much duplicate code on {}. Setup the copy paste validation on {} under validate.filesContent.copyPasteDetect section",
                entry.path, SETUP_FILE
            ));
            continue;
        }

        let Some(percentage) = parse_duplicate_percentage(&text) else {
            report.error(format!(
                "Could not read the duplicate code percentage of {} from jscpd output:\n{}",
                entry.path,
                text.trim()
            ));
            continue;
        };

        let level = entry.max_percent_error_level;
        console::success(format!(
            "Percentage of duplicate code: {} (maximum allowed: {})",
            percentage, level
        ));

        let difference = entry.max_percent_error_difference;
        if difference >= 0.0 && percentage < level && (level - percentage).abs() > difference {
            report.error(format!(
                "The percentage of duplicate code on {} is {} which is too below from the maxPercentErrorLevel of {} \
                 (max expected difference is {}). Please lower the maxPercentErrorLevel value to make it closer to the real one",
                entry.path, percentage, level, difference
            ));
        }
    }

    if remove_dir(&ctx.paths.root().join(".jscpd")).is_err() {
        report.error("The .jscpd folder could not be deleted. Please delete it manually");
    }

    Ok(())
}

fn normalize_newlines(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

fn validate_copyright_headers(ctx: &ProjectContext, report: &mut ValidationReport) -> Result<()> {
    for validator in &ctx.setup.validate.files_content.copyright_headers {
        let header_path = ctx.paths.root().join(&validator.path);
        if !header_path.is_file() {
            report.error(format!(
                "Copyright headers template not found:\n{}",
                header_path.display()
            ));
            continue;
        }

        let header = normalize_newlines(&read_text_lossy(&header_path)?);

        for affected_path in &validator.affected_paths {
            let dir = ctx.paths.root().join(affected_path);
            for file in files_from_include_list(ctx, &dir, &validator.includes, &validator.excludes) {
                let contents = normalize_newlines(&read_text_lossy(&file)?);
                if !contents.starts_with(&header) {
                    report.error(format!(
                        "Bad copyright header:\n{}\nMust be as defined in {}\n",
                        file.display(),
                        validator.path
                    ));
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::phases::test_support::{context, write};
    use crate::setup::ProjectType;
    use serde_json::json;

    #[test]
    fn test_parse_duplicate_percentage() {
        let output = "Duplications detection: Found 2 exact clones with 14(3.25%) duplicated lines in 9 (2 formats) files.";
        assert_eq!(parse_duplicate_percentage(output), Some(3.25));
        assert_eq!(parse_duplicate_percentage("│ Total: │ 4 │ 120 │ 0 (0%) │"), Some(0.0));
        assert_eq!(parse_duplicate_percentage("no summary"), None);
    }

    #[test]
    fn test_tabulations() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "src/main/js/index.js", "\"use strict\";\n\tlet a = 1;");
        write(dir.path(), "src/main/js/ok.js", "\"use strict\";\n    let a = 1;");
        write(dir.path(), "src/main/libs/vendor.js", "\t");
        write(dir.path(), "src/main/resources/icon.svg", "\t<svg/>");
        let ctx = context(dir.path(), ProjectType::LibJs, json!({}));
        let mut report = ValidationReport::default();

        validate_no_tabulations(&ctx, &mut report).unwrap();
        assert_eq!(report.errors.len(), 1);
        assert!(report.errors[0].ends_with("index.js"));
    }

    #[test]
    fn test_copyright_headers() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "extras/header.txt", "/* (c) Turbo */\r\n");
        write(dir.path(), "src/main/php/Good.php", "/* (c) Turbo */\n<?php");
        write(dir.path(), "src/main/php/Bad.php", "<?php");
        write(dir.path(), "src/main/php/libs/Vendor.php", "<?php");
        let ctx = context(
            dir.path(),
            ProjectType::LibPhp,
            json!({ "validate": { "filesContent": { "copyrightHeaders": [{
                "path": "extras/header.txt",
                "affectedPaths": ["src"],
                "includes": [".php"],
                "excludes": ["libs"]
            }] } } }),
        );
        let mut report = ValidationReport::default();

        validate_copyright_headers(&ctx, &mut report).unwrap();
        assert_eq!(report.errors.len(), 1);
        assert!(report.errors[0].contains("Bad.php"));
    }

    #[test]
    fn test_missing_copyright_template() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(
            dir.path(),
            ProjectType::LibPhp,
            json!({ "validate": { "filesContent": { "copyrightHeaders": [{
                "path": "extras/missing.txt",
                "affectedPaths": ["src"]
            }] } } }),
        );
        let mut report = ValidationReport::default();

        validate_copyright_headers(&ctx, &mut report).unwrap();
        assert!(report.errors[0].starts_with("Copyright headers template not found"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_duplicate_level_far_above_real_percentage() {
        use crate::phases::test_support::fake_tool;

        let tools = tempfile::tempdir().unwrap();
        let jscpd = fake_tool(
            tools.path(),
            "jscpd",
            "echo 'Found 1 exact clones with 2(1.5%) duplicated lines in 3 (1 formats) files.'\n",
        );
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = context(
            dir.path(),
            ProjectType::LibJs,
            json!({ "validate": { "filesContent": { "copyPasteDetect": [
                { "path": "src/main", "maxPercentErrorLevel": 10, "maxPercentErrorDifference": 2 },
                { "path": "src/test", "maxPercentErrorLevel": 3, "maxPercentErrorDifference": 2 }
            ] } } }),
        );
        ctx.toolchain = ctx.toolchain.clone().with_program(Tool::Jscpd, jscpd);
        let mut report = ValidationReport::default();

        validate_copy_paste_detect(&ctx, &mut report).await.unwrap();
        assert_eq!(report.errors.len(), 1, "{:?}", report.errors);
        assert!(report.errors[0].starts_with(
            "The percentage of duplicate code on src/main is 1.5 which is too below from the maxPercentErrorLevel of 10"
        ));
    }
}
