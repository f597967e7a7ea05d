//! Project folder and file layout rules

use super::ValidationReport;
use crate::config::{README_FILE, SETUP_FILE};
use crate::fs_utils::{find_files, is_excluded, relative_slash_path};
use crate::phases::ProjectContext;
use anyhow::Result;
use walkdir::WalkDir;

/// Folders only allowed right below `src/main` or `src/test`
const STRICT_SRC_FOLDERS: [&str; 2] = ["libs", "resources"];

pub(super) fn validate_project_structure(
    ctx: &ProjectContext,
    report: &mut ValidationReport,
) -> Result<()> {
    let rules = &ctx.setup.validate.project_structure;
    let extras = ctx.paths.extras();

    if ctx.setup.metadata.name.trim().is_empty() {
        report.warning(format!(
            "No project name defined. Please add it to {} -> metadata.name",
            SETUP_FILE
        ));
    }

    if rules.readme_file_mandatory && !ctx.paths.readme().is_file() {
        report.error(format!(
            "{} does not exist.\nSet readmeFileMandatory = false to disable this error",
            ctx.paths.root().join(README_FILE).display()
        ));
    }

    if rules.extras_folder_mandatory && !extras.is_dir() {
        report.error(format!(
            "{} does not exist.\nSet extrasFolderMandatory = false to disable this error",
            extras.display()
        ));
    }

    for folder in &rules.extras_sub_folders_mandatory {
        let path = extras.join(folder);
        if !path.is_dir() {
            report.error(format!(
                "{} does not exist.\nRemove it from extrasSubFoldersMandatory to disable this error",
                path.display()
            ));
        }
    }

    let todo = extras.join("todo");
    if rules.extras_todo_extension && todo.is_dir() {
        for file in find_files(&todo) {
            let is_todo = file.extension().is_some_and(|ext| ext == "todo");
            if !is_todo {
                report.error(format!(
                    "{} must have .todo extension.\nSet extrasTodoExtension = false to disable this error",
                    file.display()
                ));
            }
        }
    }

    if rules.strict_src_folders.enabled {
        validate_strict_src_folders(ctx, &rules.strict_src_folders.excludes, report);
    }

    if let Some(extension_case) = &rules.strict_file_extension_case {
        for affected_path in &extension_case.affected_paths {
            for file in find_files(&ctx.paths.root().join(affected_path)) {
                let path = relative_slash_path(&file, ctx.paths.root());
                if path.contains("target/")
                    || path.contains("node_modules/")
                    || is_excluded(&path, &extension_case.excludes)
                {
                    continue;
                }
                let extension = file
                    .extension()
                    .map(|ext| ext.to_string_lossy().into_owned())
                    .unwrap_or_default();
                if extension.to_lowercase() != extension {
                    report.error(format!(
                        "Expected lower case file extension:\n{}",
                        file.display()
                    ));
                }
            }
        }
    }

    Ok(())
}

fn validate_strict_src_folders(
    ctx: &ProjectContext,
    excludes: &[String],
    report: &mut ValidationReport,
) {
    let src = ctx.paths.src();
    if !src.is_dir() {
        return;
    }

    for entry in WalkDir::new(&src)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_dir())
    {
        let name = entry.file_name().to_string_lossy().to_lowercase();
        if !STRICT_SRC_FOLDERS.iter().any(|folder| name.contains(folder)) {
            continue;
        }

        let relative = relative_slash_path(entry.path(), &src);
        if is_excluded(&relative, excludes) {
            continue;
        }

        let parent = relative.rsplit_once('/').map(|(parent, _)| parent);
        if !matches!(parent, Some("main") | Some("test")) {
            report.error(format!(
                "{} folder is only allowed at src/main and src/test",
                relative
            ));
        }
    }
}
