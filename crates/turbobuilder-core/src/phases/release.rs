//! Release phase: a build into the versioned target folder plus the release options

use super::build::build;
use super::ProjectContext;
use crate::config::Tool;
use crate::console;
use crate::fs_utils::{find_files, find_files_with_extension};
use crate::git::Git;
use crate::runtime::ToolCommand;
use crate::setup::ProjectType;
use anyhow::{bail, Context, Result};
use std::path::Path;

const CHANGELOG_FILE: &str = "Changelog.txt";

/// Build the project for release. The context must carry the release setup
pub async fn release(ctx: &ProjectContext) -> Result<()> {
    if !ctx.is_release {
        bail!("release needs the release setup to be loaded");
    }
    build(ctx).await
}

/// Post processing of a release build folder, before the unpacked sources are removed
pub(crate) async fn apply_release_options(ctx: &ProjectContext, folder: &Path) -> Result<()> {
    let options = &ctx.setup.release;
    let dist = folder.join("dist");

    if options.optimize_js {
        minify_js(ctx, &dist)?;
    }

    if options.optimize_pictures {
        optimize_pictures(ctx, &dist)?;
    }

    if options.generate_code_documentation {
        generate_code_documentation(ctx, folder)?;
    }

    if options.git_change_log {
        let title = format!("{}-{}", ctx.project_name(), ctx.version);
        let changelog = Git::new(&ctx.toolchain, ctx.paths.root())
            .changelog(&title, options.git_change_log_count)?;
        std::fs::write(folder.join(CHANGELOG_FILE), changelog)
            .with_context(|| format!("Failed to write {}", CHANGELOG_FILE))?;
        console::success("changelog ok");
    }

    if options.print_todo_file {
        print_todo_files(ctx)?;
    }

    Ok(())
}

fn minify_js(ctx: &ProjectContext, dist: &Path) -> Result<()> {
    for file in find_files_with_extension(dist, &["js"]) {
        ToolCommand::for_tool(&ctx.toolchain, Tool::UglifyJs)
            .arg(&file)
            .arg("-o")
            .arg(&file)
            .args(["--compress", "--mangle"])
            .run()?;
    }
    console::success("minify Js ok");
    Ok(())
}

fn optimize_pictures(ctx: &ProjectContext, dist: &Path) -> Result<()> {
    for file in find_files_with_extension(dist, &["png"]) {
        ToolCommand::for_tool(&ctx.toolchain, Tool::ImageMinifier)
            .args(["-quiet", "-o2"])
            .arg(&file)
            .run()?;
    }
    console::success("optimize pictures ok");
    Ok(())
}

fn generate_code_documentation(ctx: &ProjectContext, folder: &Path) -> Result<()> {
    let main = folder.join("main");
    let docs = folder.join("docs");

    match ctx.project_type {
        ProjectType::LibTs => {
            let out = docs.join("ts");
            std::fs::create_dir_all(&out)?;
            ToolCommand::for_tool(&ctx.toolchain, Tool::TypeDoc)
                .arg("--name")
                .arg(ctx.project_name())
                .arg("--tsconfig")
                .arg(main.join("ts/tsconfig.json"))
                .arg("--out")
                .arg(&out)
                .args(["--entryPointStrategy", "expand"])
                .arg(main.join("ts"))
                .run()?;
            console::success("ts doc ok");
        }
        ProjectType::LibPhp => {
            let out = docs.join("php");
            std::fs::create_dir_all(&out)?;
            ToolCommand::for_tool(&ctx.toolchain, Tool::PhpDoc)
                .arg("-d")
                .arg(main.join("php"))
                .arg("-t")
                .arg(&out)
                .run()?;
            console::success("php doc ok");
        }
        other => console::warning(format!(
            "Warning: Code documentation is not available for {} projects",
            other
        )),
    }

    Ok(())
}

/// Show the pending tasks written on the extras/todo files
fn print_todo_files(ctx: &ProjectContext) -> Result<()> {
    for file in find_files(&ctx.paths.extras().join("todo")) {
        let contents = std::fs::read_to_string(&file)
            .with_context(|| format!("Failed to read {}", file.display()))?;
        if contents.trim().is_empty() {
            continue;
        }
        console::warning(format!("\nPENDING TASKS inside : {}", file.display()));
        console::text(contents.trim_end());
    }
    Ok(())
}
