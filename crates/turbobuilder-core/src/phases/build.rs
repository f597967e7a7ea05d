//! Build phase
//!
//! Copies `src/main` into `target/<name>` (or `target/<name>-<version>` on release),
//! replaces the version wildcard and produces the project type artifacts under `dist`.

use super::release::apply_release_options;
use super::sync::sync;
use super::validate::validate;
use super::ProjectContext;
use crate::config::{Tool, TURBOSITE_SETUP_FILE};
use crate::console;
use crate::fs_utils::{
    copy_dir, copy_dir_excluding, find_files, find_files_with_extension, remove_dir,
    slash_path,
};
use crate::runtime::{check_tools, required_tools, ToolCommand};
use crate::setup::model::{LibTsBuild, TsTarget};
use crate::setup::ProjectType;
use anyhow::{bail, Context, Result};
use serde_json::Value;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::path::Path;
use std::time::SystemTime;

const FAVICONS_FOLDER: &str = "resources/favicons";
const HASHED_FAVICONS: [&str; 5] = ["196x196", "128x128", "96x96", "32x32", "16x16"];
const APPLE_TOUCH_FAVICONS: [&str; 5] = ["152x152", "144x144", "114x114", "76x76", "57x57"];

/// Build the project. Release contexts also apply the release options
pub async fn build(ctx: &ProjectContext) -> Result<()> {
    let phase = if ctx.is_release { "release" } else { "build" };
    console::text(format!("\n{} start: {}", phase, ctx.project_type));

    check_tools(
        &ctx.toolchain,
        &required_tools(ctx.project_type, &ctx.setup, ctx.is_release),
    )?;

    if ctx.setup.validate.run_before_build {
        validate(ctx, false).await?;
    }

    if ctx.project_type == ProjectType::AppNodeCmd {
        console::success(format!("{} ok (no files affected or created)", phase));
        return Ok(());
    }

    let folder = ctx.target_folder();
    remove_dir(&folder)?;
    std::fs::create_dir_all(&folder)
        .with_context(|| format!("Failed to create directory: {}", folder.display()))?;

    if !ctx.project_type.is_angular() {
        let main = ctx.paths.main();
        if !main.is_dir() {
            bail!("Could not find {}", main.display());
        }
        copy_dir(&main, &folder.join("main"))?;
        replace_version(ctx, &folder.join("main"))?;
    }

    match ctx.project_type {
        ProjectType::LibPhp => build_lib_php(ctx, &folder)?,
        ProjectType::LibJs => build_lib_js(ctx, &folder)?,
        ProjectType::LibTs => build_lib_ts(ctx, &folder)?,
        ProjectType::SitePhp | ProjectType::ServerPhp => build_site(ctx, &folder)?,
        ProjectType::AppAngular | ProjectType::LibAngular => build_angular(ctx, &folder).await?,
        ProjectType::AppNodeCmd => {}
    }

    if ctx.is_release {
        apply_release_options(ctx, &folder).await?;
    }

    if !ctx.setup.build.keep_unpacked_src_files {
        remove_dir(&folder.join("main"))?;
    }

    if ctx.setup.sync.as_ref().is_some_and(|s| s.run_after_build) {
        sync(ctx, false)?;
    }

    console::success(format!("{} ok", phase));
    Ok(())
}

/// Replace the version wildcard on every file with a configured extension
fn replace_version(ctx: &ProjectContext, dir: &Path) -> Result<()> {
    let options = &ctx.setup.build.replace_version;
    if !options.enabled || options.wild_card.is_empty() {
        return Ok(());
    }

    let extensions: Vec<&str> = options.extensions.iter().map(String::as_str).collect();
    for file in find_files_with_extension(dir, &extensions) {
        let Ok(contents) = std::fs::read_to_string(&file) else {
            tracing::warn!(file = %file.display(), "skipped version replacement on a file that is not utf-8");
            continue;
        };
        if contents.contains(&options.wild_card) {
            std::fs::write(&file, contents.replace(&options.wild_card, &ctx.version))
                .with_context(|| format!("Failed to write {}", file.display()))?;
        }
    }

    console::success("replace version ok");
    Ok(())
}

fn php_string(path: &Path) -> String {
    format!("'{}'", slash_path(path).replace('\'', "\\'"))
}

fn phar_script(phar: &Path, source: &Path) -> String {
    let source = php_string(source);
    format!(
        "$phar = new Phar({}); $phar->buildFromDirectory({}); if (file_exists({} . '/autoloader.php')) {{ $phar->setDefaultStub('autoloader.php'); }}",
        php_string(phar),
        source,
        source
    )
}

fn build_lib_php(ctx: &ProjectContext, folder: &Path) -> Result<()> {
    let php = folder.join("main/php");
    if find_files_with_extension(&php, &["php"]).is_empty() {
        bail!("no files to build");
    }

    let dist = folder.join("dist");
    std::fs::create_dir_all(&dist)?;
    let phar = dist.join(format!("{}-{}.phar", ctx.project_name(), ctx.version));

    ToolCommand::for_tool(&ctx.toolchain, Tool::Php)
        .args(["-d", "phar.readonly=0", "-r"])
        .arg(phar_script(&phar, &php))
        .run()?;

    console::success("build phar ok");
    Ok(())
}

/// Contents of every js file, the root index.js first and the rest sorted by path
fn merge_js_files(dir: &Path) -> Result<String> {
    let mut files = find_files_with_extension(dir, &["js"]);
    let index = dir.join("index.js");
    if let Some(position) = files.iter().position(|file| *file == index) {
        let first = files.remove(position);
        files.insert(0, first);
    }

    let mut merged = Vec::new();
    for file in files {
        merged.push(
            std::fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?,
        );
    }
    Ok(merged.join("\n"))
}

fn build_lib_js(ctx: &ProjectContext, folder: &Path) -> Result<()> {
    let main = folder.join("main");
    let dist = folder.join("dist");
    if main.join("js").is_dir() {
        copy_dir(&main.join("js"), &dist.join("js"))?;
    }
    if main.join("resources").is_dir() {
        copy_dir(&main.join("resources"), &dist.join("resources"))?;
    }

    let options = ctx.setup.build.lib_js.clone().unwrap_or_default();
    if options.create_merged_file {
        let name = if options.merged_file_name.is_empty() {
            ctx.project_name()
        } else {
            options.merged_file_name.clone()
        };
        let merged = merge_js_files(&dist.join("js"))?;
        std::fs::write(dist.join(format!("{}.js", name)), merged)?;
        console::success("merge js files ok");
    }

    if options.delete_non_merged_js {
        remove_dir(&dist.join("js"))?;
    }

    Ok(())
}

fn tsc_command(
    ctx: &ProjectContext,
    options: &LibTsBuild,
    js_target: &str,
    out_dir: &Path,
    ts: &Path,
) -> ToolCommand {
    let mut tsc = ToolCommand::for_tool(&ctx.toolchain, Tool::Tsc);
    if options.compiler_strict {
        tsc = tsc.arg("--strict");
    }
    if options.compiler_declaration_file {
        tsc = tsc.arg("--declaration");
    }
    if options.compiler_source_map {
        tsc = tsc.arg("--sourceMap");
    }
    tsc.args(["--alwaysStrict", "--target", js_target, "--outDir"])
        .arg(out_dir)
        .args(["--module", "commonjs", "--rootDir"])
        .arg(ts)
        .arg("--project")
        .arg(ts)
}

fn webpack_command(
    ctx: &ProjectContext,
    options: &LibTsBuild,
    target: &TsTarget,
    entry: &Path,
    output: &Path,
) -> ToolCommand {
    let merged = if target.merged_file.is_empty() {
        ctx.project_name()
    } else {
        target.merged_file.clone()
    };

    let mut webpack = ToolCommand::for_tool(&ctx.toolchain, Tool::Webpack)
        .args(["--mode", "production", "--entry"])
        .arg(entry)
        .arg("--output-path")
        .arg(output)
        .arg("--output-filename")
        .arg(format!("{}.js", merged));
    if !target.global_var.is_empty() {
        webpack = webpack.arg("--output-library").arg(&target.global_var);
    }
    if options.compiler_source_map {
        webpack = webpack.args(["--devtool", "source-map"]);
    }
    webpack
}

fn build_lib_ts(ctx: &ProjectContext, folder: &Path) -> Result<()> {
    let ts = folder.join("main/ts");
    if find_files_with_extension(&ts, &["ts"]).is_empty() {
        bail!("no files to build");
    }

    let options = ctx.setup.build.lib_ts.clone().unwrap_or_default();
    let dist = folder.join("dist");

    tsc_command(ctx, &options, "ES6", &dist.join("ts"), &ts).run()?;
    console::success("Ts build ok");

    for target in &options.targets {
        let output = dist.join(&target.folder);
        let tmp = output.join("tmp");

        tsc_command(ctx, &options, &target.js_target, &tmp, &ts).run()?;
        webpack_command(ctx, &options, target, &tmp.join("index.js"), &output).run()?;
        remove_dir(&tmp)?;

        console::success(format!("Webpack {} ok", target.js_target));
    }

    Ok(())
}

fn cache_hash(ctx: &ProjectContext) -> String {
    let mut hasher = DefaultHasher::new();
    ctx.project_name().hash(&mut hasher);
    ctx.version.hash(&mut hasher);
    SystemTime::now().hash(&mut hasher);
    format!("{:x}", hasher.finish())
}

fn build_site(ctx: &ProjectContext, folder: &Path) -> Result<()> {
    let main = folder.join("main");
    let site = folder.join("dist/site");
    copy_dir_excluding(&main, &site, &[FAVICONS_FOLDER.to_string()])?;

    let hash = cache_hash(ctx);

    let turbosite = ctx.paths.turbosite_setup_file();
    if turbosite.is_file() {
        let contents = std::fs::read_to_string(&turbosite)
            .with_context(|| format!("Failed to read {}", turbosite.display()))?;
        let mut setup: Value = serde_json::from_str(&contents)
            .with_context(|| format!("Corrupted JSON for {}", TURBOSITE_SETUP_FILE))?;
        if let Some(object) = setup.as_object_mut() {
            object.insert("cacheHash".to_string(), Value::String(hash.clone()));
        }
        std::fs::write(
            site.join(TURBOSITE_SETUP_FILE),
            serde_json::to_string_pretty(&setup)?,
        )?;
    }

    if ctx.project_type == ProjectType::SitePhp {
        copy_favicons(&main.join(FAVICONS_FOLDER), &site, &hash)?;
    }

    console::success("build site ok");
    Ok(())
}

/// Destination names of a favicon, `None` when the file name is not a known size
fn favicon_names(file_name: &str, hash: &str) -> Option<Vec<String>> {
    let size = file_name.strip_suffix(".png")?;
    if HASHED_FAVICONS.contains(&size) {
        Some(vec![format!("{}-{}.png", size, hash)])
    } else if size == "180x180" {
        Some(vec![
            "apple-touch-icon-180x180.png".to_string(),
            "apple-touch-icon.png".to_string(),
            "apple-touch-icon-precomposed.png".to_string(),
        ])
    } else if APPLE_TOUCH_FAVICONS.contains(&size) {
        Some(vec![format!("apple-touch-icon-{}.png", size)])
    } else {
        None
    }
}

/// Copy the favicons to the site root with the names browsers look for
fn copy_favicons(favicons: &Path, site: &Path, hash: &str) -> Result<()> {
    let files = find_files(favicons);
    if files.is_empty() {
        console::warning("Warning: No favicons specified");
        return Ok(());
    }

    for file in files {
        let file_name = file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let Some(names) = favicon_names(&file_name, hash) else {
            bail!("Unexpected favicon name: {}", file_name);
        };
        for name in names {
            std::fs::copy(&file, site.join(&name))
                .with_context(|| format!("Failed to copy favicon {}", file.display()))?;
        }
    }

    Ok(())
}

async fn build_angular(ctx: &ProjectContext, folder: &Path) -> Result<()> {
    let mut ng = ToolCommand::for_tool(&ctx.toolchain, Tool::Ng)
        .arg("build")
        .arg("--output-path")
        .arg(folder.join("dist"))
        .current_dir(ctx.paths.root());
    if ctx.is_release {
        ng = ng.args(["--configuration", "production"]);
    }

    console::text("\nLaunching ng build");
    if !ng.stream().await? {
        bail!("ng build failed");
    }
    Ok(())
}
