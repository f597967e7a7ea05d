//! Sync phase: copy the built files to a local folder or an ftp server

use super::ProjectContext;
use crate::config::{Tool, Toolchain, SETUP_FILE};
use crate::console;
use crate::fs_utils::{copy_dir_excluding, empty_dir, is_dir_empty};
use crate::runtime::{check_tools, ToolCommand};
use crate::setup::model::{SyncKind, SyncSetup};
use anyhow::{bail, Result};
use std::path::Path;

/// Sync the build (or release) folder. `verbose` runs come from the command line,
/// the others from `runAfterBuild`
pub fn sync(ctx: &ProjectContext, verbose: bool) -> Result<()> {
    if verbose {
        console::text("\nsync start");
    }

    let Some(setup) = ctx.setup.sync.as_ref() else {
        bail!(
            "Nothing to sync. Please setup the sync section in {}",
            SETUP_FILE
        );
    };

    let source = ctx.target_folder().join(&setup.source_path);
    match setup.kind {
        SyncKind::FileSystem => sync_file_system(ctx, setup, &source),
        SyncKind::Ftp => sync_ftp(ctx, setup, &source),
    }
}

fn sync_file_system(ctx: &ProjectContext, setup: &SyncSetup, source: &Path) -> Result<()> {
    if !source.is_dir() {
        bail!("Source path does not exist: {}", source.display());
    }

    let dest = ctx.paths.root().join(&setup.dest_path);
    if setup.dest_path.is_empty() || !dest.is_dir() {
        bail!("Destination path does not exist: {}", setup.dest_path);
    }

    if setup.delete_dest_path_contents && empty_dir(&dest).is_err() {
        bail!("Could not delete destination: {}", setup.dest_path);
    }

    if !is_dir_empty(&dest)? {
        bail!("Destination path is not empty: {}", setup.dest_path);
    }

    copy_dir_excluding(source, &dest, &setup.excludes)?;
    console::success(format!("sync ok to fs: {}", setup.dest_path));
    Ok(())
}

/// WinSCP session opened against the configured ftp host running `command`
pub(super) fn winscp_command(toolchain: &Toolchain, setup: &SyncSetup, command: &str) -> ToolCommand {
    ToolCommand::for_tool(toolchain, Tool::WinScp)
        .arg("/command")
        .arg(format!("open ftp://{}:{}@{}/", setup.user, setup.psw, setup.host))
        .arg(command)
        .arg("exit")
        .redacted()
}

fn sync_ftp(ctx: &ProjectContext, setup: &SyncSetup, source: &Path) -> Result<()> {
    check_tools(&ctx.toolchain, &[Tool::WinScp])?;

    if !source.is_dir() {
        bail!("Folder does not exist: {}", source.display());
    }

    let mut command = format!(
        "synchronize remote -delete \"{}\" {}",
        source.display(),
        setup.remote_path
    );
    if !setup.excludes.is_empty() {
        command.push_str(&format!(" -filemask=\"|{}\"", setup.excludes.join(";")));
    }

    let output = winscp_command(&ctx.toolchain, setup, &command).output()?;
    if !output.success {
        tracing::debug!(stdout = %output.stdout, stderr = %output.stderr, "winscp failed");
        bail!("Sync errors");
    }

    console::success(format!("sync ok to ftp: {}", setup.host));
    Ok(())
}
