//! Clean phase: delete the target folder and optionally the sync destinations

use super::sync::winscp_command;
use crate::config::{RuntimePaths, Tool, Toolchain};
use crate::console;
use crate::fs_utils::empty_dir;
use crate::runtime::check_tools;
use crate::setup::model::{SyncKind, SyncSetup};
use crate::setup::{load_setup, ProjectType};
use anyhow::{bail, Result};

/// Remove everything the builder generated. With `clean_sync`, the sync destinations of
/// both the build and the release setups are emptied too
pub fn clean(paths: &RuntimePaths, toolchain: &Toolchain, clean_sync: bool) -> Result<()> {
    console::text("\nclean start");

    let target = paths.target();
    if target.exists() && std::fs::remove_dir_all(&target).is_err() {
        bail!("could not clean {}", target.display());
    }

    if clean_sync {
        let mut setups = vec![load_setup(paths, false)?];
        if paths.setup_release_file().is_file() {
            setups.push(load_setup(paths, true)?);
        }

        for setup in setups
            .iter()
            .filter(|setup| setup.project_type() != Some(ProjectType::AppNodeCmd))
        {
            if let Some(sync) = &setup.sync {
                clean_sync_destination(paths, toolchain, sync)?;
            }
        }
    }

    console::success("clean ok");
    Ok(())
}

fn clean_sync_destination(
    paths: &RuntimePaths,
    toolchain: &Toolchain,
    sync: &SyncSetup,
) -> Result<()> {
    match sync.kind {
        SyncKind::FileSystem => {
            let dest = paths.root().join(&sync.dest_path);
            if !sync.dest_path.is_empty() && dest.is_dir() && empty_dir(&dest).is_err() {
                bail!("could not delete contents of {}", sync.dest_path);
            }
        }
        SyncKind::Ftp => {
            check_tools(toolchain, &[Tool::WinScp])?;
            let command = format!("rm {}/*.*", sync.remote_path.trim_end_matches('/'));
            let output = winscp_command(toolchain, sync, &command).output()?;
            if !output.success {
                bail!("Remote clean errors");
            }
            console::success(format!("cleaned remote ftp: {} {}", sync.host, sync.remote_path));
        }
    }
    Ok(())
}
