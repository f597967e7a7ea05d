//! Project paths resolved against the directory the CLI runs in

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Main setup file of every project
pub const SETUP_FILE: &str = "turbobuilder.json";

/// Setup overrides merged only for release runs
pub const SETUP_RELEASE_FILE: &str = "turbobuilder.release.json";

/// Setup file of site_php and server_php projects
pub const TURBOSITE_SETUP_FILE: &str = "turbosite.json";

pub const README_FILE: &str = "README.md";
pub const EXTRAS_FOLDER: &str = "extras";
pub const TARGET_FOLDER: &str = "target";

/// Paths of the project being operated on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimePaths {
    root: PathBuf,
}

impl RuntimePaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Use the process working directory as project root
    pub fn from_current_dir() -> Result<Self> {
        let root = std::env::current_dir().context("Failed to read the current directory")?;
        Ok(Self::new(root))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Name of the root folder, used as project name when the setup does not define one
    pub fn root_folder_name(&self) -> String {
        self.root
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    pub fn setup_file(&self) -> PathBuf {
        self.root.join(SETUP_FILE)
    }

    pub fn setup_release_file(&self) -> PathBuf {
        self.root.join(SETUP_RELEASE_FILE)
    }

    pub fn turbosite_setup_file(&self) -> PathBuf {
        self.root.join(TURBOSITE_SETUP_FILE)
    }

    pub fn package_json(&self) -> PathBuf {
        self.root.join("package.json")
    }

    pub fn readme(&self) -> PathBuf {
        self.root.join(README_FILE)
    }

    pub fn src(&self) -> PathBuf {
        self.root.join("src")
    }

    pub fn main(&self) -> PathBuf {
        self.src().join("main")
    }

    pub fn extras(&self) -> PathBuf {
        self.root.join(EXTRAS_FOLDER)
    }

    pub fn target(&self) -> PathBuf {
        self.root.join(TARGET_FOLDER)
    }
}
