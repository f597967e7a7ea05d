//! Command phases: generate, build, release, validate, sync, test and clean
//!
//! Every phase except generate and clean works on a [`ProjectContext`]: the loaded
//! setup of the project in the current folder plus the runtime details of this run.

pub mod build;
pub mod clean;
pub mod generate;
pub mod release;
pub mod sync;
pub mod testing;
pub mod validate;

use crate::config::{RuntimePaths, Toolchain};
use crate::git::Git;
use crate::setup::{load_setup, ProjectType, Setup};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::PathBuf;

pub use build::build;
pub use clean::clean;
pub use generate::generate;
pub use release::release;
pub use sync::sync;
pub use testing::test;
pub use validate::validate;

/// Projects declared on an angular workspace `angular.json`
#[derive(Debug, Default, Deserialize)]
struct AngularWorkspace {
    #[serde(default)]
    projects: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AngularProject {
    #[serde(default)]
    project_type: String,
    #[serde(default)]
    root: String,
}

/// Everything a phase needs to know about the project being processed
#[derive(Debug, Clone)]
pub struct ProjectContext {
    pub paths: RuntimePaths,
    pub toolchain: Toolchain,
    pub setup: Setup,
    pub project_type: ProjectType,
    /// Project semver from the newest git tag
    pub version: String,
    pub is_release: bool,
}

impl ProjectContext {
    /// Load the project setup (merging the release setup for release runs)
    pub fn load(paths: RuntimePaths, toolchain: Toolchain, is_release: bool) -> Result<Self> {
        let setup = load_setup(&paths, is_release)?;
        let version = Git::new(&toolchain, paths.root()).repo_semver(false);
        Self::from_parts(paths, toolchain, setup, version, is_release)
    }

    pub fn from_parts(
        paths: RuntimePaths,
        toolchain: Toolchain,
        setup: Setup,
        version: String,
        is_release: bool,
    ) -> Result<Self> {
        let project_type = setup
            .project_type()
            .context("No valid project type specified under build section")?;

        Ok(Self {
            paths,
            toolchain,
            setup,
            project_type,
            version,
            is_release,
        })
    }

    /// `metadata.name`, or the project folder name when it is empty
    pub fn project_name(&self) -> String {
        let name = self.setup.metadata.name.trim();
        if name.is_empty() {
            self.paths.root_folder_name()
        } else {
            name.to_string()
        }
    }

    /// Root of the library inside a lib_angular workspace: the first `library` project of
    /// `angular.json`, or `projects/<name>` when none is declared
    pub fn angular_library_root(&self) -> PathBuf {
        let declared = std::fs::read_to_string(self.paths.root().join("angular.json"))
            .ok()
            .and_then(|contents| serde_json::from_str::<AngularWorkspace>(&contents).ok())
            .and_then(|workspace| {
                workspace.projects.into_iter().find_map(|(_, project)| {
                    serde_json::from_value::<AngularProject>(project)
                        .ok()
                        .filter(|project| project.project_type == "library" && !project.root.is_empty())
                        .map(|project| project.root)
                })
            });

        match declared {
            Some(root) => self.paths.root().join(root),
            None => self.paths.root().join("projects").join(self.project_name()),
        }
    }

    /// `target/<name>` for builds, `target/<name>-<version>` for releases
    pub fn target_folder(&self) -> PathBuf {
        let folder = if self.is_release {
            format!("{}-{}", self.project_name(), self.version)
        } else {
            self.project_name()
        };
        self.paths.target().join(folder)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::setup::customize_setup_template_to_project_type;
    use crate::setup::merge::merge;
    use serde_json::Value;
    use std::path::Path;

    /// Context for a project at `root`, with the default setup of its type and `overrides`
    /// merged over it
    pub fn context(root: &Path, project_type: ProjectType, overrides: Value) -> ProjectContext {
        let mut value = customize_setup_template_to_project_type(project_type).unwrap();
        merge(&mut value, &overrides);
        let setup: Setup = serde_json::from_value(value).unwrap();
        ProjectContext::from_parts(
            RuntimePaths::new(root),
            Toolchain::default(),
            setup,
            "1.2.3".to_string(),
            false,
        )
        .unwrap()
    }

    pub fn write(root: &Path, relative: &str, contents: &str) {
        let path = root.join(relative);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, contents).unwrap();
    }

    /// Executable shell script at `dir/name` standing in for an external tool
    #[cfg(unix)]
    pub fn fake_tool(dir: &Path, name: &str, script: &str) -> String {
        use std::os::unix::fs::PermissionsExt;

        let path = dir.join(name);
        std::fs::write(&path, format!("#!/bin/sh\n{}", script)).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path.to_string_lossy().into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::context;
    use super::*;
    use serde_json::json;

    #[test]
    fn test_project_name_falls_back_to_folder() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("my-lib");
        std::fs::create_dir_all(&root).unwrap();

        let unnamed = context(&root, ProjectType::LibJs, json!({}));
        assert_eq!(unnamed.project_name(), "my-lib");

        let named = context(&root, ProjectType::LibJs, json!({ "metadata": { "name": "turbo" } }));
        assert_eq!(named.project_name(), "turbo");
    }

    #[test]
    fn test_target_folder_depends_on_release() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = context(dir.path(), ProjectType::LibJs, json!({ "metadata": { "name": "turbo" } }));

        assert_eq!(ctx.target_folder(), dir.path().join("target/turbo"));
        ctx.is_release = true;
        assert_eq!(ctx.target_folder(), dir.path().join("target/turbo-1.2.3"));
    }

    #[test]
    fn test_angular_library_root_from_workspace() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(dir.path(), ProjectType::LibAngular, json!({ "metadata": { "name": "widgets" } }));
        assert_eq!(ctx.angular_library_root(), dir.path().join("projects/widgets"));

        std::fs::write(
            dir.path().join("angular.json"),
            r#"{ "projects": {
                "demo": { "projectType": "application", "root": "" },
                "library": { "projectType": "library", "root": "projects/library" }
            } }"#,
        )
        .unwrap();
        assert_eq!(ctx.angular_library_root(), dir.path().join("projects/library"));
    }
}
