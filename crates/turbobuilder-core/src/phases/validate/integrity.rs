//! Consistency between `turbobuilder.json` and `package.json`

use super::ValidationReport;
use crate::phases::ProjectContext;
use crate::setup::ProjectType;
use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
struct PackageMetadata {
    #[serde(default)]
    name: String,
    #[serde(default)]
    description: String,
}

/// When a package.json exists its name and description must match the setup metadata
pub(super) fn validate_package_json(
    ctx: &ProjectContext,
    report: &mut ValidationReport,
) -> Result<()> {
    let package_path = if ctx.project_type == ProjectType::LibAngular {
        ctx.angular_library_root().join("package.json")
    } else {
        ctx.paths.package_json()
    };

    if !package_path.is_file() {
        return Ok(());
    }

    let package: PackageMetadata = match serde_json::from_str(&std::fs::read_to_string(&package_path)?) {
        Ok(package) => package,
        Err(e) => {
            report.error(format!("Corrupted JSON for {}:\n{}", package_path.display(), e));
            return Ok(());
        }
    };

    let metadata = &ctx.setup.metadata;
    if metadata.name != package.name || metadata.description != package.description {
        report.error(format!(
            "Name and description must match between the following files:\n{}\n{}",
            ctx.paths.setup_file().display(),
            package_path.display()
        ));
    }

    Ok(())
}
