//! Generate phase: scaffold a new project in an empty folder

use crate::config::{RuntimePaths, SETUP_FILE};
use crate::console;
use crate::fs_utils::is_dir_empty;
use crate::setup::{customize_setup_template_to_project_type, ProjectType, SetupError};
use crate::templates::{check_compatibility, copy_template, TemplateFetcher};
use crate::BUILDER_VERSION;
use anyhow::{bail, Context, Result};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Value;

/// Create the structure of a `type_key` project at the paths root, with its default
/// `turbobuilder.json`
pub async fn generate(
    paths: &RuntimePaths,
    type_key: &str,
    fetcher: &mut TemplateFetcher,
) -> Result<()> {
    let project_type = ProjectType::from_key(type_key)
        .ok_or_else(|| SetupError::InvalidProjectType(type_key.to_string()))?;

    if paths.setup_file().exists() {
        bail!("File {} already exists", SETUP_FILE);
    }

    let root = paths.root();
    if root.exists() && !is_dir_empty(root)? {
        bail!("Current folder is not empty! :{}", root.display());
    }

    console::text(format!("\ngenerate {} start", project_type));

    let manifest = fetcher.fetch_template_manifest(project_type.key()).await?;
    if let Some(warning) = check_compatibility(BUILDER_VERSION, &manifest.version) {
        console::warning(warning);
    }

    let files = copy_template(fetcher, project_type.key(), &manifest, root).await?;
    std::fs::create_dir_all(paths.extras())
        .with_context(|| format!("Failed to create directory: {}", paths.extras().display()))?;
    tracing::debug!(count = files.len(), "copied template files");
    console::success(format!("Generated {} structure", project_type));

    let setup = customize_setup_template_to_project_type(project_type)?;
    std::fs::write(paths.setup_file(), to_setup_json(&setup)?)
        .with_context(|| format!("Failed to write {}", SETUP_FILE))?;
    console::success(format!("Created {} file", SETUP_FILE));

    console::success("Generated project structure ok");
    Ok(())
}

/// Setup file contents, indented with four spaces
fn to_setup_json(setup: &Value) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut buffer, PrettyFormatter::with_indent(b"    "));
    setup.serialize(&mut serializer)?;
    Ok(buffer)
}
