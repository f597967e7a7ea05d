//! Setup template customization, project type detection and setup loading

use super::error::SetupError;
use super::merge::merge;
use super::model::Setup;
use super::project_type::ProjectType;
use crate::config::{RuntimePaths, SETUP_FILE, SETUP_RELEASE_FILE};
use crate::BUILDER_VERSION;
use serde_json::{json, Value};
use std::path::Path;
use tracing::debug;

/// Shared setup template every project setup is derived from
const SHARED_SETUP_TEMPLATE: &str = include_str!("../../assets/turbobuilder.json");

/// Find the single project type enabled on the `build` section of a raw setup
pub fn detect_project_type_from_setup(setup: &Value) -> Result<ProjectType, SetupError> {
    let found: Vec<ProjectType> = setup
        .get("build")
        .and_then(Value::as_object)
        .map(|build| {
            build
                .keys()
                .filter_map(|key| ProjectType::from_key(key))
                .collect()
        })
        .unwrap_or_default();

    match found.as_slice() {
        [] => Err(SetupError::NoProjectType {
            types: ProjectType::key_list(),
            file: SETUP_FILE,
        }),
        [project_type] => Ok(*project_type),
        _ => Err(SetupError::MultipleProjectTypes(
            ProjectType::ALL
                .iter()
                .map(|t| t.key())
                .collect::<Vec<_>>()
                .join(","),
        )),
    }
}

/// Build the default setup of a project type from the shared template
pub fn customize_setup_template_to_project_type(
    project_type: ProjectType,
) -> Result<Value, SetupError> {
    let mut setup: Value = serde_json::from_str(SHARED_SETUP_TEMPLATE)
        .map_err(|e| SetupError::Template(e.to_string()))?;

    setup["metadata"]["builderVersion"] = json!(BUILDER_VERSION);

    if let Some(validate) = setup.get_mut("validate").and_then(Value::as_object_mut) {
        if let Some(files_content) = validate
            .get_mut("filesContent")
            .and_then(Value::as_object_mut)
        {
            files_content.insert("copyrightHeaders".to_string(), json!([]));
        }
        if project_type != ProjectType::SitePhp {
            validate.remove("sitePhp");
        }
        if !project_type.is_php() {
            validate.remove("php");
        }
        if project_type != ProjectType::AppAngular {
            validate.remove("angularApp");
        }
    }

    if let Some(build) = setup.get_mut("build").and_then(Value::as_object_mut) {
        build.retain(|key, _| match ProjectType::from_key(key) {
            Some(found) => found == project_type,
            None => true,
        });
    }

    setup["sync"] = if project_type.is_turbosite() {
        json!({
            "runAfterBuild": false,
            "type": "fileSystem",
            "excludes": [],
            "sourcePath": "dist/site/",
            "destPath": "C:/turbosite-webserver-symlink",
            "remoteUrl": "https://localhost/dev",
            "deleteDestPathContents": true
        })
    } else {
        json!([])
    };

    let tests: Vec<Value> = setup
        .get("test")
        .and_then(Value::as_array)
        .map(|entries| {
            entries
                .iter()
                .filter(|entry| keeps_test_entry(project_type, entry))
                .cloned()
                .collect()
        })
        .unwrap_or_default();
    setup["test"] = Value::Array(tests);

    Ok(setup)
}

fn keeps_test_entry(project_type: ProjectType, entry: &Value) -> bool {
    let kind = entry.get("type").and_then(Value::as_str).unwrap_or_default();
    match project_type {
        ProjectType::LibPhp => kind == "phpUnit",
        ProjectType::SitePhp => kind == "phpUnit" || kind == "jasmine",
        ProjectType::LibJs | ProjectType::LibTs => kind == "jasmine",
        _ => false,
    }
}

fn read_json(path: &Path) -> Result<Value, SetupError> {
    let content = std::fs::read_to_string(path).map_err(|e| SetupError::Io {
        path: path.display().to_string(),
        detail: e.to_string(),
    })?;
    serde_json::from_str(&content).map_err(|e| SetupError::Corrupted {
        path: path.display().to_string(),
        detail: e.to_string(),
    })
}

/// Load the project setup: template for the detected type, project file merged over it,
/// and for release runs the release file merged over that
pub fn load_setup_value(paths: &RuntimePaths, is_release: bool) -> Result<Value, SetupError> {
    let setup_path = paths.setup_file();
    if !setup_path.is_file() {
        return Err(SetupError::NotFound(SETUP_FILE));
    }

    let project_setup = read_json(&setup_path)?;
    let project_type = detect_project_type_from_setup(&project_setup)?;
    debug!(%project_type, path = %setup_path.display(), "loaded project setup");

    let mut setup = customize_setup_template_to_project_type(project_type)?;
    merge(&mut setup, &project_setup);

    let release_path = paths.setup_release_file();
    if is_release && release_path.is_file() {
        debug!(path = %release_path.display(), "merging release setup");
        merge(&mut setup, &read_json(&release_path)?);
    }

    Ok(setup)
}

/// Load and type the project setup
pub fn load_setup(paths: &RuntimePaths, is_release: bool) -> Result<Setup, SetupError> {
    let value = load_setup_value(paths, is_release)?;
    let file = if is_release && paths.setup_release_file().is_file() {
        SETUP_RELEASE_FILE
    } else {
        SETUP_FILE
    };
    serde_json::from_value(value).map_err(|e| SetupError::Schema {
        file,
        detail: e.to_string(),
    })
}

/// Compare the builder version expected by the setup with the running one.
/// Returns a warning message when they differ.
pub fn validate_builder_version(setup: &Setup) -> Result<Option<String>, SetupError> {
    let expected = setup.metadata.builder_version.trim();

    if expected.is_empty() {
        return Err(SetupError::MissingBuilderVersion(SETUP_FILE));
    }

    if expected != BUILDER_VERSION {
        return Ok(Some(format!(
            "Warning: Current turbobuilder version ({}) does not match expected ({})",
            BUILDER_VERSION, expected
        )));
    }

    Ok(None)
}
