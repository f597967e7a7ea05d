//! Template manifest types and parsing

use serde::{Deserialize, Serialize};

/// A shared file from the root templates directory that gets copied into every project
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SharedFile {
    /// Source path relative to the templates directory
    pub source: String,

    /// Destination path in each project (defaults to source if not specified)
    #[serde(default)]
    pub dest: Option<String>,
}

impl SharedFile {
    /// Get the destination path (falls back to source if dest not specified)
    pub fn destination(&self) -> &str {
        self.dest.as_deref().unwrap_or(&self.source)
    }
}

/// Root template manifest (templates/template.yaml)
/// Lists the project type templates and the files shared by all of them
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RootManifest {
    /// Template directory names, one per project type
    pub templates: Vec<String>,

    /// Shared files from the root templates directory to include in every project
    /// Supports renaming via source/dest mapping
    #[serde(default)]
    pub shared_files: Vec<SharedFile>,
}

impl RootManifest {
    pub fn contains(&self, template_name: &str) -> bool {
        self.templates.iter().any(|t| t == template_name)
    }
}

/// Per-template manifest (templates/<project_type>/template.yaml)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateManifest {
    /// Project type this template generates
    pub name: String,

    /// Description of what the template provides
    pub description: String,

    /// Minimum builder version the template was written for
    pub version: String,

    /// Explicit list of files to copy
    pub files: Vec<String>,
}
