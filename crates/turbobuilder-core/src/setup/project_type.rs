//! Supported project types

use super::error::SetupError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Project types, each one backed by a template and a `build.<type>` setup key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectType {
    LibPhp,
    LibTs,
    LibJs,
    SitePhp,
    ServerPhp,
    AppAngular,
    LibAngular,
    AppNodeCmd,
}

impl ProjectType {
    pub const ALL: [ProjectType; 8] = [
        ProjectType::LibPhp,
        ProjectType::LibTs,
        ProjectType::LibJs,
        ProjectType::SitePhp,
        ProjectType::ServerPhp,
        ProjectType::AppAngular,
        ProjectType::LibAngular,
        ProjectType::AppNodeCmd,
    ];

    /// Key used on the setup `build` section and as template directory name
    pub fn key(&self) -> &'static str {
        match self {
            ProjectType::LibPhp => "lib_php",
            ProjectType::LibTs => "lib_ts",
            ProjectType::LibJs => "lib_js",
            ProjectType::SitePhp => "site_php",
            ProjectType::ServerPhp => "server_php",
            ProjectType::AppAngular => "app_angular",
            ProjectType::LibAngular => "lib_angular",
            ProjectType::AppNodeCmd => "app_node_cmd",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|t| t.key() == key)
    }

    /// All keys, comma separated, for error messages
    pub fn key_list() -> String {
        Self::ALL
            .iter()
            .map(|t| t.key())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// site_php and server_php projects carry a turbosite.json
    pub fn is_turbosite(&self) -> bool {
        matches!(self, ProjectType::SitePhp | ProjectType::ServerPhp)
    }

    pub fn is_php(&self) -> bool {
        matches!(
            self,
            ProjectType::LibPhp | ProjectType::SitePhp | ProjectType::ServerPhp
        )
    }

    pub fn is_angular(&self) -> bool {
        matches!(self, ProjectType::AppAngular | ProjectType::LibAngular)
    }
}

impl fmt::Display for ProjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

impl FromStr for ProjectType {
    type Err = SetupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_key(s.trim()).ok_or_else(|| SetupError::InvalidProjectType(s.to_string()))
    }
}
