//! Setup loading errors

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SetupError {
    #[error("{0} setup file not found")]
    NotFound(&'static str),

    #[error("Corrupted JSON for {path}:\n{detail}")]
    Corrupted { path: String, detail: String },

    #[error("invalid project type: {0}")]
    InvalidProjectType(String),

    #[error("No valid project type specified. Please enable any of [{types}] under build section in {file}")]
    NoProjectType { types: String, file: &'static str },

    #[error("Please specify only one of the following on build setup: {0}")]
    MultipleProjectTypes(String),

    #[error("Invalid JSON schema for {file}:\n{detail}")]
    Schema { file: &'static str, detail: String },

    #[error("metadata.builderVersion not specified on {0}")]
    MissingBuilderVersion(&'static str),

    #[error("Corrupted setup template: {0}")]
    Template(String),

    #[error("Could not read {path}: {detail}")]
    Io { path: String, detail: String },
}
