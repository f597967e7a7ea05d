//! Project setup (`turbobuilder.json`)
//!
//! This module provides:
//! - The typed setup model (its deserialization is the schema check)
//! - Project type detection from a raw setup
//! - Customization of the shared setup template per project type
//! - Loading: template + project file + release file, deep merged

pub mod error;
pub mod loader;
pub mod merge;
pub mod model;
pub mod project_type;

pub use error::SetupError;
pub use loader::{
    customize_setup_template_to_project_type, detect_project_type_from_setup, load_setup,
    load_setup_value, validate_builder_version,
};
pub use model::Setup;
pub use project_type::ProjectType;
