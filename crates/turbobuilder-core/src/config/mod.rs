//! Runtime configuration
//!
//! This module provides:
//! - Well-known file and folder names of a TurboBuilder project
//! - Paths resolved against the project root
//! - External tool program names with environment overrides

pub mod paths;
pub mod toolchain;

pub use paths::{
    RuntimePaths, EXTRAS_FOLDER, README_FILE, SETUP_FILE, SETUP_RELEASE_FILE, TARGET_FOLDER,
    TURBOSITE_SETUP_FILE,
};
pub use toolchain::{Tool, Toolchain};

/// Environment variable used to fetch templates from a remote location
pub const TEMPLATE_URL_ENV: &str = "TURBOBUILDER_TEMPLATE_URL";

/// User agent for HTTP requests
pub const USER_AGENT: &str = "turbobuilder";
