//! TurboBuilder Core - Shared library for the `turbobuilder` CLI
//!
//! This library contains everything the CLI does: generating project skeletons from
//! templates, loading and merging the `turbobuilder.json` setup, and running the build,
//! release, validate, sync, test and clean phases. Most phases are sequences of file
//! operations plus invocations of external toolchains (tsc, webpack, php, git, WinSCP...).
//!
//! # Architecture
//!
//! The library is organized into layers:
//!
//! - **Layer 1: Core Operations** - Setup loading/merging, template fetching and copying,
//!   external tool detection and invocation, git helpers
//! - **Layer 2: Phases** - `ProjectContext` plus one module per CLI phase
//! - **Layer 3: CLI** - The `turbobuilder` binary crate parses flags and dispatches phases
//!
//! # Example Usage
//!
//! ```ignore
//! use turbobuilder_core::{phases, ProjectContext, RuntimePaths, Toolchain};
//!
//! let paths = RuntimePaths::from_current_dir()?;
//! let ctx = ProjectContext::load(paths, Toolchain::from_env(), false)?;
//! phases::build(&ctx).await?;
//! ```

pub mod config;
pub mod console;
pub mod git;
pub mod phases;
pub mod runtime;
pub mod setup;
pub mod templates;

mod fs_utils;

// Re-export main types for convenience
pub use config::{RuntimePaths, Tool, Toolchain};
pub use phases::ProjectContext;
pub use setup::{ProjectType, Setup, SetupError};
pub use templates::{
    copy_template, RootManifest, TemplateFetcher, TemplateManifest, TemplateSource,
};

/// Builder version - written to `metadata.builderVersion` of generated setups and
/// compared against it on every run
pub const BUILDER_VERSION: &str = env!("CARGO_PKG_VERSION");
