//! External tool detection and execution
//!
//! This module provides:
//! - Availability checks for the toolchain a project type needs
//! - A command runner that captures or streams the output of external tools

pub mod check;
pub mod tool;

pub use check::{check_tool, check_tools, required_tools, ToolInfo};
pub use tool::{ToolCommand, ToolOutput};
