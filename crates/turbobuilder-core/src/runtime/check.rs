//! Availability checks for external tools

use crate::config::{Tool, Toolchain};
use crate::setup::{ProjectType, Setup};
use anyhow::Result;
use std::process::Command;

/// Tool detection result
#[derive(Debug, Clone)]
pub struct ToolInfo {
    pub tool: Tool,
    pub program: String,
    pub version: Option<String>,
    pub available: bool,
}

/// Check if a tool can be launched, reading its version on the way
pub fn check_tool(toolchain: &Toolchain, tool: Tool) -> ToolInfo {
    let program = toolchain.program(tool).to_string();
    let output = Command::new(&program).args(tool.version_args()).output();

    match output {
        Ok(out) if out.status.success() => {
            let stdout = String::from_utf8_lossy(&out.stdout);
            let version = stdout.lines().next().unwrap_or_default().trim().to_string();
            ToolInfo {
                tool,
                program,
                version: Some(version),
                available: true,
            }
        }
        _ => ToolInfo {
            tool,
            program,
            version: None,
            available: false,
        },
    }
}

/// Tools the build (or release) of a project needs on the machine
pub fn required_tools(project_type: ProjectType, setup: &Setup, is_release: bool) -> Vec<Tool> {
    let mut tools = Vec::new();

    match project_type {
        ProjectType::LibPhp => tools.push(Tool::Php),
        ProjectType::LibTs => {
            tools.push(Tool::Tsc);
            let has_targets = setup
                .build
                .lib_ts
                .as_ref()
                .is_some_and(|lib_ts| !lib_ts.targets.is_empty());
            if has_targets {
                tools.push(Tool::Webpack);
            }
        }
        ProjectType::AppAngular | ProjectType::LibAngular => tools.push(Tool::Ng),
        _ => {}
    }

    if is_release {
        let release = &setup.release;
        if release.optimize_js {
            tools.push(Tool::UglifyJs);
        }
        if release.optimize_pictures {
            tools.push(Tool::ImageMinifier);
        }
        if release.generate_code_documentation {
            match project_type {
                ProjectType::LibTs => tools.push(Tool::TypeDoc),
                ProjectType::LibPhp => tools.push(Tool::PhpDoc),
                _ => {}
            }
        }
        if release.git_change_log {
            tools.push(Tool::Git);
        }
    }

    tools
}

/// Check every tool, failing with the whole list of missing ones
pub fn check_tools(toolchain: &Toolchain, tools: &[Tool]) -> Result<Vec<ToolInfo>> {
    let mut results = Vec::new();
    let mut missing = Vec::new();

    for tool in tools {
        let info = check_tool(toolchain, *tool);
        if info.available {
            tracing::debug!(
                tool = %info.tool,
                program = %info.program,
                version = info.version.as_deref().unwrap_or_default(),
                "tool available"
            );
            results.push(info);
        } else {
            missing.push(format!(
                "{} '{}' (install: {}, or set {})",
                tool,
                info.program,
                tool.install_hint(),
                tool.env_var()
            ));
        }
    }

    if !missing.is_empty() {
        anyhow::bail!(
            "Missing required tools:\n{}",
            missing
                .iter()
                .map(|m| format!("  - {}", m))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }

    Ok(results)
}
