//! Running external tools
//!
//! Short commands are run to completion and their output captured. Long running ones
//! (test suites, angular builds) stream their output line by line while they run.

use crate::config::{Tool, Toolchain};
use anyhow::{Context, Result};
use colored::Colorize;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command as TokioCommand;

/// Captured result of a finished command
#[derive(Debug, Clone)]
pub struct ToolOutput {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

/// An external command line
#[derive(Debug, Clone)]
pub struct ToolCommand {
    program: String,
    args: Vec<OsString>,
    current_dir: Option<PathBuf>,
    /// Arguments carry credentials and must not be logged
    redacted: bool,
}

impl ToolCommand {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            current_dir: None,
            redacted: false,
        }
    }

    /// Command for a tool, using the program configured on the toolchain
    pub fn for_tool(toolchain: &Toolchain, tool: Tool) -> Self {
        Self::new(toolchain.program(tool))
    }

    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.current_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Hide the arguments from logs and error messages
    pub fn redacted(mut self) -> Self {
        self.redacted = true;
        self
    }

    /// Printable form of the command
    pub fn command_line(&self) -> String {
        if self.redacted {
            return format!("{} ***", self.program);
        }
        std::iter::once(self.program.clone())
            .chain(self.args.iter().map(|a| a.to_string_lossy().into_owned()))
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn std_command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command.args(&self.args);
        if let Some(dir) = &self.current_dir {
            command.current_dir(dir);
        }
        command
    }

    /// Run to completion capturing the output. Fails only when the program cannot start
    pub fn output(&self) -> Result<ToolOutput> {
        tracing::debug!(command = %self.command_line(), "running");
        let output = self
            .std_command()
            .output()
            .with_context(|| format!("Failed to run {}", self.program))?;

        Ok(ToolOutput {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }

    /// Run to completion, failing with the command output when it exits with an error
    pub fn run(&self) -> Result<String> {
        let output = self.output()?;
        if !output.success {
            let detail = if output.stderr.trim().is_empty() {
                output.stdout.trim()
            } else {
                output.stderr.trim()
            };
            anyhow::bail!("{} failed:\n{}", self.command_line(), detail);
        }
        Ok(output.stdout)
    }

    /// Run while printing its output as it is produced. Returns whether it succeeded
    pub async fn stream(&self) -> Result<bool> {
        tracing::debug!(command = %self.command_line(), "streaming");

        let mut command = TokioCommand::new(&self.program);
        command
            .args(&self.args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(dir) = &self.current_dir {
            command.current_dir(dir);
        }

        let mut child = command
            .spawn()
            .with_context(|| format!("Failed to run {}", self.program))?;

        let stdout = child
            .stdout
            .take()
            .context("Failed to capture stdout")?;
        let stderr = child
            .stderr
            .take()
            .context("Failed to capture stderr")?;

        let mut stdout_reader = BufReader::new(stdout).lines();
        let mut stderr_reader = BufReader::new(stderr).lines();
        let mut stdout_open = true;
        let mut stderr_open = true;

        while stdout_open || stderr_open {
            tokio::select! {
                line = stdout_reader.next_line(), if stdout_open => {
                    match line {
                        Ok(Some(line)) => println!("{}", line),
                        Ok(None) => stdout_open = false,
                        Err(e) => {
                            eprintln!("{} {}", "Error reading stdout:".red(), e);
                            stdout_open = false;
                        }
                    }
                }
                line = stderr_reader.next_line(), if stderr_open => {
                    match line {
                        Ok(Some(line)) => eprintln!("{}", line.yellow()),
                        Ok(None) => stderr_open = false,
                        Err(e) => {
                            eprintln!("{} {}", "Error reading stderr:".red(), e);
                            stderr_open = false;
                        }
                    }
                }
            }
        }

        let status = child
            .wait()
            .await
            .with_context(|| format!("Failed to wait for {}", self.program))?;

        Ok(status.success())
    }
}
