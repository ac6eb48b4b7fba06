//! Process execution for external tools.
//!
//! Tools run as child processes driven by a current-thread tokio runtime. The
//! orchestrator blocks on each child until it exits, so every tool invocation
//! is a single suspension point and tasks never overlap.

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::process::Stdio;

use tokio::process::Command;
use tokio::runtime::{Builder, Runtime};
use tracing::debug;

use super::ToolError;

/// A program with its arguments and working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCommand {
  pub program: String,
  pub args: Vec<OsString>,
  pub cwd: Option<PathBuf>,
}

impl ToolCommand {
  pub fn new(program: impl Into<String>) -> Self {
    Self {
      program: program.into(),
      args: Vec::new(),
      cwd: None,
    }
  }

  /// Build a command from a configured word list (program first).
  pub fn from_words(tool: &'static str, words: &[String]) -> Result<Self, ToolError> {
    let (program, args) = words.split_first().ok_or(ToolError::NotConfigured { tool })?;
    Ok(Self::new(program.clone()).args(args))
  }

  pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
    self.args.push(arg.as_ref().to_os_string());
    self
  }

  pub fn args<I, S>(mut self, args: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
  {
    self.args.extend(args.into_iter().map(|a| a.as_ref().to_os_string()));
    self
  }

  pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
    self.cwd = Some(dir.as_ref().to_path_buf());
    self
  }

  /// Human-readable command line for logs.
  pub fn display(&self) -> String {
    let mut line = self.program.clone();
    for arg in &self.args {
      line.push(' ');
      line.push_str(&arg.to_string_lossy());
    }
    line
  }

  fn to_command(&self) -> Command {
    let mut command = Command::new(&self.program);
    command.args(&self.args);
    if let Some(cwd) = &self.cwd {
      command.current_dir(cwd);
    }
    command
  }
}

/// Exit status and captured output of a finished tool.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolOutput {
  pub success: bool,
  pub code: Option<i32>,
  pub stdout: String,
  pub stderr: String,
}

impl ToolOutput {
  /// Non-empty output lines, stdout first.
  pub fn lines(&self) -> Vec<String> {
    self
      .stdout
      .lines()
      .chain(self.stderr.lines())
      .map(str::trim_end)
      .filter(|line| !line.trim().is_empty())
      .map(str::to_string)
      .collect()
  }
}

/// Runs tool processes to completion, one at a time.
pub struct ProcessRunner {
  runtime: Runtime,
}

impl ProcessRunner {
  pub fn new() -> Result<Self, ToolError> {
    let runtime = Builder::new_current_thread()
      .enable_all()
      .build()
      .map_err(ToolError::Runtime)?;
    Ok(Self { runtime })
  }

  /// Run a command, capturing stdout and stderr.
  pub fn capture(&self, command: &ToolCommand) -> Result<ToolOutput, ToolError> {
    self.runtime.block_on(capture_output(command))
  }

  /// Run a command with inherited stdio so its output streams to the user.
  pub fn stream(&self, command: &ToolCommand) -> Result<ToolOutput, ToolError> {
    self.runtime.block_on(stream_output(command))
  }
}

async fn capture_output(command: &ToolCommand) -> Result<ToolOutput, ToolError> {
  debug!(cmd = %command.display(), cwd = ?command.cwd, "spawning process");

  let output = command
    .to_command()
    .stdin(Stdio::null())
    .output()
    .await
    .map_err(|source| ToolError::Spawn {
      program: command.program.clone(),
      source,
    })?;

  let result = ToolOutput {
    success: output.status.success(),
    code: output.status.code(),
    stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
    stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
  };

  if !result.success {
    debug!(code = ?result.code, stderr = %result.stderr, "process failed");
  }

  Ok(result)
}

async fn stream_output(command: &ToolCommand) -> Result<ToolOutput, ToolError> {
  debug!(cmd = %command.display(), cwd = ?command.cwd, "spawning process");

  let status = command
    .to_command()
    .stdin(Stdio::null())
    .status()
    .await
    .map_err(|source| ToolError::Spawn {
      program: command.program.clone(),
      source,
    })?;

  Ok(ToolOutput {
    success: status.success(),
    code: status.code(),
    ..Default::default()
  })
}
