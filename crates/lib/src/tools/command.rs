//! Command-backed tool implementations.
//!
//! Each tool is a configured command line. The orchestrator appends the
//! per-invocation arguments and interprets the exit status and output.

use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use serde_json::json;
use tracing::debug;
use walkdir::WalkDir;

use super::process::{ProcessRunner, ToolCommand, ToolOutput};
use super::stats;
use super::{Bundler, CompileRequest, Compiler, DeclarationInstaller, Linter, TestOutcome, TestRunner, ToolError};
use crate::config::Reporter;
use crate::variant::{Artifact, BuildPlan, PipelineResult};

/// Bundler that receives the plan as a JSON file.
///
/// The plan is written to `<plan_dir>/<variant>.plan.json` and that path is
/// appended to the configured command.
pub struct CommandBundler {
  runner: Rc<ProcessRunner>,
  command: Vec<String>,
  cwd: PathBuf,
  plan_dir: PathBuf,
}

impl CommandBundler {
  pub fn new(runner: Rc<ProcessRunner>, command: Vec<String>, cwd: PathBuf, plan_dir: PathBuf) -> Self {
    Self {
      runner,
      command,
      cwd,
      plan_dir,
    }
  }

  fn write_plan(&self, plan: &BuildPlan) -> Result<PathBuf, ToolError> {
    fs::create_dir_all(&self.plan_dir)?;
    let path = self.plan_dir.join(format!("{}.plan.json", plan.variant));
    fs::write(&path, serde_json::to_string_pretty(plan)?)?;
    Ok(path)
  }
}

impl Bundler for CommandBundler {
  fn bundle(&self, plan: &BuildPlan) -> Result<PipelineResult, ToolError> {
    let plan_path = self.write_plan(plan)?;
    let command = ToolCommand::from_words("bundler", &self.command)?
      .arg(&plan_path)
      .current_dir(&self.cwd);

    let output = self.runner.capture(&command)?;

    if let Some((stats, raw)) = stats::parse(&output.stdout) {
      return Ok(stats.into_result(&plan.output_dir, raw, output.success));
    }

    // No statistics: fall back to the exit status.
    let raw = raw_output(&command, &output);
    if output.success {
      let artifacts = plan.output_path().map(|path| Artifact::new("main", path)).into_iter().collect();
      Ok(PipelineResult::succeeded(artifacts).with_stats(raw))
    } else {
      Ok(PipelineResult::failed(failure_lines(&command, &output)).with_stats(raw))
    }
  }
}

/// Compiler invoked with `tsc`-style flags followed by the file list.
pub struct CommandCompiler {
  runner: Rc<ProcessRunner>,
  command: Vec<String>,
  cwd: PathBuf,
}

impl CommandCompiler {
  pub fn new(runner: Rc<ProcessRunner>, command: Vec<String>, cwd: PathBuf) -> Self {
    Self { runner, command, cwd }
  }
}

impl Compiler for CommandCompiler {
  fn compile(&self, request: &CompileRequest) -> Result<PipelineResult, ToolError> {
    let mut command = ToolCommand::from_words("compiler", &self.command)?
      .args(["--target", request.target.as_str(), "--module", request.module.as_str()]);
    if request.source_maps {
      command = command.arg("--sourceMap");
    }
    if request.declarations {
      command = command.arg("--declaration");
    }
    let command = command
      .arg("--outDir")
      .arg(&request.out_dir)
      .args(&request.files)
      .current_dir(&self.cwd);

    let output = self.runner.capture(&command)?;
    let raw = raw_output(&command, &output);

    if !output.success {
      return Ok(PipelineResult::failed(failure_lines(&command, &output)).with_stats(raw));
    }

    let artifacts = emitted_files(&request.out_dir)?;
    Ok(PipelineResult::succeeded(artifacts).with_stats(raw))
  }
}

/// Test runner invoked as `<command> --reporter <name> <artifact>`.
pub struct CommandTestRunner {
  runner: Rc<ProcessRunner>,
  command: Vec<String>,
  cwd: PathBuf,
}

impl CommandTestRunner {
  pub fn new(runner: Rc<ProcessRunner>, command: Vec<String>, cwd: PathBuf) -> Self {
    Self { runner, command, cwd }
  }
}

impl TestRunner for CommandTestRunner {
  fn run_tests(&self, artifact: &Path, reporter: Reporter) -> Result<TestOutcome, ToolError> {
    let command = ToolCommand::from_words("test runner", &self.command)?
      .arg("--reporter")
      .arg(reporter.as_str())
      .arg(artifact)
      .current_dir(&self.cwd);

    let output = self.runner.stream(&command)?;
    Ok(TestOutcome { passed: output.success })
  }
}

/// Declaration installer run inside the project root.
pub struct CommandInstaller {
  runner: Rc<ProcessRunner>,
  command: Vec<String>,
}

impl CommandInstaller {
  pub fn new(runner: Rc<ProcessRunner>, command: Vec<String>) -> Self {
    Self { runner, command }
  }
}

impl DeclarationInstaller for CommandInstaller {
  fn install(&self, cwd: &Path) -> Result<(), ToolError> {
    let command = ToolCommand::from_words("declaration installer", &self.command)?.current_dir(cwd);
    let output = self.runner.capture(&command)?;

    if !output.stdout.trim().is_empty() {
      debug!(stdout = %output.stdout.trim(), "installer output");
    }

    if !output.success {
      return Err(ToolError::Failed {
        program: command.program,
        code: output.code,
      });
    }

    Ok(())
  }
}

/// Linter invoked with the files to check; a non-zero exit means findings.
pub struct CommandLinter {
  runner: Rc<ProcessRunner>,
  name: &'static str,
  command: Vec<String>,
  cwd: PathBuf,
}

impl CommandLinter {
  pub fn new(runner: Rc<ProcessRunner>, name: &'static str, command: Vec<String>, cwd: PathBuf) -> Self {
    Self {
      runner,
      name,
      command,
      cwd,
    }
  }
}

impl Linter for CommandLinter {
  fn lint(&self, files: &[PathBuf]) -> Result<Vec<String>, ToolError> {
    if files.is_empty() {
      return Ok(Vec::new());
    }

    let command = ToolCommand::from_words(self.name, &self.command)?
      .args(files)
      .current_dir(&self.cwd);
    let output = self.runner.capture(&command)?;

    if output.success {
      return Ok(Vec::new());
    }
    Ok(failure_lines(&command, &output))
  }
}

fn failure_lines(command: &ToolCommand, output: &ToolOutput) -> Vec<String> {
  let lines = output.lines();
  if lines.is_empty() {
    return vec![format!("{} exited with code {:?}", command.program, output.code)];
  }
  lines
}

fn raw_output(command: &ToolCommand, output: &ToolOutput) -> serde_json::Value {
  json!({
    "command": command.display(),
    "code": output.code,
    "stdout": output.stdout,
    "stderr": output.stderr,
  })
}

/// Every file under `out_dir`, keyed by its path relative to `out_dir`.
fn emitted_files(out_dir: &Path) -> Result<Vec<Artifact>, ToolError> {
  if !out_dir.exists() {
    return Ok(Vec::new());
  }

  let mut artifacts = Vec::new();
  for entry in WalkDir::new(out_dir).sort_by_file_name() {
    let entry = entry.map_err(std::io::Error::from)?;
    if !entry.file_type().is_file() {
      continue;
    }
    let chunk = entry
      .path()
      .strip_prefix(out_dir)
      .unwrap_or(entry.path())
      .to_string_lossy()
      .into_owned();
    artifacts.push(Artifact::new(chunk, entry.path()));
  }
  Ok(artifacts)
}
