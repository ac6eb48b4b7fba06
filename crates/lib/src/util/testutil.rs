//! Test utilities for lathe-lib.
//!
//! Cross-platform shell helpers for tests that run real processes, and
//! in-memory tool fakes that record what the orchestrator asked of them.

use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::config::{Config, Reporter};
use crate::consts::{DECLARATION_ENTRY, DEFAULT_DECLARATIONS_DIR};
use crate::tools::{
  Bundler, CompileRequest, Compiler, DeclarationInstaller, Linter, TestOutcome, TestRunner, ToolError, Toolchain,
};
use crate::variant::{Artifact, BuildPlan, PipelineResult};
use crate::workflow::Context;

/// Returns the shell command and args to execute a shell script.
#[cfg(unix)]
pub fn shell_cmd(script: &str) -> (&'static str, Vec<String>) {
  ("/bin/sh", vec!["-c".to_string(), script.to_string()])
}

#[cfg(windows)]
pub fn shell_cmd(script: &str) -> (&'static str, Vec<String>) {
  ("cmd.exe", vec!["/C".to_string(), script.to_string()])
}

/// A configured tool command line that runs `script` in a shell.
///
/// Arguments appended by the orchestrator land in `$0`, `$1`, ... on Unix.
pub fn shell_words(script: &str) -> Vec<String> {
  let (program, args) = shell_cmd(script);
  std::iter::once(program.to_string()).chain(args).collect()
}

/// Returns the command and args to echo a message.
///
/// On Unix, this uses /bin/echo directly.
/// On Windows, echo is a shell builtin, so we wrap it in cmd.exe.
#[cfg(unix)]
pub fn echo_msg(msg: &str) -> (&'static str, Vec<String>) {
  ("/bin/echo", vec![msg.to_string()])
}

#[cfg(windows)]
pub fn echo_msg(msg: &str) -> (&'static str, Vec<String>) {
  ("cmd.exe", vec!["/C".to_string(), format!("echo {}", msg)])
}

/// Everything the fake tools were asked to do.
#[derive(Debug, Default)]
struct Calls {
  bundled: Vec<BuildPlan>,
  compiled: Vec<CompileRequest>,
  installs: Vec<PathBuf>,
  test_runs: Vec<(PathBuf, Reporter)>,
  linted: Vec<Vec<PathBuf>>,
}

/// In-memory toolchain. Clones share the same call log.
#[derive(Clone, Default)]
pub struct FakeTools {
  calls: Rc<RefCell<Calls>>,
  bundle_errors: Option<Vec<String>>,
  tests_fail: bool,
  install_fails: bool,
  lint_findings: Vec<String>,
}

impl FakeTools {
  /// Every bundle reports these diagnostics.
  pub fn failing_bundle(mut self, diagnostics: Vec<String>) -> Self {
    self.bundle_errors = Some(diagnostics);
    self
  }

  pub fn failing_tests(mut self) -> Self {
    self.tests_fail = true;
    self
  }

  pub fn failing_install(mut self) -> Self {
    self.install_fails = true;
    self
  }

  pub fn with_findings(mut self, findings: Vec<String>) -> Self {
    self.lint_findings = findings;
    self
  }

  pub fn toolchain(&self) -> Toolchain {
    Toolchain {
      bundler: Box::new(self.clone()),
      compiler: Box::new(self.clone()),
      test_runner: Box::new(self.clone()),
      installer: Box::new(self.clone()),
      ts_linter: Box::new(self.clone()),
      es_linter: Box::new(self.clone()),
    }
  }

  pub fn bundled(&self) -> Vec<BuildPlan> {
    self.calls.borrow().bundled.clone()
  }

  pub fn compiled(&self) -> Vec<CompileRequest> {
    self.calls.borrow().compiled.clone()
  }

  pub fn installs(&self) -> Vec<PathBuf> {
    self.calls.borrow().installs.clone()
  }

  pub fn test_runs(&self) -> Vec<(PathBuf, Reporter)> {
    self.calls.borrow().test_runs.clone()
  }

  pub fn linted(&self) -> Vec<Vec<PathBuf>> {
    self.calls.borrow().linted.clone()
  }
}

impl Bundler for FakeTools {
  fn bundle(&self, plan: &BuildPlan) -> Result<PipelineResult, ToolError> {
    self.calls.borrow_mut().bundled.push(plan.clone());

    if let Some(diagnostics) = &self.bundle_errors {
      return Ok(PipelineResult::failed(diagnostics.clone()));
    }

    let mut artifacts = Vec::new();
    if let Some(path) = plan.output_path() {
      fs::create_dir_all(&plan.output_dir)?;
      fs::write(&path, format!("// {}\n", plan.variant))?;
      artifacts.push(Artifact::new("main", path));
    }
    Ok(PipelineResult::succeeded(artifacts))
  }
}

impl Compiler for FakeTools {
  fn compile(&self, request: &CompileRequest) -> Result<PipelineResult, ToolError> {
    self.calls.borrow_mut().compiled.push(request.clone());
    fs::create_dir_all(&request.out_dir)?;
    Ok(PipelineResult::succeeded(Vec::new()))
  }
}

impl TestRunner for FakeTools {
  fn run_tests(&self, artifact: &Path, reporter: Reporter) -> Result<TestOutcome, ToolError> {
    self.calls.borrow_mut().test_runs.push((artifact.to_path_buf(), reporter));
    Ok(TestOutcome {
      passed: !self.tests_fail,
    })
  }
}

impl DeclarationInstaller for FakeTools {
  /// Writes the root declaration file, like a real installer would.
  fn install(&self, cwd: &Path) -> Result<(), ToolError> {
    self.calls.borrow_mut().installs.push(cwd.to_path_buf());
    if self.install_fails {
      return Err(ToolError::Failed {
        program: "fake-installer".to_string(),
        code: Some(1),
      });
    }

    let dir = cwd.join(DEFAULT_DECLARATIONS_DIR);
    fs::create_dir_all(&dir)?;
    fs::write(dir.join(DECLARATION_ENTRY), "/// <reference path=\"browser.d.ts\" />\n")?;
    Ok(())
  }
}

impl Linter for FakeTools {
  fn lint(&self, files: &[PathBuf]) -> Result<Vec<String>, ToolError> {
    self.calls.borrow_mut().linted.push(files.to_vec());
    Ok(self.lint_findings.clone())
  }
}

/// A shared context running against `tools`.
pub fn fake_context(config: Config, tools: &FakeTools) -> Rc<Context> {
  Rc::new(Context {
    config,
    toolchain: tools.toolchain(),
  })
}
