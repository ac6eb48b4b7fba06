//! External tool contracts.
//!
//! The compiler, bundler, test runner, linter and declaration installer are
//! opaque to the orchestrator. Each one is a trait here; the orchestrator only
//! relies on the inputs it hands over and the result it gets back. Every call
//! blocks until the tool has finished.

pub mod command;
pub mod process;
pub mod stats;

use std::path::{Path, PathBuf};
use std::rc::Rc;

use thiserror::Error;

use crate::config::{Config, Reporter};
use crate::variant::{BuildPlan, LanguageLevel, ModuleFormat, PipelineResult};

pub use command::{CommandBundler, CommandCompiler, CommandInstaller, CommandLinter, CommandTestRunner};
pub use process::{ProcessRunner, ToolCommand, ToolOutput};

/// Errors that can occur when invoking an external tool.
#[derive(Debug, Error)]
pub enum ToolError {
  /// No command is configured for the tool.
  #[error("no command configured for the {tool}")]
  NotConfigured { tool: &'static str },

  /// The tool process could not be started.
  #[error("failed to start {program}: {source}")]
  Spawn {
    program: String,
    #[source]
    source: std::io::Error,
  },

  /// The async runtime driving tool processes could not be created.
  #[error("failed to create process runtime: {0}")]
  Runtime(#[source] std::io::Error),

  /// The tool exited unsuccessfully.
  #[error("{program} exited with code {code:?}")]
  Failed { program: String, code: Option<i32> },

  #[error("io error: {0}")]
  Io(#[from] std::io::Error),

  #[error("failed to serialize tool input: {0}")]
  Serialize(#[from] serde_json::Error),
}

/// Input to a direct compiler run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileRequest {
  pub files: Vec<PathBuf>,
  pub target: LanguageLevel,
  pub module: ModuleFormat,
  pub declarations: bool,
  pub source_maps: bool,
  pub out_dir: PathBuf,
}

/// Result of a test runner invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TestOutcome {
  pub passed: bool,
}

/// Consumes a build plan and produces bundles.
pub trait Bundler {
  fn bundle(&self, plan: &BuildPlan) -> Result<PipelineResult, ToolError>;
}

/// Compiles a file set one output file per input file.
pub trait Compiler {
  fn compile(&self, request: &CompileRequest) -> Result<PipelineResult, ToolError>;
}

/// Runs a built test bundle.
pub trait TestRunner {
  fn run_tests(&self, artifact: &Path, reporter: Reporter) -> Result<TestOutcome, ToolError>;
}

/// Installs type declarations into a working directory.
pub trait DeclarationInstaller {
  fn install(&self, cwd: &Path) -> Result<(), ToolError>;
}

/// Checks source files and returns findings.
pub trait Linter {
  fn lint(&self, files: &[PathBuf]) -> Result<Vec<String>, ToolError>;
}

/// One implementation of every external tool.
pub struct Toolchain {
  pub bundler: Box<dyn Bundler>,
  pub compiler: Box<dyn Compiler>,
  pub test_runner: Box<dyn TestRunner>,
  pub installer: Box<dyn DeclarationInstaller>,
  pub ts_linter: Box<dyn Linter>,
  pub es_linter: Box<dyn Linter>,
}

impl Toolchain {
  /// Build command-backed tools from the configured commands.
  pub fn from_config(config: &Config) -> Result<Self, ToolError> {
    let runner = Rc::new(ProcessRunner::new()?);
    let tools = &config.tools;
    let cwd = config.dirs.root.clone();

    Ok(Self {
      bundler: Box::new(CommandBundler::new(
        Rc::clone(&runner),
        tools.bundler.clone(),
        cwd.clone(),
        config.dirs.build.clone(),
      )),
      compiler: Box::new(CommandCompiler::new(Rc::clone(&runner), tools.compiler.clone(), cwd.clone())),
      test_runner: Box::new(CommandTestRunner::new(Rc::clone(&runner), tools.test_runner.clone(), cwd.clone())),
      installer: Box::new(CommandInstaller::new(Rc::clone(&runner), tools.installer.clone())),
      ts_linter: Box::new(CommandLinter::new(
        Rc::clone(&runner),
        "TypeScript linter",
        tools.ts_linter.clone(),
        cwd.clone(),
      )),
      es_linter: Box::new(CommandLinter::new(runner, "script linter", tools.es_linter.clone(), cwd)),
    })
  }
}
