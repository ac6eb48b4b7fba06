//! The standard task set.
//!
//! Every task closes over one shared [`Context`]: the resolved configuration
//! and the toolchain. Task names follow `group:detail`, with bare group names
//! as aliases for the common case.

use std::path::{Path, PathBuf};
use std::rc::Rc;

use thiserror::Error;
use tracing::{info, warn};
use walkdir::WalkDir;

use crate::clean::clean;
use crate::config::{Config, Setting};
use crate::consts::{SCRIPT_EXTENSION, SOURCE_EXTENSION};
use crate::dist::copy_tree;
use crate::install::{ensure_installed, install};
use crate::task::{ActionError, GraphError, Task, TaskGraph};
use crate::tools::{Linter, ToolError, Toolchain};
use crate::variant::{Variant, build_variant, plan};

/// What every standard task runs against.
pub struct Context {
  pub config: Config,
  pub toolchain: Toolchain,
}

impl Context {
  pub fn new(config: Config, toolchain: Toolchain) -> Rc<Self> {
    Rc::new(Self { config, toolchain })
  }
}

#[derive(Debug, Error)]
pub enum TestError {
  #[error("test bundle {0} not found")]
  MissingArtifact(PathBuf),

  #[error("tests failed in {artifact}")]
  Failed { artifact: PathBuf },

  #[error(transparent)]
  Tool(#[from] ToolError),
}

#[derive(Debug, Error)]
pub enum LintError {
  #[error("failed to scan {path}: {source}")]
  Scan {
    path: PathBuf,
    #[source]
    source: walkdir::Error,
  },

  #[error(transparent)]
  Tool(#[from] ToolError),
}

/// Register every standard task into `graph`.
pub fn register_standard_tasks(graph: &mut TaskGraph, ctx: Rc<Context>) -> Result<(), GraphError> {
  let tasks = [
    Task::alias("default", ["build"]).describe("Build the debug bundle"),
    // build
    Task::alias("build", ["build:debug"]).describe("Alias for build:debug"),
    Task::action("build:debug", ["declarations:ensure"], with_ctx(&ctx, |c| {
      build_variant(Variant::Debug, c)?;
      Ok(())
    }))
    .describe("Bundle with DEBUG defined and source maps"),
    Task::action("build:release", ["declarations:ensure"], with_ctx(&ctx, |c| {
      build_variant(Variant::Release, c)?;
      Ok(())
    }))
    .describe("Bundle optimized and minified"),
    Task::action("build:test", ["declarations:ensure"], with_ctx(&ctx, |c| {
      build_variant(Variant::Test, c)?;
      Ok(())
    }))
    .describe("Bundle the test entry"),
    Task::sequence("build:all", ["build:debug", "build:release", "build:test"]).describe("Build every bundle"),
    // test
    Task::sequence("test", ["build:test", "test:run"]).describe("Build and run the tests"),
    Task::action("test:run", Vec::<String>::new(), with_ctx(&ctx, |c| Ok(run_tests(c)?)))
      .describe("Run the test bundle"),
    // declarations
    Task::alias("declarations", ["declarations:install"]).describe("Alias for declarations:install"),
    Task::action("declarations:install", Vec::<String>::new(), with_ctx(&ctx, |c| {
      install(&c.config, c.toolchain.installer.as_ref())?;
      Ok(())
    }))
    .describe("Install type declarations"),
    Task::action("declarations:ensure", Vec::<String>::new(), with_ctx(&ctx, |c| {
      ensure_installed(&c.config, c.toolchain.installer.as_ref())?;
      Ok(())
    }))
    .describe("Install type declarations if none are present"),
    // clean
    Task::alias("clean", ["clean:all"]).describe("Alias for clean:all"),
    Task::alias("clean:all", ["clean:declarations", "clean:build", "clean:lib", "clean:dist"])
      .describe("Remove every generated directory"),
    Task::action("clean:declarations", Vec::<String>::new(), with_ctx(&ctx, |c| {
      clean(&Setting::default_value(c.config.dirs.declarations.clone()), c.config.force)?;
      Ok(())
    }))
    .describe("Remove installed declarations"),
    Task::action("clean:build", Vec::<String>::new(), with_ctx(&ctx, |c| {
      clean(&Setting::default_value(c.config.dirs.build.clone()), c.config.force)?;
      Ok(())
    }))
    .describe("Remove the build directory"),
    Task::alias("clean:lib", ["clean:lib:es5", "clean:lib:es6"]).describe("Remove compiled libraries"),
    Task::action("clean:lib:es5", Vec::<String>::new(), with_ctx(&ctx, |c| {
      clean(&c.config.dirs.lib.map(|lib| lib.join("ES5")), c.config.force)?;
      Ok(())
    }))
    .describe("Remove the ES5 library"),
    Task::action("clean:lib:es6", Vec::<String>::new(), with_ctx(&ctx, |c| {
      clean(&c.config.dirs.lib.map(|lib| lib.join("ES6")), c.config.force)?;
      Ok(())
    }))
    .describe("Remove the ES6 library"),
    Task::action("clean:dist", Vec::<String>::new(), with_ctx(&ctx, |c| {
      clean(&c.config.dirs.dist, c.config.force)?;
      Ok(())
    }))
    .describe("Remove the distribution directory"),
    // lint
    Task::alias("lint", ["lint:all"]).describe("Alias for lint:all"),
    Task::alias("lint:all", ["lint:ts", "lint:es"]).describe("Run every linter"),
    Task::action("lint:ts", Vec::<String>::new(), with_ctx(&ctx, |c| {
      let files = lint_files(&c.config, SOURCE_EXTENSION)?;
      Ok(report_findings("lint:ts", c.toolchain.ts_linter.as_ref(), &files)?)
    }))
    .describe("Lint TypeScript sources"),
    Task::action("lint:es", Vec::<String>::new(), with_ctx(&ctx, |c| {
      let files = lint_files(&c.config, SCRIPT_EXTENSION)?;
      Ok(report_findings("lint:es", c.toolchain.es_linter.as_ref(), &files)?)
    }))
    .describe("Lint JavaScript sources"),
    // dist
    Task::alias("dist", ["dist:all"]).describe("Alias for dist:all"),
    Task::alias("dist:all", ["dist:lib", "dist:bundle"]).describe("Produce every distributable"),
    Task::alias("dist:lib", ["dist:lib:es5"]).describe("Compile the default library"),
    Task::action("dist:lib:es5", ["declarations:ensure", "clean:lib:es5"], with_ctx(&ctx, |c| {
      build_variant(Variant::LibEs5, c)?;
      Ok(())
    }))
    .describe("Compile the library to ES5 with commonjs modules"),
    Task::action("dist:lib:es6", ["declarations:ensure", "clean:lib:es6"], with_ctx(&ctx, |c| {
      build_variant(Variant::LibEs6, c)?;
      Ok(())
    }))
    .describe("Compile the library to ES2015 with ES modules"),
    Task::sequence("dist:bundle", ["clean:dist", "build:release", "dist:copy"])
      .describe("Build the release bundle into the distribution directory"),
    Task::action("dist:copy", Vec::<String>::new(), with_ctx(&ctx, |c| {
      let release = plan(Variant::Release, &c.config);
      copy_tree(&release.output_dir, &c.config.dirs.dist.value)?;
      Ok(())
    }))
    .describe("Copy the release build into the distribution directory"),
  ];

  for task in tasks {
    graph.register(task)?;
  }
  Ok(())
}

fn with_ctx(
  ctx: &Rc<Context>,
  action: impl Fn(&Context) -> Result<(), ActionError> + 'static,
) -> impl Fn() -> Result<(), ActionError> + 'static {
  let ctx = Rc::clone(ctx);
  move || action(&ctx)
}

fn run_tests(ctx: &Context) -> Result<(), TestError> {
  let test_plan = plan(Variant::Test, &ctx.config);
  let artifact = test_plan.output_path().unwrap_or(test_plan.output_dir);
  if !artifact.is_file() {
    return Err(TestError::MissingArtifact(artifact));
  }

  let reporter = ctx.config.runner_reporter();
  info!(artifact = %artifact.display(), reporter = %reporter, "running tests");

  let outcome = ctx.toolchain.test_runner.run_tests(&artifact, reporter)?;
  if !outcome.passed {
    return Err(TestError::Failed { artifact });
  }
  Ok(())
}

/// Files to lint: everything with `extension` under `src` and `test`, plus
/// scripts directly in the project root.
fn lint_files(config: &Config, extension: &str) -> Result<Vec<PathBuf>, LintError> {
  let mut files = Vec::new();
  for dir in [&config.dirs.src, &config.dirs.test] {
    files.extend(files_with_extension(dir, extension, usize::MAX)?);
  }
  if extension == SCRIPT_EXTENSION {
    files.extend(files_with_extension(&config.dirs.root, extension, 1)?);
  }
  Ok(files)
}

fn files_with_extension(dir: &Path, extension: &str, max_depth: usize) -> Result<Vec<PathBuf>, LintError> {
  if !dir.is_dir() {
    return Ok(Vec::new());
  }

  let mut files = Vec::new();
  for entry in WalkDir::new(dir).max_depth(max_depth).sort_by_file_name() {
    let entry = entry.map_err(|source| LintError::Scan {
      path: dir.to_path_buf(),
      source,
    })?;
    if entry.file_type().is_file() && entry.path().extension().is_some_and(|ext| ext == extension) {
      files.push(entry.into_path());
    }
  }
  Ok(files)
}

/// Findings are logged as warnings; they never fail the task.
fn report_findings(task: &str, linter: &dyn Linter, files: &[PathBuf]) -> Result<(), LintError> {
  let findings = linter.lint(files)?;
  for finding in &findings {
    warn!(task = %task, "{finding}");
  }
  info!(task = %task, files = files.len(), findings = findings.len(), "lint finished");
  Ok(())
}
