//! Configuration resolution.
//!
//! The configuration is resolved exactly once per process from command-line
//! overrides, the optional project file, and built-in defaults. It is never
//! mutated afterwards; every component receives it explicitly.

pub mod project;

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::consts::{
  DECLARATION_ENTRY, DEFAULT_BUILD_DIR, DEFAULT_DECLARATIONS_DIR, DEFAULT_DIST_DIR, DEFAULT_LIB_DIR,
  DEFAULT_SRC_DIR, DEFAULT_TEST_DIR, PROJECT_FILE,
};

pub use project::{ProjectFile, ProjectFileError, ToolCommands};

/// Configuration problems. These are reported and absorbed: resolution always
/// falls back to the default value instead of failing.
#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("unknown reporter '{0}' (expected one of: spec, list, progress, dot, min)")]
  UnknownReporter(String),

  #[error(transparent)]
  ProjectFile(#[from] ProjectFileError),
}

/// Where a configuration value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
  Default,
  Override,
}

/// A resolved value together with its origin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Setting<T> {
  pub value: T,
  pub origin: Origin,
}

impl<T> Setting<T> {
  pub fn default_value(value: T) -> Self {
    Self {
      value,
      origin: Origin::Default,
    }
  }

  pub fn overridden(value: T) -> Self {
    Self {
      value,
      origin: Origin::Override,
    }
  }

  /// Use `explicit` when present, otherwise the lazily computed default.
  pub fn resolve(explicit: Option<T>, default: impl FnOnce() -> T) -> Self {
    match explicit {
      Some(value) => Self::overridden(value),
      None => Self::default_value(default()),
    }
  }

  pub fn is_override(&self) -> bool {
    self.origin == Origin::Override
  }

  /// Derive a new value that keeps this setting's origin.
  pub fn map<U>(&self, f: impl FnOnce(&T) -> U) -> Setting<U> {
    Setting {
      value: f(&self.value),
      origin: self.origin,
    }
  }
}

/// Test report styles understood by the test runner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Reporter {
  #[default]
  Spec,
  List,
  Progress,
  Dot,
  Min,
}

impl Reporter {
  pub const ALL: [Reporter; 5] = [
    Reporter::Spec,
    Reporter::List,
    Reporter::Progress,
    Reporter::Dot,
    Reporter::Min,
  ];

  pub fn as_str(&self) -> &'static str {
    match self {
      Reporter::Spec => "spec",
      Reporter::List => "list",
      Reporter::Progress => "progress",
      Reporter::Dot => "dot",
      Reporter::Min => "min",
    }
  }
}

impl fmt::Display for Reporter {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for Reporter {
  type Err = ConfigError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let wanted = s.trim().to_ascii_lowercase();
    Reporter::ALL
      .into_iter()
      .find(|r| r.as_str() == wanted)
      .ok_or_else(|| ConfigError::UnknownReporter(s.to_string()))
  }
}

/// Explicit command-line overrides. `None`/`false` means "not given".
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
  pub root: Option<PathBuf>,
  pub verbose: bool,
  pub quiet: bool,
  pub profile: bool,
  pub force: bool,
  pub lib: Option<PathBuf>,
  pub dist: Option<PathBuf>,
  pub reporter: Option<String>,
}

/// Directory layout of the project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dirs {
  pub root: PathBuf,
  pub declarations: PathBuf,
  pub src: PathBuf,
  pub test: PathBuf,
  pub build: PathBuf,
  pub lib: Setting<PathBuf>,
  pub dist: Setting<PathBuf>,
}

/// The library being built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Project {
  pub name: String,
  pub entry: PathBuf,
  pub test_entry: PathBuf,
}

/// The resolved, immutable configuration.
#[derive(Debug, Clone, Serialize)]
pub struct Config {
  pub verbose: bool,
  pub quiet: bool,
  pub profile: bool,
  pub force: bool,
  pub dirs: Dirs,
  pub reporter: Setting<Reporter>,
  pub project: Project,
  pub tools: ToolCommands,
}

impl Config {
  /// Resolve the configuration from overrides, the project file and defaults.
  ///
  /// Never fails: a garbled reporter name or an unreadable project file is
  /// logged and replaced by the default. With `verbose`, the result is echoed
  /// to the log.
  pub fn resolve(overrides: ConfigOverrides) -> Self {
    let root = overrides
      .root
      .clone()
      .or_else(|| std::env::current_dir().ok())
      .unwrap_or_else(|| PathBuf::from("."));
    let root = dunce::canonicalize(&root).unwrap_or(root);

    let file = load_project_file(&root);
    let section = &file.project;

    let name = section.name.clone().unwrap_or_else(|| default_project_name(&root));
    let project = Project {
      entry: root.join(section.entry.clone().unwrap_or_else(|| format!("{DEFAULT_SRC_DIR}/{name}.ts"))),
      test_entry: root.join(
        section
          .test_entry
          .clone()
          .unwrap_or_else(|| format!("{DEFAULT_TEST_DIR}/{name}.tests.ts")),
      ),
      name,
    };

    let dirs = Dirs {
      declarations: root.join(section.declarations.as_deref().unwrap_or(DEFAULT_DECLARATIONS_DIR)),
      src: root.join(DEFAULT_SRC_DIR),
      test: root.join(DEFAULT_TEST_DIR),
      build: root.join(DEFAULT_BUILD_DIR),
      lib: Setting::resolve(overrides.lib.map(absolute), || root.join(DEFAULT_LIB_DIR)),
      dist: Setting::resolve(overrides.dist.map(absolute), || root.join(DEFAULT_DIST_DIR)),
      root,
    };

    let config = Self {
      verbose: overrides.verbose,
      quiet: overrides.quiet,
      profile: overrides.profile,
      force: overrides.force,
      dirs,
      reporter: resolve_reporter(overrides.reporter.as_deref()),
      project,
      tools: file.tools,
    };

    if config.verbose {
      match serde_json::to_string_pretty(&config) {
        Ok(json) => info!("resolved configuration:\n{json}"),
        Err(e) => warn!(error = %e, "could not render configuration"),
      }
    }

    config
  }

  /// Reporter handed to the test runner.
  ///
  /// An explicit `--reporter` always wins; otherwise quiet runs use `dot`.
  pub fn runner_reporter(&self) -> Reporter {
    if !self.reporter.is_override() && self.quiet {
      return Reporter::Dot;
    }
    self.reporter.value
  }

  /// Root declaration file handed to the compiler for library builds.
  pub fn declaration_entry(&self) -> PathBuf {
    self.dirs.declarations.join(DECLARATION_ENTRY)
  }
}

fn resolve_reporter(raw: Option<&str>) -> Setting<Reporter> {
  let Some(raw) = raw else {
    return Setting::default_value(Reporter::default());
  };

  match raw.parse::<Reporter>() {
    Ok(reporter) => Setting::overridden(reporter),
    Err(e) => {
      warn!(error = %e, "falling back to the default reporter");
      Setting::default_value(Reporter::default())
    }
  }
}

fn load_project_file(root: &Path) -> ProjectFile {
  match ProjectFile::load(&root.join(PROJECT_FILE)) {
    Ok(Some(file)) => file,
    Ok(None) => ProjectFile::default(),
    Err(e) => {
      let e = ConfigError::from(e);
      warn!(error = %e, "ignoring project file");
      ProjectFile::default()
    }
  }
}

/// Anchor a command-line path at the process working directory. Tools run
/// from the project root, so every consumer must see the same absolute path.
fn absolute(path: PathBuf) -> PathBuf {
  match std::path::absolute(&path) {
    Ok(abs) => dunce::simplified(&abs).to_path_buf(),
    Err(_) => path,
  }
}

fn default_project_name(root: &Path) -> String {
  root
    .file_name()
    .map(|name| name.to_string_lossy().into_owned())
    .unwrap_or_else(|| "bundle".to_string())
}
