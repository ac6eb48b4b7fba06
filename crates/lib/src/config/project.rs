//! Project file (`lathe.toml`) loading.
//!
//! The project file is optional. It names the library being built, where its
//! entry points live, and which external commands implement each tool.
//!
//! # Project File Format
//!
//! ```toml
//! [project]
//! name = "rx.obj"
//! entry = "src/rx.obj.ts"
//! test_entry = "test/rx.obj.tests.ts"
//! declarations = "typings"
//!
//! [tools]
//! bundler = ["node", "lathe.bundle.js"]
//! compiler = ["tsc"]
//! test_runner = ["mocha"]
//! installer = ["typings", "install"]
//! ts_linter = ["tslint"]
//! es_linter = ["eslint"]
//! ```

use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when loading the project file.
#[derive(Debug, Error)]
pub enum ProjectFileError {
  /// Failed to read the project file.
  #[error("failed to read project file: {0}")]
  Read(#[source] io::Error),

  /// Failed to parse the project file TOML.
  #[error("failed to parse project file: {0}")]
  Parse(#[source] toml::de::Error),
}

/// Contents of `lathe.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectFile {
  pub project: ProjectSection,
  pub tools: ToolCommands,
}

/// The `[project]` table. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectSection {
  /// Library name; output bundles are named `<name>.js`.
  pub name: Option<String>,
  /// Bundle entry, relative to the project root.
  pub entry: Option<String>,
  /// Test bundle entry, relative to the project root.
  pub test_entry: Option<String>,
  /// Declarations directory, relative to the project root.
  pub declarations: Option<String>,
}

/// External commands, each a program followed by its leading arguments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolCommands {
  /// Adapter between lathe and the real bundler.
  ///
  /// It receives the path of a serialized `BuildPlan` as its last argument,
  /// not a bundler configuration. It is expected to translate the plan for the
  /// bundler it wraps and print the bundler's JSON statistics (`errors`,
  /// `warnings`, `assetsByChunkName`) on stdout. Without statistics only the
  /// exit status is used.
  pub bundler: Vec<String>,
  pub compiler: Vec<String>,
  pub test_runner: Vec<String>,
  pub installer: Vec<String>,
  pub ts_linter: Vec<String>,
  pub es_linter: Vec<String>,
}

impl Default for ToolCommands {
  fn default() -> Self {
    Self {
      bundler: words(&["node", "lathe.bundle.js"]),
      compiler: words(&["tsc"]),
      test_runner: words(&["mocha"]),
      installer: words(&["typings", "install"]),
      ts_linter: words(&["tslint"]),
      es_linter: words(&["eslint"]),
    }
  }
}

fn words(items: &[&str]) -> Vec<String> {
  items.iter().map(|s| s.to_string()).collect()
}

impl ProjectFile {
  /// Load the project file from the given path.
  ///
  /// Returns `Ok(None)` if the file doesn't exist.
  pub fn load(path: &Path) -> Result<Option<Self>, ProjectFileError> {
    let content = match fs::read_to_string(path) {
      Ok(content) => content,
      Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
      Err(e) => return Err(ProjectFileError::Read(e)),
    };

    let file = toml::from_str(&content).map_err(ProjectFileError::Parse)?;
    Ok(Some(file))
  }
}
