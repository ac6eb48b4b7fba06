//! Types for variant planning and build results.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::tools::ToolError;

use super::Variant;

/// A literal substituted for a preprocessor symbol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DefineValue {
  Bool(bool),
  Str(String),
}

impl From<bool> for DefineValue {
  fn from(value: bool) -> Self {
    DefineValue::Bool(value)
  }
}

impl From<&str> for DefineValue {
  fn from(value: &str) -> Self {
    DefineValue::Str(value.to_string())
  }
}

/// An optimization stage appended to a bundle plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "pass", rename_all = "lowercase")]
pub enum OptimizationPass {
  /// Remove duplicate modules from the bundle.
  Dedupe,
  /// Minify the bundle.
  Minify {
    /// Emit minifier warnings.
    warnings: bool,
    /// Keep comments in the output.
    comments: bool,
  },
}

/// Language level targeted by the compiler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LanguageLevel {
  #[serde(rename = "ES5")]
  Es5,
  #[serde(rename = "ES2015")]
  Es2015,
}

impl LanguageLevel {
  pub fn as_str(&self) -> &'static str {
    match self {
      LanguageLevel::Es5 => "ES5",
      LanguageLevel::Es2015 => "ES2015",
    }
  }
}

impl fmt::Display for LanguageLevel {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Module format emitted by the compiler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleFormat {
  CommonJs,
  Es2015,
}

impl ModuleFormat {
  pub fn as_str(&self) -> &'static str {
    match self {
      ModuleFormat::CommonJs => "commonjs",
      ModuleFormat::Es2015 => "es2015",
    }
  }
}

impl fmt::Display for ModuleFormat {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// How a plan turns sources into output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Emit {
  /// One bundle produced by the bundler.
  Bundle,
  /// One compiled file per source file, produced by the compiler directly.
  PerFile {
    target: LanguageLevel,
    module: ModuleFormat,
    declarations: bool,
    /// Every source file under this directory is compiled.
    source_dir: PathBuf,
  },
}

/// The fully resolved description of one variant build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildPlan {
  pub variant: Variant,
  pub entry_points: Vec<PathBuf>,
  pub output_dir: PathBuf,
  /// Bundle filename; `None` for per-file plans.
  pub output_filename: Option<String>,
  pub defines: BTreeMap<String, DefineValue>,
  /// Non-optimized, debugger-friendly output.
  pub debug: bool,
  pub optimize: bool,
  pub source_maps: bool,
  /// Ask the bundler for per-module timing in its statistics.
  pub profile: bool,
  /// Applied in order after bundling.
  pub optimizations: Vec<OptimizationPass>,
  pub emit: Emit,
}

impl BuildPlan {
  /// Path of the bundle this plan produces, if it produces one.
  pub fn output_path(&self) -> Option<PathBuf> {
    self.output_filename.as_ref().map(|name| self.output_dir.join(name))
  }

  pub fn is_bundle(&self) -> bool {
    matches!(self.emit, Emit::Bundle)
  }
}

/// An emitted file, keyed by its logical chunk name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
  pub chunk: String,
  pub path: PathBuf,
}

impl Artifact {
  pub fn new(chunk: impl Into<String>, path: impl Into<PathBuf>) -> Self {
    Self {
      chunk: chunk.into(),
      path: path.into(),
    }
  }
}

/// Normalized outcome of a compiler or bundler run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineResult {
  pub success: bool,
  pub diagnostics: Vec<String>,
  pub artifacts: Vec<Artifact>,
  /// Raw statistics reported by the tool, persisted when profiling.
  #[serde(default)]
  pub stats: serde_json::Value,
}

impl PipelineResult {
  pub fn succeeded(artifacts: Vec<Artifact>) -> Self {
    Self {
      success: true,
      artifacts,
      ..Default::default()
    }
  }

  pub fn failed(diagnostics: Vec<String>) -> Self {
    Self {
      success: false,
      diagnostics,
      ..Default::default()
    }
  }

  pub fn with_stats(mut self, stats: serde_json::Value) -> Self {
    self.stats = stats;
    self
  }
}

/// Errors that can occur while building a variant.
#[derive(Debug, Error)]
pub enum BuildError {
  /// The compiler or bundler could not be run.
  #[error("{variant}: {source}")]
  Tool {
    variant: Variant,
    #[source]
    source: ToolError,
  },

  /// The tool ran and reported diagnostics.
  #[error("{variant} build failed with {count} diagnostic(s)", count = .diagnostics.len())]
  Failed { variant: Variant, diagnostics: Vec<String> },

  /// Source discovery failed.
  #[error("failed to scan sources in {path}: {source}")]
  Scan {
    path: PathBuf,
    #[source]
    source: walkdir::Error,
  },

  /// Writing the profiling statistics failed.
  #[error("failed to write build statistics to {path}: {source}")]
  Stats {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("failed to serialize build statistics: {0}")]
  Serialize(#[from] serde_json::Error),
}
