//! Variant build planning.
//!
//! Every variant starts from one base plan derived from the project layout.
//! Variant-specific transforms are pure functions that take the base plan by
//! value and return the adjusted plan; no plan is ever shared or mutated in
//! place.

pub mod build;
pub mod types;

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::Config;

pub use build::{build, build_variant, collect_sources};
pub use types::{
  Artifact, BuildError, BuildPlan, DefineValue, Emit, LanguageLevel, ModuleFormat, OptimizationPass, PipelineResult,
};

/// A build configuration sharing the project's inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Variant {
  #[serde(rename = "debug")]
  Debug,
  #[serde(rename = "release")]
  Release,
  #[serde(rename = "test")]
  Test,
  #[serde(rename = "libES5")]
  LibEs5,
  #[serde(rename = "libES6")]
  LibEs6,
}

impl Variant {
  pub const ALL: [Variant; 5] = [
    Variant::Debug,
    Variant::Release,
    Variant::Test,
    Variant::LibEs5,
    Variant::LibEs6,
  ];

  pub fn as_str(&self) -> &'static str {
    match self {
      Variant::Debug => "debug",
      Variant::Release => "release",
      Variant::Test => "test",
      Variant::LibEs5 => "libES5",
      Variant::LibEs6 => "libES6",
    }
  }

}

impl fmt::Display for Variant {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for Variant {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Variant::ALL
      .into_iter()
      .find(|v| v.as_str().eq_ignore_ascii_case(s))
      .ok_or_else(|| format!("unknown variant: {s}"))
  }
}

/// Symbols every bundle defines, all off by default.
const BASE_DEFINES: [&str; 4] = ["DEBUG", "RELEASE", "TEST", "DEV_SERVER"];

/// Resolve the build plan for a variant.
pub fn plan(variant: Variant, config: &Config) -> BuildPlan {
  let base = base_plan(variant, config);

  match variant {
    Variant::Debug => apply_debug(base),
    Variant::Release => apply_release(base),
    Variant::Test => apply_test(base, config),
    Variant::LibEs5 => apply_library(base, config, LanguageLevel::Es5, ModuleFormat::CommonJs, "ES5"),
    Variant::LibEs6 => apply_library(base, config, LanguageLevel::Es2015, ModuleFormat::Es2015, "ES6"),
  }
}

fn base_plan(variant: Variant, config: &Config) -> BuildPlan {
  BuildPlan {
    variant,
    entry_points: vec![config.project.entry.clone()],
    output_dir: config.dirs.build.join(variant.as_str()),
    output_filename: Some(format!("{}.js", config.project.name)),
    defines: BASE_DEFINES
      .iter()
      .map(|name| (name.to_string(), DefineValue::Bool(false)))
      .collect(),
    debug: false,
    optimize: false,
    source_maps: true,
    profile: config.profile,
    optimizations: Vec::new(),
    emit: Emit::Bundle,
  }
}

fn apply_debug(mut plan: BuildPlan) -> BuildPlan {
  plan.defines.insert("DEBUG".to_string(), true.into());
  plan.debug = true;
  plan.optimize = false;
  plan.source_maps = true;
  plan
}

fn apply_release(mut plan: BuildPlan) -> BuildPlan {
  plan.output_filename = plan.output_filename.map(|name| minified_name(&name));
  plan.defines.insert("RELEASE".to_string(), true.into());
  plan.defines.insert("NODE_ENV".to_string(), "production".into());
  plan.optimize = true;
  plan.optimizations.push(OptimizationPass::Dedupe);
  plan.optimizations.push(OptimizationPass::Minify {
    warnings: false,
    comments: false,
  });
  plan
}

fn apply_test(mut plan: BuildPlan, config: &Config) -> BuildPlan {
  plan.entry_points = vec![config.project.test_entry.clone()];
  plan.output_filename = Some(format!("{}.tests.js", config.project.name));
  plan.defines.insert("TEST".to_string(), true.into());
  plan
}

fn apply_library(
  mut plan: BuildPlan,
  config: &Config,
  target: LanguageLevel,
  module: ModuleFormat,
  dir_name: &str,
) -> BuildPlan {
  plan.entry_points = vec![config.declaration_entry()];
  plan.output_dir = config.dirs.lib.value.join(dir_name);
  plan.output_filename = None;
  plan.defines.clear();
  plan.source_maps = true;
  plan.emit = Emit::PerFile {
    target,
    module,
    declarations: true,
    source_dir: config.dirs.src.clone(),
  };
  plan
}

/// `rx.obj.js` becomes `rx.obj.min.js`.
fn minified_name(name: &str) -> String {
  Path::new(name).with_extension("min.js").to_string_lossy().into_owned()
}
