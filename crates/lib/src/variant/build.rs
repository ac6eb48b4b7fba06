//! Running a build plan through the toolchain.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, error, info};
use walkdir::WalkDir;

use super::types::{BuildError, BuildPlan, Emit, PipelineResult};
use super::{Variant, plan};
use crate::config::Config;
use crate::consts::{SOURCE_EXTENSION, STATS_FILE};
use crate::tools::{CompileRequest, Toolchain};
use crate::workflow::Context;

/// Build one variant: plan it, run it, and fail on reported diagnostics.
pub fn build_variant(variant: Variant, ctx: &Context) -> Result<PipelineResult, BuildError> {
  let plan = plan(variant, &ctx.config);
  let result = build(&plan, &ctx.config, &ctx.toolchain)?;

  if !result.success {
    for diagnostic in &result.diagnostics {
      error!(variant = %variant, "{diagnostic}");
    }
    return Err(BuildError::Failed {
      variant,
      diagnostics: result.diagnostics,
    });
  }

  Ok(result)
}

/// Hand a plan to the bundler or the compiler and normalize the result.
///
/// Errors reported by the tool come back as `success == false`; only failures
/// to run the tool at all are `Err`.
pub fn build(plan: &BuildPlan, config: &Config, toolchain: &Toolchain) -> Result<PipelineResult, BuildError> {
  info!(variant = %plan.variant, output = %plan.output_dir.display(), "building");

  let tool_error = |source| BuildError::Tool {
    variant: plan.variant,
    source,
  };

  let result = match &plan.emit {
    Emit::Bundle => toolchain.bundler.bundle(plan).map_err(tool_error)?,
    Emit::PerFile {
      target,
      module,
      declarations,
      source_dir,
    } => {
      let mut files = plan.entry_points.clone();
      files.extend(collect_sources(source_dir)?);
      let request = CompileRequest {
        files,
        target: *target,
        module: *module,
        declarations: *declarations,
        source_maps: plan.source_maps,
        out_dir: plan.output_dir.clone(),
      };
      toolchain.compiler.compile(&request).map_err(tool_error)?
    }
  };

  if !config.quiet {
    for artifact in &result.artifacts {
      info!(variant = %plan.variant, chunk = %artifact.chunk, path = %artifact.path.display(), "emitted");
    }
  }

  if config.verbose {
    let payload = serde_json::to_string_pretty(&result)?;
    debug!(variant = %plan.variant, "build result:\n{payload}");
  }

  if config.profile && plan.is_bundle() {
    write_stats(&plan.output_dir, &result)?;
  }

  Ok(result)
}

/// Every `.ts` file under `dir`, sorted. A missing directory has no sources.
pub fn collect_sources(dir: &Path) -> Result<Vec<PathBuf>, BuildError> {
  if !dir.exists() {
    return Ok(Vec::new());
  }

  let mut sources = Vec::new();
  for entry in WalkDir::new(dir).sort_by_file_name() {
    let entry = entry.map_err(|source| BuildError::Scan {
      path: dir.to_path_buf(),
      source,
    })?;
    let path = entry.path();
    if entry.file_type().is_file() && path.extension().is_some_and(|ext| ext == SOURCE_EXTENSION) {
      sources.push(path.to_path_buf());
    }
  }
  Ok(sources)
}

fn write_stats(output_dir: &Path, result: &PipelineResult) -> Result<(), BuildError> {
  let path = output_dir.join(STATS_FILE);
  let stats_error = |source| BuildError::Stats {
    path: path.clone(),
    source,
  };

  fs::create_dir_all(output_dir).map_err(stats_error)?;
  let json = serde_json::to_string_pretty(result)?;
  fs::write(&path, json).map_err(stats_error)?;

  debug!(path = %path.display(), "wrote build statistics");
  Ok(())
}
