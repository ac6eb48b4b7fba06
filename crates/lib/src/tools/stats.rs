//! Bundler statistics.
//!
//! Bundlers that support machine-readable output report a JSON document with
//! `errors`, `warnings` and `assetsByChunkName`. Errors and warnings are either
//! plain strings or objects carrying a `message`.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use crate::variant::{Artifact, PipelineResult};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleStats {
  #[serde(default)]
  pub errors: Vec<Value>,
  #[serde(default)]
  pub warnings: Vec<Value>,
  #[serde(default)]
  pub assets_by_chunk_name: BTreeMap<String, ChunkAssets>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ChunkAssets {
  One(String),
  Many(Vec<String>),
}

impl ChunkAssets {
  fn files(&self) -> Vec<&str> {
    match self {
      ChunkAssets::One(file) => vec![file.as_str()],
      ChunkAssets::Many(files) => files.iter().map(String::as_str).collect(),
    }
  }
}

/// Parse bundler stdout as statistics. Returns `None` for non-JSON output.
pub fn parse(stdout: &str) -> Option<(BundleStats, Value)> {
  let raw: Value = serde_json::from_str(stdout.trim()).ok()?;
  if !raw.is_object() {
    return None;
  }
  let stats = BundleStats::deserialize(&raw).ok()?;
  Some((stats, raw))
}

impl BundleStats {
  /// Normalize into a result, resolving asset names against `output_dir`.
  pub fn into_result(self, output_dir: &Path, raw: Value, exited_ok: bool) -> PipelineResult {
    for warning in &self.warnings {
      warn!(warning = %message_of(warning), "bundler warning");
    }

    let diagnostics: Vec<String> = self.errors.iter().map(message_of).collect();
    let artifacts = self
      .assets_by_chunk_name
      .iter()
      .flat_map(|(chunk, assets)| {
        assets
          .files()
          .into_iter()
          .map(|file| Artifact::new(chunk.clone(), output_dir.join(file)))
          .collect::<Vec<_>>()
      })
      .collect();

    PipelineResult {
      success: exited_ok && diagnostics.is_empty(),
      diagnostics,
      artifacts,
      stats: raw,
    }
  }
}

fn message_of(value: &Value) -> String {
  match value {
    Value::String(message) => message.trim().to_string(),
    Value::Object(fields) => fields
      .get("message")
      .and_then(Value::as_str)
      .map(|m| m.trim().to_string())
      .unwrap_or_else(|| value.to_string()),
    other => other.to_string(),
  }
}
