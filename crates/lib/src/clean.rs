//! Removal of generated directories.

use std::fs;
use std::path::PathBuf;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::Setting;

#[derive(Debug, Error)]
#[error("failed to remove {path}: {source}")]
pub struct CleanError {
  pub path: PathBuf,
  #[source]
  pub source: std::io::Error,
}

/// What [`clean`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CleanOutcome {
  Removed,
  /// Nothing existed at the path.
  Missing,
  /// The path was given explicitly and `force` was not set.
  Refused,
}

/// Remove `target` recursively.
///
/// Paths supplied on the command line may point anywhere, so they are only
/// removed with `force`.
pub fn clean(target: &Setting<PathBuf>, force: bool) -> Result<CleanOutcome, CleanError> {
  let path = &target.value;

  if target.is_override() && !force {
    warn!(path = %path.display(), "refusing to remove an explicitly configured path without --force");
    return Ok(CleanOutcome::Refused);
  }

  let metadata = match fs::symlink_metadata(path) {
    Ok(metadata) => metadata,
    Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
      debug!(path = %path.display(), "nothing to clean");
      return Ok(CleanOutcome::Missing);
    }
    Err(source) => {
      return Err(CleanError {
        path: path.clone(),
        source,
      });
    }
  };

  let removed = if metadata.is_dir() {
    fs::remove_dir_all(path)
  } else {
    fs::remove_file(path)
  };
  removed.map_err(|source| CleanError {
    path: path.clone(),
    source,
  })?;

  info!(path = %path.display(), "removed");
  Ok(CleanOutcome::Removed)
}
