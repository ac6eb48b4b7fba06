//! Copying build output into the distribution directory.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};
use walkdir::WalkDir;

#[derive(Debug, Error)]
pub enum DistError {
  #[error("nothing to distribute: {0} does not exist")]
  MissingSource(PathBuf),

  #[error("failed to walk {path}: {source}")]
  Walk {
    path: PathBuf,
    #[source]
    source: walkdir::Error,
  },

  #[error("failed to copy {from} to {to}: {source}")]
  Copy {
    from: PathBuf,
    to: PathBuf,
    #[source]
    source: std::io::Error,
  },
}

/// Copy the contents of `src` into `dst`, creating directories as needed.
/// Returns the number of files copied.
pub fn copy_tree(src: &Path, dst: &Path) -> Result<usize, DistError> {
  if !src.is_dir() {
    return Err(DistError::MissingSource(src.to_path_buf()));
  }

  let copy_error = |from: &Path, to: &Path, source| DistError::Copy {
    from: from.to_path_buf(),
    to: to.to_path_buf(),
    source,
  };

  let mut copied = 0;
  for entry in WalkDir::new(src).sort_by_file_name() {
    let entry = entry.map_err(|source| DistError::Walk {
      path: src.to_path_buf(),
      source,
    })?;
    let Ok(relative) = entry.path().strip_prefix(src) else {
      continue;
    };
    let target = dst.join(relative);

    if entry.file_type().is_dir() {
      fs::create_dir_all(&target).map_err(|e| copy_error(entry.path(), &target, e))?;
    } else {
      fs::copy(entry.path(), &target).map_err(|e| copy_error(entry.path(), &target, e))?;
      debug!(file = %relative.display(), "copied");
      copied += 1;
    }
  }

  info!(files = copied, from = %src.display(), to = %dst.display(), "copied distribution");
  Ok(copied)
}
