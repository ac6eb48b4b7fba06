//! Type declaration installation.
//!
//! Builds need the project's type declarations on disk. They are installed on
//! demand: if at least one declaration file is already present nothing
//! happens, otherwise the installer runs once.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;
use walkdir::WalkDir;

use crate::config::Config;
use crate::consts::DECLARATION_SUFFIX;
use crate::tools::{DeclarationInstaller, ToolError};

#[derive(Debug, Error)]
pub enum InstallError {
  #[error("failed to scan declarations in {path}: {source}")]
  Scan {
    path: PathBuf,
    #[source]
    source: walkdir::Error,
  },

  #[error("failed to install declarations: {0}")]
  Install(#[from] ToolError),
}

/// Outcome of [`ensure_installed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallOutcome {
  /// Declarations were already present; holds the number of files found.
  Present(usize),
  /// The installer ran.
  Installed,
}

/// Count `.d.ts` files under `dir`, recursively. A missing directory counts
/// as zero.
pub fn count_declarations(dir: &Path) -> Result<usize, InstallError> {
  if !dir.exists() {
    return Ok(0);
  }

  let mut count = 0;
  for entry in WalkDir::new(dir) {
    let entry = entry.map_err(|source| InstallError::Scan {
      path: dir.to_path_buf(),
      source,
    })?;
    if entry.file_type().is_file() && entry.file_name().to_string_lossy().ends_with(DECLARATION_SUFFIX) {
      count += 1;
    }
  }
  Ok(count)
}

/// Install declarations unless some are already present.
///
/// The check and the install are not atomic. Tasks never run concurrently,
/// so nothing can interleave between them.
pub fn ensure_installed(config: &Config, installer: &dyn DeclarationInstaller) -> Result<InstallOutcome, InstallError> {
  let count = count_declarations(&config.dirs.declarations)?;

  if count > 0 {
    if !config.quiet {
      info!(count, dir = %config.dirs.declarations.display(), "declarations present");
    }
    return Ok(InstallOutcome::Present(count));
  }

  install(config, installer)?;
  Ok(InstallOutcome::Installed)
}

/// Run the installer in the project root.
pub fn install(config: &Config, installer: &dyn DeclarationInstaller) -> Result<(), InstallError> {
  info!(root = %config.dirs.root.display(), "installing declarations");
  installer.install(&config.dirs.root)?;
  Ok(())
}
