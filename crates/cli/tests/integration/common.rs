//! Shared test helpers for CLI integration tests.

use std::path::PathBuf;

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use tempfile::TempDir;

/// Get path to a fixture file.
pub fn fixture_path(name: &str) -> PathBuf {
  PathBuf::from(env!("CARGO_MANIFEST_DIR"))
    .join("tests")
    .join("fixtures")
    .join(name)
}

/// Read fixture content.
pub fn fixture_content(name: &str) -> String {
  std::fs::read_to_string(fixture_path(name)).unwrap_or_else(|e| panic!("Failed to load fixture {}: {}", name, e))
}

/// Isolated project directory named `rx.obj`.
pub struct TestEnv {
  pub temp: TempDir,
  pub root: PathBuf,
}

impl TestEnv {
  /// Create from a fixture file.
  ///
  /// Copies the fixture content to the project's `lathe.toml`.
  pub fn from_fixture(name: &str) -> Self {
    let env = Self::empty();
    std::fs::write(env.root.join("lathe.toml"), fixture_content(name)).unwrap();
    env
  }

  /// Create a project without a project file.
  pub fn empty() -> Self {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("rx.obj");
    std::fs::create_dir_all(&root).unwrap();
    let root = dunce::canonicalize(&root).unwrap_or(root);
    Self { temp, root }
  }

  /// Write a file relative to the project root.
  pub fn write_file(&self, relative_path: &str, content: &str) {
    let path = self.root.join(relative_path);
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, content).unwrap();
  }

  /// Path relative to the project root.
  pub fn path(&self, relative_path: &str) -> PathBuf {
    self.root.join(relative_path)
  }

  /// A directory outside the project, for `--lib`/`--dist` overrides.
  pub fn outside(&self, name: &str) -> PathBuf {
    let p = self.temp.path().join(name);
    std::fs::create_dir_all(&p).unwrap();
    dunce::canonicalize(&p).unwrap_or(p)
  }

  /// Get a pre-configured Command for the lathe binary.
  ///
  /// Runs in the project root with `RUST_LOG` cleared so the log level
  /// follows the command-line flags.
  pub fn lathe_cmd(&self) -> Command {
    let mut cmd: Command = cargo_bin_cmd!("lathe");
    cmd.current_dir(&self.root);
    cmd.env_remove("RUST_LOG");
    cmd
  }
}
