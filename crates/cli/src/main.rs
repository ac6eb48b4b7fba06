mod cmd;
mod output;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use lathe_lib::config::ConfigOverrides;

/// lathe - task-driven build orchestrator for TypeScript libraries
#[derive(Parser)]
#[command(name = "lathe")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Tasks to run, in order
  #[arg(value_name = "TASK", default_value = "default")]
  tasks: Vec<String>,

  /// Project root (default: current directory)
  #[arg(short = 'C', long, value_name = "DIR")]
  root: Option<PathBuf>,

  /// Echo the resolved configuration and full build results
  #[arg(short, long)]
  verbose: bool,

  /// Only report warnings and errors
  #[arg(short, long)]
  quiet: bool,

  /// Write bundler statistics next to each bundle
  #[arg(long)]
  profile: bool,

  /// Allow cleaning explicitly configured directories
  #[arg(long)]
  force: bool,

  /// Library output directory (default: <root>/lib)
  #[arg(long, value_name = "PATH")]
  lib: Option<PathBuf>,

  /// Distribution directory (default: <root>/dist)
  #[arg(long, value_name = "PATH")]
  dist: Option<PathBuf>,

  /// Test reporter: spec, list, progress, dot or min
  #[arg(long, value_name = "NAME")]
  reporter: Option<String>,
}

impl Cli {
  fn overrides(&self) -> ConfigOverrides {
    ConfigOverrides {
      root: self.root.clone(),
      verbose: self.verbose,
      quiet: self.quiet,
      profile: self.profile,
      force: self.force,
      lib: self.lib.clone(),
      dist: self.dist.clone(),
      reporter: self.reporter.clone(),
    }
  }

  /// `RUST_LOG` when set, otherwise the level implied by the flags.
  fn env_filter(&self) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(self.log_level()))
  }

  /// Default log level when `RUST_LOG` is unset. Quiet wins over verbose.
  fn log_level(&self) -> &'static str {
    if self.quiet {
      "warn"
    } else if self.verbose {
      "debug"
    } else {
      "info"
    }
  }
}

fn main() -> Result<()> {
  let cli = Cli::parse();

  tracing_subscriber::fmt()
    .with_env_filter(cli.env_filter())
    .with_writer(std::io::stderr)
    .with_target(false)
    .without_time()
    .init();

  cmd::cmd_run(cli.overrides(), &cli.tasks)
}
