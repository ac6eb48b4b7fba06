//! Running tasks from the command line.
//!
//! Resolves the configuration, wires the standard task set plus the CLI's own
//! `help` and `config` tasks, and runs the requested tasks as one pipeline.

use std::rc::Rc;
use std::time::Instant;

use anyhow::{Context as _, Result};
use tracing::debug;

use lathe_lib::config::{Config, ConfigOverrides};
use lathe_lib::pipeline::run_pipeline;
use lathe_lib::task::{Scheduler, TaskGraph};
use lathe_lib::tools::Toolchain;
use lathe_lib::workflow::{Context, register_standard_tasks};

use super::config::config_task;
use super::help::{TaskListing, help_task};
use crate::output::{format_duration, print_success};

/// Execute the requested tasks in order.
///
/// Stops at the first failing task. On success a one-line summary with the
/// elapsed time is printed unless `quiet` is set.
pub fn cmd_run(overrides: ConfigOverrides, tasks: &[String]) -> Result<()> {
  let start = Instant::now();

  let config = Config::resolve(overrides);
  let toolchain = Toolchain::from_config(&config).context("Failed to set up tools")?;
  let ctx = Context::new(config, toolchain);

  let scheduler = build_scheduler(&ctx)?;
  debug!(tasks = scheduler.graph().len(), "task graph ready");

  run_pipeline(&scheduler, tasks)?;

  if !ctx.config.quiet {
    print_success(&format!(
      "Finished {} in {}",
      tasks.join(", "),
      format_duration(start.elapsed())
    ));
  }

  Ok(())
}

fn build_scheduler(ctx: &Rc<Context>) -> Result<Scheduler> {
  let mut graph = TaskGraph::new();
  register_standard_tasks(&mut graph, Rc::clone(ctx)).context("Failed to register tasks")?;
  graph.register(config_task(Rc::clone(ctx)))?;

  // The listing is taken before `help` itself exists; it adds its own line.
  let listing = TaskListing::from_graph(&graph);
  graph.register(help_task(Rc::clone(ctx), listing))?;

  Scheduler::new(graph).context("Invalid task graph")
}
