//! The `help` task: current option values and the task listing.

use std::rc::Rc;

use owo_colors::{OwoColorize, Stream};

use lathe_lib::config::{Config, Setting};
use lathe_lib::task::{Task, TaskGraph};
use lathe_lib::workflow::Context;

const HELP_DESCRIPTION: &str = "Show options and available tasks";

/// Name and description of every registered task, in registration order.
#[derive(Debug, Clone, Default)]
pub struct TaskListing {
  entries: Vec<(String, String)>,
}

impl TaskListing {
  pub fn from_graph(graph: &TaskGraph) -> Self {
    let mut entries: Vec<_> = graph.tasks().map(entry).collect();
    entries.push(("help".to_string(), HELP_DESCRIPTION.to_string()));
    Self { entries }
  }

  fn width(&self) -> usize {
    self.entries.iter().map(|(name, _)| name.len()).max().unwrap_or(0)
  }
}

fn entry(task: &Task) -> (String, String) {
  let description = match &task.description {
    Some(description) => description.clone(),
    None => format!("{} of {}", task.kind(), task.dependencies.join(", ")),
  };
  (task.name.clone(), description)
}

pub fn help_task(ctx: Rc<Context>, listing: TaskListing) -> Task {
  Task::action("help", Vec::<String>::new(), move || {
    print!("{}", render(&ctx.config, &listing));
    Ok(())
  })
  .describe(HELP_DESCRIPTION)
}

fn render(config: &Config, listing: &TaskListing) -> String {
  let mut out = String::from("Usage: lathe [OPTIONS] [TASK]...\n\n");
  out.push_str(&format!("{}\n", "Options:".if_supports_color(Stream::Stdout, |s| s.bold())));

  let options = [
    ("--verbose", config.verbose.to_string()),
    ("--quiet", config.quiet.to_string()),
    ("--profile", config.profile.to_string()),
    ("--force", config.force.to_string()),
    ("--lib <PATH>", describe_path(&config.dirs.lib)),
    ("--dist <PATH>", describe_path(&config.dirs.dist)),
    ("--reporter <NAME>", describe_reporter(config)),
  ];
  for (flag, value) in options {
    out.push_str(&format!(
      "  {:<18}{}\n",
      flag,
      value.if_supports_color(Stream::Stdout, |s| s.dimmed())
    ));
  }

  out.push_str(&format!("\n{}\n", "Tasks:".if_supports_color(Stream::Stdout, |s| s.bold())));
  let width = listing.width();
  for (name, description) in &listing.entries {
    out.push_str(&format!(
      "  {}{}{}\n",
      name.if_supports_color(Stream::Stdout, |s| s.cyan()),
      " ".repeat(width - name.len() + 2),
      description
    ));
  }
  out
}

fn describe_path(setting: &Setting<std::path::PathBuf>) -> String {
  let origin = if setting.is_override() { "override" } else { "default" };
  format!("{} ({origin})", setting.value.display())
}

fn describe_reporter(config: &Config) -> String {
  let reporter = config.runner_reporter();
  if config.reporter.is_override() {
    format!("{reporter} (override)")
  } else {
    format!("{reporter} (default)")
  }
}
