//! Task definitions and error types.

use std::fmt;

use thiserror::Error;

use crate::clean::CleanError;
use crate::dist::DistError;
use crate::install::InstallError;
use crate::pipeline::PipelineError;
use crate::tools::ToolError;
use crate::variant::BuildError;
use crate::workflow::{LintError, TestError};

/// A zero-argument, fallible task body.
pub type TaskAction = Box<dyn Fn() -> Result<(), ActionError>>;

/// What a task does once its dependencies have completed.
pub enum TaskBody {
  /// Nothing; the task only exists to run its dependencies.
  Alias,
  /// A single action.
  Action(TaskAction),
  /// Other tasks, run strictly in order.
  Sequence(Vec<String>),
}

/// A named unit of work.
pub struct Task {
  pub name: String,
  pub description: Option<String>,
  /// Run left to right before the body.
  pub dependencies: Vec<String>,
  pub body: TaskBody,
}

impl Task {
  /// A task that runs `targets` and nothing else.
  pub fn alias<I, S>(name: impl Into<String>, targets: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    Self {
      name: name.into(),
      description: None,
      dependencies: targets.into_iter().map(Into::into).collect(),
      body: TaskBody::Alias,
    }
  }

  pub fn action<I, S>(
    name: impl Into<String>,
    dependencies: I,
    action: impl Fn() -> Result<(), ActionError> + 'static,
  ) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    Self {
      name: name.into(),
      description: None,
      dependencies: dependencies.into_iter().map(Into::into).collect(),
      body: TaskBody::Action(Box::new(action)),
    }
  }

  pub fn sequence<I, S>(name: impl Into<String>, steps: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    Self {
      name: name.into(),
      description: None,
      dependencies: Vec::new(),
      body: TaskBody::Sequence(steps.into_iter().map(Into::into).collect()),
    }
  }

  pub fn describe(mut self, description: impl Into<String>) -> Self {
    self.description = Some(description.into());
    self
  }

  pub fn kind(&self) -> &'static str {
    match self.body {
      TaskBody::Alias => "alias",
      TaskBody::Action(_) => "action",
      TaskBody::Sequence(_) => "sequence",
    }
  }

  /// Every task this one refers to: dependencies, then sequence steps.
  pub fn references(&self) -> impl Iterator<Item = &str> {
    let steps = match &self.body {
      TaskBody::Sequence(steps) => steps.as_slice(),
      _ => &[],
    };
    self.dependencies.iter().chain(steps).map(String::as_str)
  }
}

impl fmt::Debug for Task {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let mut s = f.debug_struct("Task");
    s.field("name", &self.name)
      .field("kind", &self.kind())
      .field("dependencies", &self.dependencies);
    if let TaskBody::Sequence(steps) = &self.body {
      s.field("steps", steps);
    }
    s.finish()
  }
}

/// Problems with the shape of the task graph.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GraphError {
  #[error("task '{0}' is already registered")]
  Duplicate(String),

  #[error("task '{task}' refers to unknown task '{dependency}'")]
  UnknownDependency { task: String, dependency: String },

  /// A task (transitively) depends on itself. `path` reads `a -> b -> a`.
  #[error("dependency cycle: {path}")]
  Cycle { path: String },
}

/// Failure of a task body.
#[derive(Debug, Error)]
pub enum ActionError {
  #[error(transparent)]
  Install(#[from] InstallError),

  #[error(transparent)]
  Build(#[from] BuildError),

  #[error(transparent)]
  Clean(#[from] CleanError),

  #[error(transparent)]
  Dist(#[from] DistError),

  #[error(transparent)]
  Test(#[from] TestError),

  #[error(transparent)]
  Lint(#[from] LintError),

  #[error(transparent)]
  Tool(#[from] ToolError),

  #[error("io error: {0}")]
  Io(#[from] std::io::Error),
}

/// Errors from running a task.
#[derive(Debug, Error)]
pub enum TaskError {
  #[error(transparent)]
  Graph(#[from] GraphError),

  #[error("unknown task '{0}'")]
  UnknownTask(String),

  #[error("task '{task}' failed: {source}")]
  Action {
    task: String,
    #[source]
    source: ActionError,
  },

  /// A step of a sequence task failed.
  #[error(transparent)]
  Pipeline(#[from] Box<PipelineError>),
}
