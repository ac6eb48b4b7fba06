//! Dependency-ordered task execution.

use std::collections::HashSet;
use std::time::Instant;

use tracing::{debug, info};

use super::graph::TaskGraph;
use super::types::{GraphError, Task, TaskBody, TaskError};
use crate::pipeline::run_steps;

/// State of one top-level invocation.
///
/// A task completes at most once per invocation, no matter how many tasks
/// depend on it.
#[derive(Debug, Default)]
pub struct Invocation {
  completed: HashSet<String>,
  active: Vec<String>,
}

impl Invocation {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn is_completed(&self, name: &str) -> bool {
    self.completed.contains(name)
  }
}

/// Runs tasks from a validated graph, one at a time.
#[derive(Debug)]
pub struct Scheduler {
  graph: TaskGraph,
}

impl Scheduler {
  /// Validate `graph` and take ownership of it.
  pub fn new(graph: TaskGraph) -> Result<Self, GraphError> {
    graph.validate()?;
    Ok(Self { graph })
  }

  /// Skip validation so the run-time cycle guard can be exercised.
  #[cfg(test)]
  fn unvalidated(graph: TaskGraph) -> Self {
    Self { graph }
  }

  pub fn graph(&self) -> &TaskGraph {
    &self.graph
  }

  /// Run `name` and its prerequisites in a fresh invocation.
  pub fn run(&self, name: &str) -> Result<(), TaskError> {
    self.run_in(name, &mut Invocation::new())
  }

  /// Run `name` within an existing invocation.
  ///
  /// Prerequisites run depth first, left to right. The first failure aborts
  /// the rest of the invocation.
  pub fn run_in(&self, name: &str, invocation: &mut Invocation) -> Result<(), TaskError> {
    if invocation.completed.contains(name) {
      debug!(task = %name, "already completed, skipping");
      return Ok(());
    }

    let task = self.graph.get(name).ok_or_else(|| TaskError::UnknownTask(name.to_string()))?;

    if let Some(pos) = invocation.active.iter().position(|active| active == name) {
      let mut path = invocation.active[pos..].to_vec();
      path.push(name.to_string());
      return Err(GraphError::Cycle { path: path.join(" -> ") }.into());
    }

    invocation.active.push(name.to_string());
    let result = self.execute(task, invocation);
    invocation.active.pop();
    result?;

    invocation.completed.insert(name.to_string());
    Ok(())
  }

  fn execute(&self, task: &Task, invocation: &mut Invocation) -> Result<(), TaskError> {
    for dependency in &task.dependencies {
      self.run_in(dependency, invocation)?;
    }

    let start = Instant::now();
    info!(task = %task.name, "starting");

    match &task.body {
      TaskBody::Alias => {}
      TaskBody::Action(action) => action().map_err(|source| TaskError::Action {
        task: task.name.clone(),
        source,
      })?,
      TaskBody::Sequence(steps) => run_steps(self, invocation, steps).map_err(Box::new)?,
    }

    info!(task = %task.name, elapsed_ms = start.elapsed().as_millis() as u64, "finished");
    Ok(())
  }
}
