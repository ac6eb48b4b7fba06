//! Ordered multi-step runs.
//!
//! A pipeline runs named tasks one after another within a single invocation,
//! so a prerequisite shared by two steps runs once. The first failing step
//! stops the pipeline.

use thiserror::Error;
use tracing::debug;

use crate::task::{Invocation, Scheduler, TaskError};

/// A pipeline step failed.
#[derive(Debug, Error)]
#[error("step '{step}' failed: {source}")]
pub struct PipelineError {
  pub step: String,
  #[source]
  pub source: Box<TaskError>,
}

/// Run `steps` in order in a fresh invocation.
pub fn run_pipeline<S: AsRef<str>>(scheduler: &Scheduler, steps: &[S]) -> Result<(), PipelineError> {
  run_steps(scheduler, &mut Invocation::new(), steps)
}

/// Run `steps` in order within `invocation`.
pub fn run_steps<S: AsRef<str>>(
  scheduler: &Scheduler,
  invocation: &mut Invocation,
  steps: &[S],
) -> Result<(), PipelineError> {
  for (i, step) in steps.iter().enumerate() {
    let step = step.as_ref();
    debug!(step = %step, index = i, total = steps.len(), "pipeline step");
    scheduler.run_in(step, invocation).map_err(|source| PipelineError {
      step: step.to_string(),
      source: Box::new(source),
    })?;
  }
  Ok(())
}
