//! Named tasks with prerequisites.
//!
//! Tasks are registered into a [`TaskGraph`], validated once, and executed by
//! a [`Scheduler`]. Execution is strictly sequential: every task body runs to
//! completion before the next one starts.

pub mod graph;
pub mod scheduler;
pub mod types;

pub use graph::TaskGraph;
pub use scheduler::{Invocation, Scheduler};
pub use types::{ActionError, GraphError, Task, TaskAction, TaskBody, TaskError};
