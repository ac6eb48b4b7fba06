//! Task registry and static validation.

use std::collections::{HashMap, HashSet};

use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};

use super::types::{GraphError, Task};

/// Tasks by name, in registration order.
///
/// Tasks may refer to tasks registered after them; references are only
/// checked by [`TaskGraph::validate`].
#[derive(Debug, Default)]
pub struct TaskGraph {
  tasks: Vec<Task>,
  index: HashMap<String, usize>,
}

impl TaskGraph {
  pub fn new() -> Self {
    Self::default()
  }

  /// Add a task. Names are unique.
  pub fn register(&mut self, task: Task) -> Result<(), GraphError> {
    if self.index.contains_key(&task.name) {
      return Err(GraphError::Duplicate(task.name));
    }
    self.index.insert(task.name.clone(), self.tasks.len());
    self.tasks.push(task);
    Ok(())
  }

  pub fn get(&self, name: &str) -> Option<&Task> {
    self.index.get(name).map(|&i| &self.tasks[i])
  }

  pub fn contains(&self, name: &str) -> bool {
    self.index.contains_key(name)
  }

  pub fn tasks(&self) -> impl Iterator<Item = &Task> {
    self.tasks.iter()
  }

  pub fn len(&self) -> usize {
    self.tasks.len()
  }

  pub fn is_empty(&self) -> bool {
    self.tasks.is_empty()
  }

  /// Check that every reference resolves and that there are no cycles.
  pub fn validate(&self) -> Result<(), GraphError> {
    let mut graph: DiGraph<&str, ()> = DiGraph::new();
    let nodes: Vec<NodeIndex> = self.tasks.iter().map(|t| graph.add_node(t.name.as_str())).collect();

    // Edge from task to the task it needs
    for (i, task) in self.tasks.iter().enumerate() {
      for reference in task.references() {
        let Some(&target) = self.index.get(reference) else {
          return Err(GraphError::UnknownDependency {
            task: task.name.clone(),
            dependency: reference.to_string(),
          });
        };
        graph.add_edge(nodes[i], nodes[target], ());
      }
    }

    toposort(&graph, None).map_err(|cycle| GraphError::Cycle {
      path: cycle_path(&graph, cycle.node_id()),
    })?;
    Ok(())
  }
}

/// Render the cycle through `start` as `start -> ... -> start`.
fn cycle_path(graph: &DiGraph<&str, ()>, start: NodeIndex) -> String {
  let mut path = vec![start];
  let mut visited = HashSet::from([start]);
  if !walk_back(graph, start, start, &mut path, &mut visited) {
    return graph[start].to_string();
  }
  path.iter().map(|&i| graph[i]).collect::<Vec<_>>().join(" -> ")
}

fn walk_back(
  graph: &DiGraph<&str, ()>,
  current: NodeIndex,
  target: NodeIndex,
  path: &mut Vec<NodeIndex>,
  visited: &mut HashSet<NodeIndex>,
) -> bool {
  for next in graph.neighbors(current) {
    if next == target {
      path.push(target);
      return true;
    }
    if visited.insert(next) {
      path.push(next);
      if walk_back(graph, next, target, path, visited) {
        return true;
      }
      path.pop();
    }
  }
  false
}
