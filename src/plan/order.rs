//! Execution ordering for task plans.
//!
//! The ordering is a stable topological sort over the declared dependencies:
//! among all tasks whose dependencies are satisfied, the earliest in plan
//! order runs first. Dependency cycles never wedge a plan; when no task is
//! ready, the earliest remaining task is scheduled anyway and the walk
//! continues. Dependencies on ids absent from the plan count as satisfied.

use crate::plan::types::TaskPlan;
use std::collections::HashSet;
use tracing::warn;

impl TaskPlan {
    /// Compute the execution order as indexes into `tasks`
    ///
    /// Every task appears exactly once. The order is deterministic for a
    /// given plan, including in the presence of cycles.
    pub fn execution_order(&self) -> Vec<usize> {
        let known: HashSet<&str> = self.tasks.iter().map(|t| t.task_id.as_str()).collect();
        let mut scheduled: HashSet<&str> = HashSet::new();
        let mut remaining: Vec<usize> = (0..self.tasks.len()).collect();
        let mut order = Vec::with_capacity(self.tasks.len());

        while !remaining.is_empty() {
            let ready = remaining.iter().position(|&idx| {
                self.tasks[idx]
                    .depends_on
                    .iter()
                    .all(|dep| !known.contains(dep.as_str()) || scheduled.contains(dep.as_str()))
            });

            let slot = match ready {
                Some(slot) => slot,
                None => {
                    // Cycle among the remaining tasks; force the earliest one.
                    warn!(
                        "dependency cycle among remaining tasks; forcing {} in plan order",
                        self.tasks[remaining[0]].task_id
                    );
                    0
                }
            };

            let idx = remaining.remove(slot);
            scheduled.insert(self.tasks[idx].task_id.as_str());
            order.push(idx);
        }

        order
    }

    /// Check whether any task participates in a dependency cycle
    pub fn has_circular_dependency(&self) -> bool {
        let mut visited = HashSet::new();
        for task in &self.tasks {
            let mut path = HashSet::new();
            if self.circular_dependency_helper(&task.task_id, &mut visited, &mut path) {
                return true;
            }
        }
        false
    }

    fn circular_dependency_helper<'a>(
        &'a self,
        task_id: &'a str,
        visited: &mut HashSet<&'a str>,
        path: &mut HashSet<&'a str>,
    ) -> bool {
        if path.contains(task_id) {
            return true;
        }
        if visited.contains(task_id) {
            return false;
        }

        visited.insert(task_id);
        path.insert(task_id);

        if let Some(task) = self.get(task_id) {
            for dep in &task.depends_on {
                // Dangling dependencies cannot form cycles.
                if self.contains(dep) && self.circular_dependency_helper(dep, visited, path) {
                    return true;
                }
            }
        }

        path.remove(task_id);
        false
    }
}
