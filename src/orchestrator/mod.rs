//! The L1/L2 orchestration layer: planning, agent routing, and
//! dependency-ordered execution.

pub mod planner;
pub mod router;
pub mod scheduler;

#[cfg(test)]
mod tests;

pub use planner::{Planner, PlanningResult};
pub use router::Router;
pub use scheduler::{DependencyScheduler, PREVIOUS_RESULTS_DELIMITER, RoutingResult};
