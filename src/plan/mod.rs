//! Task plan model: typed tasks, the plan container, and execution ordering.

pub mod order;
pub mod types;


pub use types::*;
