//! Timeline analysis: LLM-backed event extraction plus local conflict
//! detection over the extracted events.

pub mod engine;
pub mod types;

pub use engine::TimelineEngine;
pub use types::{
    ConflictSeverity, DateConfidence, DateKind, NormalizedDate, TimelineAnalysis,
    TimelineConflict, TimelineEvent,
};
