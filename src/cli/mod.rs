//! CLI-specific functionality for the message orchestration agent
//!
//! This module contains all CLI-related code including argument parsing,
//! message input handling, and configuration discovery.

pub mod args;
pub mod config;

pub use args::{Args, ExecutionMode, InteractiveConfig, MessageInput, RunConfig};
pub use config::ConfigDiscovery;
