//! Environment constants and path utilities for the message orchestration agent.
//!
//! This module centralizes all hardcoded paths and directory names used throughout
//! the application, making them easier to maintain and modify.

/// Main application directory name (hidden directory like .git, .vscode)
pub const MOA_DIR_NAME: &str = ".moa";

/// Configuration file name
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Standalone configuration file name checked in the working directory
pub const LOCAL_CONFIG_FILE_NAME: &str = "moa.toml";

/// Store-related directory names
pub mod store {
    /// Default store root, relative to the working directory
    pub const DEFAULT_ROOT: &str = ".moa/store";

    /// Orchestration maps directory name within the store root
    pub const MAPS_DIR_NAME: &str = "maps";

    /// Planned tasks directory name within the store root
    pub const TASKS_DIR_NAME: &str = "tasks";

    /// Extraction records directory name within the store root
    pub const EXTRACTIONS_DIR_NAME: &str = "extractions";
}

/// Common path utilities
use std::path::PathBuf;

/// Build the main .moa directory path from a base directory
pub fn moa_dir_path(base_dir: &std::path::Path) -> PathBuf {
    base_dir.join(MOA_DIR_NAME)
}

/// Build the store root path from a base directory
pub fn store_root_path(base_dir: &std::path::Path) -> PathBuf {
    base_dir.join(store::DEFAULT_ROOT)
}

/// Build config directory path in user's home directory
pub fn user_config_dir_path(home_dir: &std::path::Path) -> PathBuf {
    home_dir.join(MOA_DIR_NAME)
}

/// Build config file path in user's home directory
pub fn user_config_file_path(home_dir: &std::path::Path) -> PathBuf {
    user_config_dir_path(home_dir).join(CONFIG_FILE_NAME)
}

/// Build local config file path in current directory
pub fn local_config_file_path(current_dir: &std::path::Path) -> PathBuf {
    current_dir.join(MOA_DIR_NAME).join(CONFIG_FILE_NAME)
}
