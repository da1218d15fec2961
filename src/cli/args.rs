//! Command line argument parsing
//!
//! This module handles CLI argument parsing with subcommands:
//! - `run`: Process a message file (auto-detects JSON envelope or plain text)
//! - `interactive`: Read messages from stdin in a loop
//! - `config`: Show configuration discovery information

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub enum ExecutionMode {
    Run(RunConfig),
    Interactive(InteractiveConfig),
    ShowConfig,
}

#[derive(Debug)]
pub struct RunConfig {
    pub input: MessageInput,
    pub config_override: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub plan_only: bool,
    pub json: bool,
    pub verbose: bool,
}

#[derive(Debug)]
pub struct InteractiveConfig {
    pub config_override: Option<PathBuf>,
    pub verbose: bool,
}

/// How the message file should be interpreted
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageInput {
    /// Structured message envelope with id, sender, and project
    Json(PathBuf),
    /// Raw message content; envelope fields get defaults
    Text(PathBuf),
}

impl MessageInput {
    pub fn path(&self) -> &Path {
        match self {
            MessageInput::Json(path) | MessageInput::Text(path) => path,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "moa")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(
    about = "Message orchestration agent that plans, routes, and runs extraction tasks over inbound messages"
)]
#[command(long_about = None)]
#[command(arg_required_else_help = true)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Process a message file (auto-detects JSON envelope or plain text)
    Run {
        /// Path to the message file
        file: PathBuf,
        /// Configuration file path
        #[arg(short = 'c', long = "config")]
        config: Option<PathBuf>,
        /// Write the rendered orchestration map to a file
        #[arg(short = 'o', long = "output", value_name = "FILE")]
        output: Option<PathBuf>,
        /// Plan tasks without executing them
        #[arg(long = "plan-only")]
        plan_only: bool,
        /// Print the outcome as JSON instead of the rendered map
        #[arg(long = "json")]
        json: bool,
        /// Enable verbose output
        #[arg(short = 'v', long = "verbose")]
        verbose: bool,
    },
    /// Read messages from stdin in a loop
    Interactive {
        /// Configuration file path
        #[arg(short = 'c', long = "config")]
        config: Option<PathBuf>,
        /// Enable verbose output
        #[arg(short = 'v', long = "verbose")]
        verbose: bool,
    },
    /// Show configuration discovery information
    Config,
}

impl Args {
    pub fn parse() -> Self {
        Parser::parse()
    }

    pub fn mode(&self) -> Result<ExecutionMode, String> {
        match &self.command {
            Some(Commands::Run {
                file,
                config,
                output,
                plan_only,
                json,
                verbose,
            }) => Ok(ExecutionMode::Run(RunConfig {
                input: Self::detect_file_type(file),
                config_override: config.clone(),
                output: output.clone(),
                plan_only: *plan_only,
                json: *json,
                verbose: *verbose,
            })),
            Some(Commands::Interactive { config, verbose }) => {
                Ok(ExecutionMode::Interactive(InteractiveConfig {
                    config_override: config.clone(),
                    verbose: *verbose,
                }))
            }
            Some(Commands::Config) => Ok(ExecutionMode::ShowConfig),
            None => {
                Err("No command specified. Use 'moa --help' to see available commands.".to_string())
            }
        }
    }

    /// Auto-detect input kind based on extension
    ///
    /// Detection rules:
    /// - `.json` → structured message envelope
    /// - Other → plain text message content
    ///
    /// Note: Extension matching is case-insensitive
    fn detect_file_type(path: &Path) -> MessageInput {
        let extension = path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or("")
            .to_lowercase();

        match extension.as_str() {
            "json" => MessageInput::Json(path.to_path_buf()),
            _ => MessageInput::Text(path.to_path_buf()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_command_with_json() {
        let args = Args {
            command: Some(Commands::Run {
                file: PathBuf::from("message.json"),
                config: None,
                output: Some(PathBuf::from("map.txt")),
                plan_only: false,
                json: true,
                verbose: true,
            }),
        };
        let mode = args.mode().unwrap();

        if let ExecutionMode::Run(config) = mode {
            assert!(matches!(config.input, MessageInput::Json(_)));
            assert!(config.json);
            assert!(config.verbose);
            assert_eq!(config.output, Some(PathBuf::from("map.txt")));
        } else {
            panic!("Expected Run mode");
        }
    }

    #[test]
    fn test_run_command_with_text() {
        let args = Args {
            command: Some(Commands::Run {
                file: PathBuf::from("note.txt"),
                config: Some(PathBuf::from("moa.toml")),
                output: None,
                plan_only: true,
                json: false,
                verbose: false,
            }),
        };
        let mode = args.mode().unwrap();

        if let ExecutionMode::Run(config) = mode {
            assert!(matches!(config.input, MessageInput::Text(_)));
            assert!(config.plan_only);
            assert_eq!(config.config_override, Some(PathBuf::from("moa.toml")));
        } else {
            panic!("Expected Run mode");
        }
    }

    #[test]
    fn test_file_type_detection() {
        assert!(matches!(
            Args::detect_file_type(&PathBuf::from("message.json")),
            MessageInput::Json(_)
        ));
        assert!(matches!(
            Args::detect_file_type(&PathBuf::from("message.txt")),
            MessageInput::Text(_)
        ));
        assert!(matches!(
            Args::detect_file_type(&PathBuf::from("note.md")),
            MessageInput::Text(_)
        ));

        // No extension defaults to text.
        assert!(matches!(
            Args::detect_file_type(&PathBuf::from("message")),
            MessageInput::Text(_)
        ));
    }

    #[test]
    fn test_file_type_detection_case_sensitivity() {
        assert!(matches!(
            Args::detect_file_type(&PathBuf::from("message.JSON")),
            MessageInput::Json(_)
        ));
        assert!(matches!(
            Args::detect_file_type(&PathBuf::from("/path/to/inbox.Json")),
            MessageInput::Json(_)
        ));
    }

    #[test]
    fn test_input_path_accessor() {
        let input = Args::detect_file_type(&PathBuf::from("/inbox/message.json"));
        assert_eq!(input.path(), Path::new("/inbox/message.json"));
    }

    #[test]
    fn test_interactive_command() {
        let args = Args {
            command: Some(Commands::Interactive {
                config: None,
                verbose: true,
            }),
        };
        let mode = args.mode().unwrap();

        if let ExecutionMode::Interactive(config) = mode {
            assert!(config.config_override.is_none());
            assert!(config.verbose);
        } else {
            panic!("Expected Interactive mode");
        }
    }

    #[test]
    fn test_no_command_error() {
        let args = Args { command: None };
        let result = args.mode();
        assert!(result.is_err());
    }
}
