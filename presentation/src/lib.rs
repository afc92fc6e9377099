//! Presentation layer for legal-mad
//!
//! This crate contains the CLI definition, output formatters and progress
//! reporters.

pub mod cli;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use cli::commands::{
    AssignmentArg, BaselineArgs, Cli, Command, DebateArgs, MethodArg, ModeArg, OutputFormat,
    RunArgs,
};
pub use output::console::ConsoleFormatter;
pub use progress::reporter::{ProgressReporter, SimpleProgress};
