//! Infrastructure layer for legal-mad
//!
//! This crate contains adapters that implement the ports defined in the
//! application layer: the HTTP generation backend, configuration file
//! loading, the JSONL result sink and the JSONL question reader.

pub mod backend;
pub mod config;
pub mod input;
pub mod logging;

// Re-export commonly used types
pub use backend::{BackendSettings, ChatCompletionsBackend, Provider};
pub use config::{
    ConfigError, ConfigLoader, ConfigValidationError, FileConfig, ResolvedConfig,
};
pub use input::{QuestionReadError, read_questions};
pub use logging::JsonlResultSink;
