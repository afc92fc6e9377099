//! Generation backends
//!
//! [`ChatCompletionsBackend`] implements the application's
//! [`GenerationBackend`](mad_application::GenerationBackend) port over HTTP.

mod chat_completions;
mod provider;

pub use chat_completions::{BackendSettings, ChatCompletionsBackend};
pub use provider::Provider;
