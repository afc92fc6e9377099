//! Prompt domain
//!
//! Templates for every model call: debater openings and rebuttals, judge
//! rulings, and the single-agent baselines.

mod baseline;
mod debate;

pub use baseline::{BaselinePromptTemplate, FINAL_ANSWER_MARKER};
pub use debate::DebatePromptTemplate;
