//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod baseline;
pub mod run_batch;
pub mod run_debate;
pub(crate) mod shared;
