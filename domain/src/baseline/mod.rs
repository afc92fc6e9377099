//! Baseline domain
//!
//! Single-agent reference methods that debate accuracy is compared against,
//! and the answers they produce.

pub mod answer;
pub mod method;
