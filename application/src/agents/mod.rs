//! Debate agents
//!
//! One [`Debater`] and one [`Judge`] implementation serve every
//! [`DebateMode`](mad_domain::DebateMode); behavior is selected by the mode
//! carried in [`DebateParams`](crate::config::DebateParams).

pub mod debater;
pub mod judge;

pub use debater::{Debater, DebaterState};
pub use judge::Judge;
