//! Debate domain
//!
//! Entities and value objects of one debate instance: who argues what, in
//! which round, and how the judge ruled.

pub mod argument;
pub mod decision;
pub mod mode;
pub mod record;
pub mod role;
pub mod session;
pub mod transcript;
