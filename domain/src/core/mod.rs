//! Core domain concepts shared across all subdomains.
//!
//! - [`question::LegalQuestion`] - an immutable legal question record
//! - [`choice::Choice`] - the closed answer set `{A, B, C, D}`
//! - [`error::DomainError`] - domain-level errors

pub mod choice;
pub mod error;
pub mod question;
pub mod string;
