//! Payload schemas for model output
//!
//! Every JSON payload produced by a model is checked against one declarative
//! [`payload::PayloadKind`] by the shared [`validator`] before any agent
//! treats it as data.
//!
//! - [`parsing`] - markdown fence cleanup and JSON parsing
//! - [`payload`] - the payload variants and their field tables
//! - [`validator`] - the single validation routine

pub mod parsing;
pub mod payload;
pub mod validator;
