//! Result logging - structured JSONL records.
//!
//! Provides [`JsonlResultSink`], a JSONL file writer that implements the
//! [`ResultSink`](mad_application::ResultSink) port.

mod jsonl_sink;

pub use jsonl_sink::JsonlResultSink;
