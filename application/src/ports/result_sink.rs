//! Port for persisting result records.
//!
//! Every finished question, completed or failed, is handed to a
//! [`ResultSink`] as one record. Checkpointing and file formats are the
//! adapter's concern.

use crate::use_cases::baseline::BaselineRecord;
use mad_domain::DebateRecord;

/// Destination for result records.
///
/// Methods are synchronous and non-fallible so a persistence problem never
/// aborts a batch; implementations log their own write failures.
pub trait ResultSink: Send + Sync {
    /// Record the outcome of one debate.
    fn write_debate(&self, record: &DebateRecord);

    /// Record the outcome of one baseline run.
    fn write_baseline(&self, record: &BaselineRecord);
}

/// Sink that drops every record
pub struct NoResultSink;

impl ResultSink for NoResultSink {
    fn write_debate(&self, _record: &DebateRecord) {}
    fn write_baseline(&self, _record: &BaselineRecord) {}
}
