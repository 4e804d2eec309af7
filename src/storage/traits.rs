//! Sink trait and error types
//!
//! A sink receives fully extracted records one at a time. Every
//! implementation must make `upsert` idempotent per problem id.

use crate::output::RunReport;
use crate::problem::ProblemRecord;
use thiserror::Error;

/// Errors that can occur while writing records
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid record: {0}")]
    InvalidRecord(String),
}

/// Result type for sink operations
pub type SinkResult<T> = Result<T, SinkError>;

/// Destination for extracted problem records
pub trait RecordSink {
    /// Inserts or replaces the record keyed by `record.id`
    ///
    /// A repeated upsert replaces every scalar field and both child lists;
    /// no example or constraint from an earlier write survives.
    fn upsert(&mut self, record: &ProblemRecord) -> SinkResult<()>;

    /// Stores the summary of a finished run, if the sink keeps run history
    fn record_run(&mut self, _report: &RunReport) -> SinkResult<()> {
        Ok(())
    }

    /// Short name used in logs
    fn name(&self) -> &'static str;
}

impl<S: RecordSink + ?Sized> RecordSink for Box<S> {
    fn upsert(&mut self, record: &ProblemRecord) -> SinkResult<()> {
        (**self).upsert(record)
    }

    fn record_run(&mut self, report: &RunReport) -> SinkResult<()> {
        (**self).record_run(report)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

impl<S: RecordSink + ?Sized> RecordSink for &mut S {
    fn upsert(&mut self, record: &ProblemRecord) -> SinkResult<()> {
        (**self).upsert(record)
    }

    fn record_run(&mut self, report: &RunReport) -> SinkResult<()> {
        (**self).record_run(report)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

/// Rejects records that break the key invariants
pub fn validate_record(record: &ProblemRecord) -> SinkResult<()> {
    if record.id == 0 {
        return Err(SinkError::InvalidRecord(format!(
            "problem id must be positive (slug '{}')",
            record.slug
        )));
    }
    if record.slug.trim().is_empty() {
        return Err(SinkError::InvalidRecord(format!(
            "problem {} has an empty slug",
            record.id
        )));
    }
    if record.title.trim().is_empty() {
        return Err(SinkError::InvalidRecord(format!(
            "problem {} has an empty title",
            record.id
        )));
    }
    Ok(())
}
