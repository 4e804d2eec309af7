//! In-memory sink for tests and dry runs

use crate::output::RunReport;
use crate::problem::ProblemRecord;
use crate::storage::traits::{validate_record, RecordSink, SinkResult};
use std::collections::BTreeMap;

/// Keeps records in a map keyed by problem id
#[derive(Debug, Default)]
pub struct MemorySink {
    records: BTreeMap<u32, ProblemRecord>,
    runs: Vec<RunReport>,
    writes: usize,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: u32) -> Option<&ProblemRecord> {
        self.records.get(&id)
    }

    pub fn get_by_slug(&self, slug: &str) -> Option<&ProblemRecord> {
        self.records.values().find(|r| r.slug == slug)
    }

    /// Records ordered by id
    pub fn records(&self) -> impl Iterator<Item = &ProblemRecord> {
        self.records.values()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Total upserts accepted, including replacements
    pub fn writes(&self) -> usize {
        self.writes
    }

    pub fn runs(&self) -> &[RunReport] {
        &self.runs
    }
}

impl RecordSink for MemorySink {
    fn upsert(&mut self, record: &ProblemRecord) -> SinkResult<()> {
        validate_record(record)?;

        // A slug moving to a new id takes the old row with it
        self.records
            .retain(|id, existing| *id == record.id || existing.slug != record.slug);
        self.records.insert(record.id, record.clone());
        self.writes += 1;
        Ok(())
    }

    fn record_run(&mut self, report: &RunReport) -> SinkResult<()> {
        self.runs.push(report.clone());
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
