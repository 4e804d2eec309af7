//! Per-run summary produced by the coordinator

use chrono::{DateTime, Utc};
use std::fmt;

/// Why a run stopped before its worklist was exhausted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbortReason {
    /// The shutdown flag was observed
    Interrupted,
    /// The listing failed before any entry was collected
    ListingFailed,
}

/// Terminal state of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrawlOutcome {
    Completed,
    Aborted(AbortReason),
}

impl CrawlOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, CrawlOutcome::Completed)
    }

    pub fn to_db_string(&self) -> &'static str {
        match self {
            CrawlOutcome::Completed => "completed",
            CrawlOutcome::Aborted(AbortReason::Interrupted) => "interrupted",
            CrawlOutcome::Aborted(AbortReason::ListingFailed) => "listing-failed",
        }
    }

    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "completed" => Some(CrawlOutcome::Completed),
            "interrupted" => Some(CrawlOutcome::Aborted(AbortReason::Interrupted)),
            "listing-failed" => Some(CrawlOutcome::Aborted(AbortReason::ListingFailed)),
            _ => None,
        }
    }
}

impl fmt::Display for CrawlOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_db_string())
    }
}

/// One item that did not make it into the sink
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedItem {
    pub slug: String,
    pub reason: String,
}

/// Summary of one crawl run
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Free, deduplicated entries collected by the listing
    pub listed: usize,
    /// Detail fetches started
    pub attempted: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub outcome: CrawlOutcome,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// Hash of the configuration the run was made with, if known
    pub config_hash: Option<String>,
    pub failures: Vec<FailedItem>,
}

impl RunReport {
    /// Percentage of attempted items that were stored, 0 when nothing ran
    pub fn success_rate(&self) -> f64 {
        if self.attempted == 0 {
            0.0
        } else {
            self.succeeded as f64 / self.attempted as f64 * 100.0
        }
    }

    pub fn duration_seconds(&self) -> i64 {
        (self.finished_at - self.started_at).num_seconds()
    }
}

/// Prints a run report to stdout
pub fn print_report(report: &RunReport) {
    println!("=== Harvest Report ===\n");
    println!("  Outcome: {}", report.outcome);
    println!("  Listed: {}", report.listed);
    println!("  Attempted: {}", report.attempted);
    println!("  Succeeded: {}", report.succeeded);
    println!("  Failed: {}", report.failed);
    println!("  Success rate: {:.1}%", report.success_rate());
    println!("  Duration: {}s", report.duration_seconds());

    if !report.failures.is_empty() {
        println!();
        println!("Failures ({}):", report.failures.len());
        for item in &report.failures {
            println!("  - {}: {}", item.slug, item.reason);
        }
    }
    println!();
}
