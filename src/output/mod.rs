//! Output module for run reports and store statistics
//!
//! This module handles:
//! - Summarizing a single harvest run (`RunReport`)
//! - Reporting what the SQLite store currently holds

mod report;
pub mod stats;

pub use report::{print_report, AbortReason, CrawlOutcome, FailedItem, RunReport};
pub use stats::{load_statistics, print_statistics, StoreStatistics};
