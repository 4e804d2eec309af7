//! Statistics generation from the problem database
//!
//! This module provides functionality for extracting and displaying
//! store statistics from the SQLite sink.

use crate::problem::Difficulty;
use crate::storage::{RunRecord, SinkResult, SqliteSink};

/// Number of past runs shown by `print_statistics`
const RECENT_RUNS: usize = 5;

/// Store statistics summary
#[derive(Debug, Clone)]
pub struct StoreStatistics {
    /// Total number of stored problems
    pub total_problems: u64,

    /// Count of problems by difficulty, every level present
    pub by_difficulty: Vec<(Difficulty, u64)>,

    /// Most recent runs, newest first
    pub recent_runs: Vec<RunRecord>,
}

/// Loads statistics from the database
///
/// # Arguments
///
/// * `sink` - The SQLite sink to query
///
/// # Returns
///
/// * `Ok(StoreStatistics)` - Successfully loaded statistics
/// * `Err(SinkError)` - Failed to query statistics
pub fn load_statistics(sink: &SqliteSink) -> SinkResult<StoreStatistics> {
    Ok(StoreStatistics {
        total_problems: sink.count_problems()?,
        by_difficulty: sink.count_by_difficulty()?,
        recent_runs: sink.recent_runs(RECENT_RUNS)?,
    })
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &StoreStatistics) {
    println!("=== Problem Store Statistics ===\n");

    println!("Total problems: {}", stats.total_problems);
    println!();

    println!("By Difficulty:");
    for (difficulty, count) in &stats.by_difficulty {
        let percentage = if stats.total_problems > 0 {
            (*count as f64 / stats.total_problems as f64) * 100.0
        } else {
            0.0
        };
        println!("  {}: {} ({:.1}%)", difficulty, count, percentage);
    }
    println!();

    if stats.recent_runs.is_empty() {
        println!("No harvest runs recorded.");
    } else {
        println!("Recent Runs:");
        for run in &stats.recent_runs {
            let outcome = run
                .outcome
                .map(|o| o.to_string())
                .unwrap_or_else(|| "unknown".to_string());
            println!(
                "  #{} {} {}: {}/{} stored, {} failed",
                run.id, run.started_at, outcome, run.succeeded, run.attempted, run.failed
            );
        }
    }
    println!();
}
