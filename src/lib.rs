//! Problem-Harvest: a polite question-bank harvester
//!
//! This crate walks the paginated problem listing of a remote question bank,
//! fetches each free problem's HTML content one at a time, extracts the
//! description, examples and constraints, and upserts the normalized record
//! into a pluggable sink (SQLite, JSON files or memory).

pub mod client;
pub mod config;
pub mod crawler;
pub mod extract;
pub mod output;
pub mod problem;
pub mod storage;

use thiserror::Error;

/// Errors from building a harvest session or harvesting a single problem
///
/// Full runs never fail on a single item; those failures are counted in the
/// `RunReport` instead.
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Detail error: {0}")]
    Detail(#[from] client::DetailFetchError),

    #[error("Sink error: {0}")]
    Sink(#[from] storage::SinkError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("No {0} problems available to pick from")]
    NoCandidates(problem::DifficultyFilter),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

// Re-export commonly used types
pub use config::Config;
pub use crawler::{Coordinator, CrawlPhase};
pub use extract::{extract, strip_markup, ExtractedContent};
pub use output::{CrawlOutcome, RunReport};
pub use problem::{Difficulty, DifficultyFilter, ListingEntry, ProblemRecord};
pub use storage::{RecordSink, SinkError};
