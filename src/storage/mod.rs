//! Storage module for persisting harvested problems
//!
//! This module provides:
//! - The `RecordSink` trait every destination implements
//! - `SqliteSink`: relational tables with ordered child rows and run history
//! - `JsonFileSink`: one JSON file per problem
//! - `MemorySink`: an in-process map for tests and dry runs
//! - `PlaceholderSink`: fills empty lists with placeholder lines

mod json;
mod memory;
mod placeholder;
mod schema;
mod sqlite;
mod traits;

pub use json::JsonFileSink;
pub use memory::MemorySink;
pub use placeholder::{PlaceholderSink, NO_CONSTRAINTS, NO_EXAMPLES};
pub use sqlite::SqliteSink;
pub use traits::{validate_record, RecordSink, SinkError, SinkResult};

use crate::config::{OutputConfig, SinkKind};
use crate::output::CrawlOutcome;
use std::path::Path;

/// Opens the sink selected by the output configuration
///
/// # Arguments
///
/// * `config` - The `[output]` section
///
/// # Returns
///
/// * `Ok(Box<dyn RecordSink>)` - The sink, wrapped in `PlaceholderSink` when
///   placeholders are enabled
/// * `Err(SinkError)` - The database or directory could not be opened
pub fn open_sink(config: &OutputConfig) -> SinkResult<Box<dyn RecordSink>> {
    let sink: Box<dyn RecordSink> = match config.sink {
        SinkKind::Sqlite => Box::new(SqliteSink::new(Path::new(&config.database_path))?),
        SinkKind::Json => Box::new(JsonFileSink::new(Path::new(&config.json_dir))?),
        SinkKind::Memory => Box::new(MemorySink::new()),
    };

    if config.placeholders {
        Ok(Box::new(PlaceholderSink::new(sink)))
    } else {
        Ok(sink)
    }
}

/// A stored harvest run
#[derive(Debug, Clone)]
pub struct RunRecord {
    pub id: i64,
    pub started_at: String,
    pub finished_at: String,
    pub config_hash: Option<String>,
    /// `None` if the stored status is not recognized
    pub outcome: Option<CrawlOutcome>,
    pub listed: i64,
    pub attempted: i64,
    pub succeeded: i64,
    pub failed: i64,
}
