//! Problem data model
//!
//! This module defines the records that flow through the harvest pipeline:
//! - `ListingEntry`: transient references produced by the paginated listing
//! - `ProblemRecord`: the normalized unit persisted by sinks
//! - `Difficulty` / `DifficultyFilter`: difficulty levels and listing filters

mod difficulty;
mod record;

pub use difficulty::{Difficulty, DifficultyFilter};
pub use record::{problem_url, ListingEntry, ProblemRecord};
