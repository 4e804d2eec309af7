//! Crawler module for harvest orchestration
//!
//! This module contains the core harvest logic:
//! - Session warm-up
//! - Listing drain into an ordered, deduplicated worklist
//! - Sequential detail fetching with per-item failure accounting
//! - Interruption between items
//! - Single-problem harvests, by slug or by random pick

mod coordinator;
pub mod random;

pub use coordinator::{run_crawl, Coordinator, CrawlPhase, RunStats};
