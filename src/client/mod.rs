//! Remote question bank client
//!
//! This module provides:
//! - `Session`: one cookie-carrying HTTP client per crawl
//! - `ListingPaginator`: paginated, filtered listing of problem references
//! - `DetailFetcher`: per-problem content retrieval
//! - `DelayPolicy`: fixed spacing between requests

pub mod detail;
pub mod graphql;
pub mod listing;
pub mod session;

pub use detail::{build_record, DetailFailure, DetailFetchError, DetailFetcher};
pub use listing::{EntryStream, ListingFetchError, ListingPage, ListingPaginator};
pub use session::{build_http_client, Session, SessionOptions};

use crate::config::CrawlConfig;
use std::time::Duration;

/// Fixed delays between consecutive requests
///
/// `page_delay` separates listing pages, `detail_delay` follows every detail
/// request. The crawl is strictly sequential, so these are the only rate
/// limit applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelayPolicy {
    pub page_delay: Duration,
    pub detail_delay: Duration,
}

impl DelayPolicy {
    /// No waiting at all, for tests and local mirrors
    pub fn none() -> Self {
        Self {
            page_delay: Duration::ZERO,
            detail_delay: Duration::ZERO,
        }
    }

    pub fn from_config(config: &CrawlConfig) -> Self {
        Self {
            page_delay: config.page_delay(),
            detail_delay: config.detail_delay(),
        }
    }
}

impl Default for DelayPolicy {
    fn default() -> Self {
        Self {
            page_delay: Duration::from_millis(500),
            detail_delay: Duration::from_millis(1500),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delay_policy_from_config() {
        let mut crawl = CrawlConfig::default();
        crawl.page_delay_ms = 0;
        crawl.detail_delay_ms = 250;

        let delays = DelayPolicy::from_config(&crawl);
        assert_eq!(delays.page_delay, Duration::ZERO);
        assert_eq!(delays.detail_delay, Duration::from_millis(250));
    }

    #[test]
    fn test_default_matches_default_config() {
        assert_eq!(
            DelayPolicy::default(),
            DelayPolicy::from_config(&CrawlConfig::default())
        );
    }
}
