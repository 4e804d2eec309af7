use crate::problem::DifficultyFilter;
use serde::Deserialize;
use std::time::Duration;

/// Browser-like agent string; the listing endpoint rejects obvious bots
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Main configuration structure for Problem-Harvest
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub crawl: CrawlConfig,
    #[serde(default)]
    pub client: ClientConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Remote question bank location
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Scheme and host of the question bank (e.g. "https://leetcode.com")
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Path of the query endpoint
    #[serde(rename = "graphql-path")]
    pub graphql_path: String,

    /// Path of the landing page visited once to acquire cookies
    #[serde(rename = "landing-path")]
    pub landing_path: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: "https://leetcode.com".to_string(),
            graphql_path: "/graphql".to_string(),
            landing_path: "/problemset/".to_string(),
        }
    }
}

/// Crawl behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlConfig {
    /// Difficulty filter for the listing query ("easy", "medium", "hard", "any")
    pub difficulty: DifficultyFilter,

    /// Number of listing entries requested per page
    #[serde(rename = "page-size")]
    pub page_size: u32,

    /// Delay between listing page requests (milliseconds)
    #[serde(rename = "page-delay-ms")]
    pub page_delay_ms: u64,

    /// Delay applied after every detail request (milliseconds)
    #[serde(rename = "detail-delay-ms")]
    pub detail_delay_ms: u64,

    /// Timeout for listing and detail requests (seconds)
    #[serde(rename = "request-timeout-secs")]
    pub request_timeout_secs: u64,

    /// Timeout for the session warm-up request (seconds)
    #[serde(rename = "bootstrap-timeout-secs")]
    pub bootstrap_timeout_secs: u64,

    /// Upper bound on the number of problems fetched in one run
    #[serde(rename = "max-problems")]
    pub max_problems: Option<usize>,
}

impl CrawlConfig {
    pub fn page_delay(&self) -> Duration {
        Duration::from_millis(self.page_delay_ms)
    }

    pub fn detail_delay(&self) -> Duration {
        Duration::from_millis(self.detail_delay_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn bootstrap_timeout(&self) -> Duration {
        Duration::from_secs(self.bootstrap_timeout_secs)
    }
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            difficulty: DifficultyFilter::Easy,
            page_size: 100,
            page_delay_ms: 500,
            detail_delay_ms: 1500,
            request_timeout_secs: 15,
            bootstrap_timeout_secs: 10,
            max_problems: None,
        }
    }
}

/// HTTP client identification
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    #[serde(rename = "accept-language")]
    pub accept_language: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            accept_language: "en-US,en;q=0.9".to_string(),
        }
    }
}

/// Which sink receives harvested records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SinkKind {
    #[default]
    Sqlite,
    Json,
    Memory,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub sink: SinkKind,

    /// Path to the SQLite database file
    #[serde(rename = "database-path")]
    pub database_path: String,

    /// Directory receiving one JSON file per problem
    #[serde(rename = "json-dir")]
    pub json_dir: String,

    /// Store placeholder text instead of empty example/constraint lists
    pub placeholders: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            sink: SinkKind::Sqlite,
            database_path: "./db/problems.db".to_string(),
            json_dir: "./problems".to_string(),
            placeholders: false,
        }
    }
}
