use crate::problem::Difficulty;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

/// A fully extracted problem, ready to be written through a sink
///
/// Serialized field names are `problem_id` and `scraped_at`, the layout the
/// downstream JSON loaders read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProblemRecord {
    /// Stable external identifier (the frontend question id)
    #[serde(rename = "problem_id")]
    pub id: u32,

    pub title: String,

    pub slug: String,

    pub difficulty: Difficulty,

    /// Plain text with markup stripped and entities decoded
    pub description: String,

    /// Example blocks in the order they appear in the content
    pub examples: Vec<String>,

    /// Constraint lines in the order they appear in the content
    pub constraints: Vec<String>,

    /// Canonical problem page, derived from the slug
    pub url: String,

    /// Time the detail payload was retrieved
    #[serde(rename = "scraped_at")]
    pub fetched_at: DateTime<Utc>,
}

/// A lightweight reference produced by the paginated listing query
///
/// Entries live only long enough to build the crawl worklist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingEntry {
    pub slug: String,
    pub id: u32,
    pub difficulty: Difficulty,
    pub paid_only: bool,
}

/// Derives the canonical problem URL: `{base}/problems/{slug}/`
///
/// Any path on `base` is replaced, so `https://host/graphql` and
/// `https://host/` give the same result.
pub fn problem_url(base: &Url, slug: &str) -> String {
    let mut url = base.clone();
    url.set_path(&format!("/problems/{}/", slug));
    url.set_query(None);
    url.set_fragment(None);
    url.to_string()
}
