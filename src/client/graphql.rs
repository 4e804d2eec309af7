//! Query documents and payload shapes for the question bank endpoint
//!
//! Responses are modeled with optional fields so that a missing key has a
//! defined meaning instead of failing deserialization:
//! - missing `data` or list envelope: zero entries
//! - missing `paidOnly`: treated as paid, so the entry is excluded
//! - missing `question`: empty result

use crate::problem::{Difficulty, DifficultyFilter, ListingEntry};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Paginated, filtered listing of problems
pub const LISTING_QUERY: &str = r#"
query problemsetQuestionList($categorySlug: String, $limit: Int, $skip: Int, $filters: QuestionListFilterInput) {
  problemsetQuestionList: questionList(
    categorySlug: $categorySlug
    limit: $limit
    skip: $skip
    filters: $filters
  ) {
    total: totalNum
    questions: data {
      difficulty
      frontendQuestionId: questionFrontendId
      paidOnly: isPaidOnly
      title
      titleSlug
    }
  }
}
"#;

/// Full content of one problem
pub const DETAIL_QUERY: &str = r#"
query questionData($titleSlug: String!) {
  question(titleSlug: $titleSlug) {
    questionId
    questionFrontendId
    title
    titleSlug
    content
    difficulty
  }
}
"#;

/// A `{query, variables}` request body
#[derive(Debug, Clone, Serialize)]
pub struct GraphQlRequest<V> {
    pub query: &'static str,
    pub variables: V,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingVariables {
    pub category_slug: String,
    pub limit: u32,
    pub skip: u32,
    pub filters: ListingFilters,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ListingFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<&'static str>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailVariables {
    pub title_slug: String,
}

/// Builds the listing request for one page
pub fn listing_request(
    filter: DifficultyFilter,
    limit: u32,
    skip: u32,
) -> GraphQlRequest<ListingVariables> {
    GraphQlRequest {
        query: LISTING_QUERY,
        variables: ListingVariables {
            category_slug: String::new(),
            limit,
            skip,
            filters: ListingFilters {
                difficulty: filter.difficulty().map(|d| d.as_filter()),
            },
        },
    }
}

/// Builds the detail request for one slug
pub fn detail_request(slug: &str) -> GraphQlRequest<DetailVariables> {
    GraphQlRequest {
        query: DETAIL_QUERY,
        variables: DetailVariables {
            title_slug: slug.to_string(),
        },
    }
}

/// Top-level response envelope
#[derive(Debug, Deserialize)]
pub struct GraphQlResponse<D> {
    #[serde(default = "Option::default")]
    pub data: Option<D>,
    #[serde(default)]
    pub errors: Option<Vec<GraphQlError>>,
}

impl<D> GraphQlResponse<D> {
    /// Joined error messages, if the endpoint reported any
    pub fn error_summary(&self) -> Option<String> {
        let errors = self.errors.as_ref().filter(|e| !e.is_empty())?;
        Some(
            errors
                .iter()
                .map(|e| e.message.as_str())
                .collect::<Vec<_>>()
                .join("; "),
        )
    }
}

#[derive(Debug, Deserialize)]
pub struct GraphQlError {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingData {
    #[serde(default)]
    pub problemset_question_list: Option<QuestionList>,
}

#[derive(Debug, Deserialize)]
pub struct QuestionList {
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(default)]
    pub questions: Option<Vec<ListingQuestion>>,
}

/// One row of the listing payload
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingQuestion {
    #[serde(default)]
    pub frontend_question_id: Option<Value>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub title_slug: Option<String>,
    #[serde(default)]
    pub difficulty: Option<String>,
    #[serde(default)]
    pub paid_only: Option<bool>,
}

impl ListingQuestion {
    /// Paid unless the payload explicitly says otherwise
    pub fn is_paid(&self) -> bool {
        self.paid_only.unwrap_or(true)
    }

    /// Converts to a listing entry, or `None` if a required field is unusable
    pub fn to_entry(&self) -> Option<ListingEntry> {
        let slug = self
            .title_slug
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())?;

        Some(ListingEntry {
            slug: slug.to_string(),
            id: self.frontend_question_id.as_ref().and_then(parse_id)?,
            difficulty: self.difficulty.as_deref().and_then(Difficulty::parse_loose)?,
            paid_only: self.is_paid(),
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct DetailData {
    #[serde(default)]
    pub question: Option<DetailQuestion>,
}

/// The detail payload for one problem
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailQuestion {
    #[serde(default)]
    pub question_id: Option<Value>,
    #[serde(default)]
    pub question_frontend_id: Option<Value>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub title_slug: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub difficulty: Option<String>,
}

/// Parses a positive identifier sent either as a number or a numeric string
pub fn parse_id(value: &Value) -> Option<u32> {
    let id = match value {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.trim().parse::<u32>().ok(),
        _ => None,
    }?;
    (id > 0).then_some(id)
}
