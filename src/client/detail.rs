//! Per-problem detail retrieval
//!
//! Every call waits for the configured detail delay after its request,
//! whether it succeeded or failed, so back-to-back calls are always spaced.

use crate::client::graphql::{detail_request, parse_id, DetailData, DetailQuestion, GraphQlResponse};
use crate::client::session::Session;
use crate::client::DelayPolicy;
use crate::extract::extract;
use crate::problem::{problem_url, Difficulty, ProblemRecord};
use chrono::Utc;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Failure category for a detail fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DetailFailure {
    /// Network error, timeout or non-success status
    Transport,
    /// The endpoint answered but had no problem (unknown slug or gated content)
    EmptyResult,
    /// The payload was present but unusable
    ParseFailure,
}

impl DetailFailure {
    pub fn as_str(&self) -> &'static str {
        match self {
            DetailFailure::Transport => "transport",
            DetailFailure::EmptyResult => "empty-result",
            DetailFailure::ParseFailure => "parse-failure",
        }
    }
}

impl fmt::Display for DetailFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("detail fetch for '{slug}' failed ({reason}): {message}")]
pub struct DetailFetchError {
    pub slug: String,
    pub reason: DetailFailure,
    pub message: String,
}

impl DetailFetchError {
    fn new(slug: &str, reason: DetailFailure, message: impl Into<String>) -> Self {
        Self {
            slug: slug.to_string(),
            reason,
            message: message.into(),
        }
    }
}

/// Fetches one problem at a time through a shared session
pub struct DetailFetcher {
    session: Arc<Session>,
    detail_delay: Duration,
}

impl DetailFetcher {
    pub fn new(session: Arc<Session>, delays: DelayPolicy) -> Self {
        Self {
            session,
            detail_delay: delays.detail_delay,
        }
    }

    /// Fetches and extracts the problem identified by `slug`
    ///
    /// # Returns
    ///
    /// A complete record, or an error carrying the slug and a failure
    /// category. The detail delay has elapsed in both cases.
    pub async fn fetch_detail(&self, slug: &str) -> Result<ProblemRecord, DetailFetchError> {
        let result = self.request(slug).await;

        if !self.detail_delay.is_zero() {
            tokio::time::sleep(self.detail_delay).await;
        }

        result
    }

    async fn request(&self, slug: &str) -> Result<ProblemRecord, DetailFetchError> {
        if slug.trim().is_empty() {
            return Err(DetailFetchError::new(
                slug,
                DetailFailure::ParseFailure,
                "empty slug",
            ));
        }

        tracing::debug!("Fetching detail for {}", slug);

        let referer = format!("/problems/{}/", slug);
        let response = self
            .session
            .post_query(&detail_request(slug), &referer)
            .await
            .map_err(|e| DetailFetchError::new(slug, DetailFailure::Transport, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DetailFetchError::new(
                slug,
                DetailFailure::Transport,
                format!("HTTP {}", status.as_u16()),
            ));
        }

        let body = response
            .text()
            .await
            .map_err(|e| DetailFetchError::new(slug, DetailFailure::Transport, e.to_string()))?;

        let parsed: GraphQlResponse<DetailData> = serde_json::from_str(&body).map_err(|e| {
            DetailFetchError::new(
                slug,
                DetailFailure::ParseFailure,
                format!("invalid JSON: {}", e),
            )
        })?;

        let errors = parsed.error_summary();
        let Some(question) = parsed.data.and_then(|d| d.question) else {
            let message = errors.unwrap_or_else(|| "no question in response".to_string());
            return Err(DetailFetchError::new(slug, DetailFailure::EmptyResult, message));
        };

        build_record(question, slug, self.session.base_url())
    }
}

/// Validates a detail payload and turns it into a record
pub fn build_record(
    question: DetailQuestion,
    requested_slug: &str,
    base_url: &Url,
) -> Result<ProblemRecord, DetailFetchError> {
    let parse_failure =
        |message: String| DetailFetchError::new(requested_slug, DetailFailure::ParseFailure, message);

    let id = question
        .question_frontend_id
        .as_ref()
        .and_then(parse_id)
        .ok_or_else(|| {
            parse_failure(format!(
                "unusable question id: {:?}",
                question.question_frontend_id
            ))
        })?;

    let title = question
        .title
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| parse_failure("missing title".to_string()))?
        .to_string();

    let difficulty = question
        .difficulty
        .as_deref()
        .and_then(Difficulty::parse_loose)
        .ok_or_else(|| parse_failure(format!("unknown difficulty: {:?}", question.difficulty)))?;

    let Some(content) = question.content.filter(|c| !c.trim().is_empty()) else {
        return Err(DetailFetchError::new(
            requested_slug,
            DetailFailure::EmptyResult,
            "question has no content",
        ));
    };

    let slug = question
        .title_slug
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(requested_slug)
        .to_string();

    let extracted = extract(&content);

    Ok(ProblemRecord {
        id,
        title,
        url: problem_url(base_url, &slug),
        slug,
        difficulty,
        description: extracted.description,
        examples: extracted.examples,
        constraints: extracted.constraints,
        fetched_at: Utc::now(),
    })
}
