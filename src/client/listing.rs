//! Paginated listing of problem references
//!
//! Pages are requested with an increasing offset until a short or empty page
//! comes back. Paid entries are dropped, and slugs already seen in the same
//! stream are skipped so the worklist never holds a slug twice.

use crate::client::graphql::{listing_request, GraphQlResponse, ListingData};
use crate::client::session::Session;
use crate::client::DelayPolicy;
use crate::problem::{DifficultyFilter, ListingEntry};
use std::collections::{HashSet, VecDeque};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Referer sent with listing queries
const LISTING_REFERER: &str = "/problemset/";

/// Why a listing page could not be retrieved
#[derive(Debug, Error)]
pub enum ListingFetchError {
    #[error("listing request at offset {offset} timed out")]
    Timeout { offset: u32 },

    #[error("listing request at offset {offset} failed: {source}")]
    Transport {
        offset: u32,
        #[source]
        source: reqwest::Error,
    },

    #[error("listing request at offset {offset} returned HTTP {status}")]
    Status { offset: u32, status: u16 },

    #[error("listing response at offset {offset} is malformed: {message}")]
    Malformed { offset: u32, message: String },
}

impl ListingFetchError {
    fn from_reqwest(offset: u32, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            Self::Timeout { offset }
        } else {
            Self::Transport { offset, source }
        }
    }

    /// Offset of the page that failed
    pub fn offset(&self) -> u32 {
        match self {
            Self::Timeout { offset }
            | Self::Transport { offset, .. }
            | Self::Status { offset, .. }
            | Self::Malformed { offset, .. } => *offset,
        }
    }
}

/// One page of listing results
#[derive(Debug, Clone, Default)]
pub struct ListingPage {
    /// Free entries with usable slug, id and difficulty
    pub entries: Vec<ListingEntry>,
    /// Number of rows the endpoint returned, before any filtering
    pub raw_count: usize,
    /// Whether another page may follow
    pub has_more: bool,
    /// Total matching rows reported by the endpoint, if any
    pub total: Option<u64>,
}

/// Issues listing queries against a shared session
pub struct ListingPaginator {
    session: Arc<Session>,
    page_delay: Duration,
}

impl ListingPaginator {
    pub fn new(session: Arc<Session>, delays: DelayPolicy) -> Self {
        Self {
            session,
            page_delay: delays.page_delay,
        }
    }

    /// Requests one page at `offset`
    ///
    /// A page is full when the endpoint returned `page_size` rows; only then
    /// is `has_more` set.
    pub async fn fetch_page(
        &self,
        filter: DifficultyFilter,
        page_size: u32,
        offset: u32,
    ) -> Result<ListingPage, ListingFetchError> {
        if page_size == 0 {
            return Err(ListingFetchError::Malformed {
                offset,
                message: "page size must be positive".to_string(),
            });
        }

        tracing::debug!(
            "Fetching listing page: filter={}, limit={}, skip={}",
            filter,
            page_size,
            offset
        );

        let request = listing_request(filter, page_size, offset);
        let response = self
            .session
            .post_query(&request, LISTING_REFERER)
            .await
            .map_err(|e| ListingFetchError::from_reqwest(offset, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ListingFetchError::Status {
                offset,
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| ListingFetchError::from_reqwest(offset, e))?;

        parse_listing_page(&body, page_size, offset)
    }

    /// Streams every free entry matching `filter`, deduplicated by slug
    pub fn stream_all_entries(&self, filter: DifficultyFilter, page_size: u32) -> EntryStream<'_> {
        EntryStream {
            paginator: self,
            filter,
            page_size,
            offset: 0,
            buffered: VecDeque::new(),
            seen: HashSet::new(),
            finished: false,
            pages_fetched: 0,
            duplicates: 0,
        }
    }
}

/// Turns a raw listing body into a page
pub fn parse_listing_page(
    body: &str,
    page_size: u32,
    offset: u32,
) -> Result<ListingPage, ListingFetchError> {
    let response: GraphQlResponse<ListingData> =
        serde_json::from_str(body).map_err(|e| ListingFetchError::Malformed {
            offset,
            message: e.to_string(),
        })?;

    if let Some(errors) = response.error_summary() {
        tracing::warn!("Listing query at offset {} reported errors: {}", offset, errors);
    }

    let Some(list) = response.data.and_then(|d| d.problemset_question_list) else {
        tracing::warn!("Listing response at offset {} has no question list", offset);
        return Ok(ListingPage::default());
    };

    let questions = list.questions.unwrap_or_default();
    let raw_count = questions.len();
    let mut paid = 0usize;
    let mut unusable = 0usize;

    let entries = questions
        .iter()
        .filter_map(|q| {
            if q.is_paid() {
                paid += 1;
                return None;
            }
            let entry = q.to_entry();
            if entry.is_none() {
                unusable += 1;
            }
            entry
        })
        .collect::<Vec<_>>();

    if unusable > 0 {
        tracing::warn!(
            "Dropped {} listing rows at offset {} with missing slug, id or difficulty",
            unusable,
            offset
        );
    }
    tracing::debug!(
        "Listing page at offset {}: {} rows, {} free, {} paid",
        offset,
        raw_count,
        entries.len(),
        paid
    );

    Ok(ListingPage {
        entries,
        raw_count,
        has_more: raw_count > 0 && raw_count >= page_size as usize,
        total: list.total,
    })
}

/// Lazy cursor over the whole listing
///
/// Pages are fetched on demand with the page delay between them. After an
/// error is yielded the stream is finished; it cannot be restarted.
pub struct EntryStream<'a> {
    paginator: &'a ListingPaginator,
    filter: DifficultyFilter,
    page_size: u32,
    offset: u32,
    buffered: VecDeque<ListingEntry>,
    seen: HashSet<String>,
    finished: bool,
    pages_fetched: usize,
    duplicates: usize,
}

impl EntryStream<'_> {
    /// Next entry, `None` once the listing is exhausted
    pub async fn next(&mut self) -> Option<Result<ListingEntry, ListingFetchError>> {
        loop {
            if let Some(entry) = self.buffered.pop_front() {
                return Some(Ok(entry));
            }
            if self.finished {
                return None;
            }

            if self.pages_fetched > 0 && !self.paginator.page_delay.is_zero() {
                tokio::time::sleep(self.paginator.page_delay).await;
            }

            let page = match self
                .paginator
                .fetch_page(self.filter, self.page_size, self.offset)
                .await
            {
                Ok(page) => page,
                Err(e) => {
                    self.finished = true;
                    return Some(Err(e));
                }
            };

            self.pages_fetched += 1;
            self.offset = self.offset.saturating_add(self.page_size);
            if !page.has_more {
                self.finished = true;
            }

            for entry in page.entries {
                if self.seen.insert(entry.slug.clone()) {
                    self.buffered.push_back(entry);
                } else {
                    self.duplicates += 1;
                    tracing::debug!("Skipping duplicate listing entry: {}", entry.slug);
                }
            }
        }
    }

    /// Drains the stream into a vector, stopping at the first error
    pub async fn collect_all(&mut self) -> Result<Vec<ListingEntry>, ListingFetchError> {
        let mut entries = Vec::new();
        while let Some(item) = self.next().await {
            entries.push(item?);
        }
        Ok(entries)
    }

    pub fn pages_fetched(&self) -> usize {
        self.pages_fetched
    }

    pub fn duplicates(&self) -> usize {
        self.duplicates
    }
}
