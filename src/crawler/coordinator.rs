//! Harvest coordinator - main crawl orchestration logic
//!
//! This module contains the sequential harvest loop:
//! - Warming up the session
//! - Draining the listing into an ordered worklist
//! - Fetching, extracting and storing each problem in turn
//! - Observing the shutdown flag between items
//! - Producing the run report

use super::random::{pick_slug, FALLBACK_EASY_SLUGS, RANDOM_POOL_SIZE};
use crate::client::{DelayPolicy, DetailFetcher, ListingPaginator, Session, SessionOptions};
use crate::config::Config;
use crate::output::{AbortReason, CrawlOutcome, FailedItem, RunReport};
use crate::problem::{DifficultyFilter, ListingEntry, ProblemRecord};
use crate::storage::{open_sink, RecordSink};
use crate::HarvestError;
use chrono::{DateTime, Utc};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Items between progress log lines
const PROGRESS_INTERVAL: usize = 10;

/// Where the coordinator currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrawlPhase {
    Init,
    Listing,
    /// Fetching the worklist item at this index
    DetailFetch(usize),
    Done,
    Aborted,
}

impl fmt::Display for CrawlPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CrawlPhase::Init => write!(f, "init"),
            CrawlPhase::Listing => write!(f, "listing"),
            CrawlPhase::DetailFetch(i) => write!(f, "detail-fetch[{}]", i),
            CrawlPhase::Done => write!(f, "done"),
            CrawlPhase::Aborted => write!(f, "aborted"),
        }
    }
}

/// Counters accumulated over one run
#[derive(Debug, Clone, Default)]
pub struct RunStats {
    pub listed: usize,
    pub attempted: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub failures: Vec<FailedItem>,
}

impl RunStats {
    fn record_failure(&mut self, slug: &str, reason: String) {
        self.failed += 1;
        self.failures.push(FailedItem {
            slug: slug.to_string(),
            reason,
        });
    }
}

/// Main harvest coordinator structure
pub struct Coordinator<S: RecordSink> {
    session: Arc<Session>,
    paginator: ListingPaginator,
    fetcher: DetailFetcher,
    sink: S,
    filter: DifficultyFilter,
    page_size: u32,
    max_problems: Option<usize>,
    config_hash: Option<String>,
    shutdown: Arc<AtomicBool>,
    phase: CrawlPhase,
}

impl<S: RecordSink> Coordinator<S> {
    /// Creates a new coordinator instance
    ///
    /// # Arguments
    ///
    /// * `config` - The harvester configuration
    /// * `sink` - Destination for every successfully extracted record
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Ready to run; no request has been made yet
    /// * `Err(HarvestError)` - The base URL or HTTP client was unusable
    pub fn new(config: &Config, sink: S) -> Result<Self, HarvestError> {
        let session = Arc::new(Session::new(&SessionOptions::from_config(config)?)?);
        let delays = DelayPolicy::from_config(&config.crawl);

        Ok(Self {
            paginator: ListingPaginator::new(Arc::clone(&session), delays),
            fetcher: DetailFetcher::new(Arc::clone(&session), delays),
            session,
            sink,
            filter: config.crawl.difficulty,
            page_size: config.crawl.page_size,
            max_problems: config.crawl.max_problems,
            config_hash: None,
            shutdown: Arc::new(AtomicBool::new(false)),
            phase: CrawlPhase::Init,
        })
    }

    /// Attaches the configuration hash recorded with the run
    pub fn with_config_hash(mut self, hash: Option<String>) -> Self {
        self.config_hash = hash;
        self
    }

    /// Handle for requesting a stop from another task
    ///
    /// Storing `true` stops the run before the next listing page or item.
    pub fn shutdown_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.shutdown)
    }

    pub fn request_shutdown(&self) {
        self.shutdown.store(true, Ordering::SeqCst);
    }

    fn is_shutdown_requested(&self) -> bool {
        self.shutdown.load(Ordering::SeqCst)
    }

    pub fn phase(&self) -> CrawlPhase {
        self.phase
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Runs the whole harvest
    ///
    /// Per-item failures are counted and never stop the run. The run ends
    /// early only when the shutdown flag is set or when the listing fails
    /// before producing a single entry.
    pub async fn run(&mut self) -> RunReport {
        let started_at = Utc::now();
        let mut stats = RunStats::default();

        self.phase = CrawlPhase::Init;
        tracing::info!(
            "Starting harvest: difficulty={}, page size={}, sink={}",
            self.filter,
            self.page_size,
            self.sink.name()
        );
        self.session.bootstrap().await;

        if self.is_shutdown_requested() {
            return self.finish(started_at, stats, CrawlOutcome::Aborted(AbortReason::Interrupted));
        }

        self.phase = CrawlPhase::Listing;
        let worklist = match self.collect_worklist().await {
            Ok(worklist) => worklist,
            Err(reason) => return self.finish(started_at, stats, CrawlOutcome::Aborted(reason)),
        };
        stats.listed = worklist.len();
        tracing::info!("Listing complete: {} problems to fetch", worklist.len());

        let outcome = self.fetch_all(&worklist, &mut stats).await;
        self.finish(started_at, stats, outcome)
    }

    /// Drains the listing stream before any detail fetch
    async fn collect_worklist(&self) -> Result<Vec<ListingEntry>, AbortReason> {
        let mut stream = self.paginator.stream_all_entries(self.filter, self.page_size);
        let mut entries = Vec::new();

        loop {
            if self.is_shutdown_requested() {
                tracing::warn!("Interrupted during listing after {} entries", entries.len());
                return Err(AbortReason::Interrupted);
            }

            let Some(item) = stream.next().await else {
                break;
            };

            match item {
                Ok(entry) => entries.push(entry),
                Err(e) if entries.is_empty() => {
                    tracing::error!("Listing failed before any entry was collected: {}", e);
                    return Err(AbortReason::ListingFailed);
                }
                Err(e) => {
                    tracing::warn!(
                        "Listing stopped early, continuing with {} entries: {}",
                        entries.len(),
                        e
                    );
                    break;
                }
            }

            if self.max_problems.is_some_and(|max| entries.len() >= max) {
                tracing::info!("Reached max-problems limit of {}", entries.len());
                break;
            }
        }

        tracing::debug!(
            "Listing used {} pages, skipped {} duplicates",
            stream.pages_fetched(),
            stream.duplicates()
        );
        Ok(entries)
    }

    /// Fetches and stores every worklist item in order
    async fn fetch_all(&mut self, worklist: &[ListingEntry], stats: &mut RunStats) -> CrawlOutcome {
        let total = worklist.len();

        for (index, entry) in worklist.iter().enumerate() {
            if self.is_shutdown_requested() {
                tracing::warn!("Interrupted after {} of {} problems", index, total);
                return CrawlOutcome::Aborted(AbortReason::Interrupted);
            }

            self.phase = CrawlPhase::DetailFetch(index);
            stats.attempted += 1;

            match self.fetcher.fetch_detail(&entry.slug).await {
                Ok(record) => match self.sink.upsert(&record) {
                    Ok(()) => stats.succeeded += 1,
                    Err(e) => {
                        tracing::warn!(
                            "Failed to store {} (id {}) in {}: {}",
                            record.slug,
                            record.id,
                            self.phase,
                            e
                        );
                        stats.record_failure(&entry.slug, format!("sink: {}", e));
                    }
                },
                Err(e) => {
                    tracing::warn!(
                        "Failed to fetch {} (id {}) in {}: {} ({})",
                        e.slug,
                        entry.id,
                        self.phase,
                        e.reason,
                        e.message
                    );
                    stats.record_failure(&entry.slug, format!("{}: {}", e.reason, e.message));
                }
            }

            if (index + 1) % PROGRESS_INTERVAL == 0 {
                tracing::info!(
                    "Progress: {}/{} processed, {} stored, {} failed",
                    index + 1,
                    total,
                    stats.succeeded,
                    stats.failed
                );
            }
        }

        CrawlOutcome::Completed
    }

    fn finish(
        &mut self,
        started_at: DateTime<Utc>,
        stats: RunStats,
        outcome: CrawlOutcome,
    ) -> RunReport {
        self.phase = if outcome.is_completed() {
            CrawlPhase::Done
        } else {
            CrawlPhase::Aborted
        };

        let report = RunReport {
            listed: stats.listed,
            attempted: stats.attempted,
            succeeded: stats.succeeded,
            failed: stats.failed,
            outcome,
            started_at,
            finished_at: Utc::now(),
            config_hash: self.config_hash.clone(),
            failures: stats.failures,
        };

        if let Err(e) = self.sink.record_run(&report) {
            tracing::warn!("Failed to record run summary: {}", e);
        }

        match outcome {
            CrawlOutcome::Completed => tracing::info!(
                "Harvest complete: {}/{} stored ({:.1}%), {} failed",
                report.succeeded,
                report.attempted,
                report.success_rate(),
                report.failed
            ),
            CrawlOutcome::Aborted(reason) => tracing::error!(
                "Harvest aborted ({:?}): {}/{} stored before stopping",
                reason,
                report.succeeded,
                report.attempted
            ),
        }

        report
    }

    /// Fetches and stores a single problem by slug, outside the listing
    pub async fn harvest_slug(&mut self, slug: &str) -> Result<ProblemRecord, HarvestError> {
        self.session.bootstrap().await;
        self.store_one(slug).await
    }

    /// Fetches and stores one problem picked at random
    ///
    /// The pick is made from the first listing page. If that page fails or
    /// is empty, an easy (or any-difficulty) pick falls back to a fixed list
    /// of well-known easy problems.
    pub async fn harvest_random(&mut self) -> Result<ProblemRecord, HarvestError> {
        self.session.bootstrap().await;
        self.phase = CrawlPhase::Listing;

        let listed: Vec<String> = match self.paginator.fetch_page(self.filter, RANDOM_POOL_SIZE, 0).await {
            Ok(page) => page.entries.into_iter().map(|entry| entry.slug).collect(),
            Err(e) => {
                tracing::warn!("Listing for random pick failed: {}", e);
                Vec::new()
            }
        };

        let picked = {
            let mut rng = rand::thread_rng();
            match pick_slug(&listed, &mut rng) {
                Some(slug) => Some(slug.to_string()),
                None if matches!(self.filter, DifficultyFilter::Easy | DifficultyFilter::Any) => {
                    tracing::warn!("No listed problems, picking from the fallback list");
                    pick_slug(FALLBACK_EASY_SLUGS, &mut rng).map(str::to_string)
                }
                None => None,
            }
        };

        let Some(slug) = picked else {
            self.phase = CrawlPhase::Aborted;
            return Err(HarvestError::NoCandidates(self.filter));
        };

        tracing::info!("Selected problem: {}", slug);
        self.store_one(&slug).await
    }

    async fn store_one(&mut self, slug: &str) -> Result<ProblemRecord, HarvestError> {
        self.phase = CrawlPhase::DetailFetch(0);

        let result = match self.fetcher.fetch_detail(slug).await {
            Ok(record) => self.sink.upsert(&record).map(|()| record).map_err(HarvestError::from),
            Err(e) => Err(HarvestError::from(e)),
        };

        self.phase = if result.is_ok() {
            CrawlPhase::Done
        } else {
            CrawlPhase::Aborted
        };
        result
    }
}

/// Runs a complete harvest with the sink selected by `config`
///
/// Ctrl-C sets the shutdown flag; the run stops before the next item and
/// keeps everything already stored.
pub async fn run_crawl(config: &Config, config_hash: Option<String>) -> Result<RunReport, HarvestError> {
    let sink = open_sink(&config.output)?;
    let mut coordinator = Coordinator::new(config, sink)?.with_config_hash(config_hash);

    let shutdown = coordinator.shutdown_handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Received interrupt, stopping after the current item");
            shutdown.store(true, Ordering::SeqCst);
        }
    });

    Ok(coordinator.run().await)
}
