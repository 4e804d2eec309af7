//! Integration tests for the harvester
//!
//! These tests use wiremock to create mock query endpoints and test the
//! full listing, fetch, extract and store cycle end-to-end.

use problem_harvest::config::Config;
use problem_harvest::crawler::{Coordinator, CrawlPhase};
use problem_harvest::output::{AbortReason, CrawlOutcome};
use problem_harvest::storage::{
    JsonFileSink, MemorySink, PlaceholderSink, RecordSink, SqliteSink, NO_CONSTRAINTS, NO_EXAMPLES,
};
use problem_harvest::{Difficulty, DifficultyFilter, ProblemRecord};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tempfile::TempDir;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

/// Creates a test configuration pointing at the mock server with no delays
fn create_test_config(base_url: &str, page_size: u32) -> Config {
    let mut config = Config::default();
    config.source.base_url = base_url.to_string();
    config.crawl.difficulty = DifficultyFilter::Easy;
    config.crawl.page_size = page_size;
    config.crawl.page_delay_ms = 0;
    config.crawl.detail_delay_ms = 0;
    config.crawl.request_timeout_secs = 2;
    config.crawl.bootstrap_timeout_secs = 2;
    config
}

fn listing_row(id: u32, slug: &str, paid: bool) -> Value {
    json!({
        "frontendQuestionId": id.to_string(),
        "title": slug,
        "titleSlug": slug,
        "difficulty": "Easy",
        "paidOnly": paid
    })
}

fn listing_body(rows: Vec<Value>) -> Value {
    json!({"data": {"problemsetQuestionList": {"total": 100, "questions": rows}}})
}

fn content_with_examples(examples: &[&str]) -> String {
    let mut html = String::from("<p>Solve the problem.</p>");
    for (i, example) in examples.iter().enumerate() {
        html.push_str(&format!(
            "<p><strong class=\"example\">Example {}:</strong></p><pre>{}</pre>",
            i + 1,
            example
        ));
    }
    html.push_str(
        "<p><strong>Constraints:</strong></p><ul><li><code>1 &lt;= n &lt;= 10</code></li></ul>",
    );
    html
}

fn detail_body(id: u32, slug: &str, content: &str) -> Value {
    json!({"data": {"question": {
        "questionId": (id + 1000).to_string(),
        "questionFrontendId": id.to_string(),
        "title": format!("Problem {}", id),
        "titleSlug": slug,
        "content": content,
        "difficulty": "Easy"
    }}})
}

/// Mounts a listing page answered for the given offset
async fn mount_listing(server: &MockServer, skip: u32, rows: Vec<Value>) {
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(body_partial_json(json!({"variables": {"skip": skip}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(listing_body(rows)))
        .mount(server)
        .await;
}

/// Mounts a detail response for one slug
async fn mount_detail(server: &MockServer, slug: &str, response: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(body_partial_json(json!({"variables": {"titleSlug": slug}})))
        .respond_with(response)
        .mount(server)
        .await;
}

async fn mount_good_detail(server: &MockServer, id: u32, slug: &str, examples: &[&str]) {
    let body = detail_body(id, slug, &content_with_examples(examples));
    mount_detail(server, slug, ResponseTemplate::new(200).set_body_json(body)).await;
}

/// Comparable view of a stored record, without the fetch timestamp
fn stable_view(record: &ProblemRecord) -> (u32, String, String, Vec<String>, Vec<String>, String) {
    (
        record.id,
        record.title.clone(),
        record.slug.clone(),
        record.examples.clone(),
        record.constraints.clone(),
        record.url.clone(),
    )
}

/// Responds normally but raises the shutdown flag
struct RaiseFlag {
    flag: Arc<AtomicBool>,
    body: Value,
}

impl Respond for RaiseFlag {
    fn respond(&self, _request: &Request) -> ResponseTemplate {
        self.flag.store(true, Ordering::SeqCst);
        ResponseTemplate::new(200).set_body_json(self.body.clone())
    }
}

#[tokio::test]
async fn test_full_harvest_counts_every_item() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/problemset/"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    // Two full pages and a short one; one paid entry is filtered out
    mount_listing(
        &mock_server,
        0,
        vec![listing_row(1, "p-one", false), listing_row(2, "p-two", false)],
    )
    .await;
    mount_listing(
        &mock_server,
        2,
        vec![listing_row(3, "p-three", false), listing_row(4, "p-paid", true)],
    )
    .await;
    mount_listing(&mock_server, 4, vec![listing_row(5, "p-five", false)]).await;

    mount_good_detail(&mock_server, 1, "p-one", &["Input: 1"]).await;
    mount_good_detail(&mock_server, 5, "p-five", &["Input: 5", "Input: 55"]).await;
    // Unknown slug
    mount_detail(
        &mock_server,
        "p-two",
        ResponseTemplate::new(200).set_body_json(json!({"data": {"question": null}})),
    )
    .await;
    // Server error
    mount_detail(&mock_server, "p-three", ResponseTemplate::new(500)).await;

    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("problems.db");
    let config = create_test_config(&mock_server.uri(), 2);

    let sink = SqliteSink::new(&db_path).unwrap();
    let mut coordinator = Coordinator::new(&config, sink).unwrap();
    let report = coordinator.run().await;

    assert_eq!(report.outcome, CrawlOutcome::Completed);
    assert_eq!(report.listed, 4);
    assert_eq!(report.attempted, 4);
    assert_eq!(report.succeeded, 2);
    assert_eq!(report.failed, 2);
    assert_eq!(report.succeeded + report.failed, report.attempted);
    assert_eq!(report.success_rate(), 50.0);
    assert_eq!(coordinator.phase(), CrawlPhase::Done);

    let failed: Vec<_> = report.failures.iter().map(|f| f.slug.as_str()).collect();
    assert_eq!(failed, vec!["p-two", "p-three"]);

    let sink = coordinator.into_sink();
    assert_eq!(sink.count_problems().unwrap(), 2);
    let five = sink.get_problem(5).unwrap().unwrap();
    assert_eq!(five.examples, vec!["Input: 5", "Input: 55"]);
    assert_eq!(five.constraints, vec!["1 <= n <= 10"]);
    assert_eq!(five.difficulty, Difficulty::Easy);
    assert_eq!(five.url, format!("{}/problems/p-five/", mock_server.uri()));
    assert!(sink.get_problem_by_slug("p-paid").unwrap().is_none());

    let runs = sink.recent_runs(10).unwrap();
    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0].attempted, 4);
}

#[tokio::test]
async fn test_listing_stops_after_short_page() {
    let mock_server = MockServer::start().await;

    mount_listing(
        &mock_server,
        0,
        vec![listing_row(1, "a", false), listing_row(2, "b", false)],
    )
    .await;
    mount_listing(&mock_server, 2, vec![listing_row(3, "c", false)]).await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({"variables": {"skip": 4}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(listing_body(vec![])))
        .expect(0)
        .mount(&mock_server)
        .await;

    for (id, slug) in [(1, "a"), (2, "b"), (3, "c")] {
        mount_good_detail(&mock_server, id, slug, &["x"]).await;
    }

    let config = create_test_config(&mock_server.uri(), 2);
    let mut coordinator = Coordinator::new(&config, MemorySink::new()).unwrap();
    let report = coordinator.run().await;

    assert_eq!(report.attempted, 3);
    assert_eq!(coordinator.sink().len(), 3);
}

#[tokio::test]
async fn test_overlapping_pages_fetch_each_slug_once() {
    let mock_server = MockServer::start().await;

    mount_listing(
        &mock_server,
        0,
        vec![listing_row(1, "a", false), listing_row(2, "b", false)],
    )
    .await;
    // The listing shifted between requests: "b" shows up again
    mount_listing(&mock_server, 2, vec![listing_row(2, "b", false)]).await;

    mount_good_detail(&mock_server, 1, "a", &["x"]).await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({"variables": {"titleSlug": "b"}})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(detail_body(2, "b", &content_with_examples(&["y"]))),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), 2);
    let mut coordinator = Coordinator::new(&config, MemorySink::new()).unwrap();
    let report = coordinator.run().await;

    assert_eq!(report.listed, 2);
    assert_eq!(report.attempted, 2);
    assert_eq!(coordinator.sink().writes(), 2);
}

#[tokio::test]
async fn test_repeated_runs_give_identical_state() {
    let mock_server = MockServer::start().await;

    mount_listing(
        &mock_server,
        0,
        vec![listing_row(1, "a", false), listing_row(2, "b", false)],
    )
    .await;
    mount_listing(&mock_server, 2, vec![]).await;
    mount_good_detail(&mock_server, 1, "a", &["Input: a"]).await;
    mount_good_detail(&mock_server, 2, "b", &["Input: b1", "Input: b2"]).await;

    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("problems.db");
    let config = create_test_config(&mock_server.uri(), 2);

    let mut snapshots = Vec::new();
    for _ in 0..2 {
        let sink = SqliteSink::new(&db_path).unwrap();
        let mut coordinator = Coordinator::new(&config, sink).unwrap();
        let report = coordinator.run().await;
        assert_eq!(report.succeeded, 2);

        let sink = coordinator.into_sink();
        let snapshot: Vec<_> = [1, 2]
            .iter()
            .map(|id| stable_view(&sink.get_problem(*id).unwrap().unwrap()))
            .collect();
        assert_eq!(sink.count_problems().unwrap(), 2);
        snapshots.push(snapshot);
    }

    assert_eq!(snapshots[0], snapshots[1]);
}

#[tokio::test]
async fn test_second_run_with_fewer_examples_replaces_list() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("problems.db");
    let config = create_test_config(&mock_server.uri(), 5);

    mount_listing(&mock_server, 0, vec![listing_row(7, "seven", false)]).await;
    mount_good_detail(&mock_server, 7, "seven", &["e1", "e2", "e3"]).await;

    let mut coordinator = Coordinator::new(&config, SqliteSink::new(&db_path).unwrap()).unwrap();
    coordinator.run().await;
    let sink = coordinator.into_sink();
    assert_eq!(sink.get_problem(7).unwrap().unwrap().examples.len(), 3);
    drop(sink);

    mock_server.reset().await;
    mount_listing(&mock_server, 0, vec![listing_row(7, "seven", false)]).await;
    mount_good_detail(&mock_server, 7, "seven", &["only"]).await;

    let mut coordinator = Coordinator::new(&config, SqliteSink::new(&db_path).unwrap()).unwrap();
    coordinator.run().await;
    let sink = coordinator.into_sink();
    assert_eq!(sink.get_problem(7).unwrap().unwrap().examples, vec!["only"]);
}

#[tokio::test]
async fn test_listing_failure_without_entries_aborts() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_partial_json(json!({"variables": {"skip": 0}})))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({"variables": {"titleSlug": "a"}})))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), 2);
    let mut coordinator = Coordinator::new(&config, MemorySink::new()).unwrap();
    let report = coordinator.run().await;

    assert_eq!(
        report.outcome,
        CrawlOutcome::Aborted(AbortReason::ListingFailed)
    );
    assert_eq!(report.attempted, 0);
    assert_eq!(coordinator.phase(), CrawlPhase::Aborted);
    assert!(coordinator.sink().is_empty());
    assert_eq!(coordinator.sink().runs().len(), 1);
}

#[tokio::test]
async fn test_listing_failure_after_entries_continues() {
    let mock_server = MockServer::start().await;

    mount_listing(
        &mock_server,
        0,
        vec![listing_row(1, "a", false), listing_row(2, "b", false)],
    )
    .await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({"variables": {"skip": 2}})))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>captcha</html>"))
        .mount(&mock_server)
        .await;
    mount_good_detail(&mock_server, 1, "a", &["x"]).await;
    mount_good_detail(&mock_server, 2, "b", &["y"]).await;

    let config = create_test_config(&mock_server.uri(), 2);
    let mut coordinator = Coordinator::new(&config, MemorySink::new()).unwrap();
    let report = coordinator.run().await;

    assert_eq!(report.outcome, CrawlOutcome::Completed);
    assert_eq!(report.succeeded, 2);
}

#[tokio::test]
async fn test_interrupt_keeps_stored_records() {
    let mock_server = MockServer::start().await;

    mount_listing(
        &mock_server,
        0,
        vec![
            listing_row(1, "a", false),
            listing_row(2, "b", false),
            listing_row(3, "c", false),
        ],
    )
    .await;

    let config = create_test_config(&mock_server.uri(), 5);
    let mut coordinator = Coordinator::new(&config, MemorySink::new()).unwrap();

    // The first detail response raises the flag, as Ctrl-C would mid-run
    Mock::given(method("POST"))
        .and(body_partial_json(json!({"variables": {"titleSlug": "a"}})))
        .respond_with(RaiseFlag {
            flag: coordinator.shutdown_handle(),
            body: detail_body(1, "a", &content_with_examples(&["x"])),
        })
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({"variables": {"titleSlug": "b"}})))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let report = coordinator.run().await;

    assert_eq!(
        report.outcome,
        CrawlOutcome::Aborted(AbortReason::Interrupted)
    );
    assert_eq!(report.listed, 3);
    assert_eq!(report.attempted, 1);
    assert_eq!(report.succeeded, 1);
    assert_eq!(coordinator.sink().get(1).unwrap().slug, "a");
}

#[tokio::test]
async fn test_json_sink_with_placeholders() {
    let mock_server = MockServer::start().await;

    mount_listing(&mock_server, 0, vec![listing_row(9, "bare", false)]).await;
    mount_detail(
        &mock_server,
        "bare",
        ResponseTemplate::new(200).set_body_json(detail_body(9, "bare", "<p>No sections here.</p>")),
    )
    .await;

    let dir = TempDir::new().unwrap();
    let sink = PlaceholderSink::new(JsonFileSink::new(dir.path()).unwrap());
    let config = create_test_config(&mock_server.uri(), 5);

    let mut coordinator = Coordinator::new(&config, sink).unwrap();
    let report = coordinator.run().await;
    assert_eq!(report.succeeded, 1);

    let sink = coordinator.into_sink();
    assert_eq!(sink.name(), "json");
    let stored = sink.inner().get(9).unwrap().unwrap();
    assert_eq!(stored.description, "No sections here.");
    assert_eq!(stored.examples, vec![NO_EXAMPLES]);
    assert_eq!(stored.constraints, vec![NO_CONSTRAINTS]);
    assert!(dir.path().join("bare_9.json").exists());
}
