//! Integration tests for the crawl engine against a stub GitHub API.
//!
//! A small axum server stands in for api.github.com, serving the three
//! endpoints the crawler consumes plus the raw-download fallback. Each test
//! gets its own server and an in-memory SQLite database with migrations
//! applied.
//!
//! Key scenarios tested:
//! - Upsert creates exactly one record keyed by the metadata id
//! - Repeat crawls short-circuit README transfer via 304 Not Modified
//! - Pagination stops at the first empty result page
//! - One failing item never aborts the rest of the page
//! - A failed README fetch leaves the README fields alone but never blocks
//!   the surrounding upsert
//! - The decoder falls back to the raw download URL for link-file READMEs

use std::collections::HashSet;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde_json::{Value, json};

use trendfeed::connect_and_migrate;
use trendfeed::crawl::{Crawler, CrawlError};
use trendfeed::github::{GitHubClient, GitHubClientConfig};
use trendfeed::repository;

const README_TEXT: &str = "# Hello\n\nServed by the stub API.\n";
const README_ETAG: &str = "\"readme-v1\"";
const README_SHA: &str = "3b18e512dba79e4c8300dd08aeb37f8e728b8dad";

/// Stub server behavior and request counters.
#[derive(Clone)]
struct StubState {
    /// Externally reachable base URL of this stub, used in download_url.
    base_url: Arc<String>,
    /// full_names served per search page; pages beyond the list are empty.
    pages: Arc<Vec<Vec<String>>>,
    /// full_names whose metadata endpoint answers 500.
    failing: Arc<HashSet<String>>,
    /// Serve READMEs without an inline `content` field (link-file shape).
    link_readme: bool,
    /// When set, the README endpoint answers 500 for every repository.
    readme_fail: Arc<AtomicBool>,
    search_calls: Arc<AtomicUsize>,
    readme_not_modified: Arc<AtomicUsize>,
    readme_fetched: Arc<AtomicUsize>,
}

/// Deterministic repo id from owner/name, mirroring what a real API would
/// keep stable across crawls.
fn id_for(owner: &str, name: &str) -> i64 {
    // The fixture pair used across tests keeps a well-known id
    if owner == "acme" && name == "widget" {
        return 42;
    }
    let mut hasher = DefaultHasher::new();
    owner.hash(&mut hasher);
    name.hash(&mut hasher);
    (hasher.finish() / 2) as i64
}

async fn search_handler(
    State(state): State<StubState>,
    Query(params): Query<std::collections::HashMap<String, String>>,
) -> Json<Value> {
    state.search_calls.fetch_add(1, Ordering::SeqCst);
    let page: usize = params
        .get("page")
        .and_then(|p| p.parse().ok())
        .unwrap_or(1);

    let items: Vec<Value> = state
        .pages
        .get(page.saturating_sub(1))
        .map(|names| names.iter().map(|n| json!({ "full_name": n })).collect())
        .unwrap_or_default();

    Json(json!({ "total_count": 100, "items": items }))
}

async fn metadata_handler(
    State(state): State<StubState>,
    Path((owner, name)): Path<(String, String)>,
) -> Response {
    let full_name = format!("{owner}/{name}");
    if state.failing.contains(&full_name) {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }

    // A repo owned by "weird" ships a non-numeric id
    let id: Value = if owner == "weird" {
        json!("not-a-number")
    } else {
        json!(id_for(&owner, &name))
    };

    Json(json!({
        "id": id,
        "node_id": format!("R_{owner}_{name}"),
        "name": name,
        "full_name": full_name,
        "owner": { "login": owner },
        "html_url": format!("https://github.com/{full_name}"),
        "description": "A stub repository",
        "language": "Rust",
        "stargazers_count": 100,
        "created_at": "2020-01-01T00:00:00Z",
        "updated_at": "2024-01-01T00:00:00Z",
        "pushed_at": "2024-06-01T00:00:00Z"
    }))
    .into_response()
}

async fn readme_handler(
    State(state): State<StubState>,
    Path((owner, name)): Path<(String, String)>,
    headers: HeaderMap,
) -> Response {
    if state.readme_fail.load(Ordering::SeqCst) {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }

    let presented = headers
        .get(header::IF_NONE_MATCH)
        .and_then(|v| v.to_str().ok());
    if presented == Some(README_ETAG) {
        state.readme_not_modified.fetch_add(1, Ordering::SeqCst);
        return StatusCode::NOT_MODIFIED.into_response();
    }
    state.readme_fetched.fetch_add(1, Ordering::SeqCst);

    let content: Value = if state.link_readme {
        Value::Null
    } else {
        json!(STANDARD.encode(README_TEXT))
    };

    let body = json!({
        "content": content,
        "encoding": "base64",
        "sha": README_SHA,
        "download_url": format!("{}/raw/{owner}/{name}", state.base_url),
    });

    ([(header::ETAG, README_ETAG)], Json(body)).into_response()
}

async fn raw_handler(Path((_owner, _name)): Path<(String, String)>) -> &'static str {
    README_TEXT
}

/// Start a stub server and return its state (with base_url filled in).
async fn spawn_stub(
    pages: Vec<Vec<&str>>,
    failing: &[&str],
    link_readme: bool,
) -> StubState {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("stub should bind");
    let addr = listener.local_addr().expect("stub should have an address");

    let state = StubState {
        base_url: Arc::new(format!("http://{addr}")),
        pages: Arc::new(
            pages
                .into_iter()
                .map(|p| p.into_iter().map(String::from).collect())
                .collect(),
        ),
        failing: Arc::new(failing.iter().map(|s| s.to_string()).collect()),
        link_readme,
        readme_fail: Arc::new(AtomicBool::new(false)),
        search_calls: Arc::new(AtomicUsize::new(0)),
        readme_not_modified: Arc::new(AtomicUsize::new(0)),
        readme_fetched: Arc::new(AtomicUsize::new(0)),
    };

    let app = axum::Router::new()
        .route("/search/repositories", get(search_handler))
        .route("/repos/{owner}/{name}", get(metadata_handler))
        .route("/repos/{owner}/{name}/readme", get(readme_handler))
        .route("/raw/{owner}/{name}", get(raw_handler))
        .with_state(state.clone());

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("stub serve failed");
    });

    state
}

async fn crawler_with_db(state: &StubState) -> (Crawler, sea_orm::DatabaseConnection) {
    let github = GitHubClient::new(GitHubClientConfig {
        base_url: state.base_url.as_str().to_string(),
        token: "test-token".to_string(),
        timeout: Duration::from_secs(5),
    })
    .expect("client should build");

    let db = connect_and_migrate("sqlite::memory:")
        .await
        .expect("test db should migrate");

    (
        Crawler::new(github, db.clone()).with_pacing(Duration::ZERO),
        db,
    )
}

#[tokio::test]
async fn upsert_creates_one_record_keyed_by_metadata_id() {
    let state = spawn_stub(vec![], &[], false).await;
    let (crawler, db) = crawler_with_db(&state).await;

    crawler
        .upsert_repository("acme/widget")
        .await
        .expect("upsert should succeed");

    assert_eq!(repository::count(&db).await.unwrap(), 1);

    let record = repository::find_by_id(&db, 42)
        .await
        .unwrap()
        .expect("record should exist under the metadata id");
    assert_eq!(record.full_name.as_deref(), Some("acme/widget"));
    assert_eq!(record.owner_login.as_deref(), Some("acme"));
    assert_eq!(record.stargazers_count, Some(100));
    assert_eq!(record.readme_text.as_deref(), Some(README_TEXT));
    assert_eq!(record.readme_sha.as_deref(), Some(README_SHA));
    assert_eq!(record.readme_etag.as_deref(), Some(README_ETAG));
    assert!(record.last_crawled_at.is_some());
    assert!(record.created_at.is_some());
}

#[tokio::test]
async fn upsert_rejects_malformed_identifiers_without_writing() {
    let state = spawn_stub(vec![], &[], false).await;
    let (crawler, db) = crawler_with_db(&state).await;

    for input in ["no-separator", "/name", "owner/", "a/b/c"] {
        let err = crawler
            .upsert_repository(input)
            .await
            .expect_err("malformed identifier must fail");
        assert!(matches!(err, CrawlError::InvalidIdentifier { .. }), "{input}");
    }

    assert_eq!(repository::count(&db).await.unwrap(), 0);
}

#[tokio::test]
async fn upsert_is_noop_when_metadata_is_missing_upstream() {
    let state = spawn_stub(vec![], &["ghost/town"], false).await;
    let (crawler, db) = crawler_with_db(&state).await;

    crawler
        .upsert_repository("ghost/town")
        .await
        .expect("missing upstream data is not an error");
    assert_eq!(repository::count(&db).await.unwrap(), 0);
}

#[tokio::test]
async fn upsert_propagates_malformed_metadata_without_writing() {
    let state = spawn_stub(vec![], &[], false).await;
    let (crawler, db) = crawler_with_db(&state).await;

    let err = crawler
        .upsert_repository("weird/ident")
        .await
        .expect_err("non-numeric id must fail");
    assert!(matches!(err, CrawlError::MalformedMetadata { .. }));
    assert_eq!(repository::count(&db).await.unwrap(), 0);
}

#[tokio::test]
async fn repeat_upsert_short_circuits_readme_via_not_modified() {
    let state = spawn_stub(vec![], &[], false).await;
    let (crawler, db) = crawler_with_db(&state).await;

    crawler.upsert_repository("acme/widget").await.unwrap();
    let first = repository::find_by_id(&db, 42).await.unwrap().unwrap();

    crawler.upsert_repository("acme/widget").await.unwrap();
    let second = repository::find_by_id(&db, 42).await.unwrap().unwrap();

    // README was transferred exactly once; the repeat hit 304
    assert_eq!(state.readme_fetched.load(Ordering::SeqCst), 1);
    assert_eq!(state.readme_not_modified.load(Ordering::SeqCst), 1);

    // still exactly one record, identical except for the crawl stamp
    assert_eq!(repository::count(&db).await.unwrap(), 1);
    assert_eq!(second.readme_text, first.readme_text);
    assert_eq!(second.readme_sha, first.readme_sha);
    assert_eq!(second.readme_etag, first.readme_etag);
    assert_eq!(second.description, first.description);
    assert!(second.last_crawled_at >= first.last_crawled_at);
}

#[tokio::test]
async fn pagination_stops_at_first_empty_page() {
    let state = spawn_stub(vec![vec!["org/alpha", "org/beta"], vec![]], &[], false).await;
    let (crawler, db) = crawler_with_db(&state).await;

    crawler
        .run("stars:>5000", &[], 50, 5)
        .await
        .expect("run should complete");

    // Page 1 (items) and page 2 (empty, terminates); pages 3..=5 never asked
    assert_eq!(state.search_calls.load(Ordering::SeqCst), 2);
    assert_eq!(repository::count(&db).await.unwrap(), 2);
}

#[tokio::test]
async fn one_failing_item_does_not_abort_the_page() {
    let state = spawn_stub(
        vec![vec![
            "org/repo1",
            "org/repo2",
            "org/repo3",
            "org/repo4",
            "org/repo5",
        ]],
        &["org/repo3"],
        false,
    )
    .await;
    let (crawler, db) = crawler_with_db(&state).await;

    crawler
        .run("stars:>5000", &[], 50, 1)
        .await
        .expect("run should complete despite the failing item");

    assert_eq!(repository::count(&db).await.unwrap(), 4);
    assert!(
        repository::find_by_full_name(&db, "org/repo3")
            .await
            .unwrap()
            .is_none()
    );
    for name in ["org/repo1", "org/repo2", "org/repo4", "org/repo5"] {
        assert!(
            repository::find_by_full_name(&db, name)
                .await
                .unwrap()
                .is_some(),
            "{name} should have been persisted"
        );
    }
}

#[tokio::test]
async fn failed_readme_fetch_never_blocks_the_upsert() {
    let state = spawn_stub(vec![], &[], false).await;
    let (crawler, db) = crawler_with_db(&state).await;

    // Fresh upsert under a README 500: the record still lands, with all
    // README fields empty and the crawl stamp set
    state.readme_fail.store(true, Ordering::SeqCst);
    crawler.upsert_repository("acme/widget").await.unwrap();

    let record = repository::find_by_id(&db, 42).await.unwrap().unwrap();
    assert_eq!(record.readme_text, None);
    assert_eq!(record.readme_sha, None);
    assert_eq!(record.readme_etag, None);
    assert!(record.last_crawled_at.is_some());

    // A healthy crawl populates the README fields
    state.readme_fail.store(false, Ordering::SeqCst);
    crawler.upsert_repository("acme/widget").await.unwrap();
    let populated = repository::find_by_id(&db, 42).await.unwrap().unwrap();
    assert_eq!(populated.readme_text.as_deref(), Some(README_TEXT));

    // A later 500 leaves the previously stored README fields untouched
    // while the upsert still completes and re-stamps the record
    state.readme_fail.store(true, Ordering::SeqCst);
    crawler.upsert_repository("acme/widget").await.unwrap();

    let after = repository::find_by_id(&db, 42).await.unwrap().unwrap();
    assert_eq!(after.readme_text, populated.readme_text);
    assert_eq!(after.readme_sha, populated.readme_sha);
    assert_eq!(after.readme_etag, populated.readme_etag);
    assert!(after.last_crawled_at >= populated.last_crawled_at);
    assert_eq!(repository::count(&db).await.unwrap(), 1);
}

#[tokio::test]
async fn link_file_readme_falls_back_to_raw_download() {
    let state = spawn_stub(vec![], &[], true).await;
    let (crawler, db) = crawler_with_db(&state).await;

    crawler.upsert_repository("acme/widget").await.unwrap();

    let record = repository::find_by_id(&db, 42).await.unwrap().unwrap();
    // Decoded text equals the raw body served at download_url, and the
    // cache metadata still advanced
    assert_eq!(record.readme_text.as_deref(), Some(README_TEXT));
    assert_eq!(record.readme_sha.as_deref(), Some(README_SHA));
    assert_eq!(record.readme_etag.as_deref(), Some(README_ETAG));
}
