//! Tests for the paged sync loop against scripted page sources.
//!
//! These verify:
//! 1. Pages are concatenated in arrival order across the cursor chain
//! 2. Duplicate ids across pages are dropped (first occurrence wins)
//! 3. A page failure aborts the loop with a single `Failed` outcome
//! 4. Cancellation mid-loop terminates silently with no result

mod test_utils;

use reposweep::data::{Profile, Repo};
use reposweep::remote::{
    run_sync, sync_all, ApiError, Page, PageSource, ProfileSource, SyncEvent, SyncOutcome,
};
use std::collections::HashMap;
use std::sync::Mutex;
use test_utils::make_repo;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// A page source scripted with `url -> result` responses. Optionally cancels
/// a token after serving a given url, simulating teardown between pages.
struct ScriptedSource {
    pages: HashMap<String, Result<Page, ApiError>>,
    profile: Result<Profile, ApiError>,
    cancel_after: Option<(String, CancellationToken)>,
    served: Mutex<Vec<String>>,
}

impl ScriptedSource {
    fn new(pages: Vec<(&str, Result<Page, ApiError>)>) -> Self {
        Self {
            pages: pages
                .into_iter()
                .map(|(url, result)| (url.to_string(), result))
                .collect(),
            profile: Err(ApiError::Network("no profile scripted".to_string())),
            cancel_after: None,
            served: Mutex::new(Vec::new()),
        }
    }

    fn with_profile(mut self, profile: Result<Profile, ApiError>) -> Self {
        self.profile = profile;
        self
    }

    fn cancelling_after(mut self, url: &str, token: CancellationToken) -> Self {
        self.cancel_after = Some((url.to_string(), token));
        self
    }

    fn served(&self) -> Vec<String> {
        self.served.lock().unwrap().clone()
    }
}

impl ProfileSource for ScriptedSource {
    async fn fetch_profile(&self) -> Result<Profile, ApiError> {
        self.profile.clone()
    }
}

impl PageSource for ScriptedSource {
    fn first_page_url(&self) -> String {
        "page-1".to_string()
    }

    async fn fetch_page(&self, url: &str) -> Result<Page, ApiError> {
        self.served.lock().unwrap().push(url.to_string());
        if let Some((after, token)) = &self.cancel_after {
            if after == url {
                token.cancel();
            }
        }
        self.pages
            .get(url)
            .cloned()
            .unwrap_or_else(|| Err(ApiError::Network(format!("unscripted url {}", url))))
    }
}

fn page(repos: Vec<Repo>, next_url: Option<&str>) -> Result<Page, ApiError> {
    Ok(Page {
        repos,
        next_url: next_url.map(String::from),
    })
}

#[tokio::test]
async fn follows_cursors_and_concatenates_in_arrival_order() {
    let source = ScriptedSource::new(vec![
        ("page-1", page(vec![make_repo(1, "a"), make_repo(2, "b")], Some("page-2"))),
        ("page-2", page(vec![make_repo(3, "c")], Some("page-3"))),
        ("page-3", page(vec![make_repo(4, "d")], None)),
    ]);
    let cancel = CancellationToken::new();

    let repos = match sync_all(&source, &cancel).await {
        SyncOutcome::Complete(repos) => repos,
        other => panic!("expected completion, got {:?}", other),
    };
    let ids: Vec<u64> = repos.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![1, 2, 3, 4]);
    assert_eq!(source.served(), vec!["page-1", "page-2", "page-3"]);
}

#[tokio::test]
async fn duplicate_ids_across_pages_are_dropped() {
    let source = ScriptedSource::new(vec![
        ("page-1", page(vec![make_repo(1, "a"), make_repo(2, "b")], Some("page-2"))),
        // The listing shifted under us; repo 2 appears again on page 2.
        ("page-2", page(vec![make_repo(2, "b"), make_repo(3, "c")], None)),
    ]);
    let cancel = CancellationToken::new();

    let repos = match sync_all(&source, &cancel).await {
        SyncOutcome::Complete(repos) => repos,
        other => panic!("expected completion, got {:?}", other),
    };
    let ids: Vec<u64> = repos.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![1, 2, 3]);
}

#[tokio::test]
async fn page_failure_aborts_with_single_error() {
    let source = ScriptedSource::new(vec![
        ("page-1", page(vec![make_repo(1, "a")], Some("page-2"))),
        (
            "page-2",
            Err(ApiError::Status {
                status: 502,
                message: "Server Error".to_string(),
            }),
        ),
    ]);
    let cancel = CancellationToken::new();

    let outcome = sync_all(&source, &cancel).await;
    assert_eq!(
        outcome,
        SyncOutcome::Failed(ApiError::Status {
            status: 502,
            message: "Server Error".to_string(),
        })
    );
    // The loop stopped at the failing page.
    assert_eq!(source.served(), vec!["page-1", "page-2"]);
}

#[tokio::test]
async fn cancellation_between_pages_terminates_silently() {
    let cancel = CancellationToken::new();
    let source = ScriptedSource::new(vec![
        ("page-1", page(vec![make_repo(1, "a")], Some("page-2"))),
        ("page-2", page(vec![make_repo(2, "b")], None)),
    ])
    .cancelling_after("page-1", cancel.clone());

    let outcome = sync_all(&source, &cancel).await;
    assert_eq!(outcome, SyncOutcome::Cancelled);
    // Page 2 was never requested.
    assert_eq!(source.served(), vec!["page-1"]);
}

#[tokio::test]
async fn pre_cancelled_sync_fetches_nothing() {
    let source = ScriptedSource::new(vec![("page-1", page(vec![make_repo(1, "a")], None))]);
    let cancel = CancellationToken::new();
    cancel.cancel();

    let outcome = sync_all(&source, &cancel).await;
    assert_eq!(outcome, SyncOutcome::Cancelled);
    assert!(source.served().is_empty());
}

/// Drive a full sync attempt and collect every event it reports.
async fn collect_events(source: ScriptedSource, cancel: CancellationToken) -> Vec<SyncEvent> {
    let (tx, mut rx) = mpsc::channel(8);
    run_sync(source, cancel, tx).await;

    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

#[tokio::test]
async fn profile_failure_never_aborts_the_listing() {
    let source = ScriptedSource::new(vec![
        ("page-1", page(vec![make_repo(1, "a")], Some("page-2"))),
        ("page-2", page(vec![make_repo(2, "b")], None)),
    ])
    .with_profile(Err(ApiError::Status {
        status: 500,
        message: "Server Error".to_string(),
    }));

    let events = collect_events(source, CancellationToken::new()).await;

    // The full listing still arrives, and the profile failure produces
    // neither a Profile nor a Failed event.
    assert_eq!(events.len(), 1);
    match &events[0] {
        SyncEvent::Complete(repos) => {
            let ids: Vec<u64> = repos.iter().map(|r| r.id).collect();
            assert_eq!(ids, vec![1, 2]);
        }
        other => panic!("expected completion, got {:?}", other),
    }
}

#[tokio::test]
async fn listing_failure_is_fatal_even_with_profile_ok() {
    let source = ScriptedSource::new(vec![(
        "page-1",
        Err(ApiError::Status {
            status: 401,
            message: "Bad credentials".to_string(),
        }),
    )])
    .with_profile(Ok(Profile {
        login: "octocat".to_string(),
        name: None,
        avatar_url: None,
    }));

    let events = collect_events(source, CancellationToken::new()).await;

    // Profile delivery is unaffected; the listing failure surfaces once.
    assert_eq!(events.len(), 2);
    assert!(matches!(&events[0], SyncEvent::Profile(p) if p.login == "octocat"));
    assert!(matches!(&events[1], SyncEvent::Failed(msg) if msg.contains("Bad credentials")));
}

#[tokio::test]
async fn cancelled_run_reports_nothing() {
    let cancel = CancellationToken::new();
    let source = ScriptedSource::new(vec![
        ("page-1", page(vec![make_repo(1, "a")], Some("page-2"))),
        ("page-2", page(vec![make_repo(2, "b")], None)),
    ])
    .with_profile(Ok(Profile {
        login: "octocat".to_string(),
        name: None,
        avatar_url: None,
    }))
    .cancelling_after("page-1", cancel.clone());

    let events = collect_events(source, cancel).await;
    assert!(events.is_empty(), "got events {:?}", events);
}

#[tokio::test]
async fn empty_listing_completes_with_empty_mirror() {
    let source = ScriptedSource::new(vec![("page-1", page(vec![], None))]);
    let cancel = CancellationToken::new();

    assert_eq!(
        sync_all(&source, &cancel).await,
        SyncOutcome::Complete(Vec::new())
    );
}
