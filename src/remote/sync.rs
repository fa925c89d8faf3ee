//! Full-collection synchronization across paginated listing responses.
//!
//! Pages are fetched strictly sequentially because the cursor for page N+1
//! comes from page N's `Link` header. A session-scoped cancellation token is
//! checked at every await point; a superseded sync commits nothing.

use super::{ApiError, GithubClient};
use crate::data::{Profile, Repo};
use crate::util::send_or_log;
use std::collections::HashSet;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// One page of a listing response plus its continuation cursor.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub repos: Vec<Repo>,
    pub next_url: Option<String>,
}

/// Anything that can serve paginated repository listings. Implemented by
/// [`GithubClient`]; tests substitute scripted fakes.
#[allow(async_fn_in_trait)]
pub trait PageSource {
    fn first_page_url(&self) -> String;
    async fn fetch_page(&self, url: &str) -> Result<Page, ApiError>;
}

/// The profile lookup that accompanies a sync. Separate from [`PageSource`]
/// so its failure policy (isolated, never fatal) stays independently
/// testable.
#[allow(async_fn_in_trait)]
pub trait ProfileSource {
    async fn fetch_profile(&self) -> Result<Profile, ApiError>;
}

/// Terminal state of one sync attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum SyncOutcome {
    /// Every page arrived; the full mirror in arrival order, duplicates
    /// (by id) dropped.
    Complete(Vec<Repo>),
    /// Cancelled mid-loop. Not an error; the caller keeps its old mirror.
    Cancelled,
    /// Some page failed. Reported once; the caller keeps its old mirror.
    Failed(ApiError),
}

/// Events sent from a background sync task to the UI.
#[derive(Debug)]
pub enum SyncEvent {
    /// Profile lookup succeeded (presentation-only, may never arrive).
    Profile(Profile),
    /// The whole listing arrived; replace the mirror wholesale.
    Complete(Vec<Repo>),
    /// The listing failed; the mirror must stay as it was.
    Failed(String),
}

/// Fetch the complete collection, following continuation cursors until the
/// server stops supplying one.
pub async fn sync_all<S: PageSource>(source: &S, cancel: &CancellationToken) -> SyncOutcome {
    let mut repos: Vec<Repo> = Vec::new();
    let mut seen: HashSet<u64> = HashSet::new();
    let mut next = Some(source.first_page_url());

    while let Some(url) = next {
        if cancel.is_cancelled() {
            return SyncOutcome::Cancelled;
        }

        let result = tokio::select! {
            _ = cancel.cancelled() => return SyncOutcome::Cancelled,
            result = source.fetch_page(&url) => result,
        };

        match result {
            Ok(page) => {
                for repo in page.repos {
                    if seen.insert(repo.id) {
                        repos.push(repo);
                    }
                }
                next = page.next_url;
            }
            Err(e) => return SyncOutcome::Failed(e),
        }
    }

    if cancel.is_cancelled() {
        return SyncOutcome::Cancelled;
    }
    SyncOutcome::Complete(repos)
}

/// Run one sync attempt, reporting through `tx`.
///
/// The profile lookup runs concurrently with the listing loop and its
/// failure is logged, never escalated. A cancelled sync sends nothing.
pub async fn run_sync<S: PageSource + ProfileSource>(
    source: S,
    cancel: CancellationToken,
    tx: mpsc::Sender<SyncEvent>,
) {
    let (outcome, profile) = tokio::join!(
        sync_all(&source, &cancel),
        profile_with_cancel(&source, &cancel),
    );

    if cancel.is_cancelled() {
        return;
    }

    if let Some(profile) = profile {
        send_or_log(&tx, SyncEvent::Profile(profile), "profile").await;
    }

    match outcome {
        SyncOutcome::Complete(repos) => {
            send_or_log(&tx, SyncEvent::Complete(repos), "sync completion").await;
        }
        SyncOutcome::Cancelled => {}
        SyncOutcome::Failed(e) => {
            tracing::error!("Repository sync failed: {}", e);
            send_or_log(&tx, SyncEvent::Failed(e.to_string()), "sync failure").await;
        }
    }
}

/// Spawn [`run_sync`] as a background task.
pub fn spawn_sync(client: GithubClient, cancel: CancellationToken, tx: mpsc::Sender<SyncEvent>) {
    tokio::spawn(run_sync(client, cancel, tx));
}

async fn profile_with_cancel<S: ProfileSource>(
    source: &S,
    cancel: &CancellationToken,
) -> Option<Profile> {
    let result = tokio::select! {
        _ = cancel.cancelled() => return None,
        result = source.fetch_profile() => result,
    };
    match result {
        Ok(profile) => Some(profile),
        Err(e) => {
            tracing::debug!("Profile fetch failed (non-fatal): {}", e);
            None
        }
    }
}
