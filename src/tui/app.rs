use crate::config::Config;
use crate::data::{self, Derived, Profile, Repo, ViewState};
use crate::mutation::{self, DeleteOutcome, DeletionState};
use crate::remote::{spawn_sync, GithubClient, SyncEvent};
use crate::util::send_or_log;
use anyhow::Result;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Braille spinner frames for loading animation
pub const SPINNER_FRAMES: &[char] = &['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

pub struct App {
    pub config: Arc<Config>,

    /// Full client-side copy of the account's repositories. Replaced
    /// wholesale on a completed sync, shrunk by one on a confirmed delete,
    /// never partially updated otherwise.
    pub mirror: Vec<Repo>,
    pub profile: Option<Profile>,

    /// User-controlled search/filter/sort/page parameters.
    pub view: ViewState,
    /// Projection of `mirror` under `view`, recomputed after every change
    /// to either.
    pub derived: Derived,
    /// Languages present in the mirror, for the language filter cycle.
    pub languages: Vec<String>,
    /// Cursor within the current page.
    pub selected: usize,

    pub deletion: DeletionState,

    // UI state
    pub search_mode: bool,
    pub show_help: bool,
    pub error_message: Option<String>,
    pub notice: Option<String>,
    pub is_loading: bool,
    pub spinner_frame: usize,

    /// Channel receiver for background sync events
    pub sync_rx: Option<mpsc::Receiver<SyncEvent>>,
    /// Cancellation token owned by the in-flight sync, if any
    pub sync_cancel: Option<CancellationToken>,
    /// Channel receiver for the in-flight delete, if any
    pub delete_rx: Option<mpsc::Receiver<DeleteOutcome>>,
}

impl App {
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
            mirror: Vec::new(),
            profile: None,
            view: ViewState::default(),
            derived: Derived::default(),
            languages: Vec::new(),
            selected: 0,
            deletion: DeletionState::Idle,
            search_mode: false,
            show_help: false,
            error_message: None,
            notice: None,
            is_loading: false,
            spinner_frame: 0,
            sync_rx: None,
            sync_cancel: None,
            delete_rx: None,
        }
    }

    /// Process a message and update app state (Elm Architecture update function).
    ///
    /// Returns `Ok(true)` if the app should quit, `Ok(false)` to continue.
    pub fn update(&mut self, msg: super::Message) -> Result<bool> {
        use super::Message;

        // Notices are one-shot; any real keypress clears them.
        if msg != Message::None {
            self.notice = None;
        }

        match msg {
            Message::Quit => {
                self.cancel_sync();
                return Ok(true);
            }
            Message::Refresh => self.start_sync(),

            Message::MoveUp => self.move_cursor(-1),
            Message::MoveDown => self.move_cursor(1),
            Message::NextPage => self.change_page(|view, pages| view.next_page(pages)),
            Message::PrevPage => self.change_page(|view, pages| view.prev_page(pages)),
            Message::FirstPage => self.change_page(|view, pages| view.set_page(1, pages)),
            Message::LastPage => self.change_page(|view, pages| view.set_page(pages, pages)),

            Message::EnterSearch => self.search_mode = true,
            Message::ExitSearch => {
                self.search_mode = false;
                self.apply_view_change(|view| view.set_search_text(""));
            }
            Message::ConfirmSearch => self.search_mode = false,
            Message::SearchInput(c) => self.apply_view_change(|view| view.push_search_char(c)),
            Message::SearchBackspace => self.apply_view_change(|view| view.pop_search_char()),

            Message::CycleVisibilityFilter => self.apply_view_change(|view| view.cycle_visibility()),
            Message::CycleDerivationFilter => self.apply_view_change(|view| view.cycle_derivation()),
            Message::CycleLanguageFilter => self.cycle_language_filter(),
            Message::ClearFilters => self.apply_view_change(|view| view.clear_filters()),
            Message::CycleSortKey => self.apply_view_change(|view| view.cycle_sort_key()),
            Message::ToggleSortDirection => {
                self.apply_view_change(|view| view.toggle_sort_direction())
            }

            Message::RequestDeletion => self.request_deletion(),
            Message::ConfirmDeletion => self.confirm_deletion(),
            Message::CancelDeletion => {
                self.deletion.cancel();
            }

            Message::ToggleHelp => self.show_help = !self.show_help,
            Message::CloseModal => {
                self.show_help = false;
                self.error_message = None;
            }

            Message::OpenSelected => self.open_selected()?,

            Message::None => {}
        }
        Ok(false)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Derived state
    // ─────────────────────────────────────────────────────────────────────

    /// Recompute the visible projection after the mirror or view changed.
    ///
    /// Clamps the page when the result set shrank beneath it, then clamps
    /// the cursor to the page.
    pub fn rederive(&mut self) {
        let mut derived = data::derive(&self.mirror, &self.view);
        if self.view.page > derived.total_pages {
            self.view.clamp_page(derived.total_pages);
            derived = data::derive(&self.mirror, &self.view);
        }
        self.derived = derived;
        self.languages = data::languages(&self.mirror);

        if self.selected >= self.derived.page_items.len() {
            self.selected = self.derived.page_items.len().saturating_sub(1);
        }
    }

    pub fn selected_repo(&self) -> Option<&Repo> {
        self.derived.page_items.get(self.selected)
    }

    fn move_cursor(&mut self, delta: i32) {
        let len = self.derived.page_items.len();
        if len == 0 {
            return;
        }
        if delta > 0 {
            self.selected = (self.selected + 1).min(len - 1);
        } else {
            self.selected = self.selected.saturating_sub(1);
        }
    }

    fn change_page(&mut self, f: impl FnOnce(&mut ViewState, usize)) {
        f(&mut self.view, self.derived.total_pages);
        self.selected = 0;
        self.rederive();
    }

    fn apply_view_change(&mut self, f: impl FnOnce(&mut ViewState)) {
        f(&mut self.view);
        self.selected = 0;
        self.rederive();
    }

    fn cycle_language_filter(&mut self) {
        let next = match &self.view.language {
            None => self.languages.first().cloned(),
            Some(current) => {
                let idx = self.languages.iter().position(|l| l == current);
                match idx {
                    Some(i) if i + 1 < self.languages.len() => {
                        Some(self.languages[i + 1].clone())
                    }
                    // Past the last language, or the language vanished from
                    // the mirror: back to "all".
                    _ => None,
                }
            }
        };
        self.view.set_language(next);
        self.selected = 0;
        self.rederive();
    }

    // ─────────────────────────────────────────────────────────────────────
    // Sync
    // ─────────────────────────────────────────────────────────────────────

    /// Start a background sync, superseding any sync already in flight.
    pub fn start_sync(&mut self) {
        self.cancel_sync();

        self.is_loading = true;
        let cancel = CancellationToken::new();
        let (tx, rx) = mpsc::channel(8);
        self.sync_rx = Some(rx);
        self.sync_cancel = Some(cancel.clone());

        spawn_sync(GithubClient::new(&self.config), cancel, tx);
    }

    /// Cancel the in-flight sync, if any. Its stale completion becomes inert.
    pub fn cancel_sync(&mut self) {
        if let Some(cancel) = self.sync_cancel.take() {
            cancel.cancel();
        }
        self.sync_rx = None;
    }

    /// Poll for sync events (non-blocking, call from event loop tick)
    pub fn poll_sync(&mut self) {
        let Some(mut rx) = self.sync_rx.take() else {
            return;
        };

        let mut finished = false;
        while let Ok(event) = rx.try_recv() {
            match event {
                SyncEvent::Profile(profile) => {
                    self.profile = Some(profile);
                }
                SyncEvent::Complete(repos) => {
                    self.mirror = repos;
                    self.rederive();
                    self.is_loading = false;
                    self.error_message = None;
                    finished = true;
                }
                SyncEvent::Failed(msg) => {
                    // Old mirror stays; the failure surfaces exactly once.
                    self.is_loading = false;
                    self.error_message = Some(format!("Sync failed: {}", msg));
                    finished = true;
                }
            }
        }

        if finished {
            self.sync_cancel = None;
        } else {
            self.sync_rx = Some(rx);
        }
    }

    /// Apply a completed sync as if its event had arrived. Test seam; the
    /// live path goes through `poll_sync`.
    pub fn apply_sync_complete(&mut self, repos: Vec<Repo>) {
        self.mirror = repos;
        self.is_loading = false;
        self.error_message = None;
        self.rederive();
    }

    // ─────────────────────────────────────────────────────────────────────
    // Deletion
    // ─────────────────────────────────────────────────────────────────────

    fn request_deletion(&mut self) {
        let Some(repo) = self.selected_repo().cloned() else {
            return;
        };
        if !self.deletion.request(repo) {
            return;
        }
        if !self.config.ui.confirm_before_delete {
            self.confirm_deletion();
        }
    }

    fn confirm_deletion(&mut self) {
        // `confirm` refuses anything but AwaitingConfirmation, so a second
        // confirm while in flight is a no-op.
        let Some(repo) = self.deletion.confirm() else {
            return;
        };

        let client = GithubClient::new(&self.config);
        let (tx, rx) = mpsc::channel(1);
        self.delete_rx = Some(rx);

        tokio::spawn(async move {
            let outcome = match client.delete_repo(&repo.owner, &repo.name).await {
                Ok(()) => DeleteOutcome::Deleted,
                Err(e) => DeleteOutcome::from(e),
            };
            send_or_log(&tx, outcome, "delete outcome").await;
        });
    }

    /// Poll for the delete outcome (non-blocking, call from event loop tick)
    pub fn poll_delete(&mut self) {
        let Some(mut rx) = self.delete_rx.take() else {
            return;
        };

        match rx.try_recv() {
            Ok(outcome) => self.apply_delete_outcome(outcome),
            Err(mpsc::error::TryRecvError::Empty) => {
                self.delete_rx = Some(rx);
            }
            Err(mpsc::error::TryRecvError::Disconnected) => {
                // Task died without reporting; treat as a failed attempt.
                self.apply_delete_outcome(DeleteOutcome::Failed {
                    status: None,
                    message: "delete task ended unexpectedly".to_string(),
                });
            }
        }
    }

    /// Settle the in-flight deletion and reconcile the mirror.
    ///
    /// On success the target is removed by id, exactly once; on failure the
    /// mirror is untouched and the failure surfaces as one notification.
    pub fn apply_delete_outcome(&mut self, outcome: DeleteOutcome) {
        if !self.deletion.settle(outcome) {
            return;
        }
        let Some((repo, outcome)) = self.deletion.finish() else {
            return;
        };

        match outcome {
            DeleteOutcome::Deleted => {
                mutation::remove_by_id(&mut self.mirror, repo.id);
                self.notice = Some(format!("Deleted {}", repo.full_name));
                self.rederive();
            }
            DeleteOutcome::Failed { status, message } => {
                tracing::error!("Failed to delete {}: {}", repo.full_name, message);
                self.error_message = Some(match status {
                    Some(code) => format!("Delete failed ({}): {}", code, message),
                    None => format!("Delete failed: {}", message),
                });
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Misc
    // ─────────────────────────────────────────────────────────────────────

    fn open_selected(&self) -> Result<()> {
        if let Some(repo) = self.selected_repo() {
            open_url(&repo.html_url)?;
        }
        Ok(())
    }

    /// Advance spinner frame (call on tick while loading)
    pub fn tick_spinner(&mut self) {
        // The in-flight delete modal shows the spinner too.
        if self.is_loading || self.deletion.in_flight() {
            self.spinner_frame = (self.spinner_frame + 1) % SPINNER_FRAMES.len();
        }
    }

    /// Get current spinner character
    pub fn spinner_char(&self) -> char {
        SPINNER_FRAMES[self.spinner_frame]
    }

    pub fn has_active_filters(&self) -> bool {
        let defaults = ViewState::default();
        !self.view.search_text.is_empty()
            || self.view.visibility != defaults.visibility
            || self.view.derivation != defaults.derivation
            || self.view.language.is_some()
    }
}

fn open_url(url: &str) -> Result<()> {
    // Use xdg-open on Linux, which works in WSL
    std::process::Command::new("xdg-open")
        .arg(url)
        .spawn()
        .or_else(|_| {
            // Fallback to wslview for WSL
            std::process::Command::new("wslview").arg(url).spawn()
        })?;
    Ok(())
}
