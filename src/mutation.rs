//! Single-item deletion state machine.
//!
//! One deletion attempt moves through
//! `Idle -> AwaitingConfirmation -> InFlight -> Settled -> Idle`.
//! The tagged state makes illegal transitions (confirming twice, requesting
//! while a delete is in flight) no-ops instead of scattered boolean checks.
//! An in-flight request cannot be aborted; cancellation only exists while
//! the confirmation prompt is up.

use crate::data::Repo;
use crate::remote::ApiError;

/// Result of the remote delete call.
#[derive(Debug, Clone, PartialEq)]
pub enum DeleteOutcome {
    Deleted,
    Failed {
        status: Option<u16>,
        message: String,
    },
}

impl From<ApiError> for DeleteOutcome {
    fn from(e: ApiError) -> Self {
        // Keep the bare server message; the status code is carried
        // separately so notifications don't repeat it.
        let status = e.status_code();
        let message = match e {
            ApiError::Status { message, .. } => message,
            other => other.to_string(),
        };
        Self::Failed { status, message }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum DeletionState {
    #[default]
    Idle,
    AwaitingConfirmation(Repo),
    InFlight(Repo),
    Settled {
        repo: Repo,
        outcome: DeleteOutcome,
    },
}

impl DeletionState {
    /// Record a deletion target. Only legal from `Idle`.
    pub fn request(&mut self, repo: Repo) -> bool {
        if matches!(self, Self::Idle) {
            *self = Self::AwaitingConfirmation(repo);
            true
        } else {
            false
        }
    }

    /// Drop the pending target. Only legal from `AwaitingConfirmation`;
    /// an in-flight request cannot be called back.
    pub fn cancel(&mut self) -> bool {
        if matches!(self, Self::AwaitingConfirmation(_)) {
            *self = Self::Idle;
            true
        } else {
            false
        }
    }

    /// Move to `InFlight`, returning the repo whose delete request should
    /// now be dispatched. `None` from any state but `AwaitingConfirmation`.
    pub fn confirm(&mut self) -> Option<Repo> {
        match std::mem::take(self) {
            Self::AwaitingConfirmation(repo) => {
                *self = Self::InFlight(repo.clone());
                Some(repo)
            }
            other => {
                *self = other;
                None
            }
        }
    }

    /// Record the remote outcome. Only legal from `InFlight`.
    pub fn settle(&mut self, outcome: DeleteOutcome) -> bool {
        match std::mem::take(self) {
            Self::InFlight(repo) => {
                *self = Self::Settled { repo, outcome };
                true
            }
            other => {
                *self = other;
                false
            }
        }
    }

    /// Consume a settled attempt and return to `Idle`.
    pub fn finish(&mut self) -> Option<(Repo, DeleteOutcome)> {
        match std::mem::take(self) {
            Self::Settled { repo, outcome } => Some((repo, outcome)),
            other => {
                *self = other;
                None
            }
        }
    }

    /// The repo currently targeted, in any non-idle state.
    pub fn target(&self) -> Option<&Repo> {
        match self {
            Self::Idle => None,
            Self::AwaitingConfirmation(repo)
            | Self::InFlight(repo)
            | Self::Settled { repo, .. } => Some(repo),
        }
    }

    pub fn awaiting_confirmation(&self) -> bool {
        matches!(self, Self::AwaitingConfirmation(_))
    }

    pub fn in_flight(&self) -> bool {
        matches!(self, Self::InFlight(_))
    }
}

/// Remove exactly one repo by id. Returns whether anything was removed.
pub fn remove_by_id(mirror: &mut Vec<Repo>, id: u64) -> bool {
    if let Some(pos) = mirror.iter().position(|r| r.id == id) {
        mirror.remove(pos);
        true
    } else {
        false
    }
}
