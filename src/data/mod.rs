pub mod derive;
pub mod view_state;

pub use derive::{derive, languages, Derived, PAGE_SIZE};
pub use view_state::ViewState;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One repository owned by the authenticated account.
///
/// Immutable once fetched; the mirror only ever removes whole entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Repo {
    pub id: u64,
    pub name: String,
    pub full_name: String,
    pub description: Option<String>,
    pub html_url: String,
    pub stargazers_count: u64,
    pub forks_count: u64,
    pub language: Option<String>,
    pub private: bool,
    pub fork: bool,
    pub updated_at: DateTime<Utc>,
    /// Login of the owning account.
    pub owner: String,
}

impl Repo {
    pub fn visibility(&self) -> Visibility {
        if self.private {
            Visibility::Private
        } else {
            Visibility::Public
        }
    }
}

/// The authenticated user's profile. Presentation-only; a failed profile
/// fetch never aborts a repository sync.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub login: String,
    pub name: Option<String>,
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Visibility {
    Public,
    Private,
}

impl Visibility {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Private => "private",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum VisibilityFilter {
    #[default]
    All,
    Public,
    Private,
}

impl VisibilityFilter {
    pub fn label(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Public => "public",
            Self::Private => "private",
        }
    }

    pub fn cycled(self) -> Self {
        match self {
            Self::All => Self::Public,
            Self::Public => Self::Private,
            Self::Private => Self::All,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DerivationFilter {
    #[default]
    All,
    /// Repositories that are not forks.
    Original,
    /// Forks only.
    Forks,
}

impl DerivationFilter {
    pub fn label(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Original => "sources",
            Self::Forks => "forks",
        }
    }

    pub fn cycled(self) -> Self {
        match self {
            Self::All => Self::Original,
            Self::Original => Self::Forks,
            Self::Forks => Self::All,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortKey {
    #[default]
    Updated,
    Name,
    Stars,
    Forks,
}

impl SortKey {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Updated => "updated",
            Self::Name => "name",
            Self::Stars => "stars",
            Self::Forks => "forks",
        }
    }

    pub fn cycled(self) -> Self {
        match self {
            Self::Updated => Self::Name,
            Self::Name => Self::Stars,
            Self::Stars => Self::Forks,
            Self::Forks => Self::Updated,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortDirection {
    Ascending,
    #[default]
    Descending,
}

impl SortDirection {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Ascending => "asc",
            Self::Descending => "desc",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }
}
