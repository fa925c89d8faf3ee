//! Pure filter/sort/paginate pipeline.
//!
//! `derive` is a referentially transparent function of the repository mirror
//! and the current view state. It never mutates the mirror; page clamping is
//! the view state's job, not this module's.

use super::view_state::ViewState;
use super::{DerivationFilter, Repo, SortDirection, SortKey, VisibilityFilter};
use std::cmp::Ordering;

/// Repositories shown per page.
pub const PAGE_SIZE: usize = 12;

/// The visible projection of the mirror under the current view state.
#[derive(Debug, Clone, PartialEq)]
pub struct Derived {
    /// The slice of results for the current page, in final display order.
    pub page_items: Vec<Repo>,
    /// Result count after filtering, before pagination.
    pub total_count: usize,
    /// Always at least 1, even for an empty result set.
    pub total_pages: usize,
}

impl Default for Derived {
    fn default() -> Self {
        Self {
            page_items: Vec::new(),
            total_count: 0,
            total_pages: 1,
        }
    }
}

/// Filter and sort the mirror without paginating.
///
/// Filters narrow in a fixed order: text, visibility, derivation, language.
/// The sort is stable, so ties keep their pre-sort relative order.
pub fn filter_and_sort<'a>(mirror: &'a [Repo], view: &ViewState) -> Vec<&'a Repo> {
    let needle = view.search_text.to_lowercase();

    let mut results: Vec<&Repo> = mirror
        .iter()
        .filter(|repo| matches_search(repo, &needle))
        .filter(|repo| match view.visibility {
            VisibilityFilter::All => true,
            VisibilityFilter::Public => !repo.private,
            VisibilityFilter::Private => repo.private,
        })
        .filter(|repo| match view.derivation {
            DerivationFilter::All => true,
            DerivationFilter::Original => !repo.fork,
            DerivationFilter::Forks => repo.fork,
        })
        .filter(|repo| match &view.language {
            None => true,
            Some(lang) => repo.language.as_deref() == Some(lang.as_str()),
        })
        .collect();

    results.sort_by(|a, b| {
        let ord = compare(a, b, view.sort_key);
        match view.sort_direction {
            SortDirection::Ascending => ord,
            SortDirection::Descending => ord.reverse(),
        }
    });

    results
}

/// Case-insensitive substring match over name, description, and language.
/// Absent fields are skipped, not treated as mismatches.
fn matches_search(repo: &Repo, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    if repo.name.to_lowercase().contains(needle) {
        return true;
    }
    if let Some(desc) = &repo.description {
        if desc.to_lowercase().contains(needle) {
            return true;
        }
    }
    if let Some(lang) = &repo.language {
        if lang.to_lowercase().contains(needle) {
            return true;
        }
    }
    false
}

fn compare(a: &Repo, b: &Repo, key: SortKey) -> Ordering {
    match key {
        SortKey::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
        SortKey::Updated => a.updated_at.cmp(&b.updated_at),
        SortKey::Stars => a.stargazers_count.cmp(&b.stargazers_count),
        SortKey::Forks => a.forks_count.cmp(&b.forks_count),
    }
}

/// Ceiling division with a floor of one page.
pub fn total_pages(count: usize) -> usize {
    count.div_ceil(PAGE_SIZE).max(1)
}

/// Derive the current page from the mirror and view state.
///
/// An out-of-range page yields an empty slice rather than panicking; the
/// view state store is expected to clamp before rendering.
pub fn derive(mirror: &[Repo], view: &ViewState) -> Derived {
    let results = filter_and_sort(mirror, view);
    let total_count = results.len();
    let total_pages = total_pages(total_count);

    let start = (view.page.saturating_sub(1)) * PAGE_SIZE;
    let page_items = results
        .into_iter()
        .skip(start)
        .take(PAGE_SIZE)
        .cloned()
        .collect();

    Derived {
        page_items,
        total_count,
        total_pages,
    }
}

/// Distinct languages present in the mirror, sorted for stable menu cycling.
pub fn languages(mirror: &[Repo]) -> Vec<String> {
    let mut langs: Vec<String> = mirror
        .iter()
        .filter_map(|repo| repo.language.clone())
        .collect();
    langs.sort();
    langs.dedup();
    langs
}
