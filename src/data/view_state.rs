//! User-controlled view parameters: search, filters, sort, page.
//!
//! Every filter or sort mutation resets the page to 1 so the user never
//! lands on a stale page of a freshly narrowed result set. The store also
//! owns page clamping; the derive pipeline never adjusts the page itself.

use super::{DerivationFilter, SortDirection, SortKey, VisibilityFilter};

#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    pub search_text: String,
    pub visibility: VisibilityFilter,
    pub derivation: DerivationFilter,
    /// `None` means "all languages".
    pub language: Option<String>,
    pub sort_key: SortKey,
    pub sort_direction: SortDirection,
    /// 1-based page index into the filtered result set.
    pub page: usize,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            search_text: String::new(),
            visibility: VisibilityFilter::default(),
            derivation: DerivationFilter::default(),
            language: None,
            sort_key: SortKey::default(),
            sort_direction: SortDirection::default(),
            page: 1,
        }
    }
}

impl ViewState {
    pub fn set_search_text(&mut self, text: impl Into<String>) {
        self.search_text = text.into();
        self.page = 1;
    }

    pub fn push_search_char(&mut self, c: char) {
        self.search_text.push(c);
        self.page = 1;
    }

    pub fn pop_search_char(&mut self) {
        self.search_text.pop();
        self.page = 1;
    }

    pub fn cycle_visibility(&mut self) {
        self.visibility = self.visibility.cycled();
        self.page = 1;
    }

    pub fn cycle_derivation(&mut self) {
        self.derivation = self.derivation.cycled();
        self.page = 1;
    }

    pub fn set_language(&mut self, language: Option<String>) {
        self.language = language;
        self.page = 1;
    }

    pub fn cycle_sort_key(&mut self) {
        self.sort_key = self.sort_key.cycled();
        self.page = 1;
    }

    pub fn toggle_sort_direction(&mut self) {
        self.sort_direction = self.sort_direction.toggled();
        self.page = 1;
    }

    pub fn clear_filters(&mut self) {
        self.search_text.clear();
        self.visibility = VisibilityFilter::All;
        self.derivation = DerivationFilter::All;
        self.language = None;
        self.page = 1;
    }

    /// Set the page, clamped into `[1, total_pages]`.
    pub fn set_page(&mut self, page: usize, total_pages: usize) {
        self.page = page.clamp(1, total_pages.max(1));
    }

    pub fn next_page(&mut self, total_pages: usize) {
        self.set_page(self.page + 1, total_pages);
    }

    pub fn prev_page(&mut self, total_pages: usize) {
        self.set_page(self.page.saturating_sub(1), total_pages);
    }

    /// Pull an out-of-range page back in bounds after the result set shrank.
    pub fn clamp_page(&mut self, total_pages: usize) {
        if self.page > total_pages.max(1) {
            self.page = total_pages.max(1);
        }
    }
}
