//! Messages for the Elm Architecture (TEA) update loop.
//!
//! Input dispatch turns key events into messages; `App::update` is the only
//! place state changes in response to them.

#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    // App lifecycle
    Quit,
    /// Re-sync the collection, superseding any sync already in flight.
    Refresh,

    // Cursor / pagination
    MoveUp,
    MoveDown,
    NextPage,
    PrevPage,
    FirstPage,
    LastPage,

    // Search mode
    EnterSearch,
    ExitSearch,
    ConfirmSearch,
    SearchInput(char),
    SearchBackspace,

    // Filters and sorting
    CycleVisibilityFilter,
    CycleDerivationFilter,
    CycleLanguageFilter,
    ClearFilters,
    CycleSortKey,
    ToggleSortDirection,

    // Deletion
    RequestDeletion,
    ConfirmDeletion,
    CancelDeletion,

    // Modals
    ToggleHelp,
    CloseModal,

    // Browser
    OpenSelected,

    // No-op
    None,
}
