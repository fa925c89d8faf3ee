//! Input dispatch layer for Elm Architecture (TEA) pattern.
//!
//! Maps key events to messages based on current app mode. Keys pressed while
//! a delete request is in flight are swallowed so the attempt cannot be
//! re-confirmed or dismissed before it settles.

use super::{App, Message};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Map key events to messages based on current app mode.
pub fn dispatch(app: &App, key: KeyEvent) -> Message {
    if app.search_mode {
        dispatch_search_mode(key)
    } else if app.deletion.in_flight() {
        dispatch_delete_in_flight(key)
    } else if app.deletion.awaiting_confirmation() {
        dispatch_confirm_modal(key)
    } else if app.show_help {
        dispatch_help_modal(key)
    } else {
        dispatch_normal_mode(key)
    }
}

/// Handle keys in normal mode (repository table).
fn dispatch_normal_mode(key: KeyEvent) -> Message {
    match key.code {
        KeyCode::Char('q') => Message::Quit,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Message::Quit,
        KeyCode::Char('r') => Message::Refresh,

        KeyCode::Char('j') | KeyCode::Down => Message::MoveDown,
        KeyCode::Char('k') | KeyCode::Up => Message::MoveUp,
        KeyCode::Char('l') | KeyCode::Right | KeyCode::Char('n') => Message::NextPage,
        KeyCode::Char('h') | KeyCode::Left | KeyCode::Char('p') => Message::PrevPage,
        KeyCode::Char('g') => Message::FirstPage,
        KeyCode::Char('G') => Message::LastPage,

        KeyCode::Char('/') => Message::EnterSearch,
        KeyCode::Char('v') => Message::CycleVisibilityFilter,
        KeyCode::Char('f') => Message::CycleDerivationFilter,
        KeyCode::Char('L') => Message::CycleLanguageFilter,
        KeyCode::Char('x') => Message::ClearFilters,
        KeyCode::Char('s') => Message::CycleSortKey,
        KeyCode::Char('S') => Message::ToggleSortDirection,

        KeyCode::Char('d') => Message::RequestDeletion,
        KeyCode::Enter => Message::OpenSelected,

        KeyCode::Char('?') => Message::ToggleHelp,
        KeyCode::Esc => Message::CloseModal,
        _ => Message::None,
    }
}

/// Handle keys in search mode.
fn dispatch_search_mode(key: KeyEvent) -> Message {
    match key.code {
        KeyCode::Esc => Message::ExitSearch,
        KeyCode::Enter => Message::ConfirmSearch,
        KeyCode::Backspace => Message::SearchBackspace,
        KeyCode::Char(c) => Message::SearchInput(c),
        _ => Message::None,
    }
}

/// Handle keys while the deletion confirm prompt is up.
fn dispatch_confirm_modal(key: KeyEvent) -> Message {
    match key.code {
        KeyCode::Char('y') | KeyCode::Enter => Message::ConfirmDeletion,
        KeyCode::Char('n') | KeyCode::Esc => Message::CancelDeletion,
        _ => Message::None,
    }
}

/// Handle keys while a delete request is in flight. The request is not
/// abortable once dispatched, so only quitting is honored.
fn dispatch_delete_in_flight(key: KeyEvent) -> Message {
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Message::Quit,
        _ => Message::None,
    }
}

/// Handle keys in the help modal.
fn dispatch_help_modal(key: KeyEvent) -> Message {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc | KeyCode::Char('?') => Message::CloseModal,
        _ => Message::None,
    }
}
