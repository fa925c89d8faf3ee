//! Tests for key-to-message dispatch across app modes.

mod test_utils;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use reposweep::tui::{App, Message};
use test_utils::{make_repo, test_config};

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn dispatch(app: &App, code: KeyCode) -> Message {
    reposweep::tui::input::dispatch(app, key(code))
}

#[test]
fn normal_mode_keys() {
    let app = App::new(test_config());
    assert_eq!(dispatch(&app, KeyCode::Char('q')), Message::Quit);
    assert_eq!(dispatch(&app, KeyCode::Char('r')), Message::Refresh);
    assert_eq!(dispatch(&app, KeyCode::Char('j')), Message::MoveDown);
    assert_eq!(dispatch(&app, KeyCode::Down), Message::MoveDown);
    assert_eq!(dispatch(&app, KeyCode::Char('d')), Message::RequestDeletion);
    assert_eq!(dispatch(&app, KeyCode::Char('/')), Message::EnterSearch);
    assert_eq!(dispatch(&app, KeyCode::Char('v')), Message::CycleVisibilityFilter);
    assert_eq!(dispatch(&app, KeyCode::Char('s')), Message::CycleSortKey);
    assert_eq!(dispatch(&app, KeyCode::Char('S')), Message::ToggleSortDirection);
    assert_eq!(dispatch(&app, KeyCode::F(5)), Message::None);
}

#[test]
fn search_mode_captures_text() {
    let mut app = App::new(test_config());
    app.search_mode = true;
    assert_eq!(dispatch(&app, KeyCode::Char('q')), Message::SearchInput('q'));
    assert_eq!(dispatch(&app, KeyCode::Backspace), Message::SearchBackspace);
    assert_eq!(dispatch(&app, KeyCode::Esc), Message::ExitSearch);
    assert_eq!(dispatch(&app, KeyCode::Enter), Message::ConfirmSearch);
}

#[test]
fn confirm_modal_accepts_only_yes_no() {
    let mut app = App::new(test_config());
    app.apply_sync_complete(vec![make_repo(1, "a")]);
    app.deletion.request(make_repo(1, "a"));

    assert_eq!(dispatch(&app, KeyCode::Char('y')), Message::ConfirmDeletion);
    assert_eq!(dispatch(&app, KeyCode::Enter), Message::ConfirmDeletion);
    assert_eq!(dispatch(&app, KeyCode::Char('n')), Message::CancelDeletion);
    assert_eq!(dispatch(&app, KeyCode::Esc), Message::CancelDeletion);
    assert_eq!(dispatch(&app, KeyCode::Char('d')), Message::None);
}

#[test]
fn in_flight_deletion_swallows_confirmation_keys() {
    let mut app = App::new(test_config());
    app.apply_sync_complete(vec![make_repo(1, "a")]);
    app.deletion.request(make_repo(1, "a"));
    app.deletion.confirm().unwrap();

    // No re-confirmation, no cancellation, no further requests.
    assert_eq!(dispatch(&app, KeyCode::Char('y')), Message::None);
    assert_eq!(dispatch(&app, KeyCode::Enter), Message::None);
    assert_eq!(dispatch(&app, KeyCode::Esc), Message::None);
    assert_eq!(dispatch(&app, KeyCode::Char('d')), Message::None);
}
