use cats_catalog::Protocol;
use test_utils::table;

use super::*;
use crate::domain::models::DisplayBlock;
use crate::domain::models::Tone;

fn state() -> AppState {
    return AppState::new(AppStateProps {
        history_capacity: 10,
    });
}

fn write(text: &str) -> Event {
    return Event::Display(DisplayUpdate::Write(DisplayBlock::text(text, Tone::Plain)));
}

#[test]
fn it_starts_on_welcome_screen() {
    let app_state = state();
    assert!(app_state
        .screen
        .plain_text()
        .contains("Welcome to Interactive Cats"));
    assert_eq!(app_state.connection_label(), "No connection");
}

#[test]
fn it_blocks_input_while_busy() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut app_state = state();

    assert!(!app_state.submit("   ", &tx).unwrap());
    assert!(app_state.submit("connect paris", &tx).unwrap());
    assert!(!app_state.submit("list datasets", &tx).unwrap());
    app_state.handle_event(Event::KeyboardF1, &tx).unwrap();

    assert_eq!(rx.try_recv(), Ok(Action::Submit("connect paris".to_string())));
    assert!(rx.try_recv().is_err());

    app_state.handle_event(Event::CommandFinished, &tx).unwrap();
    app_state.handle_event(Event::KeyboardF2, &tx).unwrap();
    assert_eq!(rx.try_recv(), Ok(Action::ShowCommands));
}

#[test]
fn it_tracks_the_connection_indicator() {
    let (tx, _rx) = mpsc::unbounded_channel();
    let mut app_state = state();

    let catalog = CatalogDescriptor::new("paris", Protocol::OpenDataSoft, "https://opendata.paris.fr");
    app_state
        .handle_event(Event::ConnectionChanged(Some(catalog)), &tx)
        .unwrap();
    assert_eq!(app_state.connection_label(), "Connected: PARIS (opendatasoft)");

    app_state
        .handle_event(Event::ConnectionChanged(None), &tx)
        .unwrap();
    assert_eq!(app_state.connection_label(), "No connection");
}

#[test]
fn it_navigates_history() {
    let (tx, _rx) = mpsc::unbounded_channel();
    let mut app_state = state();
    app_state.handle_event(Event::Display(DisplayUpdate::ClearHistory), &tx).unwrap();

    for text in ["one", "two"] {
        app_state.handle_event(write(text), &tx).unwrap();
    }
    app_state.handle_event(Event::KeyboardCTRLP, &tx).unwrap();
    assert_eq!(app_state.screen.plain_text(), "one");

    app_state.handle_event(Event::KeyboardCTRLN, &tx).unwrap();
    assert_eq!(app_state.screen.plain_text(), "one\ntwo");
}

#[test]
fn it_toggles_focus_only_with_a_preview() {
    let (tx, _rx) = mpsc::unbounded_channel();
    let mut app_state = state();

    app_state.handle_event(Event::KeyboardTab, &tx).unwrap();
    assert_eq!(app_state.focus, Focus::Log);

    let loaded = table(&["a"], &[&["1"], &["2"], &["3"]]);
    let preview = TablePreview::new("x", &loaded, 100);
    app_state
        .handle_event(Event::TablePreview(Some(preview)), &tx)
        .unwrap();
    app_state.set_viewports(5, 1);
    app_state.handle_event(Event::KeyboardTab, &tx).unwrap();
    assert_eq!(app_state.focus, Focus::Table);

    app_state.handle_event(Event::UIScrollDown, &tx).unwrap();
    app_state.handle_event(Event::UIScrollDown, &tx).unwrap();
    app_state.handle_event(Event::UIScrollDown, &tx).unwrap();
    assert_eq!(app_state.table_scroll.position(), 2);

    app_state
        .handle_event(Event::TablePreview(None), &tx)
        .unwrap();
    assert_eq!(app_state.focus, Focus::Log);
}

#[test]
fn it_quits_on_ctrl_c() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut app_state = state();

    assert!(!app_state.handle_event(Event::KeyboardCTRLC, &tx).unwrap());
    assert_eq!(rx.try_recv(), Ok(Action::Quit));

    assert!(app_state.handle_event(Event::KeyboardCTRLC, &tx).unwrap());
    assert!(app_state.handle_event(Event::Quit, &tx).unwrap());
}
