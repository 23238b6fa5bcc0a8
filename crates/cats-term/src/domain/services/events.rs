use anyhow::Result;
use crossterm::event::Event as CrosstermEvent;
use crossterm::event::EventStream;
use crossterm::event::KeyCode;
use crossterm::event::KeyEventKind;
use crossterm::event::KeyModifiers;
use crossterm::event::MouseEventKind;
use futures::StreamExt;
use tokio::sync::mpsc;
use tokio::time;
use tui_textarea::Input;
use tui_textarea::Key;

use crate::domain::models::Event;

pub struct EventsService {
    crossterm_events: EventStream,
    events: mpsc::UnboundedReceiver<Event>,
}

/// Maps a terminal event to an application event. Anything without a binding
/// is handed to the input box as-is.
pub fn map_crossterm(event: CrosstermEvent) -> Option<Event> {
    match event {
        CrosstermEvent::Paste(text) => {
            return Some(Event::KeyboardPaste(text));
        }
        CrosstermEvent::Mouse(mouseevent) => match mouseevent.kind {
            MouseEventKind::ScrollUp => {
                return Some(Event::UIScrollUp);
            }
            MouseEventKind::ScrollDown => {
                return Some(Event::UIScrollDown);
            }
            _ => {
                return None;
            }
        },
        CrosstermEvent::Key(keyevent) => {
            if keyevent.kind == KeyEventKind::Release {
                return None;
            }

            let key = match keyevent.code {
                KeyCode::Char(c) => Key::Char(c),
                KeyCode::Enter => Key::Enter,
                KeyCode::Left => Key::Left,
                KeyCode::Right => Key::Right,
                KeyCode::Up => Key::Up,
                KeyCode::Down => Key::Down,
                KeyCode::Home => Key::Home,
                KeyCode::End => Key::End,
                KeyCode::PageUp => Key::PageUp,
                KeyCode::PageDown => Key::PageDown,
                KeyCode::Tab => Key::Tab,
                KeyCode::Delete => Key::Delete,
                KeyCode::F(n) => Key::F(n),
                KeyCode::Backspace => Key::Backspace,
                KeyCode::Esc => Key::Esc,
                _ => return None,
            };

            let input = Input {
                key,
                ctrl: keyevent.modifiers.contains(KeyModifiers::CONTROL),
                alt: keyevent.modifiers.contains(KeyModifiers::ALT),
                shift: keyevent.modifiers.contains(KeyModifiers::SHIFT),
            };
            match input {
                Input { key: Key::F(1), .. } => {
                    return Some(Event::KeyboardF1);
                }
                Input { key: Key::F(2), .. } => {
                    return Some(Event::KeyboardF2);
                }
                Input { key: Key::Tab, .. } => {
                    return Some(Event::KeyboardTab);
                }
                Input { key: Key::Down, .. } => {
                    return Some(Event::UIScrollDown);
                }
                Input { key: Key::Up, .. } => {
                    return Some(Event::UIScrollUp);
                }
                Input {
                    key: Key::PageDown, ..
                } => {
                    return Some(Event::UIScrollPageDown);
                }
                Input {
                    key: Key::PageUp, ..
                } => {
                    return Some(Event::UIScrollPageUp);
                }
                Input {
                    key: Key::Char('d'),
                    ctrl: true,
                    ..
                } => {
                    return Some(Event::UIScrollPageDown);
                }
                Input {
                    key: Key::Char('u'),
                    ctrl: true,
                    ..
                } => {
                    return Some(Event::UIScrollPageUp);
                }
                Input {
                    key: Key::Char('c'),
                    ctrl: true,
                    ..
                } => {
                    return Some(Event::KeyboardCTRLC);
                }
                Input {
                    key: Key::Char('p'),
                    ctrl: true,
                    ..
                } => {
                    return Some(Event::KeyboardCTRLP);
                }
                Input {
                    key: Key::Char('n'),
                    ctrl: true,
                    ..
                } => {
                    return Some(Event::KeyboardCTRLN);
                }
                Input {
                    key: Key::Char('r'),
                    ctrl: true,
                    ..
                } => {
                    return Some(Event::KeyboardCTRLR);
                }
                Input {
                    key: Key::Enter, ..
                } => {
                    return Some(Event::KeyboardEnter);
                }
                input => {
                    return Some(Event::KeyboardCharInput(input));
                }
            }
        }
        _ => return None,
    }
}

impl EventsService {
    pub fn new(events: mpsc::UnboundedReceiver<Event>) -> EventsService {
        return EventsService {
            crossterm_events: EventStream::new(),
            events,
        };
    }

    pub async fn next(&mut self) -> Result<Event> {
        loop {
            let evt = tokio::select! {
                event = self.events.recv() => event,
                event = self.crossterm_events.next() => match event {
                    Some(Ok(input)) => map_crossterm(input),
                    Some(Err(_)) => None,
                    None => None
                },
                _ = time::sleep(time::Duration::from_millis(500)) => Some(Event::UITick)
            };

            if let Some(event) = evt {
                return Ok(event);
            }
        }
    }
}
