use anyhow::Result;
use cats_catalog::CatalogDescriptor;
use tokio::sync::mpsc;

use super::help;
use super::Scroll;
use super::Screen;
use crate::domain::models::Action;
use crate::domain::models::DisplayUpdate;
use crate::domain::models::Event;
use crate::domain::models::TablePreview;

#[cfg(test)]
#[path = "app_state_test.rs"]
mod tests;

pub struct AppStateProps {
    pub history_capacity: usize,
}

/// Which pane receives scroll keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Log,
    Table,
}

/// Everything the UI loop draws. Mutated only from the UI task, from events
/// sent by the actions service and from keyboard input.
pub struct AppState {
    pub screen: Screen,
    pub catalog: Option<CatalogDescriptor>,
    pub preview: Option<TablePreview>,
    pub focus: Focus,
    pub log_scroll: Scroll,
    pub table_scroll: Scroll,
    pub waiting_for_backend: bool,
    log_viewport: usize,
    table_viewport: usize,
}

impl AppState {
    pub fn new(props: AppStateProps) -> AppState {
        let mut screen = Screen::new(props.history_capacity);
        screen.apply(DisplayUpdate::Write(help::welcome()));

        let mut app_state = AppState {
            screen,
            catalog: None,
            preview: None,
            focus: Focus::Log,
            log_scroll: Scroll::default(),
            table_scroll: Scroll::default(),
            waiting_for_backend: false,
            log_viewport: 0,
            table_viewport: 0,
        };
        app_state.sync_dependants();

        return app_state;
    }

    pub fn connection_label(&self) -> String {
        match &self.catalog {
            Some(catalog) => {
                return format!(
                    "Connected: {} ({})",
                    catalog.name.to_uppercase(),
                    catalog.protocol
                );
            }
            None => return "No connection".to_string(),
        }
    }

    /// Viewport heights in lines, as last laid out by the UI.
    pub fn set_viewports(&mut self, log: usize, table: usize) {
        self.log_viewport = log;
        self.table_viewport = table;
        self.sync_dependants();
    }

    fn sync_dependants(&mut self) {
        let follow = self.log_scroll.is_position_at_last();
        self.log_scroll
            .set_state(self.screen.lines().count(), self.log_viewport);
        if follow {
            self.log_scroll.last();
        }

        let rows = self.preview.as_ref().map(|p| p.rows.len()).unwrap_or_default();
        self.table_scroll.set_state(rows, self.table_viewport);
    }

    fn request(&mut self, action: Action, tx: &mpsc::UnboundedSender<Action>) -> Result<()> {
        if self.waiting_for_backend {
            tracing::debug!(action = ?action, "busy, dropping action");
            return Ok(());
        }
        self.waiting_for_backend = true;
        tx.send(action)?;
        return Ok(());
    }

    /// Sends a typed line to the actions service. Returns false when the line
    /// was not accepted, either blank or because a command is still running.
    pub fn submit(&mut self, text: &str, tx: &mpsc::UnboundedSender<Action>) -> Result<bool> {
        if text.trim().is_empty() || self.waiting_for_backend {
            return Ok(false);
        }
        self.request(Action::Submit(text.to_string()), tx)?;
        return Ok(true);
    }

    /// Applies one event. Returns true when the UI loop should exit.
    pub fn handle_event(&mut self, event: Event, tx: &mpsc::UnboundedSender<Action>) -> Result<bool> {
        match event {
            Event::Display(update) => {
                self.screen.apply(update);
                self.log_scroll.last();
                self.sync_dependants();
            }
            Event::ConnectionChanged(catalog) => {
                self.catalog = catalog;
            }
            Event::TablePreview(preview) => {
                self.preview = preview;
                self.table_scroll.first();
                if self.preview.is_none() {
                    self.focus = Focus::Log;
                }
                self.sync_dependants();
            }
            Event::CommandFinished => {
                self.waiting_for_backend = false;
            }
            Event::Quit => {
                return Ok(true);
            }
            Event::KeyboardCTRLC => {
                if self.waiting_for_backend {
                    tracing::info!("interrupted while a command was running");
                    return Ok(true);
                }
                self.request(Action::Quit, tx)?;
            }
            Event::KeyboardCTRLP => {
                if !self.waiting_for_backend && self.screen.previous() {
                    self.sync_dependants();
                    self.log_scroll.last();
                }
            }
            Event::KeyboardCTRLN => {
                if !self.waiting_for_backend && self.screen.next() {
                    self.sync_dependants();
                    self.log_scroll.last();
                }
            }
            Event::KeyboardCTRLR => {
                self.request(Action::Reset, tx)?;
            }
            Event::KeyboardF1 => {
                self.request(Action::ShowCatalogs, tx)?;
            }
            Event::KeyboardF2 => {
                self.request(Action::ShowCommands, tx)?;
            }
            Event::KeyboardTab => {
                self.focus = match self.focus {
                    Focus::Log if self.preview.is_some() => Focus::Table,
                    _ => Focus::Log,
                };
            }
            Event::UIScrollUp => self.focused_scroll().up(),
            Event::UIScrollDown => self.focused_scroll().down(),
            Event::UIScrollPageUp => self.focused_scroll().up_page(),
            Event::UIScrollPageDown => self.focused_scroll().down_page(),
            Event::KeyboardCharInput(_)
            | Event::KeyboardEnter
            | Event::KeyboardPaste(_)
            | Event::UITick => {}
        }

        return Ok(false);
    }

    fn focused_scroll(&mut self) -> &mut Scroll {
        match self.focus {
            Focus::Log => return &mut self.log_scroll,
            Focus::Table => return &mut self.table_scroll,
        }
    }
}
