use cats_catalog::CatalogDescriptor;
use tui_textarea::Input;

use super::DisplayBlock;
use super::TablePreview;

/// A change to the visible log. Only `Write` reaches the history; the other
/// updates act on the view alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayUpdate {
    Clear,
    /// Replaces the view without recording anything, e.g. an animation frame.
    Transient(DisplayBlock),
    Write(DisplayBlock),
    ClearHistory,
}

#[derive(Debug)]
pub enum Event {
    Display(DisplayUpdate),
    ConnectionChanged(Option<CatalogDescriptor>),
    TablePreview(Option<TablePreview>),
    CommandFinished,
    Quit,
    KeyboardCharInput(Input),
    KeyboardCTRLC,
    KeyboardCTRLN,
    KeyboardCTRLP,
    KeyboardCTRLR,
    KeyboardEnter,
    KeyboardF1,
    KeyboardF2,
    KeyboardPaste(String),
    KeyboardTab,
    UITick,
    UIScrollDown,
    UIScrollUp,
    UIScrollPageDown,
    UIScrollPageUp,
}
