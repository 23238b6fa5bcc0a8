//! Command line definition, terminal rendering and the UI loop.

pub mod cli;
pub mod theme;
pub mod ui;
