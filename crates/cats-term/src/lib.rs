//! Terminal front end for browsing open-data catalogs.
//!
//! Typed command lines are routed to the catalog bound to the current
//! session, and results are rendered into a scrollable log with history
//! navigation and a table preview.

pub mod application;
pub mod configuration;
pub mod domain;
pub mod infrastructure;
pub use application::ui::{destruct_terminal_for_panic, start_loop};
pub use configuration::{Config, ConfigKey};
pub use domain::models::{Action, DisplayBlock, Event};
pub use domain::services::{ActionsService, AppStateProps, CommandRouter, RouterSettings};
pub use infrastructure::connectors::ConnectorManager;
