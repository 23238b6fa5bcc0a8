mod actions;
mod app_state;
mod events;
pub mod formatter;
pub mod help;
mod log_history;
mod registry;
mod router;
mod screen;
mod scroll;
mod session;

pub use actions::*;
pub use app_state::*;
pub use events::*;
pub use log_history::*;
pub use registry::*;
pub use router::*;
pub use screen::*;
pub use scroll::*;
pub use session::*;
