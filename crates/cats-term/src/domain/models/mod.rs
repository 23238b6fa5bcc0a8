mod action;
mod command;
mod display;
mod event;
mod preview;

pub use action::*;
pub use command::*;
pub use display::*;
pub use event::*;
pub use preview::*;
