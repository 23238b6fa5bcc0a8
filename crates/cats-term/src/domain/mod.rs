//! Command routing, session state and display models, independent of the
//! terminal they are drawn on.

pub mod models;
pub mod services;
