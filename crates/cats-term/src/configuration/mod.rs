//! Runtime configuration: built-in defaults, the TOML config file, then
//! command line flags and environment variables.

mod config;

pub use config::*;
