//! Bindings from the terminal to the outside world: the catalog connector.

pub mod connectors;
