//! Built-in CLI commands, grouped by category.

pub mod config;
pub mod library;
pub mod watch;
