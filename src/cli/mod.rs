//! Command-line interface over the configuration store.
//!
//! Provides a hierarchical command system for interacting with the
//! build framework's configuration. Commands are organized by category
//! and automatically generate help text from metadata.

mod commands;
pub mod formatting;
mod registry;
mod service;
mod types;

#[cfg(test)]
mod tests;

pub use registry::CommandRegistry;
pub use service::CliService;
pub use types::{CliError, Command, CommandResult};
