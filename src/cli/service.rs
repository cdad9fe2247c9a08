use std::sync::Arc;

use crate::scaffold::Scaffolder;
use crate::store::ConfigStore;

use super::{CliError, CommandRegistry, formatting};

/// High-level service for managing and executing CLI commands.
///
/// Wires the registry to the store and the scaffolding collaborator,
/// registers all built-in commands and exposes execution plus help
/// listing.
pub struct CliService {
    registry: CommandRegistry,
}

impl CliService {
    /// Creates a CLI service with all available commands registered.
    pub fn new(config_store: ConfigStore, scaffolder: Arc<dyn Scaffolder>) -> Self {
        let config_store = Arc::new(config_store);
        let mut registry = CommandRegistry::new(config_store, scaffolder);
        registry.register_all_commands();

        CliService { registry }
    }

    /// Executes a command by category and name with the provided
    /// arguments, returning its output on success.
    ///
    /// # Errors
    /// Returns `CliError::CommandNotFound` if the command does not
    /// exist, or the command's own error.
    pub async fn execute_command(
        &self,
        category: &str,
        command_name: &str,
        args: &[String],
    ) -> Result<String, CliError> {
        self.registry.execute(category, command_name, args).await
    }

    /// Renders the help listing of all commands grouped by category.
    pub fn help_text(&self) -> String {
        let mut lines = vec![formatting::format_header("Available commands:")];

        for (category, commands) in self.registry.list_commands() {
            lines.push(format!("  {category}"));
            for command in commands {
                lines.push(format!("    {command}"));
            }
        }

        lines.join("\n")
    }
}
