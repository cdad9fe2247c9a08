use std::{collections::HashMap, sync::Arc};

use crate::scaffold::Scaffolder;
use crate::store::ConfigStore;

use super::{
    CliError, Command,
    commands::{config, library},
    types::CommandMetadata,
};

/// Registry for CLI commands organized by category.
///
/// Commands are grouped by logical categories (`config`, `library`) so
/// the CLI scales without a giant match statement. Lookup walks
/// category then command name; argument counts are validated against
/// each command's metadata before execution.
pub struct CommandRegistry {
    /// Category name -> (command name -> command implementation).
    categories: HashMap<String, HashMap<String, Box<dyn Command>>>,
    config_store: Arc<ConfigStore>,
    scaffolder: Arc<dyn Scaffolder>,
}

impl CommandRegistry {
    /// Creates a new empty command registry.
    pub fn new(config_store: Arc<ConfigStore>, scaffolder: Arc<dyn Scaffolder>) -> Self {
        Self {
            categories: HashMap::new(),
            config_store,
            scaffolder,
        }
    }

    /// Registers a command under `category`, keyed by its metadata name.
    /// An existing command with the same name is replaced.
    pub fn register_command(&mut self, category: &str, command: Box<dyn Command>) {
        self.categories
            .entry(category.to_string())
            .or_default()
            .insert(command.metadata().name, command);
    }

    /// Executes a command by category and name with the provided
    /// arguments.
    ///
    /// # Errors
    /// Returns `CliError::CommandNotFound` if the category or command
    /// does not exist, `CliError::InvalidArguments` if the argument
    /// count does not match the metadata, or whatever the command's
    /// execute method returns.
    pub async fn execute(
        &self,
        category: &str,
        command_name: &str,
        args: &[String],
    ) -> Result<String, CliError> {
        let found_category = self.categories.get(category).ok_or_else(|| {
            CliError::CommandNotFound(format!("Failed to find category '{category}'"))
        })?;

        let found_command = found_category.get(command_name).ok_or_else(|| {
            CliError::CommandNotFound(format!("Failed to find command '{command_name}'"))
        })?;

        Self::validate_args(&found_command.metadata(), args)?;

        found_command.execute(args).await
    }

    /// Lists all registered commands organized by category, both sorted
    /// alphabetically for stable help output.
    pub fn list_commands(&self) -> Vec<(String, Vec<String>)> {
        let mut categories: Vec<(String, Vec<String>)> = self
            .categories
            .iter()
            .map(|(category, commands)| {
                let mut command_list: Vec<String> = commands.keys().cloned().collect();
                command_list.sort();

                (category.clone(), command_list)
            })
            .collect();

        categories.sort();
        categories
    }

    fn validate_args(metadata: &CommandMetadata, args: &[String]) -> Result<(), CliError> {
        let required_count = metadata.args.iter().filter(|arg| arg.required).count();
        let total_count = metadata.args.len();

        if args.len() < required_count {
            return Err(CliError::InvalidArguments(format!(
                "Expected at least {} arguments, got {}",
                required_count,
                args.len(),
            )));
        }

        if args.len() > total_count {
            return Err(CliError::InvalidArguments(format!(
                "Expected at most {} arguments, got {}",
                total_count,
                args.len(),
            )));
        }

        Ok(())
    }

    /// Registers all available CLI commands in their respective
    /// categories.
    pub fn register_all_commands(&mut self) {
        config::register_commands(self, self.config_store.clone());
        library::register_commands(
            self,
            self.config_store.clone(),
            self.scaffolder.clone(),
        );
    }
}
