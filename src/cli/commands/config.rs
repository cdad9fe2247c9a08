//! Commands in the `config` category: reading and writing tree values.

use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    cli::{
        CliError, Command, CommandRegistry, CommandResult, formatting,
        types::{ArgType, CommandArg, CommandMetadata},
    },
    ops,
    store::ConfigStore,
    tree::{SectionNode, SectionPath},
};

/// Registers the config-category commands.
pub fn register_commands(registry: &mut CommandRegistry, store: Arc<ConfigStore>) {
    registry.register_command("config", Box::new(GetCommand::new(store.clone())));
    registry.register_command("config", Box::new(SetCommand::new(store.clone())));
    registry.register_command("config", Box::new(ShowCommand::new(store.clone())));
    registry.register_command(
        "config",
        Box::new(super::watch::WatchCommand::new(store)),
    );
}

/// Prints the node at a dotted path: a value directly, a section as a
/// listing of its children.
pub struct GetCommand {
    store: Arc<ConfigStore>,
}

impl GetCommand {
    /// Creates the command over the shared store.
    pub fn new(store: Arc<ConfigStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Command for GetCommand {
    async fn execute(&self, args: &[String]) -> CommandResult {
        let path_text = args.first().ok_or_else(|| {
            CliError::InvalidArguments("Expected <path> argument for 'get'".to_string())
        })?;
        let path = SectionPath::parse(path_text);

        match self.store.get_node(&path)? {
            SectionNode::Leaf(value) => Ok(format!("{path} = {value}")),
            SectionNode::Branch(_) => {
                let children = ops::children_of(&self.store, &path)?;
                let header = if path.is_root() {
                    formatting::format_header("(root)")
                } else {
                    formatting::format_header(&path.to_string())
                };

                let mut lines = vec![header];
                for child in &children {
                    lines.push(format!("  {}", formatting::format_child(child)));
                }
                Ok(lines.join("\n"))
            }
        }
    }

    fn metadata(&self) -> CommandMetadata {
        CommandMetadata {
            name: "get".to_string(),
            description: "Get a configuration value or section".to_string(),
            category: "config".to_string(),
            args: vec![CommandArg {
                name: "path".to_string(),
                description: "Dotted path (e.g., library.mathlib or application.type)"
                    .to_string(),
                required: true,
                value_type: ArgType::Path,
            }],
            examples: vec![
                "mortar config get application".to_string(),
                "mortar config get library.mathlib.type".to_string(),
            ],
        }
    }
}

/// Sets `key = value` inside a section.
pub struct SetCommand {
    store: Arc<ConfigStore>,
}

impl SetCommand {
    /// Creates the command over the shared store.
    pub fn new(store: Arc<ConfigStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Command for SetCommand {
    async fn execute(&self, args: &[String]) -> CommandResult {
        let [section, key, value] = args else {
            return Err(CliError::InvalidArguments(
                "Expected <section> <key> <value> for 'set'".to_string(),
            ));
        };

        let path = SectionPath::parse(section);
        ops::update_value(&self.store, &path, key, value)?;

        Ok(format!("{path}.{key} = {value}"))
    }

    fn metadata(&self) -> CommandMetadata {
        CommandMetadata {
            name: "set".to_string(),
            description: "Set a value inside a section".to_string(),
            category: "config".to_string(),
            args: vec![
                CommandArg {
                    name: "section".to_string(),
                    description: "Dotted section path".to_string(),
                    required: true,
                    value_type: ArgType::Path,
                },
                CommandArg {
                    name: "key".to_string(),
                    description: "Key within the section".to_string(),
                    required: true,
                    value_type: ArgType::String,
                },
                CommandArg {
                    name: "value".to_string(),
                    description: "New value (stored as a string)".to_string(),
                    required: true,
                    value_type: ArgType::String,
                },
            ],
            examples: vec![
                "mortar config set application type static".to_string(),
                "mortar config set library.mathlib path mathlib".to_string(),
            ],
        }
    }
}

/// Prints the whole tree, as text or JSON.
pub struct ShowCommand {
    store: Arc<ConfigStore>,
}

impl ShowCommand {
    /// Creates the command over the shared store.
    pub fn new(store: Arc<ConfigStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Command for ShowCommand {
    async fn execute(&self, args: &[String]) -> CommandResult {
        match args.first().map(String::as_str) {
            Some("json") => serde_json::to_string_pretty(&self.store.snapshot())
                .map_err(|e| CliError::ServiceError(e.to_string())),
            Some(other) => Err(CliError::InvalidArguments(format!(
                "Unknown format '{other}': expected 'json'"
            ))),
            None => Ok(self.store.render()),
        }
    }

    fn metadata(&self) -> CommandMetadata {
        CommandMetadata {
            name: "show".to_string(),
            description: "Print the entire configuration".to_string(),
            category: "config".to_string(),
            args: vec![CommandArg {
                name: "format".to_string(),
                description: "Output format".to_string(),
                required: false,
                value_type: ArgType::Choice(&["json"]),
            }],
            examples: vec![
                "mortar config show".to_string(),
                "mortar config show json".to_string(),
            ],
        }
    }
}
