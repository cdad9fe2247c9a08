//! Commands in the `library` category: creating libraries and editing
//! dependency lists.

use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    cli::{
        CliError, Command, CommandRegistry, CommandResult, formatting,
        types::{ArgType, CommandArg, CommandMetadata},
    },
    ops::{self, DependencyOutcome, LibraryKind},
    scaffold::Scaffolder,
    store::ConfigStore,
    tree::SectionPath,
};

/// Registers the library-category commands.
pub fn register_commands(
    registry: &mut CommandRegistry,
    store: Arc<ConfigStore>,
    scaffolder: Arc<dyn Scaffolder>,
) {
    registry.register_command(
        "library",
        Box::new(AddCommand::new(store.clone(), scaffolder)),
    );
    registry.register_command(
        "library",
        Box::new(AddDependencyCommand::new(store.clone())),
    );
    registry.register_command("library", Box::new(ListCommand::new(store)));
}

/// Scaffolds a new library and records it as `library.<name>`,
/// optionally registering it as a dependency of an existing unit.
pub struct AddCommand {
    store: Arc<ConfigStore>,
    scaffolder: Arc<dyn Scaffolder>,
}

impl AddCommand {
    /// Creates the command over the shared store and scaffolder.
    pub fn new(store: Arc<ConfigStore>, scaffolder: Arc<dyn Scaffolder>) -> Self {
        Self { store, scaffolder }
    }
}

#[async_trait]
impl Command for AddCommand {
    async fn execute(&self, args: &[String]) -> CommandResult {
        let (name, kind_text) = match args {
            [name, kind, ..] => (name, kind),
            _ => {
                return Err(CliError::InvalidArguments(
                    "Expected <name> <static|dynamic> [target-section] for 'add'".to_string(),
                ));
            }
        };
        let kind: LibraryKind = kind_text.parse().map_err(CliError::InvalidArguments)?;

        let name = ops::add_library(&self.store, name, kind, self.scaffolder.as_ref()).await?;
        let mut lines = vec![format!("Added library '{name}' ({kind})")];

        // Optional caller-confirmed follow-up: register the new library
        // with an existing buildable unit.
        if let Some(target) = args.get(2) {
            let target_path = SectionPath::parse(target);
            match ops::add_dependency(&self.store, &target_path, &name)? {
                DependencyOutcome::Added => {
                    lines.push(format!("Registered '{name}' as a dependency of '{target_path}'"));
                }
                DependencyOutcome::AlreadyPresent => {
                    lines.push(format!(
                        "'{name}' is already a dependency of '{target_path}'; nothing to do"
                    ));
                }
            }
        }

        Ok(lines.join("\n"))
    }

    fn metadata(&self) -> CommandMetadata {
        CommandMetadata {
            name: "add".to_string(),
            description: "Scaffold a new library and record it".to_string(),
            category: "library".to_string(),
            args: vec![
                CommandArg {
                    name: "name".to_string(),
                    description: "Library name (letters, digits, '_' and '-')".to_string(),
                    required: true,
                    value_type: ArgType::String,
                },
                CommandArg {
                    name: "type".to_string(),
                    description: "Library type".to_string(),
                    required: true,
                    value_type: ArgType::Choice(&["static", "dynamic"]),
                },
                CommandArg {
                    name: "target-section".to_string(),
                    description: "Buildable unit to register the library with".to_string(),
                    required: false,
                    value_type: ArgType::Path,
                },
            ],
            examples: vec![
                "mortar library add mathlib static".to_string(),
                "mortar library add strlib dynamic application".to_string(),
            ],
        }
    }
}

/// Appends a dependency to a buildable unit's dependency list.
pub struct AddDependencyCommand {
    store: Arc<ConfigStore>,
}

impl AddDependencyCommand {
    /// Creates the command over the shared store.
    pub fn new(store: Arc<ConfigStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Command for AddDependencyCommand {
    async fn execute(&self, args: &[String]) -> CommandResult {
        let [section, name] = args else {
            return Err(CliError::InvalidArguments(
                "Expected <section> <name> for 'add-dependency'".to_string(),
            ));
        };

        let path = SectionPath::parse(section);
        match ops::add_dependency(&self.store, &path, name)? {
            DependencyOutcome::Added => Ok(format!("Added '{name}' to '{path}'")),
            DependencyOutcome::AlreadyPresent => Ok(format!(
                "'{name}' already exists in '{path}'; nothing to do"
            )),
        }
    }

    fn metadata(&self) -> CommandMetadata {
        CommandMetadata {
            name: "add-dependency".to_string(),
            description: "Add a dependency to a buildable unit".to_string(),
            category: "library".to_string(),
            args: vec![
                CommandArg {
                    name: "section".to_string(),
                    description: "Buildable unit (application or library.<name>)".to_string(),
                    required: true,
                    value_type: ArgType::Path,
                },
                CommandArg {
                    name: "name".to_string(),
                    description: "Dependency name".to_string(),
                    required: true,
                    value_type: ArgType::String,
                },
            ],
            examples: vec!["mortar library add-dependency application mathlib".to_string()],
        }
    }
}

/// Lists buildable units with their dependency lists.
pub struct ListCommand {
    store: Arc<ConfigStore>,
}

impl ListCommand {
    /// Creates the command over the shared store.
    pub fn new(store: Arc<ConfigStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Command for ListCommand {
    async fn execute(&self, args: &[String]) -> CommandResult {
        let units = ops::list_buildable_units(&self.store);

        if args.first().map(String::as_str) == Some("json") {
            return serde_json::to_string_pretty(&units)
                .map_err(|e| CliError::ServiceError(e.to_string()));
        }

        if units.is_empty() {
            return Ok("No buildable units".to_string());
        }

        let mut lines = vec![formatting::format_header("Buildable units:")];
        for unit in &units {
            let deps = if unit.dependencies.is_empty() {
                "(no dependencies)".to_string()
            } else {
                unit.dependencies.join(", ")
            };
            lines.push(format!("  {}  {deps}", unit.path));
        }

        Ok(lines.join("\n"))
    }

    fn metadata(&self) -> CommandMetadata {
        CommandMetadata {
            name: "list".to_string(),
            description: "List buildable units and their dependencies".to_string(),
            category: "library".to_string(),
            args: vec![CommandArg {
                name: "format".to_string(),
                description: "Output format".to_string(),
                required: false,
                value_type: ArgType::Choice(&["json"]),
            }],
            examples: vec![
                "mortar library list".to_string(),
                "mortar library list json".to_string(),
            ],
        }
    }
}
