use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur during CLI command execution.
///
/// Each variant maps to a distinct user-facing outcome so a duplicate
/// library, a bad name and a missing section never collapse into one
/// generic failure message.
#[derive(Error, Debug)]
pub enum CliError {
    /// A command or category was not found in the registry.
    #[error("Command not found: {0}")]
    CommandNotFound(String),

    /// Invalid arguments were provided to a command.
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// An operation against the configuration model failed. The inner
    /// text carries the operation's own distinct message.
    #[error("{0}")]
    Operation(String),

    /// A general service error occurred.
    #[error("Service error: {0}")]
    ServiceError(String),

    /// An I/O operation failed.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<crate::ops::OpError> for CliError {
    fn from(error: crate::ops::OpError) -> Self {
        CliError::Operation(error.to_string())
    }
}

impl From<crate::store::ConfigError> for CliError {
    fn from(error: crate::store::ConfigError) -> Self {
        CliError::Operation(error.to_string())
    }
}

/// Type alias for command execution results: a success message or a
/// [`CliError`].
pub type CommandResult = Result<String, CliError>;

/// Specification for a single command argument, used for validation
/// and help generation.
#[derive(Debug, Clone)]
pub struct CommandArg {
    /// The name of the argument (e.g., "path", "name").
    pub name: String,

    /// Human-readable description of what this argument does.
    pub description: String,

    /// Whether this argument is required for command execution.
    pub required: bool,

    /// The expected shape of this argument for help display.
    pub value_type: ArgType,
}

/// Shape classification for command arguments, shown in help text.
#[derive(Debug, Clone)]
pub enum ArgType {
    /// A general string value.
    String,

    /// A dotted configuration path.
    Path,

    /// One of a fixed set of words.
    Choice(&'static [&'static str]),
}

/// Complete metadata for a CLI command: identity, arguments, examples
/// and category. The registry uses this for help generation, argument
/// validation and command discovery.
#[derive(Debug, Clone)]
pub struct CommandMetadata {
    /// The command name (e.g., "get", "set", "add").
    pub name: String,

    /// Brief description of what this command does.
    pub description: String,

    /// Specification of all arguments this command accepts.
    pub args: Vec<CommandArg>,

    /// Example usage strings to show in help text.
    pub examples: Vec<String>,

    /// Category this command belongs to (e.g., "config", "library").
    pub category: String,
}

/// Trait defining the interface for all CLI commands.
///
/// Commands receive their dependencies through their constructors and
/// are responsible for their own argument parsing beyond the count
/// validation the registry performs from metadata.
#[async_trait]
pub trait Command: Send + Sync {
    /// Executes the command with the provided arguments.
    ///
    /// # Errors
    /// Returns `CliError` for invalid argument values, configuration
    /// operation failures, or I/O failures.
    async fn execute(&self, args: &[String]) -> CommandResult;

    /// Returns the complete metadata for this command.
    fn metadata(&self) -> CommandMetadata;
}
