//! The external scaffolding collaborator gating library creation.
//!
//! The build framework owns the actual source generation; this crate
//! only needs its outcome. The seam is a trait so the CLI can shell out
//! to the framework's generator script while tests substitute a no-op.

use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::ops::LibraryKind;

/// Failure to run the external scaffolding action at all.
///
/// An action that ran but reported failure is not an error here; that
/// is carried in [`ScaffoldOutput`] so its diagnostics reach the caller
/// verbatim.
#[derive(Debug, Error)]
pub enum ScaffoldError {
    /// The scaffolding program could not be launched.
    #[error("failed to launch '{program}': {details}")]
    Launch {
        /// The program that failed to start.
        program: PathBuf,
        /// Launch error details.
        details: String,
    },
}

/// What the external action reported back.
#[derive(Debug, Clone)]
pub struct ScaffoldOutput {
    /// Whether the action completed successfully.
    pub success: bool,
    /// Captured standard output.
    pub stdout: String,
    /// Captured standard error.
    pub stderr: String,
}

impl ScaffoldOutput {
    /// An output representing unconditional success with no diagnostics.
    pub fn succeeded() -> Self {
        Self {
            success: true,
            stdout: String::new(),
            stderr: String::new(),
        }
    }

    /// The action's diagnostic text, preferring stderr.
    pub fn diagnostics(&self) -> String {
        if self.stderr.trim().is_empty() {
            self.stdout.trim().to_string()
        } else {
            self.stderr.trim().to_string()
        }
    }
}

/// An opaque external action that prepares a library on disk before the
/// configuration tree records it.
#[async_trait]
pub trait Scaffolder: Send + Sync {
    /// Runs the action for a library named `name` of the given kind.
    ///
    /// # Errors
    /// Returns [`ScaffoldError`] only when the action cannot be invoked;
    /// an action that ran and failed reports that through the output.
    async fn scaffold(&self, name: &str, kind: LibraryKind) -> Result<ScaffoldOutput, ScaffoldError>;
}

/// Scaffolder that invokes the framework's generator script as
/// `<program> <name> <kind>` and captures its output.
pub struct CommandScaffolder {
    program: PathBuf,
}

impl CommandScaffolder {
    /// Creates a scaffolder around the given generator program.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

#[async_trait]
impl Scaffolder for CommandScaffolder {
    #[instrument(skip(self), fields(program = %self.program.display()))]
    async fn scaffold(&self, name: &str, kind: LibraryKind) -> Result<ScaffoldOutput, ScaffoldError> {
        debug!("Running library scaffolding");

        let output = tokio::process::Command::new(&self.program)
            .arg(name)
            .arg(kind.to_string())
            .output()
            .await
            .map_err(|e| ScaffoldError::Launch {
                program: self.program.clone(),
                details: e.to_string(),
            })?;

        Ok(ScaffoldOutput {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// Scaffolder that does nothing and succeeds, for setups where the
/// framework's sources are managed by hand.
pub struct NoopScaffolder;

#[async_trait]
impl Scaffolder for NoopScaffolder {
    async fn scaffold(&self, _name: &str, _kind: LibraryKind) -> Result<ScaffoldOutput, ScaffoldError> {
        Ok(ScaffoldOutput::succeeded())
    }
}
