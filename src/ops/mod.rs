//! Higher-level operations over the config store: value updates,
//! dependency-list edits, library creation and buildable-unit
//! classification. Every mutating operation composes resolve, mutate,
//! persist and notify through [`ConfigStore::commit`](crate::store::ConfigStore::commit),
//! so callers only ever observe all-or-nothing state transitions.

mod classify;
mod dependency;
mod library;
mod update;

#[cfg(test)]
mod tests;

pub use classify::{ChildEntry, NodeKind, children_of, is_buildable_unit};
pub use dependency::{
    DependencyOutcome, add_dependency, join_dependency_list, parse_dependency_list,
};
pub use library::{BuildableUnit, LibraryKind, add_library, list_buildable_units, sanitize_name};
pub use update::update_value;

use thiserror::Error;

use crate::{store::ConfigError, tree::TreeError};

/// Errors returned by configuration operations.
///
/// Distinct variants become distinct user-facing outcomes; none of them
/// leaves the tree or the backing file partially written.
#[derive(Debug, Error)]
pub enum OpError {
    /// The addressed section does not exist.
    #[error("section not found: '{0}'")]
    SectionNotFound(String),

    /// Values cannot live at the tree root; the backing format has no
    /// place for a key that precedes every header.
    #[error("cannot set values at the tree root; give a section path")]
    RootSection,

    /// A supplied identifier failed the allow-list pattern.
    #[error("invalid name '{0}': only letters, digits, '_' and '-' are allowed")]
    InvalidName(String),

    /// A supplied value cannot be stored on a single line.
    #[error("invalid value: values must be single-line strings")]
    InvalidValue(String),

    /// The library already exists; the tree was not modified.
    #[error("library '{0}' already exists")]
    DuplicateLibrary(String),

    /// The external scaffolding action failed before any mutation; its
    /// diagnostic output is carried verbatim.
    #[error("scaffolding '{name}' failed: {details}")]
    ScaffoldFailed {
        /// The library that was being scaffolded.
        name: String,
        /// Diagnostics from the external action, verbatim.
        details: String,
    },

    /// A store-level failure (I/O, persistence, locking, notification).
    #[error(transparent)]
    Store(#[from] ConfigError),

    /// A tree-level failure other than the mapped path outcomes.
    #[error(transparent)]
    Tree(#[from] TreeError),
}
