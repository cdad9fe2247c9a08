use std::{path::PathBuf, time::Instant};

use thiserror::Error;

use crate::tree::TreeError;

/// A payload-free "tree changed" event.
///
/// The store is always the authoritative state, so subscribers re-query
/// it instead of receiving a diff. Only the moment of the change is
/// carried along.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeChanged {
    /// When the change was observed.
    pub timestamp: Instant,
}

impl TreeChanged {
    /// Creates an event stamped with the current instant.
    pub fn now() -> Self {
        Self {
            timestamp: Instant::now(),
        }
    }
}

impl Default for TreeChanged {
    fn default() -> Self {
        Self::now()
    }
}

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A tree-level failure: parse error or unresolved path.
    #[error(transparent)]
    Tree(#[from] TreeError),

    /// Error occurred during file I/O operations.
    #[error("I/O error on '{path}': {details}")]
    Io {
        /// Path where the I/O error occurred.
        path: PathBuf,
        /// I/O error details.
        details: String,
    },

    /// Error occurred while persisting the tree to disk.
    #[error("failed to persist config to '{path}': {details}")]
    Persistence {
        /// Path where persistence failed.
        path: PathBuf,
        /// Error details from the persistence operation.
        details: String,
    },

    /// Error occurred while acquiring the tree lock.
    #[error("failed to acquire {lock_type} lock: {details}")]
    Lock {
        /// Type of lock that failed (read, write).
        lock_type: &'static str,
        /// Lock error details.
        details: String,
    },

    /// Failed to initialize the file watcher.
    #[error("failed to initialize file watcher: {details}")]
    FileWatcherInit {
        /// File watcher initialization error details.
        details: String,
    },

    /// Error occurred while watching the backing file.
    #[error("file watcher error for '{path}': {details}")]
    FileWatch {
        /// Path being watched when the error occurred.
        path: PathBuf,
        /// File watcher error details.
        details: String,
    },

    /// The broadcast service is no longer running.
    #[error("{service} service unavailable: {details}")]
    ServiceUnavailable {
        /// Name of the unavailable service.
        service: &'static str,
        /// Details about why it is unavailable.
        details: String,
    },
}
