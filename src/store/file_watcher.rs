use std::path::{Path, PathBuf};

use notify::{Event, EventKind, RecommendedWatcher, Watcher, recommended_watcher};
use tokio::sync::mpsc;

use super::ConfigError;

/// A file system event for the watched backing file.
#[derive(Debug, Clone)]
pub struct FileEvent {
    /// The path of the file that changed.
    pub path: PathBuf,
    /// The type of change that occurred.
    pub kind: FileEventKind,
}

/// The type of file system change that occurred.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileEventKind {
    /// File was modified.
    Modified,
    /// File was created.
    Created,
    /// File was removed.
    Removed,
}

/// Watcher for the single backing configuration file.
///
/// Wraps the notify crate and converts its callback events into a
/// Tokio-compatible channel. Only create/modify/remove events are
/// forwarded; access and metadata churn is filtered out.
pub struct FileWatcher {
    watcher: RecommendedWatcher,
}

impl FileWatcher {
    /// Creates a watcher and the receiver its events arrive on.
    ///
    /// Uses an unbounded channel since file events are infrequent but
    /// bursty (editors often emit several per save).
    ///
    /// # Errors
    /// Returns `ConfigError::FileWatcherInit` if the underlying file
    /// system watcher cannot be created.
    pub fn new() -> Result<(Self, mpsc::UnboundedReceiver<FileEvent>), ConfigError> {
        let (event_tx, event_rx) = mpsc::unbounded_channel();

        let watcher = recommended_watcher(move |res: notify::Result<Event>| {
            let Ok(event) = res else {
                return;
            };

            let kind = match event.kind {
                EventKind::Create(_) => FileEventKind::Created,
                EventKind::Modify(_) => FileEventKind::Modified,
                EventKind::Remove(_) => FileEventKind::Removed,
                _ => return,
            };

            for path in event.paths {
                let _ = event_tx.send(FileEvent {
                    path,
                    kind: kind.clone(),
                });
            }
        })
        .map_err(|e| ConfigError::FileWatcherInit {
            details: e.to_string(),
        })?;

        Ok((Self { watcher }, event_rx))
    }

    /// Starts watching the backing file's parent directory.
    ///
    /// Watching the directory rather than the file itself keeps the
    /// watch alive across editors that replace the file by rename, and
    /// covers a backing file that does not exist yet.
    ///
    /// # Errors
    /// Returns `ConfigError::FileWatch` if the watch cannot be placed.
    pub fn watch_parent_of(&mut self, path: &Path) -> Result<(), ConfigError> {
        let dir = path.parent().filter(|p| !p.as_os_str().is_empty());
        let target = dir.unwrap_or_else(|| Path::new("."));

        self.watcher
            .watch(target, notify::RecursiveMode::NonRecursive)
            .map_err(|e| ConfigError::FileWatch {
                path: path.to_path_buf(),
                details: e.to_string(),
            })
    }
}
