use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::{ConfigError, ConfigStore, FileWatcher};

/// How long to wait after the last file event before reloading. Editors
/// and the store's own write-through produce bursts of events; one
/// reload per burst is enough.
const DEBOUNCE: Duration = Duration::from_millis(500);

impl ConfigStore {
    /// Starts watching the backing file for external edits.
    ///
    /// When a change is detected the store silently reloads and
    /// broadcasts a change event; rapid bursts are coalesced into a
    /// single reload. The watch runs until the returned task handle is
    /// aborted or the process exits.
    ///
    /// # Errors
    /// Returns `ConfigError::FileWatcherInit` or `ConfigError::FileWatch`
    /// if the watcher cannot be set up.
    pub fn start_file_watching(&self) -> Result<JoinHandle<()>, ConfigError> {
        let (mut watcher, mut event_rx) = FileWatcher::new()?;
        watcher.watch_parent_of(self.backing_path())?;

        let store = self.clone();
        let backing = self.backing_path().to_path_buf();

        let handle = tokio::spawn(async move {
            // Owns the watcher so the watch stays alive with the task.
            let _watcher = watcher;
            let mut pending = false;

            let debounce_sleep = tokio::time::sleep(DEBOUNCE);
            tokio::pin!(debounce_sleep);

            loop {
                tokio::select! {
                    event = event_rx.recv() => {
                        let Some(event) = event else {
                            break;
                        };

                        if event.path.file_name() != backing.file_name() {
                            continue;
                        }

                        debug!(?event.kind, path = %event.path.display(), "Backing file event");
                        pending = true;
                        debounce_sleep.as_mut().reset(tokio::time::Instant::now() + DEBOUNCE);
                    }

                    () = &mut debounce_sleep, if pending => {
                        if let Err(e) = store.reload() {
                            warn!("Failed to reload config after file change: {e}");
                        }

                        pending = false;
                    }
                }
            }
        });

        Ok(handle)
    }
}
