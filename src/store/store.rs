use std::{
    fs, io,
    path::{Path, PathBuf},
    sync::{
        Arc, RwLock,
        atomic::{AtomicBool, Ordering},
    },
};

use tracing::{debug, info, instrument, warn};

use crate::tree::{ConfigTree, SectionNode, SectionPath, parse_document, render_document, resolve};

use super::{BroadcastService, ConfigError, Subscription, TreeChanged};

/// Write-through store for one backing configuration file.
///
/// The in-memory tree and the backing text are kept convergent: every
/// mutation serializes the whole tree, overwrites the whole file, then
/// re-parses it, so re-reading disk always reproduces the held tree.
/// Cloning the store is cheap; clones share the same tree and notifier.
#[derive(Clone)]
pub struct ConfigStore {
    path: PathBuf,
    tree: Arc<RwLock<ConfigTree>>,
    missing_at_load: Arc<AtomicBool>,
    broadcast: BroadcastService,
}

impl ConfigStore {
    /// Loads a store from the backing file at `path`.
    ///
    /// A missing file is non-fatal: the store starts with an empty tree,
    /// logs a warning, and records the condition for
    /// [`backing_was_missing`](Self::backing_was_missing).
    ///
    /// # Errors
    /// Returns `ConfigError::Io` if the file exists but cannot be read,
    /// or `ConfigError::Tree` if it cannot be parsed.
    #[instrument(skip_all)]
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        info!(path = %path.display(), "Loading configuration");

        let (tree, missing) = read_backing(&path)?;

        Ok(Self {
            path,
            tree: Arc::new(RwLock::new(tree)),
            missing_at_load: Arc::new(AtomicBool::new(missing)),
            broadcast: BroadcastService::new(),
        })
    }

    /// The path of the backing file.
    pub fn backing_path(&self) -> &Path {
        &self.path
    }

    /// Whether the backing file was absent at the most recent load.
    pub fn backing_was_missing(&self) -> bool {
        self.missing_at_load.load(Ordering::Relaxed)
    }

    /// Returns a clone of the current tree, tolerating a poisoned lock.
    pub fn snapshot(&self) -> ConfigTree {
        match self.tree.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Resolves `path` and returns a clone of the node found there.
    ///
    /// # Errors
    /// Returns `ConfigError::Tree` if the path does not resolve.
    pub fn get_node(&self, path: &SectionPath) -> Result<SectionNode, ConfigError> {
        let tree = self.snapshot();
        let node = resolve(&tree, path)?;

        Ok(match node {
            crate::tree::NodeRef::Branch(children) => SectionNode::Branch(children.clone()),
            crate::tree::NodeRef::Leaf(value) => SectionNode::Leaf(value.to_string()),
        })
    }

    /// Renders the current tree to backing text.
    pub fn render(&self) -> String {
        render_document(&self.snapshot())
    }

    /// Re-reads the backing file, wholesale-replaces the held tree and
    /// notifies subscribers. No diff is computed.
    ///
    /// # Errors
    /// Returns `ConfigError::Io` or `ConfigError::Tree` if the file
    /// cannot be read or parsed; the held tree is left untouched then.
    #[instrument(skip(self))]
    pub fn reload(&self) -> Result<(), ConfigError> {
        debug!(path = %self.path.display(), "Reloading configuration");
        let (tree, missing) = read_backing(&self.path)?;

        {
            let mut guard = self.tree.write().map_err(|e| ConfigError::Lock {
                lock_type: "write",
                details: e.to_string(),
            })?;
            *guard = tree;
        }
        self.missing_at_load.store(missing, Ordering::Relaxed);

        self.notify_changed();
        Ok(())
    }

    /// Applies `mutate` to the tree, persists, refreshes and notifies.
    ///
    /// The closure runs against the tree as it is at commit time, under
    /// the write lock, so multi-step flows that suspended in between see
    /// the current structure rather than a stale snapshot. The mutation
    /// is all-or-nothing: it runs on a working copy, and neither the held
    /// tree nor the file changes unless the closure and the write both
    /// succeed. After the write the file is re-parsed (write-through),
    /// and a single change event is broadcast.
    ///
    /// # Errors
    /// Propagates the closure's error, or `ConfigError::Persistence` if
    /// the file cannot be written.
    pub fn commit<F, E>(&self, mutate: F) -> Result<(), E>
    where
        F: FnOnce(&mut ConfigTree) -> Result<(), E>,
        E: From<ConfigError>,
    {
        {
            let mut guard = self.tree.write().map_err(|e| ConfigError::Lock {
                lock_type: "write",
                details: e.to_string(),
            })?;

            let mut working = guard.clone();
            mutate(&mut working)?;

            let text = render_document(&working);
            write_atomic(&self.path, &text)?;

            *guard = working;
        }
        self.missing_at_load.store(false, Ordering::Relaxed);

        // Convergence check: what we just wrote must parse back to what
        // we hold. A failure here is a defect, not an expected state.
        if let Err(e) = self.reload() {
            warn!("Re-parse after write failed: {e}");
            return Err(e.into());
        }

        Ok(())
    }

    /// Registers an observer of change events.
    ///
    /// # Errors
    /// Returns `ConfigError::ServiceUnavailable` if the notifier has
    /// shut down.
    pub async fn subscribe(&self) -> Result<Subscription, ConfigError> {
        self.broadcast.subscribe().await
    }

    /// Fire-and-forget broadcast of a change event.
    ///
    /// Mutations happen in synchronous critical sections, so delivery is
    /// handed to a task rather than awaited in place.
    pub(super) fn notify_changed(&self) {
        let broadcast = self.broadcast.clone();
        tokio::spawn(async move {
            if let Err(e) = broadcast.broadcast(TreeChanged::now()).await {
                warn!("Failed to broadcast config change: {e}");
            }
        });
    }
}

/// Reads and parses the backing file, reporting a missing file as an
/// empty tree plus a flag rather than an error.
fn read_backing(path: &Path) -> Result<(ConfigTree, bool), ConfigError> {
    match fs::read_to_string(path) {
        Ok(text) => {
            let tree = parse_document(&text)?;
            Ok((tree, false))
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            warn!(path = %path.display(), "Backing file missing; starting with an empty tree");
            Ok((ConfigTree::new(), true))
        }
        Err(e) => Err(ConfigError::Io {
            path: path.to_path_buf(),
            details: e.to_string(),
        }),
    }
}

/// Replaces the entire file contents via a temp file and rename, so a
/// crash mid-write never leaves a truncated backing file behind.
fn write_atomic(path: &Path, text: &str) -> Result<(), ConfigError> {
    let temp_path = path.with_extension("tmp");

    fs::write(&temp_path, text).map_err(|e| ConfigError::Persistence {
        path: temp_path.clone(),
        details: e.to_string(),
    })?;

    fs::rename(&temp_path, path).map_err(|e| ConfigError::Persistence {
        path: path.to_path_buf(),
        details: e.to_string(),
    })
}
