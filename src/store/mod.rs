//! Write-through configuration store with change notification.
//!
//! Owns the parsed tree for one backing file, rewrites the whole file
//! after every mutation, and notifies subscribers with a payload-free
//! event so they re-query the store. A notify-based watcher reloads the
//! tree when the file changes underneath us.

mod broadcast;
mod events;
mod file_watcher;
mod file_watching;
mod store;

#[cfg(test)]
mod tests;

pub use broadcast::{BroadcastService, Subscription};
pub use events::{ConfigError, TreeChanged};
pub use file_watcher::{FileEvent, FileEventKind, FileWatcher};
pub use store::ConfigStore;
