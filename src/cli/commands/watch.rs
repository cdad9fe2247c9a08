//! The `config watch` command: follow external edits to the backing
//! file.

use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    cli::{
        Command, CommandResult,
        types::{CommandArg, CommandMetadata},
    },
    store::ConfigStore,
};

/// Watches the backing file and prints a line per change event until
/// interrupted.
pub struct WatchCommand {
    store: Arc<ConfigStore>,
}

impl WatchCommand {
    /// Creates the command over the shared store.
    pub fn new(store: Arc<ConfigStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Command for WatchCommand {
    async fn execute(&self, _args: &[String]) -> CommandResult {
        let _watch_task = self.store.start_file_watching()?;
        let mut subscription = self.store.subscribe().await?;

        println!(
            "Watching {} (Ctrl-C to stop)",
            self.store.backing_path().display()
        );

        // Events carry no payload; re-query the store each time.
        while let Some(event) = subscription.changed().await {
            let tree = self.store.snapshot();
            println!(
                "[{:?}] configuration changed ({} top-level sections)",
                event.timestamp,
                tree.root().len()
            );
        }

        Ok(String::new())
    }

    fn metadata(&self) -> CommandMetadata {
        CommandMetadata {
            name: "watch".to_string(),
            description: "Watch the backing file and report changes".to_string(),
            category: "config".to_string(),
            args: Vec::<CommandArg>::new(),
            examples: vec!["mortar config watch".to_string()],
        }
    }
}
