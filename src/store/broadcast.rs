use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};
use tokio::{
    sync::mpsc::{self, Receiver, Sender},
    task::JoinHandle,
};

use super::{ConfigError, TreeChanged};

/// Commands sent to the broadcast actor task.
enum BroadcastCommand {
    /// Register an observer.
    Subscribe {
        id: usize,
        sender: Sender<TreeChanged>,
    },
    /// Remove an observer by ID.
    Unsubscribe { id: usize },
    /// Deliver a change event to every live observer.
    Broadcast(TreeChanged),
}

/// Internal observer entry held by the actor.
struct ActorSubscription {
    id: usize,
    sender: Sender<TreeChanged>,
}

/// An observer handle that unsubscribes itself when dropped.
///
/// A presentation layer that goes away simply drops its handle; no
/// explicit unregister call is needed.
pub struct Subscription {
    id: usize,
    service: BroadcastService,
    receiver: Receiver<TreeChanged>,
}

/// Handle to the change-notification service.
///
/// A dedicated actor task owns the observer list and processes commands
/// via message passing, so registration and delivery never contend on a
/// lock.
#[derive(Clone)]
pub struct BroadcastService {
    command_tx: Sender<BroadcastCommand>,
    next_id: Arc<AtomicUsize>,
    _handle: Arc<JoinHandle<()>>,
}

impl BroadcastService {
    /// Creates a new broadcast service with its own actor task.
    ///
    /// The actor runs until the last clone of the service is dropped.
    pub fn new() -> Self {
        let (command_tx, mut command_rx) = mpsc::channel(100);

        let handle = tokio::spawn(async move {
            broadcast_actor_loop(&mut command_rx).await;
        });

        Self {
            command_tx,
            next_id: Arc::new(AtomicUsize::new(1)),
            _handle: Arc::new(handle),
        }
    }

    /// Registers an observer and returns its RAII handle.
    ///
    /// # Errors
    /// Returns `ConfigError::ServiceUnavailable` if the actor task is
    /// no longer running.
    pub async fn subscribe(&self) -> Result<Subscription, ConfigError> {
        let (tx, rx) = mpsc::channel(100);
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);

        self.command_tx
            .send(BroadcastCommand::Subscribe { id, sender: tx })
            .await
            .map_err(|_| ConfigError::ServiceUnavailable {
                service: "broadcast",
                details: "broadcast actor is not running".to_string(),
            })?;

        Ok(Subscription {
            id,
            service: self.clone(),
            receiver: rx,
        })
    }

    /// Delivers a change event to every registered observer.
    ///
    /// Observers whose channels are closed are pruned as a side effect.
    ///
    /// # Errors
    /// Returns `ConfigError::ServiceUnavailable` if the actor task is
    /// no longer running.
    pub async fn broadcast(&self, event: TreeChanged) -> Result<(), ConfigError> {
        self.command_tx
            .send(BroadcastCommand::Broadcast(event))
            .await
            .map_err(|_| ConfigError::ServiceUnavailable {
                service: "broadcast",
                details: "broadcast actor is not running".to_string(),
            })
    }
}

impl Default for BroadcastService {
    fn default() -> Self {
        Self::new()
    }
}

impl Subscription {
    /// Waits for the next change event.
    ///
    /// Returns `None` once the broadcast service has shut down.
    pub async fn changed(&mut self) -> Option<TreeChanged> {
        self.receiver.recv().await
    }

    /// Non-blocking poll for a pending change event.
    pub fn try_changed(&mut self) -> Option<TreeChanged> {
        self.receiver.try_recv().ok()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        let _ = self
            .service
            .command_tx
            .try_send(BroadcastCommand::Unsubscribe { id: self.id });
    }
}

/// Actor loop owning the observer list.
async fn broadcast_actor_loop(command_rx: &mut Receiver<BroadcastCommand>) {
    let mut subscriptions: Vec<ActorSubscription> = Vec::new();

    while let Some(command) = command_rx.recv().await {
        match command {
            BroadcastCommand::Subscribe { id, sender } => {
                subscriptions.push(ActorSubscription { id, sender });
            }

            BroadcastCommand::Unsubscribe { id } => {
                subscriptions.retain(|sub| sub.id != id);
            }

            BroadcastCommand::Broadcast(event) => {
                subscriptions.retain(|sub| sub.sender.try_send(event.clone()).is_ok());
            }
        }
    }
}
