//! Multicast interaction events.
//!
//! An [`InteractionHub`] fans entity lifecycle events out to any number of
//! subscribers. Semantics are multicast, replay-none: a subscriber only
//! observes events published after it subscribed. Publishing with no
//! subscribers is a no-op.

use tokio::sync::broadcast;

/// What happened to the item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionAction {
    Created,
    Updated,
    Deleted,
}

/// A single interaction event carrying the affected item.
#[derive(Debug, Clone)]
pub struct Interaction<T> {
    pub action: InteractionAction,
    pub item: T,
}

/// Broadcast hub for interaction events of one entity type.
#[derive(Debug, Clone)]
pub struct InteractionHub<T> {
    tx: broadcast::Sender<Interaction<T>>,
}

impl<T: Clone> InteractionHub<T> {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(64);
        Self { tx }
    }

    /// Registers a new observer. Past events are not replayed.
    pub fn subscribe(&self) -> broadcast::Receiver<Interaction<T>> {
        self.tx.subscribe()
    }

    /// Publishes an event to all current subscribers.
    pub fn publish(&self, action: InteractionAction, item: T) {
        // A send error only means nobody is listening right now.
        let _ = self.tx.send(Interaction { action, item });
    }
}

impl<T: Clone> Default for InteractionHub<T> {
    fn default() -> Self {
        Self::new()
    }
}
