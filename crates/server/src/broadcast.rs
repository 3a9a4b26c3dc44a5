//! Broadcast fan-out.
//!
//! Every outbound insight goes to all connected listeners. Each listener is
//! an unbounded outbox channel drained by its connection's writer task; a
//! closed channel means the connection died, and the listener is pruned on
//! the next send without affecting the others.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::mpsc;
use uuid::Uuid;

use insight_core::{Broadcaster, OutboundMessage};

/// Handle for one registered listener.
pub struct ListenerHandle {
    pub id: Uuid,
    /// Direct sender for same-channel replies (control responses,
    /// transcript echoes).
    pub tx: mpsc::UnboundedSender<String>,
    /// Drained by the connection's writer task.
    pub rx: mpsc::UnboundedReceiver<String>,
}

/// The set of currently connected listeners.
#[derive(Default)]
pub struct ConnectionManager {
    listeners: Mutex<HashMap<Uuid, mpsc::UnboundedSender<String>>>,
}

impl ConnectionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new listener.
    pub fn register(&self) -> ListenerHandle {
        let (tx, rx) = mpsc::unbounded_channel();
        let id = Uuid::new_v4();
        self.listeners.lock().insert(id, tx.clone());
        tracing::info!(listener = %id, total = self.count(), "New listener registered");
        ListenerHandle { id, tx, rx }
    }

    /// Remove a listener explicitly (clean disconnect).
    pub fn unregister(&self, id: Uuid) {
        if self.listeners.lock().remove(&id).is_some() {
            tracing::info!(listener = %id, total = self.count(), "Listener unregistered");
        }
    }

    pub fn count(&self) -> usize {
        self.listeners.lock().len()
    }
}

#[async_trait]
impl Broadcaster for ConnectionManager {
    async fn send(&self, message: OutboundMessage) {
        let json = match serde_json::to_string(&message) {
            Ok(json) => json,
            Err(e) => {
                tracing::error!(error = %e, "Failed to serialize outbound message");
                return;
            }
        };

        let mut failed: Vec<Uuid> = Vec::new();
        {
            let listeners = self.listeners.lock();
            tracing::debug!(listeners = listeners.len(), "Broadcasting message");
            for (id, tx) in listeners.iter() {
                if tx.send(json.clone()).is_err() {
                    failed.push(*id);
                }
            }
        }

        if !failed.is_empty() {
            let mut listeners = self.listeners.lock();
            for id in failed {
                listeners.remove(&id);
                tracing::warn!(listener = %id, "Dropped listener after failed send");
            }
        }

        crate::metrics::record_listeners(self.count());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_broadcast_reaches_all_listeners() {
        let manager = ConnectionManager::new();
        let mut a = manager.register();
        let mut b = manager.register();

        manager
            .send(OutboundMessage::insight("Product Agent", "an idea"))
            .await;

        assert!(a.rx.recv().await.unwrap().contains("an idea"));
        assert!(b.rx.recv().await.unwrap().contains("an idea"));
    }

    #[tokio::test]
    async fn test_failed_listener_pruned_others_unaffected() {
        let manager = ConnectionManager::new();
        let dead = manager.register();
        let mut alive = manager.register();

        // Simulate a dead connection: its outbox receiver is gone.
        drop(dead.rx);

        manager
            .send(OutboundMessage::insight("Product Agent", "still here"))
            .await;

        assert!(alive.rx.recv().await.unwrap().contains("still here"));
        assert_eq!(manager.count(), 1);
    }

    #[tokio::test]
    async fn test_unregister() {
        let manager = ConnectionManager::new();
        let handle = manager.register();
        assert_eq!(manager.count(), 1);
        manager.unregister(handle.id);
        assert_eq!(manager.count(), 0);
    }
}
