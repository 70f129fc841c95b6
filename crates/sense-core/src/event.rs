use glam::DVec3;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;
use tracing::debug;

use crate::types::{Block, Entity, EntityId};

/// Notifications delivered by the host's world session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WorldEvent {
    // ── Simulation clock ───────────────────────────────────────
    Tick {
        tick: u64,
    },

    // ── Entity status ──────────────────────────────────────────
    /// Raw entity status code (37 = set on fire).
    EntityStatus {
        entity_id: EntityId,
        status: i8,
    },
    /// Metadata index 0 flags byte (bit 0x01 = on fire).
    EntityFlags {
        entity_id: EntityId,
        flags: u8,
    },
    EntitySpawn {
        entity: Entity,
    },

    // ── World changes ──────────────────────────────────────────
    BlockUpdate {
        old: Option<Block>,
        new: Block,
    },

    // ── Agent lifecycle ────────────────────────────────────────
    Move {
        position: DVec3,
    },
    Mount {
        entity_id: EntityId,
    },
    Dismount,
    Death,
    Spawn,
    Disconnected,
}

/// A broadcast-based event bus fed by the host.
#[derive(Clone)]
pub struct EventBus {
    sender: Arc<broadcast::Sender<WorldEvent>>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender: Arc::new(sender),
        }
    }

    pub fn publish(&self, event: WorldEvent) {
        // Ignore send errors (no subscribers).
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> Subscription {
        Subscription {
            receiver: self.sender.subscribe(),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(1024)
    }
}

/// A live subscription to the bus. Dropping it (or calling [`unsubscribe`](Self::unsubscribe))
/// stops delivery.
pub struct Subscription {
    receiver: broadcast::Receiver<WorldEvent>,
}

impl Subscription {
    /// Next event, or `None` once the bus is closed or the agent disconnected.
    pub async fn recv(&mut self) -> Option<WorldEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(WorldEvent::Disconnected) => return None,
                Ok(event) => return Some(event),
                Err(RecvError::Lagged(skipped)) => {
                    debug!(skipped, "subscription lagged, skipping events");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }

    /// Resolve with the first event `filter` maps to `Some`, or `None` when
    /// `timeout` elapses or the bus closes first.
    pub async fn next_matching<T, F>(&mut self, timeout: Duration, mut filter: F) -> Option<T>
    where
        F: FnMut(&WorldEvent) -> Option<T>,
    {
        let wait = async {
            while let Some(event) = self.recv().await {
                if let Some(found) = filter(&event) {
                    return Some(found);
                }
            }
            None
        };
        tokio::time::timeout(timeout, wait).await.ok().flatten()
    }

    pub fn unsubscribe(self) {}
}
