use serde::Serialize;
use tokio::sync::broadcast;
use uuid::Uuid;

/// Lifecycle outcomes published for audit consumers. Fire-and-forget: a
/// missing subscriber never fails the operation.
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "type")]
pub enum Event {
    Created { id: Uuid },
    Updated { id: Uuid },
    VersionAdded { id: Uuid, version: u32 },
    Deleted { id: Uuid, comments_removed: usize },
    Shared { id: Uuid, grantee: Uuid },
    ShareRevoked { id: Uuid, grantee: Uuid },
    Commented { id: Uuid, comment: Uuid },
}

#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<Event>,
}

impl EventBus {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(100);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.tx.subscribe()
    }

    pub fn send(&self, event: Event) {
        let _ = self.tx.send(event);
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
