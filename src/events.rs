//! Change notifications backed by a `tokio::sync::broadcast` channel.
//!
//! The task and category stores publish one [`ChangeEvent`] per applied
//! mutation, in the order the mutations completed. Views subscribe instead of
//! polling; nothing is published for failed operations.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::broadcast;

/// What happened to which record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    TaskCreated,
    TaskUpdated,
    TaskArchived,
    TaskUnarchived,
    TaskDeleted,
    CategoryCreated,
    CategoryUpdated,
    CategoryDeleted,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChangeEvent {
    pub kind: ChangeKind,
    pub id: u64,
    pub timestamp: DateTime<Utc>,
}

impl ChangeEvent {
    pub fn new(kind: ChangeKind, id: u64) -> Self {
        ChangeEvent {
            kind,
            id,
            timestamp: Utc::now(),
        }
    }
}

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 256;

/// In-process fan-out of change events.
///
/// When the buffer is full the oldest unread events are dropped and slow
/// receivers observe `RecvError::Lagged`.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<ChangeEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish to all current subscribers; dropped silently when there are none.
    pub fn publish(&self, kind: ChangeKind, id: u64) {
        let _ = self.sender.send(ChangeEvent::new(kind, id));
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscribers_see_events_in_publish_order() {
        let bus = EventBus::default();
        let mut rx = bus.subscribe();

        bus.publish(ChangeKind::TaskCreated, 1);
        bus.publish(ChangeKind::TaskDeleted, 1);

        assert_eq!(rx.recv().await.unwrap().kind, ChangeKind::TaskCreated);
        assert_eq!(rx.recv().await.unwrap().kind, ChangeKind::TaskDeleted);
    }

    #[test]
    fn publish_with_no_subscribers_does_not_panic() {
        EventBus::default().publish(ChangeKind::CategoryCreated, 3);
    }
}
