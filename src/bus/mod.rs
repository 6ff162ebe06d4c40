//! In-process notifications between portal components.
//!
//! Components publish what changed; interested parties subscribe through the
//! bus handed to them in the application state.

use tokio::sync::broadcast;

/// Capacity of the notification channel. Slow subscribers skip older events.
const CHANNEL_CAPACITY: usize = 64;

/// Something that happened to an event's registrations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PortalEvent {
    RegistrationSubmitted { event_id: String, slug: String },
    FormSaved { event_id: String, field_count: usize },
    DraftDiscarded { event_id: String },
}

/// Broadcast bus for [`PortalEvent`]s.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<PortalEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { sender }
    }

    /// Publish an event. Having no subscribers is fine.
    pub fn publish(&self, event: PortalEvent) {
        let delivered = self.sender.send(event).unwrap_or(0);
        tracing::debug!("Portal event delivered to {} subscriber(s)", delivered);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<PortalEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Log every portal event until the bus is dropped.
pub async fn log_events(mut receiver: broadcast::Receiver<PortalEvent>) {
    loop {
        match receiver.recv().await {
            Ok(event) => tracing::info!("Portal event: {:?}", event),
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                tracing::warn!("Event logger lagged, skipped {} events", skipped);
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_subscribers_receive_published_events() {
        let bus = EventBus::new();
        let mut rx = bus.subscribe();

        bus.publish(PortalEvent::FormSaved {
            event_id: "e1".to_string(),
            field_count: 3,
        });

        assert_eq!(
            rx.recv().await.unwrap(),
            PortalEvent::FormSaved {
                event_id: "e1".to_string(),
                field_count: 3
            }
        );
    }

    #[test]
    fn test_publish_without_subscribers() {
        let bus = EventBus::new();
        bus.publish(PortalEvent::DraftDiscarded {
            event_id: "e1".to_string(),
        });
    }
}
