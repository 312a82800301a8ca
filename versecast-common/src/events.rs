//! Event types for the VerseCast broadcast channel
//!
//! Provides the wire message shown by display pages and the EventBus that
//! fans events out to every connected peer.

use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::sync::broadcast;
use uuid::Uuid;

/// The one message a display page understands
///
/// Serialized in camelCase (`{"currentVerse": .., "nextVerse": ..}`) because
/// display pages consume it verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BroadcastMessage {
    /// Text of the selected verse line
    pub current_verse: String,
    /// Text of the following line, empty when the selection is the last line
    pub next_verse: String,
}

impl BroadcastMessage {
    pub fn new(current_verse: impl Into<String>, next_verse: impl Into<String>) -> Self {
        Self {
            current_verse: current_verse.into(),
            next_verse: next_verse.into(),
        }
    }

    /// Empty message, clears the display
    pub fn blank() -> Self {
        Self::default()
    }
}

/// VerseCast event types
///
/// Events are broadcast via EventBus and serialized for SSE transmission.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum VerseCastEvent {
    /// A verse line was selected (or the display was blanked)
    ///
    /// Triggers:
    /// - SSE `verse` event: display pages show the message
    VerseSelected {
        /// Unique id, used as the SSE event id
        event_id: Uuid,
        /// Message pushed to display pages
        message: BroadcastMessage,
        /// When the verse was selected
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Playlist contents changed (add, remove, reorder, import, clear)
    ///
    /// Triggers:
    /// - SSE `playlist` event: other controller pages refresh their list
    PlaylistChanged {
        /// Unique id, used as the SSE event id
        event_id: Uuid,
        /// Number of entries after the change
        count: usize,
        /// When the playlist changed
        timestamp: chrono::DateTime<chrono::Utc>,
    },
}

impl VerseCastEvent {
    /// Create a VerseSelected event
    pub fn verse_selected(message: BroadcastMessage) -> Self {
        Self::VerseSelected {
            event_id: Uuid::new_v4(),
            message,
            timestamp: chrono::Utc::now(),
        }
    }

    /// Create a PlaylistChanged event
    pub fn playlist_changed(count: usize) -> Self {
        Self::PlaylistChanged {
            event_id: Uuid::new_v4(),
            count,
            timestamp: chrono::Utc::now(),
        }
    }

    /// SSE `event:` field
    pub fn event_name(&self) -> &'static str {
        match self {
            Self::VerseSelected { .. } => "verse",
            Self::PlaylistChanged { .. } => "playlist",
        }
    }

    /// SSE `id:` field
    pub fn event_id(&self) -> Uuid {
        match self {
            Self::VerseSelected { event_id, .. } | Self::PlaylistChanged { event_id, .. } => {
                *event_id
            }
        }
    }

    /// SSE `data:` payload
    ///
    /// `verse` events carry the bare BroadcastMessage so display pages never
    /// see the envelope.
    pub fn payload(&self) -> serde_json::Value {
        match self {
            Self::VerseSelected { message, .. } => json!(message),
            Self::PlaylistChanged { count, .. } => json!({ "count": count }),
        }
    }
}

/// Central event distribution bus
///
/// Uses tokio::broadcast internally:
/// - Non-blocking publish (slow subscribers don't block producers)
/// - Multiple concurrent subscribers
/// - Events sent while nobody listens are dropped
/// - Lagged subscribers skip the oldest events
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<VerseCastEvent>,
}

impl EventBus {
    /// Creates a new EventBus with specified channel capacity
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Subscribe to all future events
    ///
    /// Events emitted before subscription are not received.
    pub fn subscribe(&self) -> broadcast::Receiver<VerseCastEvent> {
        self.tx.subscribe()
    }

    /// Emit an event to all subscribers
    ///
    /// Returns `Ok(subscriber_count)` if at least one subscriber exists.
    /// Returns `Err` if no subscribers are listening.
    #[allow(clippy::result_large_err)]
    pub fn emit(
        &self,
        event: VerseCastEvent,
    ) -> Result<usize, broadcast::error::SendError<VerseCastEvent>> {
        self.tx.send(event)
    }

    /// Emit an event, ignoring if no subscribers are listening
    pub fn emit_lossy(&self, event: VerseCastEvent) {
        let _ = self.tx.send(event);
    }

    /// Get the current number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_broadcast_message_wire_format() {
        let msg = BroadcastMessage::new("Amazing grace", "How sweet the sound");
        let json = serde_json::to_value(&msg).unwrap();

        assert_eq!(
            json,
            json!({ "currentVerse": "Amazing grace", "nextVerse": "How sweet the sound" })
        );
    }

    #[test]
    fn test_verse_event_payload_is_bare_message() {
        let event = VerseCastEvent::verse_selected(BroadcastMessage::new("a", ""));

        assert_eq!(event.event_name(), "verse");
        assert_eq!(event.payload(), json!({ "currentVerse": "a", "nextVerse": "" }));
    }

    #[test]
    fn test_playlist_event_payload() {
        let event = VerseCastEvent::playlist_changed(3);

        assert_eq!(event.event_name(), "playlist");
        assert_eq!(event.payload(), json!({ "count": 3 }));
    }

    #[test]
    fn test_emit_without_subscribers_is_dropped() {
        let bus = EventBus::new(10);
        assert_eq!(bus.subscriber_count(), 0);
        assert!(bus.emit(VerseCastEvent::playlist_changed(0)).is_err());

        // Subscribing later does not replay the dropped event
        let mut rx = bus.subscribe();
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_emit_reaches_every_subscriber() {
        let bus = EventBus::new(10);
        let mut first = bus.subscribe();
        let mut second = bus.subscribe();

        let sent = bus
            .emit(VerseCastEvent::verse_selected(BroadcastMessage::new("x", "y")))
            .unwrap();
        assert_eq!(sent, 2);

        for rx in [&mut first, &mut second] {
            match rx.recv().await.unwrap() {
                VerseCastEvent::VerseSelected { message, .. } => {
                    assert_eq!(message, BroadcastMessage::new("x", "y"));
                }
                other => panic!("unexpected event: {:?}", other),
            }
        }
    }
}
