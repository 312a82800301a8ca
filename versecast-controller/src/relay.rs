//! Broadcast relay
//!
//! One-way publishing of the selected verse to display pages. Delivery is
//! fire-and-forget: nothing is acknowledged and nothing is kept for peers
//! that connect later.

use std::sync::Mutex;

use tracing::debug;
use versecast_common::{BroadcastMessage, EventBus, VerseCastEvent};

use crate::playlist::PlaylistEntry;

/// Build the message for `entry.verses[index]`
///
/// `next_verse` is the following line's text, or empty at the last line.
/// Returns None when `index` is out of range.
pub fn build_message(entry: &PlaylistEntry, index: usize) -> Option<BroadcastMessage> {
    let current = entry.verses.get(index)?;
    let next = entry
        .verses
        .get(index + 1)
        .map(|line| line.text.clone())
        .unwrap_or_default();

    Some(BroadcastMessage::new(current.text.clone(), next))
}

/// Sink for verse and playlist notifications
pub trait VerseRelay: Send + Sync {
    /// Deliver a verse message to every listening peer
    fn publish_verse(&self, message: BroadcastMessage);

    /// Tell peers the playlist changed
    fn playlist_changed(&self, _count: usize) {}
}

impl VerseRelay for EventBus {
    fn publish_verse(&self, message: BroadcastMessage) {
        match self.emit(VerseCastEvent::verse_selected(message)) {
            Ok(count) => debug!("Verse broadcast to {} peers", count),
            Err(_) => debug!("Verse broadcast dropped: no display listening"),
        }
    }

    fn playlist_changed(&self, count: usize) {
        self.emit_lossy(VerseCastEvent::playlist_changed(count));
    }
}

/// Relay that records everything it is given
#[derive(Debug, Default)]
pub struct RecordingRelay {
    verses: Mutex<Vec<BroadcastMessage>>,
    playlist_counts: Mutex<Vec<usize>>,
}

impl RecordingRelay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Verse messages published so far, oldest first
    pub fn verses(&self) -> Vec<BroadcastMessage> {
        self.verses
            .lock()
            .map(|v| v.clone())
            .unwrap_or_default()
    }

    /// Playlist sizes reported so far, oldest first
    pub fn playlist_counts(&self) -> Vec<usize> {
        self.playlist_counts
            .lock()
            .map(|v| v.clone())
            .unwrap_or_default()
    }
}

impl VerseRelay for RecordingRelay {
    fn publish_verse(&self, message: BroadcastMessage) {
        if let Ok(mut verses) = self.verses.lock() {
            verses.push(message);
        }
    }

    fn playlist_changed(&self, count: usize) {
        if let Ok(mut counts) = self.playlist_counts.lock() {
            counts.push(count);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formatter::VerseLine;

    fn entry(lines: &[&str]) -> PlaylistEntry {
        PlaylistEntry {
            id: 0,
            title: "Test".to_string(),
            verses: lines.iter().map(|l| VerseLine::verse(*l)).collect(),
        }
    }

    #[test]
    fn test_message_has_next_line() {
        let entry = entry(&["first", "second"]);
        assert_eq!(
            build_message(&entry, 0),
            Some(BroadcastMessage::new("first", "second"))
        );
    }

    #[test]
    fn test_last_line_has_empty_next() {
        let entry = entry(&["first", "second"]);
        assert_eq!(
            build_message(&entry, 1),
            Some(BroadcastMessage::new("second", ""))
        );
    }

    #[test]
    fn test_out_of_range_index() {
        assert_eq!(build_message(&entry(&["only"]), 1), None);
        assert_eq!(build_message(&entry(&[]), 0), None);
    }

    #[tokio::test]
    async fn test_event_bus_relay_delivers_verse_event() {
        let bus = EventBus::new(10);
        let mut rx = bus.subscribe();

        bus.publish_verse(BroadcastMessage::new("a", "b"));

        match rx.recv().await.unwrap() {
            VerseCastEvent::VerseSelected { message, .. } => {
                assert_eq!(message, BroadcastMessage::new("a", "b"));
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn test_event_bus_relay_without_listeners_does_not_fail() {
        let bus = EventBus::new(10);
        bus.publish_verse(BroadcastMessage::new("a", "b"));
        bus.playlist_changed(1);
    }

    #[test]
    fn test_recording_relay_captures_in_order() {
        let relay = RecordingRelay::new();
        relay.publish_verse(BroadcastMessage::new("1", "2"));
        relay.publish_verse(BroadcastMessage::new("2", ""));
        relay.playlist_changed(4);

        assert_eq!(
            relay.verses(),
            vec![BroadcastMessage::new("1", "2"), BroadcastMessage::new("2", "")]
        );
        assert_eq!(relay.playlist_counts(), vec![4]);
    }
}
