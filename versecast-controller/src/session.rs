//! Controller session
//!
//! Serializes commands against the shared `Controller` and carries out the
//! effects they request: persisting the playlist and relaying verses.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::controller::{Command, Controller, Effect, Reply};
use crate::error::Result;
use crate::playlist::PlaylistEntry;
use crate::presenter::Presenter;
use crate::storage::PlaylistStore;
use crate::relay::VerseRelay;

pub struct Session {
    controller: Mutex<Controller>,
    store: Arc<dyn PlaylistStore>,
    relay: Arc<dyn VerseRelay>,
}

impl Session {
    pub fn new(
        controller: Controller,
        store: Arc<dyn PlaylistStore>,
        relay: Arc<dyn VerseRelay>,
    ) -> Self {
        Self {
            controller: Mutex::new(controller),
            store,
            relay,
        }
    }

    /// Load the persisted playlist
    ///
    /// Returns the number of restored entries. A missing value restores
    /// nothing; a malformed one is an error and the playlist stays empty.
    pub async fn restore(&self) -> Result<usize> {
        let Some(stored) = self.store.load().await? else {
            debug!("No stored playlist");
            return Ok(0);
        };

        let mut controller = self.controller.lock().await;
        let count = controller.restore(&stored)?;
        info!("Restored playlist with {} entries", count);
        Ok(count)
    }

    /// Run one command and apply its effects
    ///
    /// The controller lock is held until the effects are applied so stored
    /// and broadcast state follow command order.
    pub async fn dispatch(&self, command: Command) -> Result<Reply> {
        let mut controller = self.controller.lock().await;
        let outcome = controller.handle(command)?;

        for effect in outcome.effects {
            match effect {
                Effect::Persist => {
                    let blob = controller.playlist().to_json()?;
                    if let Err(e) = self.store.save(&blob).await {
                        warn!("Failed to persist playlist: {}", e);
                        return Err(e);
                    }
                    self.relay.playlist_changed(controller.playlist().len());
                }
                Effect::Publish(message) => self.relay.publish_verse(message),
            }
        }

        Ok(outcome.reply)
    }

    pub async fn playlist(&self) -> Vec<PlaylistEntry> {
        self.controller.lock().await.playlist().entries().to_vec()
    }

    /// Playlist as indented JSON, ready to save as a file
    pub async fn export(&self) -> Result<String> {
        self.controller.lock().await.playlist().to_pretty_json()
    }

    pub async fn presenter(&self) -> Presenter {
        self.controller.lock().await.presenter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Song;
    use crate::formatter::ChorusPlacement;
    use crate::relay::RecordingRelay;
    use crate::storage::MemoryPlaylistStore;
    use versecast_common::BroadcastMessage;

    fn catalog() -> Vec<Song> {
        vec![Song {
            title: "Amazing".to_string(),
            verses: vec![vec!["one".to_string(), "two".to_string()]],
            chorus: Some(vec!["refrain".to_string()]),
        }]
    }

    fn session(store: Arc<MemoryPlaylistStore>, relay: Arc<RecordingRelay>) -> Session {
        Session::new(
            Controller::new(catalog(), ChorusPlacement::AfterEachStanza),
            store,
            relay,
        )
    }

    #[tokio::test]
    async fn test_add_persists_and_notifies() {
        let store = Arc::new(MemoryPlaylistStore::new());
        let relay = Arc::new(RecordingRelay::new());
        let session = session(store.clone(), relay.clone());

        session
            .dispatch(Command::AddSong { song_index: 0 })
            .await
            .unwrap();

        let stored = store.load().await.unwrap().unwrap();
        assert!(stored.contains("\"Amazing\""));
        assert_eq!(relay.playlist_counts(), vec![1]);
        assert!(relay.verses().is_empty());
    }

    #[tokio::test]
    async fn test_restore_from_store() {
        let store = Arc::new(MemoryPlaylistStore::with_value(
            r#"[{"id":4,"title":"Kept","verses":[{"text":"x","kind":"verse"}]}]"#,
        ));
        let relay = Arc::new(RecordingRelay::new());
        let session = session(store, relay);

        assert_eq!(session.restore().await.unwrap(), 1);
        let playlist = session.playlist().await;
        assert_eq!(playlist[0].id, 4);

        session
            .dispatch(Command::AddSong { song_index: 0 })
            .await
            .unwrap();
        assert_eq!(session.playlist().await[1].id, 5);
    }

    #[tokio::test]
    async fn test_restore_malformed_leaves_empty_playlist() {
        let store = Arc::new(MemoryPlaylistStore::with_value("not json"));
        let session = session(store, Arc::new(RecordingRelay::new()));

        assert!(session.restore().await.is_err());
        assert!(session.playlist().await.is_empty());
    }

    #[tokio::test]
    async fn test_presenter_commands_relay_verses() {
        let store = Arc::new(MemoryPlaylistStore::new());
        let relay = Arc::new(RecordingRelay::new());
        let session = session(store, relay.clone());

        session
            .dispatch(Command::AddSong { song_index: 0 })
            .await
            .unwrap();
        let id = session.playlist().await[0].id;
        session.dispatch(Command::Open { id }).await.unwrap();
        session
            .dispatch(Command::Select { index: 1 })
            .await
            .unwrap();
        session.dispatch(Command::Next).await.unwrap();
        session.dispatch(Command::Blank).await.unwrap();

        assert_eq!(
            relay.verses(),
            vec![
                BroadcastMessage::new("two", "refrain"),
                BroadcastMessage::new("refrain", ""),
                BroadcastMessage::blank(),
            ]
        );
        assert_eq!(session.presenter().await.selected(), None);
    }

    #[tokio::test]
    async fn test_failed_command_has_no_effects() {
        let store = Arc::new(MemoryPlaylistStore::new());
        let relay = Arc::new(RecordingRelay::new());
        let session = session(store.clone(), relay.clone());

        assert!(session.dispatch(Command::Next).await.is_err());
        assert!(session
            .dispatch(Command::AddSong { song_index: 3 })
            .await
            .is_err());

        assert_eq!(store.load().await.unwrap(), None);
        assert!(relay.verses().is_empty());
        assert!(relay.playlist_counts().is_empty());
    }
}
