//! Controller state and command dispatcher
//!
//! `Controller` owns the catalog, the playlist and the presenter. Every user
//! action is a `Command`; `handle` applies it and returns the reply plus the
//! side effects (persist, publish) for the session to carry out. Nothing in
//! here performs I/O.

use serde::Serialize;
use versecast_common::BroadcastMessage;

use crate::catalog::Song;
use crate::error::{Error, Result};
use crate::formatter::ChorusPlacement;
use crate::playlist::{import_playlist, EntryId, Playlist, PlaylistEntry};
use crate::presenter::Presenter;
use crate::search::{search_hits, SearchHit};

/// User actions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Search { query: String },
    AddSong { song_index: usize },
    Remove { id: EntryId },
    Reorder { old_index: usize, new_index: usize },
    Clear,
    Import { mime: String, contents: Vec<u8> },
    Open { id: EntryId },
    Select { index: usize },
    Next,
    Previous,
    Blank,
}

/// Side effects requested by a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Playlist changed; write it to storage
    Persist,
    /// Send a message to display pages
    Publish(BroadcastMessage),
}

/// Command result returned to the caller
///
/// Serializes as the bare payload, which is what the HTTP API returns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Reply {
    Hits(Vec<SearchHit>),
    Added(PlaylistEntry),
    Removed(Option<PlaylistEntry>),
    Playlist(Vec<PlaylistEntry>),
    Opened(PlaylistEntry),
    Presenter(Presenter),
}

/// Reply plus the effects still to be applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub reply: Reply,
    pub effects: Vec<Effect>,
}

impl Outcome {
    fn reply(reply: Reply) -> Self {
        Self {
            reply,
            effects: Vec::new(),
        }
    }

    fn with(reply: Reply, effect: Effect) -> Self {
        Self {
            reply,
            effects: vec![effect],
        }
    }
}

/// Explicit application state
#[derive(Debug, Clone, Default)]
pub struct Controller {
    catalog: Vec<Song>,
    playlist: Playlist,
    presenter: Presenter,
    chorus_placement: ChorusPlacement,
}

impl Controller {
    pub fn new(catalog: Vec<Song>, chorus_placement: ChorusPlacement) -> Self {
        Self {
            catalog,
            playlist: Playlist::new(),
            presenter: Presenter::new(),
            chorus_placement,
        }
    }

    pub fn catalog(&self) -> &[Song] {
        &self.catalog
    }

    pub fn playlist(&self) -> &Playlist {
        &self.playlist
    }

    pub fn presenter(&self) -> Presenter {
        self.presenter
    }

    /// Replace the playlist with a stored copy
    ///
    /// A malformed value is reported and leaves the current playlist alone.
    pub fn restore(&mut self, stored: &str) -> Result<usize> {
        let playlist = Playlist::from_json(stored)?;
        self.playlist.replace(playlist);
        self.presenter.close();
        Ok(self.playlist.len())
    }

    /// Apply one command
    ///
    /// On error the state is unchanged and no effects are requested.
    pub fn handle(&mut self, command: Command) -> Result<Outcome> {
        match command {
            Command::Search { query } => {
                Ok(Outcome::reply(Reply::Hits(search_hits(&self.catalog, &query))))
            }

            Command::AddSong { song_index } => {
                let song = self
                    .catalog
                    .get(song_index)
                    .ok_or(Error::SongNotFound(song_index))?;
                let entry = self.playlist.add(song, self.chorus_placement).clone();
                Ok(Outcome::with(Reply::Added(entry), Effect::Persist))
            }

            Command::Remove { id } => match self.playlist.remove(id) {
                Some(removed) => {
                    if self.presenter.entry_id() == Some(id) {
                        let still_present = self.playlist.get(id);
                        self.presenter.revalidate(still_present);
                    }
                    Ok(Outcome::with(Reply::Removed(Some(removed)), Effect::Persist))
                }
                None => Ok(Outcome::reply(Reply::Removed(None))),
            },

            Command::Reorder {
                old_index,
                new_index,
            } => {
                self.playlist.reorder(old_index, new_index)?;
                Ok(Outcome::with(self.playlist_reply(), Effect::Persist))
            }

            Command::Clear => {
                self.playlist.clear();
                self.presenter.close();
                Ok(Outcome::with(self.playlist_reply(), Effect::Persist))
            }

            Command::Import { mime, contents } => {
                let imported = import_playlist(&mime, &contents)?;
                self.playlist.replace(imported);
                self.revalidate_presenter();
                Ok(Outcome::with(self.playlist_reply(), Effect::Persist))
            }

            Command::Open { id } => {
                let entry = self.playlist.get(id).ok_or(Error::EntryNotFound(id))?;
                self.presenter.open(entry);
                Ok(Outcome::reply(Reply::Opened(entry.clone())))
            }

            Command::Select { index } => {
                let entry = open_entry(&self.playlist, self.presenter)?;
                let message = self.presenter.select(entry, index)?;
                Ok(Outcome::with(
                    Reply::Presenter(self.presenter),
                    Effect::Publish(message),
                ))
            }

            Command::Next => {
                let entry = open_entry(&self.playlist, self.presenter)?;
                let message = self.presenter.next(entry)?;
                Ok(self.step_outcome(message))
            }

            Command::Previous => {
                let entry = open_entry(&self.playlist, self.presenter)?;
                let message = self.presenter.previous(entry)?;
                Ok(self.step_outcome(message))
            }

            Command::Blank => {
                self.presenter.deselect();
                Ok(Outcome::with(
                    Reply::Presenter(self.presenter),
                    Effect::Publish(BroadcastMessage::blank()),
                ))
            }
        }
    }

    fn playlist_reply(&self) -> Reply {
        Reply::Playlist(self.playlist.entries().to_vec())
    }

    fn revalidate_presenter(&mut self) {
        let entry = self
            .presenter
            .entry_id()
            .and_then(|id| self.playlist.get(id));
        self.presenter.revalidate(entry);
    }

    fn step_outcome(&self, message: Option<BroadcastMessage>) -> Outcome {
        let reply = Reply::Presenter(self.presenter);
        match message {
            Some(message) => Outcome::with(reply, Effect::Publish(message)),
            None => Outcome::reply(reply),
        }
    }
}

/// Entry currently open in the presenter
///
/// Takes the fields apart so the presenter can be mutated while the entry is
/// borrowed.
fn open_entry(playlist: &Playlist, presenter: Presenter) -> Result<&PlaylistEntry> {
    let id = presenter.entry_id().ok_or(Error::NoEntryOpen)?;
    playlist.get(id).ok_or(Error::EntryNotFound(id))
}
