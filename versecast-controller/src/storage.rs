//! Playlist persistence
//!
//! The playlist is stored as one serialized string under a fixed key. The
//! production store is the SQLite settings table; the in-memory store backs
//! tests and `--ephemeral` runs.

use async_trait::async_trait;
use sqlx::SqlitePool;
use std::sync::Mutex;
use versecast_common::db::{get_setting, set_setting};

use crate::error::{Error, Result};

/// Settings key holding the serialized playlist
pub const PLAYLIST_KEY: &str = "playlist";

/// Key-value slot for the serialized playlist
#[async_trait]
pub trait PlaylistStore: Send + Sync {
    /// Stored value, None if nothing was ever saved
    async fn load(&self) -> Result<Option<String>>;

    /// Overwrite the stored value
    async fn save(&self, blob: &str) -> Result<()>;
}

/// Playlist slot in the SQLite `settings` table
#[derive(Clone)]
pub struct SqlitePlaylistStore {
    db: SqlitePool,
}

impl SqlitePlaylistStore {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PlaylistStore for SqlitePlaylistStore {
    async fn load(&self) -> Result<Option<String>> {
        Ok(get_setting::<String>(&self.db, PLAYLIST_KEY).await?)
    }

    async fn save(&self, blob: &str) -> Result<()> {
        Ok(set_setting(&self.db, PLAYLIST_KEY, blob).await?)
    }
}

/// Process-local playlist slot
#[derive(Debug, Default)]
pub struct MemoryPlaylistStore {
    slot: Mutex<Option<String>>,
}

impl MemoryPlaylistStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with `blob`
    pub fn with_value(blob: impl Into<String>) -> Self {
        Self {
            slot: Mutex::new(Some(blob.into())),
        }
    }
}

#[async_trait]
impl PlaylistStore for MemoryPlaylistStore {
    async fn load(&self) -> Result<Option<String>> {
        self.slot
            .lock()
            .map(|slot| slot.clone())
            .map_err(|_| Error::Internal("playlist slot poisoned".to_string()))
    }

    async fn save(&self, blob: &str) -> Result<()> {
        let mut slot = self
            .slot
            .lock()
            .map_err(|_| Error::Internal("playlist slot poisoned".to_string()))?;
        *slot = Some(blob.to_string());
        Ok(())
    }
}
