//! Error types for versecast-controller
//!
//! Defines module-specific error types using thiserror for clear error propagation.

use thiserror::Error;

use crate::playlist::EntryId;

/// Main error type for versecast-controller
#[derive(Error, Debug)]
pub enum Error {
    /// Catalog could not be read or parsed
    #[error("Catalog error: {0}")]
    Catalog(String),

    /// Import file was not JSON
    #[error("Invalid file type: expected application/json, got '{0}'")]
    InvalidFileType(String),

    /// Stored or imported playlist JSON did not parse
    #[error("Malformed playlist: {0}")]
    MalformedPlaylist(#[from] serde_json::Error),

    /// No playlist entry with this id
    #[error("Playlist entry not found: {0}")]
    EntryNotFound(EntryId),

    /// No catalog song at this index
    #[error("Song not found: {0}")]
    SongNotFound(usize),

    /// Presenter command issued before an entry was opened
    #[error("No playlist entry is open")]
    NoEntryOpen,

    /// Invalid request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Playlist storage errors
    #[error("Storage error: {0}")]
    Storage(#[from] versecast_common::Error),

    /// File I/O errors
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Unexpected internal failure
    #[error("Internal error: {0}")]
    Internal(String),

    /// Catalog download errors (network failure or non-success status)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Convenience Result type using versecast-controller Error
pub type Result<T> = std::result::Result<T, Error>;
