//! Playlist management
//!
//! The playlist is an ordered list of formatted songs. Order drives
//! presentation and is user-reorderable. Ids come from a monotonically
//! increasing counter, so removing an entry never lets a later add reuse
//! its id.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

use crate::catalog::Song;
use crate::error::{Error, Result};
use crate::formatter::{format_song, ChorusPlacement, VerseLine};

/// Playlist entry identifier
pub type EntryId = u64;

/// MIME type accepted by `import`
pub const JSON_MIME: &str = "application/json";

/// A formatted song in the playlist
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistEntry {
    pub id: EntryId,
    pub title: String,
    #[serde(default)]
    pub verses: Vec<VerseLine>,
}

impl PlaylistEntry {
    /// Format a catalog song into a new entry
    pub fn from_song(id: EntryId, song: &Song, placement: ChorusPlacement) -> Self {
        Self {
            id,
            title: song.title.clone(),
            verses: format_song(song, placement),
        }
    }
}

/// Entry as read from storage or an imported file
///
/// Older files carry no ids at all, so the id is optional here and assigned
/// when the playlist is built.
#[derive(Debug, Deserialize)]
struct StoredEntry {
    #[serde(default)]
    id: Option<EntryId>,
    title: String,
    #[serde(default)]
    verses: Vec<VerseLine>,
}

impl From<PlaylistEntry> for StoredEntry {
    fn from(entry: PlaylistEntry) -> Self {
        Self {
            id: Some(entry.id),
            title: entry.title,
            verses: entry.verses,
        }
    }
}

/// Ordered collection of playlist entries
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Playlist {
    entries: Vec<PlaylistEntry>,
    next_id: EntryId,
}

impl Playlist {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a playlist from existing entries, continuing ids after the largest one
    ///
    /// The first entry holding a given id keeps it; later entries with the
    /// same id are renumbered so every entry stays addressable.
    pub fn from_entries(entries: Vec<PlaylistEntry>) -> Self {
        Self::from_stored(entries.into_iter().map(StoredEntry::from).collect())
    }

    fn from_stored(stored: Vec<StoredEntry>) -> Self {
        let mut seen = HashSet::new();
        let keeps_id: Vec<bool> = stored
            .iter()
            .map(|e| e.id.is_some_and(|id| seen.insert(id)))
            .collect();
        let mut next_id = seen
            .iter()
            .map(|id: &EntryId| id.saturating_add(1))
            .max()
            .unwrap_or(0);

        let entries = stored
            .into_iter()
            .zip(keeps_id)
            .map(|(entry, keeps_id)| {
                let id = match entry.id {
                    Some(id) if keeps_id => id,
                    _ => {
                        let id = next_id;
                        next_id = next_id.saturating_add(1);
                        debug!("Playlist: '{}' assigned id {}", entry.title, id);
                        id
                    }
                };
                PlaylistEntry {
                    id,
                    title: entry.title,
                    verses: entry.verses,
                }
            })
            .collect();

        Self { entries, next_id }
    }

    /// Parse a serialized playlist (JSON array of entries)
    pub fn from_json(json: &str) -> Result<Self> {
        let stored: Vec<StoredEntry> = serde_json::from_str(json)?;
        Ok(Self::from_stored(stored))
    }

    /// Compact JSON used for storage
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.entries)?)
    }

    /// Indented JSON used for file export
    pub fn to_pretty_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.entries)?)
    }

    pub fn entries(&self) -> &[PlaylistEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Id the next added entry will receive
    pub fn next_id(&self) -> EntryId {
        self.next_id
    }

    /// First entry with this id
    pub fn get(&self, id: EntryId) -> Option<&PlaylistEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Format `song` and append it; duplicates are allowed
    pub fn add(&mut self, song: &Song, placement: ChorusPlacement) -> &PlaylistEntry {
        let entry = PlaylistEntry::from_song(self.next_id, song, placement);
        self.next_id = self.next_id.saturating_add(1);
        debug!("Playlist: added '{}' as entry {}", entry.title, entry.id);

        self.entries.push(entry);
        &self.entries[self.entries.len() - 1]
    }

    /// Remove the first entry with this id; unknown ids are a no-op
    pub fn remove(&mut self, id: EntryId) -> Option<PlaylistEntry> {
        let position = self.entries.iter().position(|e| e.id == id)?;
        let removed = self.entries.remove(position);
        debug!("Playlist: removed entry {} at position {}", id, position);
        Some(removed)
    }

    /// Move the entry at `old_index` to `new_index`
    ///
    /// Every other entry keeps its relative order. Both indices must address
    /// an existing entry.
    pub fn reorder(&mut self, old_index: usize, new_index: usize) -> Result<()> {
        let len = self.entries.len();
        if old_index >= len || new_index >= len {
            return Err(Error::InvalidInput(format!(
                "reorder indices {} -> {} out of range for playlist of {}",
                old_index, new_index, len
            )));
        }

        let entry = self.entries.remove(old_index);
        self.entries.insert(new_index, entry);
        Ok(())
    }

    /// Replace the whole playlist
    pub fn replace(&mut self, other: Playlist) {
        *self = other;
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Whether a MIME type names JSON, ignoring parameters and case
pub fn is_json_mime(mime: &str) -> bool {
    mime.split(';')
        .next()
        .map(|essence| essence.trim().eq_ignore_ascii_case(JSON_MIME))
        .unwrap_or(false)
}

/// Validate and parse an imported playlist file
///
/// Rejects non-JSON MIME types before looking at the contents.
pub fn import_playlist(mime: &str, contents: &[u8]) -> Result<Playlist> {
    if !is_json_mime(mime) {
        return Err(Error::InvalidFileType(mime.to_string()));
    }

    let stored: Vec<StoredEntry> = serde_json::from_slice(contents)?;
    Ok(Playlist::from_stored(stored))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formatter::VerseKind;

    fn song(title: &str) -> Song {
        Song {
            title: title.to_string(),
            verses: vec![vec![format!("{} line 1", title), format!("{} line 2", title)]],
            chorus: Some(vec![format!("{} chorus", title)]),
        }
    }

    fn playlist_of(titles: &[&str]) -> Playlist {
        let mut playlist = Playlist::new();
        for title in titles {
            playlist.add(&song(title), ChorusPlacement::AfterEachStanza);
        }
        playlist
    }

    fn titles(playlist: &Playlist) -> Vec<&str> {
        playlist.entries().iter().map(|e| e.title.as_str()).collect()
    }

    #[test]
    fn test_add_formats_and_assigns_ids() {
        let playlist = playlist_of(&["A", "B"]);

        assert_eq!(playlist.len(), 2);
        assert_eq!(playlist.entries()[0].id, 0);
        assert_eq!(playlist.entries()[1].id, 1);
        assert_eq!(playlist.entries()[0].verses.len(), 3);
        assert_eq!(playlist.entries()[0].verses[2].kind, VerseKind::Chorus);
    }

    #[test]
    fn test_duplicates_allowed() {
        let playlist = playlist_of(&["A", "A"]);

        assert_eq!(titles(&playlist), vec!["A", "A"]);
        assert_ne!(playlist.entries()[0].id, playlist.entries()[1].id);
    }

    #[test]
    fn test_ids_not_reused_after_removal() {
        let mut playlist = playlist_of(&["A", "B", "C"]);
        playlist.remove(1).unwrap();

        let added = playlist.add(&song("D"), ChorusPlacement::AfterEachStanza).id;
        assert_eq!(added, 3);

        let ids: Vec<EntryId> = playlist.entries().iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![0, 2, 3]);
    }

    #[test]
    fn test_remove_unknown_id_is_noop() {
        let mut playlist = playlist_of(&["A", "B"]);
        let before = playlist.clone();

        assert!(playlist.remove(42).is_none());
        assert_eq!(playlist, before);
    }

    #[test]
    fn test_duplicate_ids_renumbered() {
        let entry = |id, title: &str| PlaylistEntry {
            id,
            title: title.to_string(),
            verses: Vec::new(),
        };
        let mut playlist =
            Playlist::from_entries(vec![entry(0, "A"), entry(1, "B"), entry(1, "C")]);

        let ids: Vec<EntryId> = playlist.entries().iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![0, 1, 2]);
        assert_eq!(playlist.next_id(), 3);

        let removed = playlist.remove(1).unwrap();
        assert_eq!(removed.title, "B");
        assert_eq!(titles(&playlist), vec!["A", "C"]);
    }

    #[test]
    fn test_import_without_ids_assigns_distinct_ids() {
        let legacy = r#"[
            {"title": "A", "verses": [{"verse": "a1", "type": "verse"}]},
            {"title": "B", "verses": [{"verse": "b1", "type": "chorus"}]}
        ]"#;

        let playlist = import_playlist(JSON_MIME, legacy.as_bytes()).unwrap();

        let ids: Vec<EntryId> = playlist.entries().iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![0, 1]);
        assert_eq!(playlist.get(1).unwrap().title, "B");
        assert_eq!(playlist.get(1).unwrap().verses, vec![VerseLine::chorus("b1")]);
        assert_eq!(playlist.next_id(), 2);
    }

    #[test]
    fn test_mixed_ids_keep_unique_ones() {
        let json = r#"[
            {"id": 5, "title": "A"},
            {"title": "B"},
            {"id": 5, "title": "C"},
            {"id": 2, "title": "D"}
        ]"#;

        let playlist = Playlist::from_json(json).unwrap();

        let ids: Vec<EntryId> = playlist.entries().iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![5, 6, 7, 2]);
        assert_eq!(playlist.next_id(), 8);
    }

    #[test]
    fn test_reorder_moves_forward_and_back() {
        let mut playlist = playlist_of(&["A", "B", "C", "D"]);

        playlist.reorder(0, 2).unwrap();
        assert_eq!(titles(&playlist), vec!["B", "C", "A", "D"]);

        playlist.reorder(3, 0).unwrap();
        assert_eq!(titles(&playlist), vec!["D", "B", "C", "A"]);

        playlist.reorder(1, 1).unwrap();
        assert_eq!(titles(&playlist), vec!["D", "B", "C", "A"]);
    }

    #[test]
    fn test_reorder_is_permutation() {
        let original = playlist_of(&["A", "B", "C", "D", "E"]);
        for old in 0..original.len() {
            for new in 0..original.len() {
                let mut playlist = original.clone();
                playlist.reorder(old, new).unwrap();

                let mut before: Vec<_> = original.entries().to_vec();
                let mut after: Vec<_> = playlist.entries().to_vec();
                before.sort_by_key(|e| e.id);
                after.sort_by_key(|e| e.id);
                assert_eq!(before, after);
                assert_eq!(playlist.entries()[new], original.entries()[old]);
            }
        }
    }

    #[test]
    fn test_reorder_out_of_range_rejected() {
        let mut playlist = playlist_of(&["A", "B"]);
        let before = playlist.clone();

        assert!(matches!(playlist.reorder(2, 0), Err(Error::InvalidInput(_))));
        assert!(matches!(playlist.reorder(0, 2), Err(Error::InvalidInput(_))));
        assert_eq!(playlist, before);
    }

    #[test]
    fn test_json_round_trip() {
        let mut playlist = playlist_of(&["A", "B", "C"]);
        playlist.remove(0);

        let restored = Playlist::from_json(&playlist.to_json().unwrap()).unwrap();
        assert_eq!(restored.entries(), playlist.entries());
        assert_eq!(restored.next_id(), 3);
    }

    #[test]
    fn test_export_import_round_trip() {
        let playlist = playlist_of(&["A", "B"]);
        let exported = playlist.to_pretty_json().unwrap();

        let imported = import_playlist(JSON_MIME, exported.as_bytes()).unwrap();
        assert_eq!(imported.entries(), playlist.entries());
    }

    #[test]
    fn test_import_rejects_non_json_mime() {
        let exported = playlist_of(&["A"]).to_json().unwrap();

        let err = import_playlist("text/plain", exported.as_bytes()).unwrap_err();
        assert!(matches!(err, Error::InvalidFileType(ref mime) if mime == "text/plain"));
    }

    #[test]
    fn test_import_malformed_json() {
        let err = import_playlist(JSON_MIME, b"[{\"title\": 3}]").unwrap_err();
        assert!(matches!(err, Error::MalformedPlaylist(_)));
    }

    #[test]
    fn test_is_json_mime() {
        assert!(is_json_mime("application/json"));
        assert!(is_json_mime("Application/JSON; charset=utf-8"));
        assert!(!is_json_mime("text/plain"));
        assert!(!is_json_mime("application/jsonp"));
        assert!(!is_json_mime(""));
    }

    #[test]
    fn test_clear_keeps_id_counter() {
        let mut playlist = playlist_of(&["A", "B"]);
        playlist.clear();

        assert!(playlist.is_empty());
        assert_eq!(playlist.next_id(), 2);
    }
}
