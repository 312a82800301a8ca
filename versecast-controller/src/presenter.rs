//! Verse presenter
//!
//! Tracks which playlist entry is open in the verse list and which single
//! line of it is selected. The presenter stores ids and indices only; the
//! controller hands it the entry to validate against.

use serde::Serialize;
use versecast_common::BroadcastMessage;

use crate::error::{Error, Result};
use crate::playlist::{EntryId, PlaylistEntry};
use crate::relay::build_message;

/// Selection state, also the presenter's HTTP representation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Presenter {
    entry_id: Option<EntryId>,
    selected: Option<usize>,
}

impl Presenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entry_id(&self) -> Option<EntryId> {
        self.entry_id
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// Show `entry` in the verse list; any previous selection is cleared
    pub fn open(&mut self, entry: &PlaylistEntry) {
        self.entry_id = Some(entry.id);
        self.selected = None;
    }

    pub fn close(&mut self) {
        *self = Self::default();
    }

    /// Clear the selection but keep the entry open
    pub fn deselect(&mut self) {
        self.selected = None;
    }

    /// Select line `index` of the open entry and build its broadcast message
    ///
    /// Selection is exclusive: the previous selection is replaced.
    pub fn select(&mut self, entry: &PlaylistEntry, index: usize) -> Result<BroadcastMessage> {
        if self.entry_id != Some(entry.id) {
            return Err(Error::NoEntryOpen);
        }

        let message = build_message(entry, index).ok_or_else(|| {
            Error::InvalidInput(format!(
                "verse index {} out of range for '{}' ({} lines)",
                index,
                entry.title,
                entry.verses.len()
            ))
        })?;

        self.selected = Some(index);
        Ok(message)
    }

    /// Move the selection one line forward
    ///
    /// With nothing selected this selects the first line. Returns None when
    /// already at the last line (or the entry has no lines).
    pub fn next(&mut self, entry: &PlaylistEntry) -> Result<Option<BroadcastMessage>> {
        let target = match self.selected {
            None => 0,
            Some(index) => index + 1,
        };
        if target >= entry.verses.len() {
            return Ok(None);
        }
        self.select(entry, target).map(Some)
    }

    /// Move the selection one line back
    ///
    /// Returns None at the first line or with nothing selected.
    pub fn previous(&mut self, entry: &PlaylistEntry) -> Result<Option<BroadcastMessage>> {
        match self.selected {
            Some(index) if index > 0 => self.select(entry, index - 1).map(Some),
            _ => Ok(None),
        }
    }

    /// Re-check the state after the playlist was replaced
    ///
    /// Keeps the open entry if its id still exists, dropping a selection that
    /// no longer fits; closes otherwise.
    pub fn revalidate(&mut self, entry: Option<&PlaylistEntry>) {
        match entry {
            Some(entry) if self.entry_id == Some(entry.id) => {
                if self.selected.is_some_and(|i| i >= entry.verses.len()) {
                    self.selected = None;
                }
            }
            _ => self.close(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formatter::VerseLine;

    fn entry(id: EntryId, lines: &[&str]) -> PlaylistEntry {
        PlaylistEntry {
            id,
            title: format!("Entry {}", id),
            verses: lines.iter().map(|l| VerseLine::verse(*l)).collect(),
        }
    }

    #[test]
    fn test_open_clears_selection() {
        let first = entry(1, &["a", "b"]);
        let second = entry(2, &["c"]);
        let mut presenter = Presenter::new();

        presenter.open(&first);
        presenter.select(&first, 1).unwrap();
        assert_eq!(presenter.selected(), Some(1));

        presenter.open(&second);
        assert_eq!(presenter.entry_id(), Some(2));
        assert_eq!(presenter.selected(), None);
    }

    #[test]
    fn test_selection_is_exclusive() {
        let entry = entry(1, &["a", "b", "c"]);
        let mut presenter = Presenter::new();
        presenter.open(&entry);

        presenter.select(&entry, 0).unwrap();
        presenter.select(&entry, 2).unwrap();
        assert_eq!(presenter.selected(), Some(2));
    }

    #[test]
    fn test_select_builds_message() {
        let entry = entry(1, &["a", "b"]);
        let mut presenter = Presenter::new();
        presenter.open(&entry);

        assert_eq!(
            presenter.select(&entry, 0).unwrap(),
            BroadcastMessage::new("a", "b")
        );
        assert_eq!(
            presenter.select(&entry, 1).unwrap(),
            BroadcastMessage::new("b", "")
        );
    }

    #[test]
    fn test_select_out_of_range_keeps_selection() {
        let entry = entry(1, &["a"]);
        let mut presenter = Presenter::new();
        presenter.open(&entry);
        presenter.select(&entry, 0).unwrap();

        assert!(matches!(presenter.select(&entry, 5), Err(Error::InvalidInput(_))));
        assert_eq!(presenter.selected(), Some(0));
    }

    #[test]
    fn test_select_requires_open_entry() {
        let entry = entry(1, &["a"]);
        let mut presenter = Presenter::new();

        assert!(matches!(presenter.select(&entry, 0), Err(Error::NoEntryOpen)));
    }

    #[test]
    fn test_next_and_previous_step_through_lines() {
        let entry = entry(1, &["a", "b", "c"]);
        let mut presenter = Presenter::new();
        presenter.open(&entry);

        assert_eq!(presenter.previous(&entry).unwrap(), None);
        assert_eq!(
            presenter.next(&entry).unwrap(),
            Some(BroadcastMessage::new("a", "b"))
        );
        presenter.next(&entry).unwrap();
        assert_eq!(
            presenter.next(&entry).unwrap(),
            Some(BroadcastMessage::new("c", ""))
        );
        assert_eq!(presenter.next(&entry).unwrap(), None);
        assert_eq!(presenter.selected(), Some(2));

        assert_eq!(
            presenter.previous(&entry).unwrap(),
            Some(BroadcastMessage::new("b", "c"))
        );
    }

    #[test]
    fn test_revalidate() {
        let long = entry(1, &["a", "b", "c"]);
        let short = entry(1, &["a"]);
        let mut presenter = Presenter::new();
        presenter.open(&long);
        presenter.select(&long, 2).unwrap();

        presenter.revalidate(Some(&short));
        assert_eq!(presenter.entry_id(), Some(1));
        assert_eq!(presenter.selected(), None);

        presenter.revalidate(None);
        assert_eq!(presenter, Presenter::default());
    }
}
