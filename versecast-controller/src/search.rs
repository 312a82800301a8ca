//! Catalog search
//!
//! Case-insensitive substring match on the title and every stanza line.
//! Chorus lines are not searched. Results keep catalog order.

use serde::Serialize;

use crate::catalog::Song;

/// One search result; `index` is the song's position in the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchHit {
    pub index: usize,
    pub title: String,
}

/// Whether `song` matches an already lowercased query
fn matches(song: &Song, needle: &str) -> bool {
    if song.title.to_lowercase().contains(needle) {
        return true;
    }

    song.verses
        .iter()
        .flatten()
        .any(|line| line.to_lowercase().contains(needle))
}

/// Return the songs whose title or any stanza line contains `query`
///
/// An empty query matches everything.
pub fn search<'a>(catalog: &'a [Song], query: &str) -> Vec<(usize, &'a Song)> {
    let needle = query.to_lowercase();

    catalog
        .iter()
        .enumerate()
        .filter(|(_, song)| needle.is_empty() || matches(song, &needle))
        .collect()
}

/// `search` reduced to index/title pairs for the results list
pub fn search_hits(catalog: &[Song], query: &str) -> Vec<SearchHit> {
    search(catalog, query)
        .into_iter()
        .map(|(index, song)| SearchHit {
            index,
            title: song.title.clone(),
        })
        .collect()
}
