//! Song formatting
//!
//! Flattens a catalog song into the ordered line sequence shown in the verse
//! list and sent to display pages.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::catalog::Song;
use crate::error::Error;

/// Whether a line belongs to a stanza or the chorus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerseKind {
    Verse,
    Chorus,
}

/// One displayable line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerseLine {
    /// Line text; `verse` is accepted for playlists saved by older pages
    #[serde(alias = "verse")]
    pub text: String,
    #[serde(alias = "type")]
    pub kind: VerseKind,
}

impl VerseLine {
    pub fn verse(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: VerseKind::Verse,
        }
    }

    pub fn chorus(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: VerseKind::Chorus,
        }
    }
}

/// Where chorus lines are placed in the flattened sequence
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChorusPlacement {
    /// Whole chorus repeated after every stanza
    #[default]
    AfterEachStanza,
    /// Whole chorus once, after the first stanza
    Once,
}

impl FromStr for ChorusPlacement {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "after_each_stanza" => Ok(Self::AfterEachStanza),
            "once" => Ok(Self::Once),
            other => Err(Error::InvalidInput(format!(
                "unknown chorus placement '{}' (expected after_each_stanza or once)",
                other
            ))),
        }
    }
}

/// Flatten `song` into verse/chorus lines
///
/// Stanza lines are emitted in order. After a stanza, the chorus (if any) is
/// emitted according to `placement`. A song without stanzas yields no lines,
/// chorus included.
pub fn format_song(song: &Song, placement: ChorusPlacement) -> Vec<VerseLine> {
    let chorus = song.chorus_lines();
    let mut lines = Vec::new();

    for (stanza_index, stanza) in song.verses.iter().enumerate() {
        lines.extend(stanza.iter().map(VerseLine::verse));

        let emit_chorus = match placement {
            ChorusPlacement::AfterEachStanza => true,
            ChorusPlacement::Once => stanza_index == 0,
        };
        if emit_chorus {
            lines.extend(chorus.iter().map(VerseLine::chorus));
        }
    }

    lines
}
