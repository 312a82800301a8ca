//! Song catalog loading
//!
//! The catalog is a static JSON array of songs, read once at startup from a
//! local file or an `http(s)://` URL. A failed load leaves the catalog empty;
//! it is never retried.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::path::PathBuf;
use tracing::{error, info};

use crate::error::{Error, Result};

/// A catalog song, immutable once loaded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Song {
    pub title: String,
    /// Stanzas in order, each an ordered list of lines
    #[serde(default, deserialize_with = "null_as_empty")]
    pub verses: Vec<Vec<String>>,
    /// Optional chorus lines
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chorus: Option<Vec<String>>,
}

impl Song {
    /// Chorus lines, empty when the song has none
    pub fn chorus_lines(&self) -> &[String] {
        self.chorus.as_deref().unwrap_or(&[])
    }
}

/// `null` reads as no stanzas, so one odd record does not sink the catalog
fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<Vec<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<Vec<String>>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Where the catalog comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    File(PathBuf),
    Url(String),
}

impl CatalogSource {
    /// Anything starting with `http://` or `https://` is a URL, the rest is a path
    pub fn parse(source: &str) -> Self {
        let lower = source.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            Self::Url(source.to_string())
        } else {
            Self::File(PathBuf::from(source))
        }
    }
}

impl fmt::Display for CatalogSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Url(url) => write!(f, "{}", url),
        }
    }
}

/// Parse catalog JSON
pub fn parse_catalog(bytes: &[u8]) -> Result<Vec<Song>> {
    serde_json::from_slice(bytes).map_err(|e| Error::Catalog(format!("invalid catalog JSON: {}", e)))
}

/// Fetch and parse the catalog, reporting any failure
pub async fn fetch_catalog(source: &CatalogSource) -> Result<Vec<Song>> {
    let bytes = match source {
        CatalogSource::File(path) => tokio::fs::read(path).await?,
        CatalogSource::Url(url) => reqwest::get(url)
            .await?
            .error_for_status()?
            .bytes()
            .await?
            .to_vec(),
    };

    parse_catalog(&bytes)
}

/// Load the catalog at startup
///
/// Failures are logged and yield an empty catalog.
pub async fn load_catalog(source: &CatalogSource) -> Vec<Song> {
    match fetch_catalog(source).await {
        Ok(songs) => {
            info!("Loaded {} songs from catalog {}", songs.len(), source);
            songs
        }
        Err(e) => {
            error!("Error fetching catalog {}: {}", source, e);
            Vec::new()
        }
    }
}
