//! Song catalog indexed for the fuzzy join

use crate::model::{Artist, Song};
use std::collections::HashMap;

/// A song joined with its artist
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogEntry {
    pub song_id: String,
    pub title: String,
    pub artist_id: String,
    pub artist_name: String,
    pub duration: f64,
}

/// Read-only lookup from `(title, artist_name)` to catalog entries
///
/// Songs join artists on `artist_id`. A song whose artist is unknown, or
/// that lacks a title or artist name, can never satisfy the equality part of
/// the match and is left out of the index.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    by_title: HashMap<String, HashMap<String, Vec<CatalogEntry>>>,
    len: usize,
}

impl Catalog {
    /// Build the catalog from the song and artist dimensions
    pub fn build(songs: &[Song], artists: &[Artist]) -> Self {
        let names: HashMap<&str, &str> = artists
            .iter()
            .filter_map(|a| Some((a.artist_id.as_str(), a.name.as_deref()?)))
            .collect();

        let mut catalog = Self::default();
        for song in songs {
            let (Some(title), Some(&artist_name)) =
                (song.title.as_deref(), names.get(song.artist_id.as_str()))
            else {
                continue;
            };

            catalog
                .by_title
                .entry(title.to_string())
                .or_default()
                .entry(artist_name.to_string())
                .or_default()
                .push(CatalogEntry {
                    song_id: song.song_id.clone(),
                    title: title.to_string(),
                    artist_id: song.artist_id.clone(),
                    artist_name: artist_name.to_string(),
                    duration: song.duration,
                });
            catalog.len += 1;
        }
        catalog
    }

    /// Entries whose title and artist name both equal the given ones
    pub fn candidates(&self, title: &str, artist_name: &str) -> &[CatalogEntry] {
        self.by_title
            .get(title)
            .and_then(|artists| artists.get(artist_name))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Number of indexed entries
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}
