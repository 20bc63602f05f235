use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{PlayerError, Result};

/// One playable item. Built once by the catalog builder and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackRecord {
    pub title: String,
    pub artist: String,
    pub album: String,
    pub year: Option<u32>,
    pub genre: String,
    /// Handle handed to the media engine; resolved at build time.
    pub source: PathBuf,
    /// Raw embedded picture bytes, if the file carries any.
    pub artwork: Option<Vec<u8>>,
    pub duration: Option<Duration>,
    /// Label used by the list view.
    pub display: String,
}

impl TrackRecord {
    pub fn has_artwork(&self) -> bool {
        self.artwork.as_ref().is_some_and(|a| !a.is_empty())
    }
}

/// How the browser groups the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GroupKind {
    #[default]
    AllTracks,
    Albums,
    Artists,
    Years,
    Genres,
}

impl GroupKind {
    /// `AllTracks -> Albums -> Artists -> Years -> Genres -> AllTracks`.
    pub fn cycle(self) -> Self {
        match self {
            GroupKind::AllTracks => GroupKind::Albums,
            GroupKind::Albums => GroupKind::Artists,
            GroupKind::Artists => GroupKind::Years,
            GroupKind::Years => GroupKind::Genres,
            GroupKind::Genres => GroupKind::AllTracks,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            GroupKind::AllTracks => "tracks",
            GroupKind::Albums => "albums",
            GroupKind::Artists => "artists",
            GroupKind::Years => "years",
            GroupKind::Genres => "genres",
        }
    }
}

/// Name for tracks with no artist or album tag.
const UNKNOWN_GROUP: &str = "Unknown";

/// A named set of catalog positions, in catalog order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackGroup {
    pub name: String,
    pub positions: Vec<usize>,
}

/// Fields a [`super::MetadataSource`] extracts for a single resource.
///
/// Empty strings stand for missing fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackMetadata {
    pub title: String,
    pub artist: String,
    pub album: String,
    pub year: Option<u32>,
    pub genre: String,
    pub artwork: Option<Vec<u8>>,
    pub duration: Option<Duration>,
}

/// Ordered, immutable list of tracks. Never empty.
#[derive(Debug, Clone)]
pub struct Catalog {
    tracks: Vec<TrackRecord>,
}

impl Catalog {
    /// Wrap already-built records, keeping their order.
    pub fn from_records(tracks: Vec<TrackRecord>) -> Result<Self> {
        if tracks.is_empty() {
            return Err(PlayerError::EmptyCatalog);
        }
        Ok(Self { tracks })
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Always false for a successfully built catalog.
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<&TrackRecord> {
        self.tracks.get(position)
    }

    pub fn tracks(&self) -> &[TrackRecord] {
        &self.tracks
    }

    /// Positions of tracks whose artist matches `artist`, ignoring case.
    pub fn positions_by_artist(&self, artist: &str) -> Vec<usize> {
        self.positions_matching(artist, |t| &t.artist)
    }

    /// Positions of tracks whose album matches `album`, ignoring case.
    pub fn positions_by_album(&self, album: &str) -> Vec<usize> {
        self.positions_matching(album, |t| &t.album)
    }

    /// Positions of tracks whose title matches `title`, ignoring case.
    pub fn positions_by_title(&self, title: &str) -> Vec<usize> {
        self.positions_matching(title, |t| &t.title)
    }

    /// Group the catalog by `kind`, groups sorted by name.
    ///
    /// `AllTracks` is a single group. Albums are keyed by album and artist,
    /// so same-named albums by different artists stay apart. Tracks without
    /// a year or genre are left out of those groupings.
    pub fn groups(&self, kind: GroupKind) -> Vec<TrackGroup> {
        if kind == GroupKind::AllTracks {
            return vec![TrackGroup {
                name: "All tracks".to_string(),
                positions: (0..self.tracks.len()).collect(),
            }];
        }

        // (sort key, display name) -> positions
        let mut groups: BTreeMap<(String, String), TrackGroup> = BTreeMap::new();
        for (position, track) in self.tracks.iter().enumerate() {
            let Some((sort_key, name)) = group_key(kind, track) else {
                continue;
            };
            groups
                .entry(sort_key)
                .or_insert_with(|| TrackGroup {
                    name,
                    positions: Vec::new(),
                })
                .positions
                .push(position);
        }
        groups.into_values().collect()
    }

    fn positions_matching(&self, needle: &str, field: impl Fn(&TrackRecord) -> &str) -> Vec<usize> {
        let needle = needle.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }
        self.tracks
            .iter()
            .enumerate()
            .filter(|(_, t)| field(t).trim().to_lowercase() == needle)
            .map(|(i, _)| i)
            .collect()
    }
}

fn or_unknown(field: &str) -> &str {
    match field.trim() {
        "" => UNKNOWN_GROUP,
        field => field,
    }
}

fn group_key(kind: GroupKind, track: &TrackRecord) -> Option<((String, String), String)> {
    match kind {
        GroupKind::AllTracks => None,
        GroupKind::Albums => {
            let album = or_unknown(&track.album);
            let artist = or_unknown(&track.artist).to_lowercase();
            Some(((album.to_lowercase(), artist), album.to_string()))
        }
        GroupKind::Artists => {
            let artist = or_unknown(&track.artist);
            Some(((artist.to_lowercase(), String::new()), artist.to_string()))
        }
        GroupKind::Years => track
            .year
            .map(|year| ((format!("{year:010}"), String::new()), year.to_string())),
        GroupKind::Genres => {
            let genre = track.genre.trim();
            if genre.is_empty() {
                return None;
            }
            Some(((genre.to_lowercase(), String::new()), genre.to_string()))
        }
    }
}
