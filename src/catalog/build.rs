use std::path::{Path, PathBuf};

use crate::config::LibrarySettings;
use crate::error::{MetadataError, Result};

use super::display::display_from_fields;
use super::model::{Catalog, TrackMetadata, TrackRecord};

/// Platform facility that lists the playable resources, in a stable order.
pub trait ResourceEnumerator {
    fn list_resources(&self) -> Result<Vec<PathBuf>>;
}

/// Extracts per-resource metadata.
///
/// Implementations report missing fields as empty strings / `None`; an `Err`
/// means the resource could not be read at all.
pub trait MetadataSource {
    fn extract(&self, source: &Path) -> std::result::Result<TrackMetadata, MetadataError>;
}

impl Catalog {
    /// Enumerate resources once and build one record per resource, in
    /// enumeration order.
    ///
    /// A resource whose metadata cannot be read is kept with empty text
    /// fields. Only an enumeration failure or an empty result aborts the build.
    pub fn build(
        enumerator: &impl ResourceEnumerator,
        metadata: &impl MetadataSource,
        settings: &LibrarySettings,
    ) -> Result<Self> {
        let resources = enumerator.list_resources()?;

        let mut tracks = Vec::with_capacity(resources.len());
        let mut unreadable = 0usize;
        for source in resources {
            let meta = match metadata.extract(&source) {
                Ok(meta) => meta,
                Err(e) => {
                    unreadable += 1;
                    tracing::warn!(source = %source.display(), "metadata unavailable: {e}");
                    TrackMetadata::default()
                }
            };
            tracks.push(record_from(source, meta, settings));
        }

        let catalog = Catalog::from_records(tracks)?;
        tracing::info!(
            tracks = catalog.len(),
            unreadable,
            "catalog built"
        );
        Ok(catalog)
    }
}

fn record_from(source: PathBuf, meta: TrackMetadata, settings: &LibrarySettings) -> TrackRecord {
    let display = display_from_fields(
        &source,
        &meta.title,
        &meta.artist,
        &meta.album,
        &settings.display_fields,
        &settings.display_separator,
    );

    TrackRecord {
        title: meta.title,
        artist: meta.artist,
        album: meta.album,
        year: meta.year,
        genre: meta.genre,
        source,
        artwork: meta.artwork,
        duration: meta.duration,
        display,
    }
}
