use std::path::Path;

use lofty::error::ErrorKind;
use lofty::file::{AudioFile, TaggedFileExt};
use lofty::picture::PictureType;
use lofty::prelude::ItemKey;
use lofty::tag::Accessor;

use crate::error::MetadataError;

use super::build::MetadataSource;
use super::model::TrackMetadata;

/// Reads title/artist/album, duration and embedded artwork with `lofty`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TagReader;

impl MetadataSource for TagReader {
    fn extract(&self, source: &Path) -> Result<TrackMetadata, MetadataError> {
        let tagged = lofty::read_from_path(source).map_err(|e| match e.kind() {
            ErrorKind::UnknownFormat => MetadataError::Unsupported(source.to_path_buf()),
            _ => MetadataError::Tags(e),
        })?;

        let mut meta = TrackMetadata {
            duration: Some(tagged.properties().duration()),
            ..TrackMetadata::default()
        };

        let Some(tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) else {
            return Ok(meta);
        };

        let text = |v: Option<std::borrow::Cow<'_, str>>| {
            v.map(|s| s.trim().to_string()).unwrap_or_default()
        };
        meta.title = text(tag.title());
        meta.artist = text(tag.artist());
        meta.album = text(tag.album());
        meta.genre = text(tag.genre());
        meta.year = tag.get_string(ItemKey::RecordingDate).and_then(parse_year);

        // Prefer the front cover, otherwise whatever picture comes first.
        let pictures = tag.pictures();
        meta.artwork = pictures
            .iter()
            .find(|p| matches!(p.pic_type(), PictureType::CoverFront))
            .or_else(|| pictures.first())
            .map(|p| p.data().to_vec())
            .filter(|data| !data.is_empty());

        Ok(meta)
    }
}

/// Leading four-digit year of a date tag ("1997", "1997-05-21").
fn parse_year(date: &str) -> Option<u32> {
    let digits = date.trim().get(..4)?;
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok().filter(|&year| year > 0)
}

#[cfg(test)]
mod tests {
    use super::parse_year;

    #[test]
    fn year_comes_from_the_start_of_the_date() {
        assert_eq!(parse_year("1997"), Some(1997));
        assert_eq!(parse_year(" 2004-05-21T10:00"), Some(2004));
        assert_eq!(parse_year("0000"), None);
        assert_eq!(parse_year("May 1997"), None);
        assert_eq!(parse_year("97"), None);
    }
}
