use std::path::Path;

use crate::config::TrackDisplayField;

/// Build a display string for a track according to the provided `fields` and separator.
///
/// This composes metadata fields (artist, title, album, filename, path) in the
/// configured order. When no parts were produced it falls back to `title`, then to
/// the file stem, so untagged files still get a readable label.
pub fn display_from_fields(
    path: &Path,
    title: &str,
    artist: &str,
    album: &str,
    fields: &[TrackDisplayField],
    sep: &str,
) -> String {
    let mut parts: Vec<String> = Vec::new();
    let mut push_trimmed = |s: &str| {
        let s = s.trim();
        if !s.is_empty() {
            parts.push(s.to_string());
        }
    };

    for f in fields {
        match f {
            TrackDisplayField::Display => {
                // "display" inside the label fields means "artist - title".
                push_trimmed(artist);
                push_trimmed(title);
            }
            TrackDisplayField::Title => push_trimmed(title),
            TrackDisplayField::Artist => push_trimmed(artist),
            TrackDisplayField::Album => push_trimmed(album),
            TrackDisplayField::Filename => push_trimmed(file_stem(path)),
            TrackDisplayField::Path => push_trimmed(&path.display().to_string()),
        }
    }

    if !parts.is_empty() {
        parts.join(sep)
    } else if !title.trim().is_empty() {
        title.trim().to_string()
    } else {
        file_stem(path).to_string()
    }
}

pub(crate) fn file_stem(path: &Path) -> &str {
    path.file_stem().and_then(|s| s.to_str()).unwrap_or("UNKNOWN")
}
