use super::display::display_from_fields;
use super::enumerate::is_audio_file;
use super::*;
use crate::config::{LibrarySettings, TrackDisplayField};
use crate::error::{MetadataError, PlayerError};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::tempdir;

struct FixedResources(Vec<PathBuf>);

impl ResourceEnumerator for FixedResources {
    fn list_resources(&self) -> crate::error::Result<Vec<PathBuf>> {
        Ok(self.0.clone())
    }
}

/// Serves canned metadata; paths without an entry fail to extract.
#[derive(Default)]
struct CannedMetadata(HashMap<PathBuf, TrackMetadata>);

impl CannedMetadata {
    fn with(mut self, path: &str, title: &str, artist: &str, artwork: Option<&[u8]>) -> Self {
        self.0.insert(
            PathBuf::from(path),
            TrackMetadata {
                title: title.into(),
                artist: artist.into(),
                album: "Album".into(),
                artwork: artwork.map(<[u8]>::to_vec),
                duration: Some(Duration::from_secs(180)),
                ..TrackMetadata::default()
            },
        );
        self
    }
}

impl MetadataSource for CannedMetadata {
    fn extract(&self, source: &Path) -> Result<TrackMetadata, MetadataError> {
        self.0
            .get(source)
            .cloned()
            .ok_or_else(|| MetadataError::Unsupported(source.to_path_buf()))
    }
}

fn paths(names: &[&str]) -> Vec<PathBuf> {
    names.iter().map(PathBuf::from).collect()
}

#[test]
fn build_keeps_enumeration_order_and_tolerates_missing_artwork() {
    let enumerator = FixedResources(paths(&["/m/c.mp3", "/m/a.mp3", "/m/b.mp3"]));
    let metadata = CannedMetadata::default()
        .with("/m/c.mp3", "Gamma", "Zed", Some(b"png-bytes"))
        .with("/m/a.mp3", "Alpha", "Amy", None)
        .with("/m/b.mp3", "Beta", "Bob", Some(b"jpg-bytes"));

    let catalog = Catalog::build(&enumerator, &metadata, &LibrarySettings::default()).unwrap();

    assert_eq!(catalog.len(), 3);
    let titles: Vec<&str> = catalog.tracks().iter().map(|t| t.title.as_str()).collect();
    assert_eq!(titles, vec!["Gamma", "Alpha", "Beta"]);
    assert!(catalog.get(0).unwrap().has_artwork());
    assert_eq!(catalog.get(1).unwrap().artwork, None);
    assert!(catalog.get(2).unwrap().has_artwork());
    assert_eq!(catalog.get(1).unwrap().source, PathBuf::from("/m/a.mp3"));
}

#[test]
fn build_keeps_unreadable_resources_with_empty_text() {
    let enumerator = FixedResources(paths(&["/m/good.mp3", "/m/broken.mp3"]));
    let metadata = CannedMetadata::default().with("/m/good.mp3", "Good", "Artist", None);

    let catalog = Catalog::build(&enumerator, &metadata, &LibrarySettings::default()).unwrap();

    assert_eq!(catalog.len(), 2);
    let broken = catalog.get(1).unwrap();
    assert_eq!(broken.title, "");
    assert_eq!(broken.artist, "");
    assert_eq!(broken.album, "");
    assert_eq!(broken.artwork, None);
    assert_eq!(broken.duration, None);
    // The list label still has something to show.
    assert_eq!(broken.display, "broken");
    assert_eq!(catalog.get(0).unwrap().display, "Artist - Good");
}

#[test]
fn build_with_no_resources_is_an_empty_catalog_error() {
    let enumerator = FixedResources(Vec::new());
    let err = Catalog::build(&enumerator, &CannedMetadata::default(), &LibrarySettings::default())
        .unwrap_err();
    assert!(matches!(err, PlayerError::EmptyCatalog));
}

#[test]
fn lookups_match_case_insensitively_and_ignore_blank_queries() {
    let enumerator = FixedResources(paths(&["/m/1.mp3", "/m/2.mp3", "/m/3.mp3"]));
    let metadata = CannedMetadata::default()
        .with("/m/1.mp3", "One", "Amy", None)
        .with("/m/2.mp3", "Two", "Bob", None)
        .with("/m/3.mp3", "one", "AMY", None);
    let catalog = Catalog::build(&enumerator, &metadata, &LibrarySettings::default()).unwrap();

    assert_eq!(catalog.positions_by_artist("amy"), vec![0, 2]);
    assert_eq!(catalog.positions_by_title(" ONE "), vec![0, 2]);
    assert_eq!(catalog.positions_by_album("album"), vec![0, 1, 2]);
    assert!(catalog.positions_by_artist("   ").is_empty());
    assert!(catalog.positions_by_artist("nobody").is_empty());
}

fn tagged(title: &str, artist: &str, album: &str, year: Option<u32>, genre: &str) -> TrackRecord {
    TrackRecord {
        title: title.into(),
        artist: artist.into(),
        album: album.into(),
        year,
        genre: genre.into(),
        source: PathBuf::from(format!("/m/{title}.mp3")),
        artwork: None,
        duration: None,
        display: title.into(),
    }
}

fn grouped_catalog() -> Catalog {
    Catalog::from_records(vec![
        tagged("a", "Zed", "Live", Some(2001), "Rock"),
        tagged("b", "amy", "Songs", Some(1999), "jazz"),
        tagged("c", "Amy", "Live", None, ""),
        tagged("d", "", "", Some(2001), "Rock"),
        tagged("e", "Zed", "Live", Some(1999), "Jazz"),
    ])
    .unwrap()
}

fn names_and_positions(groups: &[TrackGroup]) -> Vec<(&str, Vec<usize>)> {
    groups
        .iter()
        .map(|g| (g.name.as_str(), g.positions.clone()))
        .collect()
}

#[test]
fn all_tracks_is_one_group_in_catalog_order() {
    let catalog = grouped_catalog();
    assert_eq!(
        names_and_positions(&catalog.groups(GroupKind::AllTracks)),
        vec![("All tracks", vec![0, 1, 2, 3, 4])]
    );
}

#[test]
fn artists_group_case_insensitively_with_unknown_bucket() {
    let catalog = grouped_catalog();
    assert_eq!(
        names_and_positions(&catalog.groups(GroupKind::Artists)),
        vec![("amy", vec![1, 2]), ("Unknown", vec![3]), ("Zed", vec![0, 4])]
    );
}

#[test]
fn albums_with_the_same_name_stay_apart_per_artist() {
    let catalog = grouped_catalog();
    assert_eq!(
        names_and_positions(&catalog.groups(GroupKind::Albums)),
        vec![
            ("Live", vec![2]),
            ("Live", vec![0, 4]),
            ("Songs", vec![1]),
            ("Unknown", vec![3]),
        ]
    );
}

#[test]
fn years_and_genres_skip_untagged_tracks() {
    let catalog = grouped_catalog();
    assert_eq!(
        names_and_positions(&catalog.groups(GroupKind::Years)),
        vec![("1999", vec![1, 4]), ("2001", vec![0, 3])]
    );
    assert_eq!(
        names_and_positions(&catalog.groups(GroupKind::Genres)),
        vec![("jazz", vec![1, 4]), ("Rock", vec![0, 3])]
    );
}

#[test]
fn group_kinds_cycle_back_to_all_tracks() {
    let mut kind = GroupKind::default();
    let mut seen = vec![kind.label()];
    for _ in 0..5 {
        kind = kind.cycle();
        seen.push(kind.label());
    }
    assert_eq!(seen, vec!["tracks", "albums", "artists", "years", "genres", "tracks"]);
}

#[test]
fn display_from_fields_can_format_artist_title() {
    let p = Path::new("/tmp/Song.mp3");
    let fields = [TrackDisplayField::Artist, TrackDisplayField::Title];
    assert_eq!(
        display_from_fields(p, "Song", "Artist", "", &fields, " - "),
        "Artist - Song"
    );
    assert_eq!(
        display_from_fields(p, "Song", "  Artist  ", "", &fields, " - "),
        "Artist - Song"
    );
    assert_eq!(display_from_fields(p, "Song", "", "", &fields, " - "), "Song");
}

#[test]
fn display_from_fields_falls_back_to_file_stem() {
    let p = Path::new("/tmp/untagged-take.flac");
    assert_eq!(
        display_from_fields(p, "", "", "", &[TrackDisplayField::Artist], " - "),
        "untagged-take"
    );
    assert_eq!(
        display_from_fields(p, "", "", "Album", &[TrackDisplayField::Album, TrackDisplayField::Filename], "::"),
        "Album::untagged-take"
    );
}

#[test]
fn is_audio_file_matches_configured_extensions_case_insensitive() {
    let settings = LibrarySettings::default();
    assert!(is_audio_file(Path::new("/tmp/a.mp3"), &settings));
    assert!(is_audio_file(Path::new("/tmp/a.MP3"), &settings));
    assert!(is_audio_file(Path::new("/tmp/a.flac"), &settings));
    assert!(is_audio_file(Path::new("/tmp/a.wav"), &settings));
    assert!(is_audio_file(Path::new("/tmp/a.ogg"), &settings));
    assert!(!is_audio_file(Path::new("/tmp/a.txt"), &settings));
    assert!(!is_audio_file(Path::new("/tmp/a"), &settings));
}

#[test]
fn enumerator_filters_non_audio_and_orders_by_file_name() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("b.MP3"), b"not a real mp3").unwrap();
    fs::write(dir.path().join("a.ogg"), b"not a real ogg").unwrap();
    fs::write(dir.path().join("c.txt"), b"ignore me").unwrap();

    let found = DirectoryEnumerator::new(dir.path(), &LibrarySettings::default())
        .list_resources()
        .unwrap();
    assert_eq!(
        found,
        vec![dir.path().join("a.ogg"), dir.path().join("b.MP3")]
    );
}

#[test]
fn enumerator_respects_include_hidden_false() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join(".hidden.mp3"), b"not real").unwrap();
    fs::write(dir.path().join("visible.mp3"), b"not real").unwrap();

    let settings = LibrarySettings {
        include_hidden: false,
        ..LibrarySettings::default()
    };
    let found = DirectoryEnumerator::new(dir.path(), &settings)
        .list_resources()
        .unwrap();
    assert_eq!(found, vec![dir.path().join("visible.mp3")]);
}

#[test]
fn enumerator_respects_recursive_false_and_max_depth() {
    let dir = tempdir().unwrap();
    let d1 = dir.path().join("d1");
    let d2 = d1.join("d2");
    fs::create_dir_all(&d2).unwrap();
    fs::write(dir.path().join("root.mp3"), b"not real").unwrap();
    fs::write(d1.join("one.mp3"), b"not real").unwrap();
    fs::write(d2.join("two.mp3"), b"not real").unwrap();

    let flat = LibrarySettings {
        recursive: false,
        ..LibrarySettings::default()
    };
    let found = DirectoryEnumerator::new(dir.path(), &flat)
        .list_resources()
        .unwrap();
    assert_eq!(found, vec![dir.path().join("root.mp3")]);

    // WalkDir depth counts root as 0, children as 1, grandchildren as 2.
    let capped = LibrarySettings {
        max_depth: Some(2),
        ..LibrarySettings::default()
    };
    let found = DirectoryEnumerator::new(dir.path(), &capped)
        .list_resources()
        .unwrap();
    assert!(found.contains(&d1.join("one.mp3")));
    assert!(found.contains(&dir.path().join("root.mp3")));
    assert!(!found.contains(&d2.join("two.mp3")));
}

#[test]
fn enumerator_reports_missing_root() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("nope");
    let err = DirectoryEnumerator::new(&missing, &LibrarySettings::default())
        .list_resources()
        .unwrap_err();
    assert!(matches!(err, PlayerError::MissingRoot(p) if p == missing));
}

#[test]
fn build_from_directory_with_unparseable_files_uses_file_names() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("01 intro.mp3"), b"garbage").unwrap();
    fs::write(dir.path().join("02 outro.mp3"), b"garbage").unwrap();

    let settings = LibrarySettings::default();
    let catalog = Catalog::build(
        &DirectoryEnumerator::new(dir.path(), &settings),
        &TagReader,
        &settings,
    )
    .unwrap();

    let labels: Vec<&str> = catalog.tracks().iter().map(|t| t.display.as_str()).collect();
    assert_eq!(labels, vec!["01 intro", "02 outro"]);
    assert!(catalog.tracks().iter().all(|t| t.title.is_empty()));
}
