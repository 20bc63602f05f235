use std::path::PathBuf;
use std::sync::Arc;

use super::*;
use crate::catalog::{Catalog, GroupKind, TrackRecord};
use crate::cursor::NowPlayingObserver;
use crate::transport::{RepeatMode, TransportState};

fn t(label: &str, artist: &str, album: &str) -> TrackRecord {
    TrackRecord {
        title: label.into(),
        artist: artist.into(),
        album: album.into(),
        year: None,
        genre: String::new(),
        source: PathBuf::from(format!("/music/{label}.mp3")),
        artwork: None,
        duration: None,
        display: label.into(),
    }
}

fn app_of(labels: &[&str]) -> App {
    let tracks = labels.iter().map(|l| t(l, "", "")).collect();
    App::new(Arc::new(Catalog::from_records(tracks).unwrap()))
}

#[test]
fn fuzzy_match_simple() {
    let label = "Hello World";
    assert!(App::fuzzy_match_positions(label, "hw").is_some());
    assert!(App::fuzzy_match_positions(label, "ello").is_some());
    assert!(App::fuzzy_match_positions(label, "xyz").is_none());
    assert_eq!(App::fuzzy_match_positions(label, "HW"), Some(vec![0, 6]));
}

#[test]
fn display_indices_respects_filter_query() {
    let mut app = app_of(&["Alpha", "Beta", "Gamma", "Delta"]);
    app.push_filter_char('e');
    app.push_filter_char('t');
    assert_eq!(app.display_indices(), vec![1, 3]);
}

#[test]
fn display_indices_uses_fuzzy_not_substring_only() {
    let mut app = app_of(&["Metallica - Blackened", "Black Sabbath - Paranoid"]);
    app.filter_query = "mtbk".into();
    assert_eq!(app.display_indices(), vec![0]);
}

#[test]
fn blank_filter_query_shows_everything() {
    let mut app = app_of(&["Black Sabbath - Paranoid", "Other"]);
    app.filter_query = "Black ".into();
    assert_eq!(app.display_indices(), vec![0]);

    app.filter_query = "   ".into();
    assert_eq!(app.display_indices(), vec![0, 1]);
}

#[test]
fn large_catalogs_filter_the_same_way() {
    let labels: Vec<String> = (0..150).map(|i| format!("Song {i:03}")).collect();
    let refs: Vec<&str> = labels.iter().map(String::as_str).collect();
    let mut app = app_of(&refs);

    app.filter_query = "SONG 149".into();
    assert_eq!(app.display_indices(), vec![149]);
    assert_eq!(app.fuzzy_match_positions_for_track(149, "SONG 149").map(|p| p.len()), Some(8));
}

#[test]
fn filter_prefixes_use_catalog_lookups() {
    let tracks = vec![
        t("One", "Muse", "Absolution"),
        t("Two", "Blur", "Parklife"),
        t("Three", "muse", "Drones"),
    ];
    let mut app = App::new(Arc::new(Catalog::from_records(tracks).unwrap()));

    app.filter_query = "artist: MUSE".into();
    assert_eq!(app.display_indices(), vec![0, 2]);
    assert_eq!(app.fuzzy_query(), None);

    app.filter_query = "album:parklife".into();
    assert_eq!(app.display_indices(), vec![1]);

    app.filter_query = "title:three".into();
    assert_eq!(app.display_indices(), vec![2]);

    app.filter_query = "artist:".into();
    assert_eq!(app.display_indices(), vec![0, 1, 2]);

    // Unknown prefixes are plain fuzzy text.
    app.filter_query = "genre:x".into();
    assert_eq!(app.fuzzy_query(), Some("genre:x"));
}

#[test]
fn filter_query_parse() {
    assert_eq!(FilterQuery::parse("  abc "), FilterQuery::Fuzzy("abc"));
    assert_eq!(FilterQuery::parse("Artist: Muse"), FilterQuery::Artist("Muse"));
    assert_eq!(FilterQuery::parse("album:x"), FilterQuery::Album("x"));
    assert_eq!(FilterQuery::parse("title:"), FilterQuery::Title(""));
}

#[test]
fn next_prev_in_view_helpers_work() {
    let mut app = app_of(&["Alpha", "Beta", "Gamma"]);
    app.filter_query = "et".into(); // only Beta is visible

    assert_eq!(app.next_in_view_from(0), Some(1));
    assert_eq!(app.prev_in_view_from(0), Some(1));
    assert_eq!(app.next_in_view_from(1), Some(1));
    assert_eq!(app.prev_in_view_from(1), Some(1));
}

#[test]
fn selection_wraps_and_jumps_to_ends() {
    let mut app = app_of(&["a", "b", "c"]);
    app.prev();
    assert_eq!(app.selected, 2);
    app.next();
    assert_eq!(app.selected, 0);

    app.select_last();
    assert_eq!(app.selected, 2);
    app.select_first();
    assert_eq!(app.selected, 0);
}

#[test]
fn filtering_moves_selection_into_view() {
    let mut app = app_of(&["Alpha", "Beta", "Gamma"]);
    app.enter_filter_mode();
    assert!(!app.follow_playback);

    for c in "gam".chars() {
        app.push_filter_char(c);
    }
    assert_eq!(app.selected, 2);

    app.clear_filter();
    assert!(!app.filter_mode);
    assert_eq!(app.selected, 2);
}

#[test]
fn feed_updates_now_playing_and_follow_moves_selection() {
    let mut app = app_of(&["a", "b", "c"]);
    let feed = app.feed();

    feed.track_changed(2, &t("c", "", ""));
    feed.state_changed(TransportState::Playing);
    feed.repeat_changed(RepeatMode::RepeatOne);

    let now = app.now_playing();
    assert_eq!(now.position, Some(2));
    assert_eq!(now.state, TransportState::Playing);
    assert_eq!(now.repeat, RepeatMode::RepeatOne);
    assert_eq!(app.now_playing_track().map(|t| t.title.as_str()), Some("c"));

    app.sync_follow();
    assert_eq!(app.selected, 2);
}

#[test]
fn free_roam_keeps_selection() {
    let mut app = app_of(&["a", "b", "c"]);
    let feed = app.feed();
    app.follow_playback_off();

    feed.track_changed(1, &t("b", "", ""));
    app.sync_follow();
    assert_eq!(app.selected, 0);

    app.follow_playback_on();
    app.sync_follow();
    assert_eq!(app.selected, 1);
}

#[test]
fn metadata_window_toggles() {
    let mut app = app_of(&["a"]);
    assert!(!app.metadata_window);
    app.toggle_metadata_window();
    assert!(app.metadata_window);
    assert_eq!(app.selected_track().map(|t| t.title.as_str()), Some("a"));
}

fn band_app() -> App {
    let tracks = vec![
        t("One", "Muse", "Absolution"),
        t("Two", "Blur", "Parklife"),
        t("Three", "muse", "Drones"),
        t("Four", "Blur", "Parklife"),
    ];
    App::new(Arc::new(Catalog::from_records(tracks).unwrap()))
}

#[test]
fn grouping_lists_groups_and_opening_one_narrows_the_view() {
    let mut app = band_app();
    app.set_group_kind(GroupKind::Artists);
    assert!(app.browsing_groups);
    let names: Vec<&str> = app.groups().iter().map(|g| g.name.as_str()).collect();
    assert_eq!(names, vec!["Blur", "Muse"]);

    app.open_selected_group();
    assert!(!app.browsing_groups);
    assert!(!app.follow_playback);
    assert_eq!(app.active_group().map(|g| g.name.as_str()), Some("Blur"));
    assert_eq!(app.display_indices(), vec![1, 3]);
    assert_eq!(app.selected, 1);

    // The filter applies inside the group.
    app.filter_query = "fo".into();
    assert_eq!(app.display_indices(), vec![3]);
    app.filter_query.clear();

    app.next();
    assert_eq!(app.selected, 3);
    app.next();
    assert_eq!(app.selected, 1);

    app.back_to_groups();
    assert!(app.browsing_groups);
    assert!(app.active_group().is_none());
    assert_eq!(app.display_indices(), vec![0, 1, 2, 3]);
}

#[test]
fn group_selection_wraps_and_all_tracks_leaves_the_browser() {
    let mut app = band_app();
    app.cycle_group_kind();
    assert_eq!(app.group_kind(), GroupKind::Albums);
    assert_eq!(app.groups().len(), 3);

    app.prev_group();
    assert_eq!(app.group_selected, 2);
    app.next_group();
    assert_eq!(app.group_selected, 0);
    app.select_last_group();
    assert_eq!(app.group_selected, 2);

    app.set_group_kind(GroupKind::AllTracks);
    assert!(!app.browsing_groups);
    assert!(app.groups().is_empty());
    app.back_to_groups();
    assert!(!app.browsing_groups);
}

#[test]
fn follow_ignores_tracks_outside_the_open_group() {
    let mut app = band_app();
    let feed = app.feed();
    app.set_group_kind(GroupKind::Artists);
    app.open_selected_group();
    app.follow_playback_on();

    feed.track_changed(2, &t("Three", "muse", "Drones"));
    app.sync_follow();
    assert_eq!(app.selected, 1);

    feed.track_changed(3, &t("Four", "Blur", "Parklife"));
    app.sync_follow();
    assert_eq!(app.selected, 3);
}

#[test]
fn filtering_from_the_group_list_shows_tracks() {
    let mut app = band_app();
    app.set_group_kind(GroupKind::Albums);
    app.enter_filter_mode();
    assert!(!app.browsing_groups);
    app.push_filter_char('w');
    assert_eq!(app.display_indices(), vec![1]);
}
