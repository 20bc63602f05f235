//! Application model: `App`.
//!
//! The `App` struct holds the catalog view, the selected row and the flags
//! the UI and runtime toggle.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use crate::catalog::{Catalog, GroupKind, TrackGroup, TrackRecord};

use super::now_playing::{NowPlaying, ScreenFeed, SharedNowPlaying};

/// A parsed filter query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterQuery<'a> {
    /// Fuzzy subsequence match on list labels.
    Fuzzy(&'a str),
    Artist(&'a str),
    Album(&'a str),
    Title(&'a str),
}

impl<'a> FilterQuery<'a> {
    /// `artist:`, `album:` and `title:` select a field lookup; anything else is fuzzy.
    pub fn parse(query: &'a str) -> Self {
        let query = query.trim();
        let Some((prefix, rest)) = query.split_once(':') else {
            return FilterQuery::Fuzzy(query);
        };
        match prefix.trim().to_ascii_lowercase().as_str() {
            "artist" => FilterQuery::Artist(rest.trim()),
            "album" => FilterQuery::Album(rest.trim()),
            "title" => FilterQuery::Title(rest.trim()),
            _ => FilterQuery::Fuzzy(query),
        }
    }
}

/// The main application model.
pub struct App {
    catalog: Arc<Catalog>,
    pub selected: usize,
    now: SharedNowPlaying,

    lower_labels: Option<Vec<String>>,

    pub follow_playback: bool,
    pub filter_mode: bool,
    pub filter_query: String,
    pub current_dir: Option<String>,
    pub metadata_window: bool,

    group_kind: GroupKind,
    groups: Vec<TrackGroup>,
    /// Highlighted row of the group list.
    pub group_selected: usize,
    /// Showing the group list instead of tracks.
    pub browsing_groups: bool,
    /// Group whose tracks the list is narrowed to.
    active_group: Option<usize>,
}

impl App {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        // For larger libraries, precompute lowercase labels so fuzzy filtering
        // doesn't lowercase every label on each keystroke.
        let lower_labels = if catalog.len() > 100 {
            Some(
                catalog
                    .tracks()
                    .iter()
                    .map(|t| t.display.to_ascii_lowercase())
                    .collect(),
            )
        } else {
            None
        };

        Self {
            catalog,
            selected: 0,
            now: Rc::new(RefCell::new(NowPlaying::default())),
            lower_labels,
            follow_playback: true,
            filter_mode: false,
            filter_query: String::new(),
            current_dir: None,
            metadata_window: false,
            group_kind: GroupKind::AllTracks,
            groups: Vec::new(),
            group_selected: 0,
            browsing_groups: false,
            active_group: None,
        }
    }

    /// An observer that feeds transport changes into this screen.
    pub fn feed(&self) -> ScreenFeed {
        ScreenFeed::new(self.now.clone())
    }

    pub fn tracks(&self) -> &[TrackRecord] {
        self.catalog.tracks()
    }

    pub fn now_playing(&self) -> NowPlaying {
        *self.now.borrow()
    }

    pub fn now_playing_track(&self) -> Option<&TrackRecord> {
        self.now_playing().position.and_then(|i| self.catalog.get(i))
    }

    pub fn selected_track(&self) -> Option<&TrackRecord> {
        self.catalog.get(self.selected)
    }

    pub fn toggle_metadata_window(&mut self) {
        self.metadata_window = !self.metadata_window;
    }

    pub fn set_current_dir(&mut self, dir: String) {
        self.current_dir = Some(dir);
    }

    pub fn follow_playback_on(&mut self) {
        self.follow_playback = true;
    }

    pub fn follow_playback_off(&mut self) {
        self.follow_playback = false;
    }

    /// Move the selection onto the now-playing track while following.
    ///
    /// A track outside the open group does not pull the selection along.
    pub fn sync_follow(&mut self) {
        if !self.follow_playback || self.filter_mode || self.browsing_groups {
            return;
        }
        if let Some(idx) = self.now_playing().position {
            if self.selected != idx && self.in_active_group(idx) {
                self.set_selected(idx);
            }
        }
    }

    pub fn group_kind(&self) -> GroupKind {
        self.group_kind
    }

    /// Groups for the current grouping; empty while showing all tracks.
    pub fn groups(&self) -> &[TrackGroup] {
        &self.groups
    }

    pub fn active_group(&self) -> Option<&TrackGroup> {
        self.active_group.and_then(|i| self.groups.get(i))
    }

    /// Switch to the next grouping and show its group list.
    pub fn cycle_group_kind(&mut self) {
        self.set_group_kind(self.group_kind.cycle());
    }

    pub fn set_group_kind(&mut self, kind: GroupKind) {
        self.group_kind = kind;
        self.active_group = None;
        self.group_selected = 0;
        if kind == GroupKind::AllTracks {
            self.groups.clear();
            self.browsing_groups = false;
            self.ensure_selected_visible();
        } else {
            self.groups = self.catalog.groups(kind);
            self.browsing_groups = true;
        }
    }

    pub fn next_group(&mut self) {
        if !self.groups.is_empty() {
            self.group_selected = (self.group_selected + 1) % self.groups.len();
        }
    }

    pub fn prev_group(&mut self) {
        if !self.groups.is_empty() {
            self.group_selected = self
                .group_selected
                .checked_sub(1)
                .unwrap_or(self.groups.len() - 1);
        }
    }

    pub fn select_first_group(&mut self) {
        self.group_selected = 0;
    }

    pub fn select_last_group(&mut self) {
        self.group_selected = self.groups.len().saturating_sub(1);
    }

    /// Narrow the track list to the highlighted group.
    pub fn open_selected_group(&mut self) {
        if self.group_selected >= self.groups.len() {
            return;
        }
        self.active_group = Some(self.group_selected);
        self.browsing_groups = false;
        self.follow_playback_off();
        self.select_first();
    }

    /// Leave an open group and go back to the group list.
    pub fn back_to_groups(&mut self) {
        if self.group_kind == GroupKind::AllTracks {
            return;
        }
        self.active_group = None;
        self.browsing_groups = true;
    }

    fn in_active_group(&self, position: usize) -> bool {
        self.active_group()
            .is_none_or(|group| group.positions.binary_search(&position).is_ok())
    }

    /// Catalog positions visible under the open group and the filter, in catalog order.
    pub fn display_indices(&self) -> Vec<usize> {
        let mut indices = self.filtered_indices();
        if let Some(group) = self.active_group() {
            indices.retain(|i| group.positions.binary_search(i).is_ok());
        }
        indices
    }

    fn filtered_indices(&self) -> Vec<usize> {
        let all = || (0..self.catalog.len()).collect::<Vec<_>>();
        match FilterQuery::parse(&self.filter_query) {
            FilterQuery::Fuzzy("") => all(),
            FilterQuery::Fuzzy(query) => match self.lower_labels.as_deref() {
                Some(lower_labels) => {
                    let query_lower = query.to_ascii_lowercase();
                    (0..self.catalog.len())
                        .filter(|&i| {
                            Self::fuzzy_match_positions_lower(&lower_labels[i], &query_lower)
                                .is_some()
                        })
                        .collect()
                }
                None => self
                    .tracks()
                    .iter()
                    .enumerate()
                    .filter(|(_, t)| Self::fuzzy_match_positions(&t.display, query).is_some())
                    .map(|(i, _)| i)
                    .collect(),
            },
            // A bare prefix hasn't narrowed anything yet.
            FilterQuery::Artist("") | FilterQuery::Album("") | FilterQuery::Title("") => all(),
            FilterQuery::Artist(artist) => self.catalog.positions_by_artist(artist),
            FilterQuery::Album(album) => self.catalog.positions_by_album(album),
            FilterQuery::Title(title) => self.catalog.positions_by_title(title),
        }
    }

    /// The active fuzzy query, if the filter is a fuzzy one. Used for highlighting.
    pub fn fuzzy_query(&self) -> Option<&str> {
        match FilterQuery::parse(&self.filter_query) {
            FilterQuery::Fuzzy(q) if !q.is_empty() => Some(q),
            _ => None,
        }
    }

    /// Fuzzy-match `query` against a specific track's label.
    pub fn fuzzy_match_positions_for_track(&self, index: usize, query: &str) -> Option<Vec<usize>> {
        match self.lower_labels.as_deref() {
            Some(lower_labels) => {
                Self::fuzzy_match_positions_lower(&lower_labels[index], &query.to_ascii_lowercase())
            }
            None => Self::fuzzy_match_positions(&self.tracks()[index].display, query),
        }
    }

    /// Fuzzy/subsequence match: return the character positions in `label`
    /// that match `query`, or `None` if not matched.
    pub fn fuzzy_match_positions(label: &str, query: &str) -> Option<Vec<usize>> {
        if query.is_empty() {
            return Some(Vec::new());
        }

        let mut positions: Vec<usize> = Vec::new();
        let mut label_iter = label.chars().enumerate();

        for qc in query.chars() {
            let qc_low = qc.to_ascii_lowercase();
            loop {
                match label_iter.next() {
                    Some((li, lc)) if lc.to_ascii_lowercase() == qc_low => {
                        positions.push(li);
                        break;
                    }
                    Some(_) => continue,
                    None => return None,
                }
            }
        }

        Some(positions)
    }

    fn fuzzy_match_positions_lower(label_lower: &str, query_lower: &str) -> Option<Vec<usize>> {
        if query_lower.is_empty() {
            return Some(Vec::new());
        }

        let mut positions: Vec<usize> = Vec::new();
        let mut label_iter = label_lower.chars().enumerate();

        for qc in query_lower.chars() {
            loop {
                match label_iter.next() {
                    Some((li, lc)) if lc == qc => {
                        positions.push(li);
                        break;
                    }
                    Some(_) => continue,
                    None => return None,
                }
            }
        }

        Some(positions)
    }

    /// Next visible index after `current`, wrapping to the first.
    pub fn next_in_view_from(&self, current: usize) -> Option<usize> {
        let display = self.display_indices();
        if display.is_empty() {
            return None;
        }

        match display.iter().position(|&i| i == current) {
            Some(p) => Some(display[(p + 1) % display.len()]),
            None => Some(display[0]),
        }
    }

    /// Previous visible index before `current`, wrapping to the last.
    pub fn prev_in_view_from(&self, current: usize) -> Option<usize> {
        let display = self.display_indices();
        if display.is_empty() {
            return None;
        }

        match display.iter().position(|&i| i == current) {
            Some(0) | None => Some(display[display.len() - 1]),
            Some(p) => Some(display[p - 1]),
        }
    }

    pub fn set_selected(&mut self, idx: usize) {
        self.selected = idx;
        self.ensure_selected_visible();
    }

    pub fn select_first(&mut self) {
        if let Some(&first) = self.display_indices().first() {
            self.set_selected(first);
        }
    }

    pub fn select_last(&mut self) {
        if let Some(&last) = self.display_indices().last() {
            self.set_selected(last);
        }
    }

    pub fn enter_filter_mode(&mut self) {
        self.filter_mode = true;
        self.browsing_groups = false;
        self.follow_playback_off();
        self.ensure_selected_visible();
    }

    pub fn exit_filter_mode(&mut self) {
        self.filter_mode = false;
    }

    pub fn clear_filter(&mut self) {
        self.filter_query.clear();
        self.filter_mode = false;
        self.ensure_selected_visible();
    }

    pub fn push_filter_char(&mut self, c: char) {
        self.filter_query.push(c);
        self.ensure_selected_visible();
    }

    pub fn pop_filter_char(&mut self) {
        self.filter_query.pop();
        self.ensure_selected_visible();
    }

    /// Keep `selected` inside the filtered view, else move to its first entry.
    fn ensure_selected_visible(&mut self) {
        let display = self.display_indices();
        if display.is_empty() {
            return;
        }
        if !display.contains(&self.selected) {
            self.selected = display[0];
        }
    }

    pub fn next(&mut self) {
        if let Some(next) = self.next_in_view_from(self.selected) {
            self.selected = next;
        }
    }

    pub fn prev(&mut self) {
        if let Some(prev) = self.prev_in_view_from(self.selected) {
            self.selected = prev;
        }
    }
}
