//! UI rendering helpers for the terminal user interface.
//!
//! This module contains functions to render the TUI using `ratatui`.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Padding, Paragraph, Wrap},
};
use std::time::Duration;

use crate::app::App;
use crate::catalog::{GroupKind, TrackGroup, TrackRecord, file_stem};
use crate::config::{ControlsSettings, TimeField, TrackDisplayField, UiSettings};
use crate::transport::{Progress, TransportState};

const CONTROLS: &[(&str, &str)] = &[
    ("j/k", "up/down"),
    ("h/l", "prev/next song"),
    ("H/L", ""),
    ("enter", "play selected song"),
    ("space/p", "play/pause"),
    ("s", "stop"),
    ("gg/G", "top/bottom"),
    ("K", "details"),
    ("/", "filter"),
    ("tab", "group by album/artist/year/genre"),
    ("bksp", "back to groups"),
    ("r", "repeat mode"),
    ("q", "quit"),
];

/// Render the controls help text, incorporating scrub seconds.
fn controls_text(scrub_seconds: u64) -> String {
    CONTROLS
        .iter()
        .map(|(key, what)| {
            if *key == "H/L" {
                format!("[H/L] scrub -/+{scrub_seconds}s")
            } else {
                format!("[{key}] {what}")
            }
        })
        .collect::<Vec<String>>()
        .join(" | ")
}

/// Format a `Duration` as `MM:SS`.
pub(crate) fn format_mmss(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Build the "now playing" track text according to `ui` settings.
fn now_playing_track_text(track: &TrackRecord, ui: &UiSettings) -> String {
    let mut parts: Vec<&str> = Vec::new();

    let path = track.source.display().to_string();
    for f in &ui.now_playing_track_fields {
        let value = match f {
            TrackDisplayField::Display => track.display.as_str(),
            TrackDisplayField::Title => track.title.as_str(),
            TrackDisplayField::Artist => track.artist.as_str(),
            TrackDisplayField::Album => track.album.as_str(),
            TrackDisplayField::Filename => file_stem(&track.source),
            TrackDisplayField::Path => path.as_str(),
        };
        let value = value.trim();
        if !value.is_empty() {
            parts.push(value);
        }
    }

    if parts.is_empty() {
        track.display.clone()
    } else {
        parts.join(&ui.now_playing_track_separator)
    }
}

/// Build the now-playing time text (elapsed/total/remaining) per `UiSettings`.
fn now_playing_time_text(progress: Progress, ui: &UiSettings) -> Option<String> {
    let mut parts: Vec<String> = Vec::new();
    for f in &ui.now_playing_time_fields {
        match f {
            TimeField::Elapsed => parts.push(format_mmss(progress.elapsed)),
            TimeField::Total => {
                if let Some(t) = progress.total {
                    parts.push(format_mmss(t));
                }
            }
            TimeField::Remaining => {
                if let Some(rem) = progress.remaining() {
                    parts.push(format!("-{}", format_mmss(rem)));
                }
            }
        }
    }

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(&ui.now_playing_time_separator))
    }
}

/// Status line: repeat mode, transport state, song and time.
fn status_text(app: &App, progress: Progress, ui: &UiSettings) -> String {
    let now = app.now_playing();
    let mut parts: Vec<String> = Vec::new();

    parts.push(if app.follow_playback {
        "CURSOR: Follow".to_string()
    } else {
        "CURSOR: Free-roam".to_string()
    });
    parts.push(format!("PLAYBACK: {}", now.repeat.label()));

    if app.group_kind() != GroupKind::AllTracks {
        match app.active_group() {
            Some(group) => {
                parts.push(format!("BROWSE: {} / {}", app.group_kind().label(), group.name))
            }
            None => parts.push(format!("BROWSE: {}", app.group_kind().label())),
        }
    }

    let q = app.filter_query.trim();
    if app.filter_mode || !q.is_empty() {
        parts.push(format!("FILTER: {q}").trim_end().to_string());
    }

    parts.push(now.state.to_string());
    if let Some(track) = app.now_playing_track() {
        let song = now_playing_track_text(track, ui);
        match now_playing_time_text(progress, ui) {
            Some(time) if now.state != TransportState::Idle => {
                parts.push(format!("Song: {song} [{time}]"))
            }
            _ => parts.push(format!("Song: {song}")),
        }
    }

    if let Some(dir) = &app.current_dir {
        parts.push(format!("Dir: {dir}"));
    }

    parts.join(" • ")
}

/// Detail text for the popup: tags, duration, artwork and source.
fn detail_text(track: Option<&TrackRecord>) -> String {
    let Some(track) = track else {
        return "No track selected".to_string();
    };
    let or_dash = |s: &str| {
        if s.trim().is_empty() {
            "-".to_string()
        } else {
            s.to_string()
        }
    };
    let artwork = match &track.artwork {
        Some(bytes) if track.has_artwork() => format!("{} bytes", bytes.len()),
        _ => "none".to_string(),
    };
    let year = track.year.map_or_else(|| "-".to_string(), |y| y.to_string());
    format!(
        "Title: {}\nArtist: {}\nAlbum: {}\nYear: {}\nGenre: {}\nDuration: {}\nArtwork: {}\nPath: {}",
        or_dash(&track.title),
        or_dash(&track.artist),
        or_dash(&track.album),
        year,
        or_dash(&track.genre),
        format_duration_mmss_ceil(track.duration),
        artwork,
        track.source.display()
    )
}

/// Row label for the group list.
fn group_label(group: &TrackGroup) -> String {
    let n = group.positions.len();
    format!("{} ({n} {})", group.name, if n == 1 { "track" } else { "tracks" })
}

/// First and one-past-last row of a `height`-row window over `total` rows,
/// centered on `selected` when possible.
fn visible_window(total: usize, selected: usize, height: usize) -> (usize, usize) {
    if total <= height || height == 0 {
        return (0, total);
    }
    let mut start = selected.saturating_sub(height / 2);
    if start + height > total {
        start = total - height;
    }
    (start, start + height)
}

/// Compute a centered rectangle with given size constrained to `r`.
fn centered_rect_sized(mut width: u16, mut height: u16, r: Rect) -> Rect {
    width = width.min(r.width.saturating_sub(2)).max(10);
    height = height.min(r.height.saturating_sub(2)).max(5);

    let x = r.x + (r.width.saturating_sub(width) / 2);
    let y = r.y + (r.height.saturating_sub(height) / 2);
    Rect {
        x,
        y,
        width,
        height,
    }
}

/// Format an optional duration, rounding up partial seconds, showing total seconds.
fn format_duration_mmss_ceil(d: Option<Duration>) -> String {
    let Some(d) = d else {
        return "-".to_string();
    };

    let mut total_secs = d.as_secs();
    if d.subsec_nanos() > 0 {
        total_secs = total_secs.saturating_add(1);
    }

    format!("{}:{:02} ({}s)", total_secs / 60, total_secs % 60, total_secs)
}

/// Uppercase the characters of `label` at `positions` (sorted char indices).
fn highlight(label: &str, positions: &[usize]) -> String {
    let mut rendered = String::with_capacity(label.len());
    let mut pos_iter = positions.iter().copied().peekable();
    for (ci, ch) in label.chars().enumerate() {
        if pos_iter.peek() == Some(&ci) {
            rendered.extend(ch.to_uppercase());
            pos_iter.next();
        } else {
            rendered.push(ch);
        }
    }
    rendered
}

fn padded_block(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .title(title)
        .padding(Padding {
            left: 1,
            right: 0,
            top: 0,
            bottom: 0,
        })
}

/// Render the entire UI into the provided `frame`.
pub fn draw(
    frame: &mut Frame,
    app: &App,
    display: &[usize],
    progress: Progress,
    ui_settings: &UiSettings,
    controls_settings: &ControlsSettings,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(5),
            Constraint::Min(1),
            Constraint::Length(4),
        ])
        .split(frame.area());

    let header = Paragraph::new(ui_settings.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" jukebox ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    let status = Paragraph::new(status_text(app, progress, ui_settings))
        .block(padded_block(" status "))
        .wrap(Wrap { trim: true });
    frame.render_widget(status, chunks[1]);

    // Main list. Only build ListItems for the visible window, centered on the
    // selection when possible.
    let list_height = chunks[2].height.saturating_sub(2) as usize;
    let (items, selected, title): (Vec<ListItem>, Option<usize>, String) = if app.browsing_groups {
        let groups = app.groups();
        let (start, end) = visible_window(groups.len(), app.group_selected, list_height);
        let items = groups[start..end]
            .iter()
            .map(|g| ListItem::new(group_label(g)))
            .collect();
        let selected = (!groups.is_empty()).then(|| app.group_selected.saturating_sub(start));
        (items, selected, format!(" {} ", app.group_kind().label()))
    } else {
        let query = app.fuzzy_query();
        let sel_pos = display.iter().position(|&i| i == app.selected).unwrap_or(0);
        let (start, end) = visible_window(display.len(), sel_pos, list_height);

        let tracks = app.tracks();
        let playing = app.now_playing().position;
        let items = display[start..end]
            .iter()
            .map(|&i| {
                let label = &tracks[i].display;
                let marker = if playing == Some(i) { "♪ " } else { "  " };
                let text = match query.and_then(|q| app.fuzzy_match_positions_for_track(i, q)) {
                    Some(positions) => highlight(label, &positions),
                    None => label.clone(),
                };
                ListItem::new(format!("{marker}{text}"))
            })
            .collect();
        let selected = (!display.is_empty()).then(|| sel_pos - start);
        let title = match app.active_group() {
            Some(group) => format!(" tracks: {} ", group.name),
            None => " tracks ".to_string(),
        };
        (items, selected, title)
    };

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    let mut state = ListState::default();
    state.select(selected);
    frame.render_stateful_widget(list, chunks[2], &mut state);

    // Detail popup stays inside the list area.
    if app.metadata_window {
        let popup_area = centered_rect_sized(72, 12, chunks[2]);
        frame.render_widget(Clear, popup_area);
        let details = Paragraph::new(detail_text(app.selected_track()))
            .block(padded_block(" details (K closes) "))
            .wrap(Wrap { trim: true });
        frame.render_widget(details, popup_area);
    }

    let footer = Paragraph::new(controls_text(controls_settings.scrub_seconds))
        .block(padded_block(" controls "))
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, chunks[3]);
}
