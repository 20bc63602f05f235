use std::sync::mpsc;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::App;
use crate::audio::MediaEngine;
use crate::catalog::GroupKind;
use crate::config;
use crate::mpris::{ControlCmd, MprisHandle};
use crate::runtime::ticker::Ticker;
use crate::transport::{Progress, Transport, TransportState};
use crate::ui;

/// Longest time the loop blocks on terminal input.
const INPUT_POLL: Duration = Duration::from_millis(50);

/// State tracked by the runtime event loop across iterations.
#[derive(Debug, Default)]
pub struct EventLoopState {
    /// Internal two-key prefix state used for `gg` handling.
    pub pending_gg: bool,
    /// What the progress line shows. Resampled on ticks and after commands.
    pub progress: Progress,
    /// Set by commands so the next pass resamples without waiting for a tick.
    pub progress_stale: bool,
}

/// Main terminal event loop: handles input, drawing, track completion and
/// MPRIS commands. Returns `Ok(())` when shutdown is requested.
pub fn run<E: MediaEngine>(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    app: &mut App,
    transport: &mut Transport<E>,
    mpris: &MprisHandle,
    control_rx: &mpsc::Receiver<ControlCmd>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut state = EventLoopState {
        progress: transport.progress(),
        ..EventLoopState::default()
    };
    let mut ticker = Ticker::start(Duration::from_millis(settings.ui.progress_interval_ms));

    loop {
        if transport.poll() {
            state.progress_stale = true;
        }
        app.sync_follow();

        let ticked = ticker.poll_due();
        refresh_progress(&mut state, transport, ticked);
        if ticked {
            mpris.set_position(state.progress.elapsed);
        }

        let display = app.display_indices();
        let progress = state.progress;
        terminal.draw(|f| ui::draw(f, app, &display, progress, &settings.ui, &settings.controls))?;

        while let Ok(cmd) = control_rx.try_recv() {
            state.progress_stale = true;
            if handle_control_cmd(cmd, app, transport) {
                return Ok(());
            }
        }

        if event::poll(ticker.timeout(INPUT_POLL))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if handle_key_event(key, settings, app, transport, &mut state) {
                    return Ok(());
                }
            }
        }
    }
}

/// Resample the displayed progress on a tick, or when a command made it stale.
fn refresh_progress<E: MediaEngine>(
    state: &mut EventLoopState,
    transport: &Transport<E>,
    ticked: bool,
) {
    if ticked || std::mem::take(&mut state.progress_stale) {
        state.progress = transport.progress();
    }
}

/// Apply a transport command. Keys and MPRIS both come through here.
/// Returns true when the app should quit.
pub fn handle_control_cmd<E: MediaEngine>(
    cmd: ControlCmd,
    app: &mut App,
    transport: &mut Transport<E>,
) -> bool {
    tracing::debug!(?cmd, "control command");
    if cmd != ControlCmd::Quit && !app.filter_mode {
        app.follow_playback_on();
    }

    match cmd {
        ControlCmd::Quit => return true,
        ControlCmd::Play => transport.play(),
        ControlCmd::Pause => transport.pause(),
        ControlCmd::PlayPause => transport.toggle(),
        ControlCmd::Stop => transport.stop(),
        ControlCmd::Next => {
            if let Err(e) = transport.next() {
                tracing::warn!("next failed: {e}");
            }
        }
        ControlCmd::Prev => {
            if let Err(e) = transport.previous() {
                tracing::warn!("previous failed: {e}");
            }
        }
        ControlCmd::SetRepeat(mode) => transport.set_repeat_mode(mode),
    }
    false
}

/// Handle one key press. Returns true when the app should quit.
pub fn handle_key_event<E: MediaEngine>(
    key: KeyEvent,
    settings: &config::Settings,
    app: &mut App,
    transport: &mut Transport<E>,
    state: &mut EventLoopState,
) -> bool {
    state.progress_stale = true;
    if app.filter_mode {
        state.pending_gg = false;
        handle_filter_key(key, app, transport);
        return false;
    }

    let was_pending_gg = std::mem::take(&mut state.pending_gg);
    if app.browsing_groups && handle_group_key(key, app, was_pending_gg, state) {
        return false;
    }
    match key.code {
        KeyCode::Char('q') => return true,
        KeyCode::Tab => app.cycle_group_kind(),
        KeyCode::Backspace => app.back_to_groups(),
        KeyCode::Char('/') => app.enter_filter_mode(),
        KeyCode::Char('g') => {
            if was_pending_gg {
                app.follow_playback_off();
                app.select_first();
            } else {
                state.pending_gg = true;
            }
        }
        KeyCode::Char('G') => {
            app.follow_playback_off();
            app.select_last();
        }
        KeyCode::Char('j') | KeyCode::Down => {
            app.follow_playback_off();
            app.next();
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.follow_playback_off();
            app.prev();
        }
        KeyCode::Enter => play_selected(app, transport),
        KeyCode::Char('p') | KeyCode::Char(' ') => {
            handle_control_cmd(ControlCmd::PlayPause, app, transport);
        }
        KeyCode::Char('l') => {
            handle_control_cmd(ControlCmd::Next, app, transport);
        }
        KeyCode::Char('h') => {
            handle_control_cmd(ControlCmd::Prev, app, transport);
        }
        KeyCode::Char('s') => {
            handle_control_cmd(ControlCmd::Stop, app, transport);
        }
        KeyCode::Char('L') => transport.seek_by(scrub_seconds(settings)),
        KeyCode::Char('H') => transport.seek_by(-scrub_seconds(settings)),
        KeyCode::Char('r') => {
            transport.cycle_repeat_mode();
        }
        KeyCode::Char('K') => app.toggle_metadata_window(),
        _ => {}
    }

    false
}

/// Keys that act on the group list. Returns false for keys it leaves to the track view.
fn handle_group_key(
    key: KeyEvent,
    app: &mut App,
    was_pending_gg: bool,
    state: &mut EventLoopState,
) -> bool {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => app.next_group(),
        KeyCode::Char('k') | KeyCode::Up => app.prev_group(),
        KeyCode::Char('g') => {
            if was_pending_gg {
                app.select_first_group();
            } else {
                state.pending_gg = true;
            }
        }
        KeyCode::Char('G') => app.select_last_group(),
        KeyCode::Enter => app.open_selected_group(),
        KeyCode::Esc => app.set_group_kind(GroupKind::AllTracks),
        _ => return false,
    }
    true
}

fn handle_filter_key<E: MediaEngine>(key: KeyEvent, app: &mut App, transport: &mut Transport<E>) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Esc => app.clear_filter(),
        KeyCode::Backspace => app.pop_filter_char(),
        KeyCode::Char('j') | KeyCode::Char('n') if ctrl => {
            app.follow_playback_off();
            app.next();
        }
        KeyCode::Char('k') | KeyCode::Char('p') if ctrl => {
            app.follow_playback_off();
            app.prev();
        }
        KeyCode::Down => app.next(),
        KeyCode::Up => app.prev(),
        KeyCode::Char(c) if !c.is_control() => app.push_filter_char(c),
        KeyCode::Enter => {
            if app.display_indices().is_empty() {
                return;
            }
            app.exit_filter_mode();
            play_selected(app, transport);
        }
        _ => {}
    }
}

/// Play the selected row. The current track keeps playing, or resumes if paused.
fn play_selected<E: MediaEngine>(app: &mut App, transport: &mut Transport<E>) {
    app.follow_playback_on();
    let now = app.now_playing();
    if now.position == Some(app.selected) {
        match now.state {
            TransportState::Playing => return,
            TransportState::Paused => {
                transport.play();
                return;
            }
            TransportState::Idle => {}
        }
    }
    if let Err(e) = transport.play_at(app.selected) {
        tracing::warn!("cannot play selection: {e}");
    }
}

fn scrub_seconds(settings: &config::Settings) -> i64 {
    i64::try_from(settings.controls.scrub_seconds).unwrap_or(i64::MAX)
}
