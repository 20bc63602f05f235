//! Transport: the play/pause/next/previous state machine.
//!
//! The transport owns the [`PlaybackCursor`] and a [`MediaEngine`]. Keys and
//! MPRIS commands both end up here, so the rules below are written once.

mod state;

use std::time::Duration;

pub use state::{Progress, RepeatMode, TransportState};

use crate::audio::MediaEngine;
use crate::cursor::{NowPlayingObserver, PlaybackCursor};
use crate::error::{EngineError, Result};

/// Below this much elapsed time, "previous" goes to the previous track;
/// at or above it, "previous" restarts the current one.
pub const REWIND_THRESHOLD: Duration = Duration::from_millis(3000);

pub struct Transport<E: MediaEngine> {
    cursor: PlaybackCursor,
    engine: E,
    state: TransportState,
    repeat: RepeatMode,
    /// Whether the engine holds the cursor's current track.
    loaded: bool,
}

impl<E: MediaEngine> Transport<E> {
    pub fn new(cursor: PlaybackCursor, engine: E, repeat: RepeatMode) -> Self {
        Self {
            cursor,
            engine,
            state: TransportState::Idle,
            repeat,
            loaded: false,
        }
    }

    pub fn state(&self) -> TransportState {
        self.state
    }

    pub fn repeat(&self) -> RepeatMode {
        self.repeat
    }

    pub fn cursor(&self) -> &PlaybackCursor {
        &self.cursor
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Register an observer and replay the current track, state and repeat mode to it.
    pub fn subscribe(&mut self, observer: Box<dyn NowPlayingObserver>) {
        observer.state_changed(self.state);
        observer.repeat_changed(self.repeat);
        self.cursor.subscribe(observer);
    }

    pub fn set_repeat_mode(&mut self, mode: RepeatMode) {
        if self.repeat == mode {
            return;
        }
        self.repeat = mode;
        tracing::debug!(?mode, "repeat mode changed");
        self.cursor.notify_repeat(mode);
    }

    pub fn cycle_repeat_mode(&mut self) -> RepeatMode {
        self.set_repeat_mode(self.repeat.cycle());
        self.repeat
    }

    pub fn play(&mut self) {
        match self.state {
            TransportState::Playing => {}
            TransportState::Paused => self.resume(),
            TransportState::Idle if self.loaded => self.resume(),
            TransportState::Idle => self.start_current(),
        }
    }

    pub fn pause(&mut self) {
        if self.state == TransportState::Playing {
            self.engine.pause();
            self.set_state(TransportState::Paused);
        }
    }

    pub fn toggle(&mut self) {
        if self.state == TransportState::Playing {
            self.pause();
        } else {
            self.play();
        }
    }

    pub fn stop(&mut self) {
        self.engine.stop();
        self.loaded = false;
        self.set_state(TransportState::Idle);
    }

    /// Go to the next track. Keeps playing if we were playing, otherwise just loads it.
    pub fn next(&mut self) -> Result<()> {
        let autoplay = self.state == TransportState::Playing;
        self.move_by(1, autoplay)
    }

    /// Restart the current track once it has played for [`REWIND_THRESHOLD`],
    /// otherwise go to the previous track.
    pub fn previous(&mut self) -> Result<()> {
        if self.elapsed() >= REWIND_THRESHOLD {
            self.restart();
            return Ok(());
        }
        let autoplay = self.state == TransportState::Playing;
        self.move_by(-1, autoplay)
    }

    /// Select `position` and start playing it.
    pub fn play_at(&mut self, position: usize) -> Result<()> {
        self.cursor.set_current_track(position)?;
        self.loaded = false;
        self.start_current();
        Ok(())
    }

    pub fn seek(&mut self, to: Duration) {
        if !self.loaded {
            return;
        }
        if let Err(e) = self.engine.seek(to) {
            tracing::warn!("seek to {to:?} failed: {e}");
        }
    }

    /// Scrub by `delta_secs`, clamped to the start (and the end, when known).
    pub fn seek_by(&mut self, delta_secs: i64) {
        if !self.loaded {
            return;
        }
        let elapsed = self.engine.position();
        let step = Duration::from_secs(delta_secs.unsigned_abs());
        let mut target = if delta_secs < 0 {
            elapsed.saturating_sub(step)
        } else {
            elapsed + step
        };
        if let Some(total) = self.total() {
            target = target.min(total);
        }
        self.seek(target);
    }

    /// Handle a natural end of track, if one happened. Returns whether it did.
    pub fn poll(&mut self) -> bool {
        if !self.engine.take_completion() {
            return false;
        }
        tracing::debug!(position = self.cursor.position(), repeat = ?self.repeat, "track finished");

        match self.repeat {
            RepeatMode::RepeatOne => self.replay_current(),
            RepeatMode::CycleList => self.advance_after_completion(),
            RepeatMode::Off => {
                let last = self.cursor.catalog().len() - 1;
                if self.cursor.position() == last {
                    self.stop();
                } else {
                    self.advance_after_completion();
                }
            }
        }
        true
    }

    pub fn progress(&self) -> Progress {
        Progress {
            elapsed: self.elapsed(),
            total: self.total(),
        }
    }

    fn elapsed(&self) -> Duration {
        if self.loaded {
            self.engine.position()
        } else {
            Duration::ZERO
        }
    }

    fn total(&self) -> Option<Duration> {
        let from_engine = if self.loaded {
            self.engine.duration()
        } else {
            None
        };
        from_engine.or(self.cursor.current().duration)
    }

    fn advance_after_completion(&mut self) {
        if let Err(e) = self.move_by(1, true) {
            tracing::warn!("could not advance after track end: {e}");
        }
    }

    fn move_by(&mut self, delta: isize, autoplay: bool) -> Result<()> {
        self.cursor.step(delta)?;
        self.loaded = false;
        if autoplay {
            self.start_current();
        } else {
            self.load_current();
        }
        Ok(())
    }

    fn restart(&mut self) {
        if let Err(e) = self.engine.seek(Duration::ZERO) {
            tracing::warn!("restart failed: {e}");
        }
    }

    /// Rewind the finished track and play it again without reloading it.
    fn replay_current(&mut self) {
        if self.loaded {
            match self.engine.seek(Duration::ZERO) {
                Ok(()) => {
                    self.resume();
                    return;
                }
                Err(e) => tracing::debug!("rewind failed, reloading: {e}"),
            }
        }
        self.loaded = false;
        self.start_current();
    }

    fn resume(&mut self) {
        match self.engine.play() {
            Ok(()) => self.set_state(TransportState::Playing),
            Err(e) => self.fail(e),
        }
    }

    fn load_current(&mut self) {
        let source = self.cursor.current().source.clone();
        match self.engine.load(&source) {
            Ok(()) => {
                self.loaded = true;
                self.set_state(TransportState::Idle);
            }
            Err(e) => self.fail(e),
        }
    }

    fn start_current(&mut self) {
        self.load_current();
        if self.loaded {
            self.resume();
        }
    }

    /// Engine errors stop at the transport: log, drop the track, go idle.
    fn fail(&mut self, err: EngineError) {
        tracing::warn!(position = self.cursor.position(), "playback skipped: {err}");
        self.engine.stop();
        self.loaded = false;
        self.set_state(TransportState::Idle);
    }

    fn set_state(&mut self, state: TransportState) {
        if self.state == state {
            return;
        }
        self.state = state;
        self.cursor.notify_state(state);
    }
}
