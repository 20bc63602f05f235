//! Audio-related small types and handles.
//!
//! This module defines the commands sent to the audio thread and the status
//! it shares back with the engine handle.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use super::sink::FileSource;

pub enum AudioCmd {
    /// Swap in a freshly decoded source. `generation` tags it so completion
    /// of an older source is never reported against a newer one.
    Load {
        source: FileSource,
        start_at: Duration,
        total: Option<Duration>,
        generation: u64,
        autoplay: bool,
    },
    Play,
    Pause,
    /// Drop the current sink.
    Stop,
    /// Quit the audio thread, optionally fading out over `fade_out_ms` milliseconds.
    Quit { fade_out_ms: u64 },
}

impl std::fmt::Debug for AudioCmd {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AudioCmd::Load {
                start_at,
                generation,
                autoplay,
                ..
            } => f
                .debug_struct("Load")
                .field("start_at", start_at)
                .field("generation", generation)
                .field("autoplay", autoplay)
                .finish_non_exhaustive(),
            AudioCmd::Play => f.write_str("Play"),
            AudioCmd::Pause => f.write_str("Pause"),
            AudioCmd::Stop => f.write_str("Stop"),
            AudioCmd::Quit { fade_out_ms } => {
                f.debug_struct("Quit").field("fade_out_ms", fade_out_ms).finish()
            }
        }
    }
}

/// Playback status published by the audio thread.
#[derive(Debug, Clone, Default)]
pub struct EngineStatus {
    /// Generation of the source currently in the sink, if any.
    pub generation: Option<u64>,
    /// Generation of the last source that played to its natural end.
    pub finished: Option<u64>,
    pub playing: bool,
    /// Set while playing; elapsed time is `accumulated + started_at.elapsed()`.
    pub started_at: Option<Instant>,
    pub accumulated: Duration,
    pub total: Option<Duration>,
    /// Why the output device could not be opened, if it could not.
    pub unavailable: Option<String>,
}

impl EngineStatus {
    pub fn elapsed(&self) -> Duration {
        self.accumulated + self.started_at.map_or(Duration::ZERO, |st| st.elapsed())
    }

    pub(super) fn start_clock(&mut self) {
        if self.started_at.is_none() {
            self.started_at = Some(Instant::now());
        }
        self.playing = true;
    }

    pub(super) fn stop_clock(&mut self) {
        if let Some(st) = self.started_at.take() {
            self.accumulated += st.elapsed();
        }
        self.playing = false;
    }

    pub(super) fn reset(&mut self) {
        self.generation = None;
        self.playing = false;
        self.started_at = None;
        self.accumulated = Duration::ZERO;
        self.total = None;
    }
}

pub type StatusHandle = Arc<Mutex<EngineStatus>>;
