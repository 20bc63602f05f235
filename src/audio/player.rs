use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Sender};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;

use crate::error::EngineError;

use super::engine::MediaEngine;
use super::sink::open_source_at;
use super::thread::spawn_audio_thread;
use super::types::{AudioCmd, EngineStatus, StatusHandle};

/// `MediaEngine` backed by a `rodio` output running on its own thread.
pub struct RodioEngine {
    tx: Sender<AudioCmd>,
    status: StatusHandle,
    join: Mutex<Option<JoinHandle<()>>>,
    loaded: Option<PathBuf>,
    generation: u64,
    consumed: Option<u64>,
}

impl RodioEngine {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel::<AudioCmd>();
        let status: StatusHandle = Arc::new(Mutex::new(EngineStatus::default()));
        let join = spawn_audio_thread(rx, status.clone());

        Self {
            tx,
            status,
            join: Mutex::new(Some(join)),
            loaded: None,
            generation: 0,
            consumed: None,
        }
    }

    fn send(&self, cmd: AudioCmd) -> Result<(), EngineError> {
        if let Some(reason) = self.status.lock().ok().and_then(|s| s.unavailable.clone()) {
            return Err(EngineError::Unavailable(reason));
        }
        self.tx
            .send(cmd)
            .map_err(|_| EngineError::Unavailable("audio thread stopped".to_string()))
    }

    fn snapshot(&self) -> EngineStatus {
        self.status.lock().map(|s| s.clone()).unwrap_or_default()
    }

    fn swap_source(&mut self, path: &Path, start_at: Duration, autoplay: bool) -> Result<(), EngineError> {
        let (source, total) = open_source_at(path, start_at)?;
        self.generation += 1;
        self.send(AudioCmd::Load {
            source,
            start_at,
            total,
            generation: self.generation,
            autoplay,
        })
    }

    /// Fade out, stop the audio thread and wait for it to exit.
    pub fn quit_softly(&self, fade_out: Duration) {
        let _ = self.tx.send(AudioCmd::Quit {
            fade_out_ms: fade_out.as_millis() as u64,
        });

        if let Ok(mut j) = self.join.lock() {
            if let Some(h) = j.take() {
                let _ = h.join();
            }
        }
    }
}

impl Default for RodioEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for RodioEngine {
    fn drop(&mut self) {
        self.quit_softly(Duration::ZERO);
    }
}

impl MediaEngine for RodioEngine {
    fn load(&mut self, source: &Path) -> Result<(), EngineError> {
        self.swap_source(source, Duration::ZERO, false)?;
        self.loaded = Some(source.to_path_buf());
        Ok(())
    }

    fn play(&mut self) -> Result<(), EngineError> {
        if self.loaded.is_none() {
            return Err(EngineError::NothingLoaded);
        }
        self.send(AudioCmd::Play)
    }

    fn pause(&mut self) {
        let _ = self.send(AudioCmd::Pause);
    }

    fn stop(&mut self) {
        self.loaded = None;
        let _ = self.send(AudioCmd::Stop);
    }

    fn seek(&mut self, to: Duration) -> Result<(), EngineError> {
        let Some(path) = self.loaded.clone() else {
            return Err(EngineError::NothingLoaded);
        };
        let playing = self.is_playing();
        // Rebuilding the sink is the seek; the file is re-decoded from `to`.
        self.swap_source(&path, to, playing)
    }

    fn position(&self) -> Duration {
        self.snapshot().elapsed()
    }

    fn duration(&self) -> Option<Duration> {
        self.snapshot().total
    }

    fn is_playing(&self) -> bool {
        self.snapshot().playing
    }

    fn take_completion(&mut self) -> bool {
        let finished = self.snapshot().finished;
        if finished.is_some() && finished == Some(self.generation) && self.consumed != finished {
            self.consumed = finished;
            return true;
        }
        false
    }
}
