//! Fixtures shared by unit tests.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::audio::MediaEngine;
use crate::catalog::{Catalog, TrackRecord};
use crate::error::EngineError;

pub fn track(title: &str) -> TrackRecord {
    TrackRecord {
        title: title.into(),
        artist: String::new(),
        album: String::new(),
        year: None,
        genre: String::new(),
        source: PathBuf::from(format!("/music/{title}.mp3")),
        artwork: None,
        duration: Some(Duration::from_secs(200)),
        display: title.into(),
    }
}

pub fn catalog_of(titles: &[&str]) -> Arc<Catalog> {
    Arc::new(Catalog::from_records(titles.iter().map(|t| track(t)).collect()).unwrap())
}

/// Catalog of `n` tracks named "t0", "t1", ...
pub fn numbered_catalog(n: usize) -> Arc<Catalog> {
    let titles: Vec<String> = (0..n).map(|i| format!("t{i}")).collect();
    let refs: Vec<&str> = titles.iter().map(String::as_str).collect();
    catalog_of(&refs)
}

/// In-memory engine that records every call.
#[derive(Debug, Default)]
pub struct FakeEngine {
    pub calls: Vec<String>,
    pub loaded: Option<PathBuf>,
    pub playing: bool,
    pub position: Duration,
    /// Set to simulate a natural end of track; consumed by `take_completion`.
    pub completed: bool,
    /// Sources whose `load` fails.
    pub broken: HashSet<PathBuf>,
    /// Makes every `seek` fail.
    pub seek_fails: bool,
}

impl FakeEngine {
    pub fn loaded_name(&self) -> Option<String> {
        self.loaded
            .as_ref()
            .and_then(|p| p.file_stem())
            .map(|s| s.to_string_lossy().into_owned())
    }
}

impl MediaEngine for FakeEngine {
    fn load(&mut self, source: &Path) -> Result<(), EngineError> {
        self.calls.push(format!("load {}", source.display()));
        if self.broken.contains(source) {
            return Err(EngineError::Unavailable("broken".into()));
        }
        self.loaded = Some(source.to_path_buf());
        self.playing = false;
        self.position = Duration::ZERO;
        Ok(())
    }

    fn play(&mut self) -> Result<(), EngineError> {
        self.calls.push("play".into());
        if self.loaded.is_none() {
            return Err(EngineError::NothingLoaded);
        }
        self.playing = true;
        Ok(())
    }

    fn pause(&mut self) {
        self.calls.push("pause".into());
        self.playing = false;
    }

    fn stop(&mut self) {
        self.calls.push("stop".into());
        self.loaded = None;
        self.playing = false;
    }

    fn seek(&mut self, to: Duration) -> Result<(), EngineError> {
        self.calls.push(format!("seek {}", to.as_millis()));
        if self.seek_fails {
            return Err(EngineError::NothingLoaded);
        }
        self.position = to;
        Ok(())
    }

    fn position(&self) -> Duration {
        self.position
    }

    fn duration(&self) -> Option<Duration> {
        self.loaded.as_ref().map(|_| Duration::from_secs(180))
    }

    fn is_playing(&self) -> bool {
        self.playing
    }

    fn take_completion(&mut self) -> bool {
        std::mem::take(&mut self.completed)
    }
}
