//! Playback cursor: the single owner of "which track is current".
//!
//! Navigation math lives in [`advance`]; [`PlaybackCursor::set_current_track`]
//! is the only way the current track changes, and it fans the change out to
//! every registered [`NowPlayingObserver`].

use std::sync::Arc;

use crate::catalog::{Catalog, TrackRecord};
use crate::error::{PlayerError, Result};
use crate::transport::{RepeatMode, TransportState};

/// Compute the position `delta` steps away from `position`, wrapping at both
/// ends of a catalog of `len` tracks.
///
/// For single steps this is the classic policy: stepping back from 0 lands on
/// `len - 1`, stepping forward from `len - 1` lands on 0. Larger deltas wrap
/// by Euclidean remainder, so any delta stays in range.
pub fn advance(position: usize, delta: isize, len: usize) -> Result<usize> {
    if len == 0 {
        return Err(PlayerError::EmptyCatalog);
    }
    let next = position as i128 + delta as i128;
    Ok(next.rem_euclid(len as i128) as usize)
}

/// A presentation surface that renders the now-playing state.
///
/// Observers never hold a copy of the cursor; they are told about changes.
pub trait NowPlayingObserver {
    fn track_changed(&self, position: usize, track: &TrackRecord);

    fn state_changed(&self, _state: TransportState) {}

    fn repeat_changed(&self, _mode: RepeatMode) {}
}

pub struct PlaybackCursor {
    catalog: Arc<Catalog>,
    position: usize,
    observers: Vec<Box<dyn NowPlayingObserver>>,
}

impl PlaybackCursor {
    /// Start at the first track.
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self {
            catalog,
            position: 0,
            observers: Vec::new(),
        }
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn current(&self) -> &TrackRecord {
        // position is only ever set through set_current_track, which bounds-checks.
        &self.catalog.tracks()[self.position]
    }

    /// Register an observer and bring it up to date with the current track.
    pub fn subscribe(&mut self, observer: Box<dyn NowPlayingObserver>) {
        observer.track_changed(self.position, self.current());
        self.observers.push(observer);
    }

    /// Make `position` the current track and return it for rendering.
    pub fn set_current_track(&mut self, position: usize) -> Result<&TrackRecord> {
        let Some(track) = self.catalog.get(position) else {
            return Err(PlayerError::PositionOutOfRange {
                position,
                len: self.catalog.len(),
            });
        };

        self.position = position;
        tracing::debug!(position, source = %track.source.display(), "current track changed");
        for observer in &self.observers {
            observer.track_changed(position, track);
        }
        Ok(track)
    }

    /// Move `delta` tracks (wrapping) and make that the current track.
    pub fn step(&mut self, delta: isize) -> Result<&TrackRecord> {
        let next = advance(self.position, delta, self.catalog.len())?;
        self.set_current_track(next)
    }

    pub(crate) fn notify_state(&self, state: TransportState) {
        for observer in &self.observers {
            observer.state_changed(state);
        }
    }

    pub(crate) fn notify_repeat(&self, mode: RepeatMode) {
        for observer in &self.observers {
            observer.repeat_changed(mode);
        }
    }
}

#[cfg(test)]
mod tests;
