use std::path::Path;
use std::time::Duration;

use crate::error::EngineError;

/// Playback backend driven by the transport.
///
/// The engine knows nothing about the catalog or the cursor: it plays
/// whatever source it was last asked to `load`.
pub trait MediaEngine {
    /// Replace the current source with `source`, paused at offset 0.
    fn load(&mut self, source: &Path) -> Result<(), EngineError>;

    fn play(&mut self) -> Result<(), EngineError>;

    fn pause(&mut self);

    /// Drop the current source.
    fn stop(&mut self);

    /// Jump to `to` within the loaded source, keeping the play/pause state.
    fn seek(&mut self, to: Duration) -> Result<(), EngineError>;

    fn position(&self) -> Duration;

    fn duration(&self) -> Option<Duration>;

    fn is_playing(&self) -> bool;

    /// Returns `true` exactly once after the loaded source played to its end.
    fn take_completion(&mut self) -> bool;
}
