use std::cell::RefCell;
use std::rc::Rc;

use crate::catalog::TrackRecord;
use crate::cursor::NowPlayingObserver;
use crate::transport::{RepeatMode, TransportState};

/// What the screen knows about playback, as last reported by the transport.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NowPlaying {
    pub position: Option<usize>,
    pub state: TransportState,
    pub repeat: RepeatMode,
}

pub type SharedNowPlaying = Rc<RefCell<NowPlaying>>;

/// Observer that keeps the screen's [`NowPlaying`] current.
pub struct ScreenFeed {
    now: SharedNowPlaying,
}

impl ScreenFeed {
    pub fn new(now: SharedNowPlaying) -> Self {
        Self { now }
    }
}

impl NowPlayingObserver for ScreenFeed {
    fn track_changed(&self, position: usize, _track: &TrackRecord) {
        self.now.borrow_mut().position = Some(position);
    }

    fn state_changed(&self, state: TransportState) {
        self.now.borrow_mut().state = state;
    }

    fn repeat_changed(&self, mode: RepeatMode) {
        self.now.borrow_mut().repeat = mode;
    }
}
