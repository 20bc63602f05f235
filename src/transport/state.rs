use std::fmt;
use std::time::Duration;

use crate::config::RepeatModeSetting;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransportState {
    #[default]
    Idle,
    Playing,
    Paused,
}

impl TransportState {
    pub fn label(self) -> &'static str {
        match self {
            TransportState::Idle => "Stopped",
            TransportState::Playing => "Playing",
            TransportState::Paused => "Paused",
        }
    }
}

impl fmt::Display for TransportState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// What happens when a track plays to its end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RepeatMode {
    /// Advance, but stop after the last track.
    Off,
    /// Advance and wrap from the last track to the first.
    #[default]
    CycleList,
    /// Restart the same track.
    RepeatOne,
}

impl RepeatMode {
    /// `Off -> RepeatOne -> CycleList -> Off`.
    pub fn cycle(self) -> Self {
        match self {
            RepeatMode::Off => RepeatMode::RepeatOne,
            RepeatMode::RepeatOne => RepeatMode::CycleList,
            RepeatMode::CycleList => RepeatMode::Off,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RepeatMode::Off => "repeat off",
            RepeatMode::CycleList => "repeat all",
            RepeatMode::RepeatOne => "repeat one",
        }
    }
}

impl From<RepeatModeSetting> for RepeatMode {
    fn from(setting: RepeatModeSetting) -> Self {
        match setting {
            RepeatModeSetting::Off => RepeatMode::Off,
            RepeatModeSetting::CycleList => RepeatMode::CycleList,
            RepeatModeSetting::RepeatOne => RepeatMode::RepeatOne,
        }
    }
}

/// Elapsed/total snapshot for progress rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Progress {
    pub elapsed: Duration,
    pub total: Option<Duration>,
}

impl Progress {
    pub fn remaining(&self) -> Option<Duration> {
        self.total.map(|t| t.saturating_sub(self.elapsed))
    }
}
