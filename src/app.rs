//! Application module: the screen model used by the TUI and runtime.
//!
//! `App` holds the catalog view, selection, filter and popup flags. What is
//! playing comes from the transport through a [`ScreenFeed`] observer.

mod model;
mod now_playing;

pub use model::*;
pub use now_playing::{NowPlaying, ScreenFeed, SharedNowPlaying};

#[cfg(test)]
mod tests;
