//! Audio output.
//!
//! [`MediaEngine`] is the seam the transport drives; [`RodioEngine`] is the
//! real implementation, which owns a `rodio` sink on a dedicated thread.

mod engine;
mod player;
mod sink;
mod thread;
mod types;

pub use engine::MediaEngine;
pub use player::RodioEngine;
