//! Opening and decoding audio files for `rodio`.
//!
//! Decoding happens on the caller's thread so open/decode failures surface as
//! `EngineError`s; the audio thread only ever receives ready sources.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;

use rodio::source::SkipDuration;
use rodio::{Decoder, OutputStream, Sink, Source};

use crate::error::EngineError;

pub type FileSource = SkipDuration<Decoder<BufReader<File>>>;

/// Decode `path` and position it at `start_at`. Also returns the total
/// duration when the decoder knows it.
pub(super) fn open_source_at(
    path: &Path,
    start_at: Duration,
) -> Result<(FileSource, Option<Duration>), EngineError> {
    let file = File::open(path).map_err(|source| EngineError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let decoder = Decoder::new(BufReader::new(file)).map_err(|source| EngineError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    let total = decoder.total_duration();

    // `skip_duration` is our seeking primitive; even Duration::ZERO is fine.
    Ok((decoder.skip_duration(start_at), total))
}

/// Create a paused `Sink` on `stream` holding `source`.
pub(super) fn paused_sink(stream: &OutputStream, source: FileSource) -> Sink {
    let sink = Sink::connect_new(stream.mixer());
    sink.append(source);
    sink.pause();
    sink
}
