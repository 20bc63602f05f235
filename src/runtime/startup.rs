use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::audio::MediaEngine;
use crate::catalog::{Catalog, DirectoryEnumerator, TagReader};
use crate::config;
use crate::cursor::PlaybackCursor;
use crate::error::Result;
use crate::transport::{RepeatMode, Transport};

pub const USAGE: &str = "usage: jukebox [DIR] | jukebox --print-config";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Run { dir: PathBuf },
    PrintConfig,
    Help,
}

/// Parse command-line arguments (without the program name).
pub fn parse_args<I>(args: I) -> std::result::Result<Command, String>
where
    I: IntoIterator<Item = String>,
{
    let mut dir: Option<PathBuf> = None;
    for arg in args {
        match arg.as_str() {
            "--print-config" => return Ok(Command::PrintConfig),
            "-h" | "--help" => return Ok(Command::Help),
            flag if flag.starts_with('-') => return Err(format!("unknown option {flag}")),
            _ if dir.is_some() => return Err(format!("unexpected argument {arg}")),
            _ => dir = Some(PathBuf::from(arg)),
        }
    }
    Ok(Command::Run {
        dir: dir.unwrap_or_else(default_dir),
    })
}

fn default_dir() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("Music"))
}

/// Walk `dir` and read tags into a catalog.
pub fn load_catalog(dir: &Path, settings: &config::LibrarySettings) -> Result<Arc<Catalog>> {
    let enumerator = DirectoryEnumerator::new(dir, settings);
    let catalog = Catalog::build(&enumerator, &TagReader, settings)?;
    Ok(Arc::new(catalog))
}

/// A transport over `catalog`, idle at the first track, with the configured repeat mode.
pub fn build_transport<E: MediaEngine>(
    catalog: Arc<Catalog>,
    engine: E,
    settings: &config::PlaybackSettings,
) -> Transport<E> {
    let repeat = RepeatMode::from(settings.repeat_mode);
    Transport::new(PlaybackCursor::new(catalog), engine, repeat)
}
