//! Error types shared by the catalog, cursor and transport.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the player core.
#[derive(Debug, Error)]
pub enum PlayerError {
    /// No playable resources were found, so there is nothing to navigate.
    #[error("catalog is empty: no playable tracks were found")]
    EmptyCatalog,

    /// A position outside `0..len` was requested.
    #[error("position {position} is outside the catalog (len {len})")]
    PositionOutOfRange { position: usize, len: usize },

    /// The library root does not exist or is not a directory.
    #[error("library root {0:?} is not a readable directory")]
    MissingRoot(PathBuf),

    /// Walking the library root failed part-way.
    #[error("failed to enumerate {path:?}: {source}")]
    Enumerate {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// Errors raised by a [`crate::audio::MediaEngine`].
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to open {path:?}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode {path:?}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: rodio::decoder::DecoderError,
    },

    /// The output device or the audio thread is gone.
    #[error("audio output unavailable: {0}")]
    Unavailable(String),

    #[error("no track loaded")]
    NothingLoaded,
}

/// Tag extraction failure for a single resource.
#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("failed to read tags: {0}")]
    Tags(#[from] lofty::error::LoftyError),

    #[error("unsupported resource {0:?}")]
    Unsupported(PathBuf),
}

pub type Result<T> = std::result::Result<T, PlayerError>;
