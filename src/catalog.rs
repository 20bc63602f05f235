//! Track catalog: the ordered, read-only list of playable tracks.
//!
//! The catalog is built once at startup from a [`ResourceEnumerator`] (the
//! directory walk) and a [`MetadataSource`] (the tag reader).

mod build;
mod display;
mod enumerate;
mod model;
mod tags;

pub use build::{MetadataSource, ResourceEnumerator};
pub use enumerate::DirectoryEnumerator;
pub use model::{Catalog, GroupKind, TrackGroup, TrackMetadata, TrackRecord};
pub use tags::TagReader;

pub(crate) use display::file_stem;

#[cfg(test)]
mod tests;
