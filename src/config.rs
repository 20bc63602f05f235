//! Settings for jukebox.
//!
//! Defaults, then `config.toml` from the XDG config dir (or
//! `JUKEBOX_CONFIG_PATH`), then `JUKEBOX__SECTION__KEY` environment overrides.

mod load;
mod schema;

pub use load::default_log_path;
pub use schema::*;
