use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::config::LibrarySettings;
use crate::error::{PlayerError, Result};

use super::build::ResourceEnumerator;

/// Lists audio files below a root directory.
///
/// Entries are visited in file-name order so the catalog order is stable
/// across runs and filesystems.
pub struct DirectoryEnumerator {
    root: PathBuf,
    settings: LibrarySettings,
}

impl DirectoryEnumerator {
    pub fn new(root: impl Into<PathBuf>, settings: &LibrarySettings) -> Self {
        Self {
            root: root.into(),
            settings: settings.clone(),
        }
    }
}

impl ResourceEnumerator for DirectoryEnumerator {
    fn list_resources(&self) -> Result<Vec<PathBuf>> {
        if !self.root.is_dir() {
            return Err(PlayerError::MissingRoot(self.root.clone()));
        }

        let settings = &self.settings;
        let mut walker = WalkDir::new(&self.root)
            .follow_links(settings.follow_links)
            .sort_by_file_name();

        // Non-recursive = only the root directory.
        let depth_cap = if settings.recursive {
            settings.max_depth
        } else {
            Some(1)
        };
        if let Some(d) = depth_cap {
            walker = walker.max_depth(d);
        }

        let mut resources = Vec::new();
        for entry in walker
            .into_iter()
            .filter_entry(|e| settings.include_hidden || e.depth() == 0 || !is_hidden(e.path()))
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) if e.depth() == 0 => {
                    return Err(PlayerError::Enumerate {
                        path: self.root.clone(),
                        source: e,
                    });
                }
                Err(e) => {
                    tracing::warn!("skipping unreadable entry: {e}");
                    continue;
                }
            };

            let path = entry.path();
            if path.is_file()
                && (settings.include_hidden || !is_hidden(path))
                && is_audio_file(path, settings)
            {
                resources.push(path.to_path_buf());
            }
        }

        tracing::debug!(
            root = %self.root.display(),
            count = resources.len(),
            "enumerated audio resources"
        );
        Ok(resources)
    }
}

pub(super) fn is_audio_file(path: &Path, settings: &LibrarySettings) -> bool {
    let exts: Vec<String> = settings
        .extensions
        .iter()
        .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|e| !e.is_empty())
        .collect();

    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            exts.iter().any(|e| e == &ext)
        })
        .unwrap_or(false)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}
