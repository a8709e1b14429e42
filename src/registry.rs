// SPDX-License-Identifier: MPL-2.0
//! Image registry holding every loaded image and its active flag.
//!
//! The registry is the single owner of the image list. The viewport core
//! never reads it directly: after every registry mutation the caller feeds
//! the read-only [`Item`] projection into the state store, which re-derives
//! the active subset on its own.

use crate::error::{Error, Result};
use std::path::{Path, PathBuf};

/// Image file extensions the registry accepts.
pub const IMAGE_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "gif", "tiff", "tif", "webp", "bmp", "ico",
];

/// Opaque identifier for a registered image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ImageId(u64);

impl ImageId {
    /// Raw numeric value, used only for display and logging.
    #[must_use]
    pub fn value(self) -> u64 {
        self.0
    }

    /// Builds an id from a raw value. Ids are normally allocated by the
    /// registry; this is in-crate plumbing for tests.
    #[cfg(test)]
    pub(crate) const fn from_raw(value: u64) -> Self {
        Self(value)
    }
}

/// A registered image with its backing file.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageEntry {
    pub id: ImageId,
    pub filename: String,
    pub path: PathBuf,
    pub active: bool,
}

/// Read-only projection of an entry, the only shape the viewport core sees.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub id: ImageId,
    pub filename: String,
    pub active: bool,
}

/// Owns the image list and the active flags.
#[derive(Debug, Default)]
pub struct Registry {
    entries: Vec<ImageEntry>,
    next_id: u64,
}

impl Registry {
    /// Creates a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Imports the given files, skipping anything without a supported image
    /// extension. Returns how many files were registered.
    pub fn import_files(&mut self, paths: &[PathBuf]) -> usize {
        let mut imported = 0;
        for path in paths {
            if !is_supported_image(path) {
                log::warn!("skipping unsupported file: {}", path.display());
                continue;
            }
            self.push_entry(path.clone());
            imported += 1;
        }
        imported
    }

    /// Scans a directory for supported image files, sorted by filename, and
    /// registers each of them. Returns how many files were found.
    ///
    /// Returns an error if the directory cannot be read.
    pub fn scan_directory(&mut self, directory: &Path) -> Result<usize> {
        if !directory.is_dir() {
            return Err(Error::Io(format!(
                "not a directory: {}",
                directory.display()
            )));
        }

        let mut found = Vec::new();
        for entry in std::fs::read_dir(directory)? {
            let entry = entry?;
            let path = entry.path();
            if path.is_file() && is_supported_image(&path) {
                found.push(path);
            }
        }
        found.sort();

        let count = found.len();
        for path in found {
            self.push_entry(path);
        }
        Ok(count)
    }

    fn push_entry(&mut self, path: PathBuf) {
        let id = ImageId(self.next_id);
        self.next_id += 1;

        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        self.entries.push(ImageEntry {
            id,
            filename,
            path,
            active: true,
        });
    }

    /// Flips an entry's active flag. Returns the new flag value, or `None`
    /// if the id is unknown.
    pub fn toggle(&mut self, id: ImageId) -> Option<bool> {
        let entry = self.entries.iter_mut().find(|e| e.id == id)?;
        entry.active = !entry.active;
        Some(entry.active)
    }

    /// Deactivates every entry. Returns how many were active before.
    pub fn deactivate_all(&mut self) -> usize {
        let was_active = self.entries.iter().filter(|e| e.active).count();
        for entry in &mut self.entries {
            entry.active = false;
        }
        was_active
    }

    /// Removes every inactive entry. Returns how many were removed.
    pub fn purge_inactive(&mut self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|e| e.active);
        before - self.entries.len()
    }

    /// Looks up an entry by id.
    #[must_use]
    pub fn entry(&self, id: ImageId) -> Option<&ImageEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// The read-only projection fed into the state store.
    #[must_use]
    pub fn items(&self) -> Vec<Item> {
        self.entries
            .iter()
            .map(|e| Item {
                id: e.id,
                filename: e.filename.clone(),
                active: e.active,
            })
            .collect()
    }

    /// Returns the total number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Checks if the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the number of active entries.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.entries.iter().filter(|e| e.active).count()
    }
}

/// Checks whether a path has a supported image extension.
#[must_use]
pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext = ext.to_lowercase();
            IMAGE_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}
