// SPDX-License-Identifier: MPL-2.0
//! Image decoding and the decoded-image cache.
//!
//! Decoding happens off the update loop; the resulting [`ImageData`] is
//! kept in an LRU cache keyed by registry id. Draw code uses [`MediaStore::peek`],
//! which does not touch recency, so rendering never needs mutable access.

use crate::error::Result;
use crate::registry::ImageId;
use iced::widget::image;
use lru::LruCache;
use std::collections::HashSet;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

/// Decoded images kept resident at once.
const CACHE_CAPACITY: usize = 64;

/// A decoded image ready for display.
#[derive(Debug, Clone)]
pub struct ImageData {
    pub handle: image::Handle,
    pub width: u32,
    pub height: u32,
}

impl ImageData {
    /// Creates an `ImageData` from RGBA pixels.
    #[must_use]
    pub fn from_rgba(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        Self {
            handle: image::Handle::from_rgba(width, height, pixels),
            width,
            height,
        }
    }
}

/// Decodes an image file into RGBA.
pub fn load_image(path: &Path) -> Result<ImageData> {
    let decoded = image_rs::open(path)?;
    let rgba = decoded.to_rgba8();
    let (width, height) = rgba.dimensions();
    Ok(ImageData::from_rgba(width, height, rgba.into_raw()))
}

/// Async wrapper running the decode on a blocking task.
pub async fn load_image_async(path: PathBuf) -> Result<ImageData> {
    tokio::task::spawn_blocking(move || load_image(&path))
        .await
        .map_err(|join| crate::error::Error::Image(join.to_string()))?
}

/// LRU cache of decoded images plus the set of in-flight loads.
pub struct MediaStore {
    cache: LruCache<ImageId, ImageData>,
    pending: HashSet<ImageId>,
}

impl Default for MediaStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MediaStore {
    #[must_use]
    pub fn new() -> Self {
        let capacity = NonZeroUsize::new(CACHE_CAPACITY).expect("capacity is non-zero");
        Self {
            cache: LruCache::new(capacity),
            pending: HashSet::new(),
        }
    }

    /// Stores a decoded image, clearing its pending mark.
    pub fn insert(&mut self, id: ImageId, data: ImageData) {
        self.pending.remove(&id);
        self.cache.put(id, data);
    }

    /// Looks up a decoded image and refreshes its recency.
    pub fn get(&mut self, id: ImageId) -> Option<&ImageData> {
        self.cache.get(&id)
    }

    /// Looks up a decoded image without touching recency; used by draw code.
    #[must_use]
    pub fn peek(&self, id: ImageId) -> Option<&ImageData> {
        self.cache.peek(&id)
    }

    /// Whether the image is decoded or currently loading.
    #[must_use]
    pub fn is_ready_or_pending(&self, id: ImageId) -> bool {
        self.pending.contains(&id) || self.cache.contains(&id)
    }

    /// Marks a load as in flight.
    pub fn mark_pending(&mut self, id: ImageId) {
        self.pending.insert(id);
    }

    /// Clears a pending mark after a failed load so a retry stays possible.
    pub fn clear_pending(&mut self, id: ImageId) {
        self.pending.remove(&id);
    }
}

impl std::fmt::Debug for MediaStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaStore")
            .field("cached", &self.cache.len())
            .field("pending", &self.pending.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::ImageId;

    fn sample() -> ImageData {
        ImageData::from_rgba(1, 1, vec![255, 0, 0, 255])
    }

    #[test]
    fn insert_clears_pending_and_makes_peek_succeed() {
        let mut store = MediaStore::new();
        let id = ImageId::from_raw(1);

        store.mark_pending(id);
        assert!(store.is_ready_or_pending(id));
        assert!(store.peek(id).is_none());

        store.insert(id, sample());
        assert!(store.peek(id).is_some());
        assert!(store.is_ready_or_pending(id));
    }

    #[test]
    fn clear_pending_allows_a_retry() {
        let mut store = MediaStore::new();
        let id = ImageId::from_raw(2);

        store.mark_pending(id);
        store.clear_pending(id);
        assert!(!store.is_ready_or_pending(id));
    }

    #[test]
    fn load_image_rejects_garbage_data() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"definitely not a png").expect("write");

        assert!(load_image(&path).is_err());
    }
}
