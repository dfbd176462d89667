// this_file: crates/pixfont-fonts/src/glyph_cache.rs

//! Bitmap cache for file-backed fonts
//!
//! Drawing a VLW glyph normally costs two seeks and two reads on the
//! backing stream. With the cache enabled the decoded record and alpha
//! bitmap of recently drawn glyphs stay in memory, keyed by glyph index.
//! Metrics lookups never go through here.

use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use lru::LruCache;
use parking_lot::Mutex;

/// One decoded VLW glyph: its record fields and 8-bit alpha bitmap
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VlwGlyph {
    pub height: i32,
    pub width: i32,
    /// Unscaled advance
    pub x_advance: i32,
    /// Distance from the baseline up to the top row
    pub y_delta: i32,
    pub x_delta: i32,
    /// `width * height` alpha values, row-major
    pub pixels: Vec<u8>,
}

impl VlwGlyph {
    #[inline]
    pub(crate) fn row(&self, i: i32) -> &[u8] {
        let w = self.width as usize;
        let start = i as usize * w;
        self.pixels.get(start..start + w).unwrap_or(&[])
    }
}

/// LRU cache of decoded glyphs with hit/miss counters
pub struct GlyphCache {
    cache: Mutex<LruCache<usize, Arc<VlwGlyph>>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl GlyphCache {
    /// `None` when `capacity` is zero
    pub fn new(capacity: usize) -> Option<Self> {
        let capacity = NonZeroUsize::new(capacity)?;
        Some(Self {
            cache: Mutex::new(LruCache::new(capacity)),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        })
    }

    pub fn get(&self, index: usize) -> Option<Arc<VlwGlyph>> {
        let found = self.cache.lock().get(&index).cloned();
        let counter = if found.is_some() { &self.hits } else { &self.misses };
        counter.fetch_add(1, Ordering::Relaxed);
        found
    }

    pub fn insert(&self, index: usize, glyph: Arc<VlwGlyph>) {
        self.cache.lock().put(index, glyph);
    }

    pub fn clear(&self) {
        self.cache.lock().clear();
    }

    pub fn stats(&self) -> GlyphCacheStats {
        let cache = self.cache.lock();
        GlyphCacheStats {
            size: cache.len(),
            capacity: cache.cap().get(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}

impl std::fmt::Debug for GlyphCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GlyphCache").field("stats", &self.stats()).finish()
    }
}

/// Glyph cache statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GlyphCacheStats {
    pub size: usize,
    pub capacity: usize,
    pub hits: u64,
    pub misses: u64,
}

impl GlyphCacheStats {
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn glyph(width: i32) -> Arc<VlwGlyph> {
        Arc::new(VlwGlyph {
            height: 1,
            width,
            x_advance: width,
            pixels: vec![0xFF; width as usize],
            ..Default::default()
        })
    }

    #[test]
    fn test_zero_capacity_disables() {
        assert!(GlyphCache::new(0).is_none());
    }

    #[test]
    fn test_hits_and_misses() {
        let cache = GlyphCache::new(4).unwrap();
        assert!(cache.get(1).is_none());
        cache.insert(1, glyph(3));
        assert_eq!(cache.get(1).unwrap().width, 3);
        let stats = cache.stats();
        assert_eq!((stats.hits, stats.misses, stats.size), (1, 1, 1));
        assert!((stats.hit_rate() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_evicts_least_recent() {
        let cache = GlyphCache::new(2).unwrap();
        cache.insert(1, glyph(1));
        cache.insert(2, glyph(2));
        assert!(cache.get(1).is_some());
        cache.insert(3, glyph(3));
        assert!(cache.get(2).is_none());
        assert!(cache.get(1).is_some());
        assert_eq!(cache.stats().capacity, 2);
        cache.clear();
        assert_eq!(cache.stats().size, 0);
    }

    #[test]
    fn test_row_slices() {
        let g = VlwGlyph {
            height: 2,
            width: 2,
            pixels: vec![1, 2, 3, 4],
            ..Default::default()
        };
        assert_eq!(g.row(1), &[3, 4]);
        assert!(g.row(2).is_empty());
    }
}
