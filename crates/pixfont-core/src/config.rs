// this_file: crates/pixfont-core/src/config.rs

//! Process-wide configuration
//!
//! The only tunable today is the capacity of the per-font glyph bitmap
//! cache used by file-backed fonts. **The cache is disabled by default**
//! (capacity 0) and is enabled with `set_glyph_cache_capacity(n)` or the
//! `PIXFONT_GLYPH_CACHE=<n>` environment variable.
//!
//! # Example
//!
//! ```
//! use pixfont_core::config;
//!
//! config::set_glyph_cache_capacity(64);
//! assert_eq!(config::glyph_cache_capacity(), 64);
//!
//! config::set_glyph_cache_capacity(0);
//! assert!(!config::is_glyph_cache_enabled());
//! ```
//!
//! The value is read when a font is loaded; changing it does not resize
//! caches of fonts that are already loaded.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::OnceLock;

use crate::error::{PixfontError, Result};

/// Environment variable holding the glyph cache capacity
pub const GLYPH_CACHE_ENV: &str = "PIXFONT_GLYPH_CACHE";

static GLYPH_CACHE_CAPACITY: AtomicUsize = AtomicUsize::new(0);

static ENV_CHECKED: OnceLock<()> = OnceLock::new();

fn check_env() {
    ENV_CHECKED.get_or_init(|| {
        if let Ok(val) = std::env::var(GLYPH_CACHE_ENV) {
            match parse_capacity(&val) {
                Ok(n) => {
                    GLYPH_CACHE_CAPACITY.store(n, Ordering::SeqCst);
                    log::debug!("Glyph cache capacity {n} via {GLYPH_CACHE_ENV}");
                },
                Err(err) => log::warn!("Ignoring {GLYPH_CACHE_ENV}: {err}"),
            }
        }
    });
}

/// Parse a capacity value: a decimal count, or a boolean switch
/// (`on`/`true`/`yes` select a default of 128 entries)
pub fn parse_capacity(val: &str) -> Result<usize> {
    let val = val.trim().to_lowercase();
    match val.as_str() {
        "" | "0" | "off" | "false" | "no" => Ok(0),
        "on" | "true" | "yes" => Ok(DEFAULT_GLYPH_CACHE_CAPACITY),
        _ => val
            .parse()
            .map_err(|_| PixfontError::Config(format!("invalid glyph cache capacity {val:?}"))),
    }
}

/// Capacity used when the cache is switched on without a size
pub const DEFAULT_GLYPH_CACHE_CAPACITY: usize = 128;

/// Number of glyph bitmaps each loaded file-backed font may keep in memory
pub fn glyph_cache_capacity() -> usize {
    check_env();
    GLYPH_CACHE_CAPACITY.load(Ordering::SeqCst)
}

/// Override the glyph cache capacity at runtime (0 disables caching)
pub fn set_glyph_cache_capacity(capacity: usize) {
    check_env();
    GLYPH_CACHE_CAPACITY.store(capacity, Ordering::SeqCst);
    log::debug!("Glyph cache capacity set to {capacity}");
}

pub fn is_glyph_cache_enabled() -> bool {
    glyph_cache_capacity() > 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_capacity() {
        assert_eq!(parse_capacity("32").unwrap(), 32);
        assert_eq!(parse_capacity(" 8 ").unwrap(), 8);
        assert_eq!(parse_capacity("off").unwrap(), 0);
        assert_eq!(parse_capacity("ON").unwrap(), DEFAULT_GLYPH_CACHE_CAPACITY);
        let err = parse_capacity("lots").unwrap_err();
        assert!(matches!(err, PixfontError::Config(_)));
        assert_eq!(err.to_string(), "Configuration error: invalid glyph cache capacity \"lots\"");
    }

    #[test]
    fn test_runtime_override() {
        // global state: this is the only test in the crate that writes it
        set_glyph_cache_capacity(16);
        assert_eq!(glyph_cache_capacity(), 16);
        assert!(is_glyph_cache_enabled());
        set_glyph_cache_capacity(0);
        assert!(!is_glyph_cache_enabled());
    }
}
