//! CSS colour strings to RGBA, with an LRU cache.
//!
//! Supported forms:
//! - `#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa`
//! - `rgb(r, g, b)` and `rgba(r, g, b, a)` with `a` in `[0, 1]`
//! - `transparent` and a table of common CSS colour names

use lru::LruCache;
use serde::Serialize;
use std::num::NonZeroUsize;

/// Default cache capacity.
const DEFAULT_CACHE_CAPACITY: usize = 256;

/// A colour as `[red, green, blue, alpha]` bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Rgba(pub [u8; 4]);

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba([0, 0, 0, 0]);
    pub const BLACK: Rgba = Rgba([0, 0, 0, 255]);

    /// Returns whether the colour is fully transparent.
    pub fn is_transparent(&self) -> bool {
        self.0[3] == 0
    }
}

const NAMED_COLOURS: &[(&str, [u8; 3])] = &[
    ("black", [0, 0, 0]),
    ("white", [255, 255, 255]),
    ("red", [255, 0, 0]),
    ("green", [0, 128, 0]),
    ("lime", [0, 255, 0]),
    ("blue", [0, 0, 255]),
    ("yellow", [255, 255, 0]),
    ("cyan", [0, 255, 255]),
    ("aqua", [0, 255, 255]),
    ("magenta", [255, 0, 255]),
    ("fuchsia", [255, 0, 255]),
    ("silver", [192, 192, 192]),
    ("gray", [128, 128, 128]),
    ("grey", [128, 128, 128]),
    ("maroon", [128, 0, 0]),
    ("olive", [128, 128, 0]),
    ("purple", [128, 0, 128]),
    ("teal", [0, 128, 128]),
    ("navy", [0, 0, 128]),
    ("orange", [255, 165, 0]),
    ("pink", [255, 192, 203]),
    ("brown", [165, 42, 42]),
    ("gold", [255, 215, 0]),
    ("indigo", [75, 0, 130]),
    ("violet", [238, 130, 238]),
    ("crimson", [220, 20, 60]),
    ("coral", [255, 127, 80]),
    ("salmon", [250, 128, 114]),
    ("khaki", [240, 230, 140]),
    ("turquoise", [64, 224, 208]),
    ("steelblue", [70, 130, 180]),
    ("tomato", [255, 99, 71]),
];

/// Parses a colour string without caching.
///
/// # Returns
/// `None` if the string is not a supported colour.
///
/// # Examples
/// ```
/// # use phylograph::session::colour::{parse_colour, Rgba};
/// assert_eq!(parse_colour("#f00"), Some(Rgba([255, 0, 0, 255])));
/// assert_eq!(parse_colour("#3366cc80"), Some(Rgba([51, 102, 204, 128])));
/// assert_eq!(parse_colour("rgba(10, 20, 30, 0.5)"), Some(Rgba([10, 20, 30, 128])));
/// assert_eq!(parse_colour("Teal"), Some(Rgba([0, 128, 128, 255])));
/// assert_eq!(parse_colour("not-a-colour"), None);
/// ```
pub fn parse_colour(colour: &str) -> Option<Rgba> {
    let colour = colour.trim().to_ascii_lowercase();
    if colour == "transparent" {
        return Some(Rgba::TRANSPARENT);
    }
    if let Some(hex) = colour.strip_prefix('#') {
        return parse_hex(hex);
    }
    if let Some(args) = colour
        .strip_prefix("rgba(")
        .or_else(|| colour.strip_prefix("rgb("))
    {
        return parse_functional(args.strip_suffix(')')?);
    }
    NAMED_COLOURS
        .iter()
        .find(|(name, _)| *name == colour)
        .map(|&(_, [r, g, b])| Rgba([r, g, b, 255]))
}

fn parse_hex(hex: &str) -> Option<Rgba> {
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let digit = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok();
    let pair = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();

    match hex.len() {
        3 | 4 => {
            let mut rgba = [255u8; 4];
            for (i, channel) in rgba.iter_mut().enumerate().take(hex.len()) {
                *channel = digit(i)? * 17;
            }
            Some(Rgba(rgba))
        }
        6 | 8 => {
            let mut rgba = [255u8; 4];
            for (i, channel) in rgba.iter_mut().enumerate().take(hex.len() / 2) {
                *channel = pair(2 * i)?;
            }
            Some(Rgba(rgba))
        }
        _ => None,
    }
}

fn parse_functional(args: &str) -> Option<Rgba> {
    let parts: Vec<&str> = args.split(',').map(str::trim).collect();
    if parts.len() != 3 && parts.len() != 4 {
        return None;
    }

    let mut rgba = [255u8; 4];
    for (channel, part) in rgba.iter_mut().zip(&parts[..3]) {
        let value: f64 = part.parse().ok()?;
        *channel = value.round().clamp(0.0, 255.0) as u8;
    }
    if let Some(alpha) = parts.get(3) {
        let alpha: f64 = alpha.parse().ok()?;
        rgba[3] = (alpha.clamp(0.0, 1.0) * 255.0).round() as u8;
    }
    Some(Rgba(rgba))
}

// =#========================================================================#=
// COLOUR CACHE
// =#========================================================================$=
/// Bounded LRU cache from colour strings to parse results.
///
/// Failed parses are cached too, so an invalid style colour is only
/// reported once while it stays in the cache.
#[derive(Debug)]
pub struct ColourCache {
    cache: LruCache<String, Option<Rgba>>,
    hits: u64,
    misses: u64,
}

impl Default for ColourCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}

impl ColourCache {
    /// Creates a new cache with the specified capacity (at least 1).
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            cache: LruCache::new(capacity),
            hits: 0,
            misses: 0,
        }
    }

    /// Parses `colour`, consulting the cache first.
    ///
    /// # Returns
    /// The colour, and whether this call parsed it (cache miss).
    pub fn resolve(&mut self, colour: &str) -> (Option<Rgba>, bool) {
        if let Some(&cached) = self.cache.get(colour) {
            self.hits += 1;
            return (cached, false);
        }
        self.misses += 1;
        let parsed = parse_colour(colour);
        self.cache.put(colour.to_string(), parsed);
        (parsed, true)
    }

    /// Parses `colour` through the cache.
    pub fn get(&mut self, colour: &str) -> Option<Rgba> {
        self.resolve(colour).0
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    /// Maximum number of cached entries.
    pub fn capacity(&self) -> usize {
        self.cache.cap().get()
    }

    /// Returns `(hits, misses)` since creation.
    pub fn stats(&self) -> (u64, u64) {
        (self.hits, self.misses)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_forms() {
        assert_eq!(parse_colour("#000"), Some(Rgba::BLACK));
        assert_eq!(parse_colour("#0000"), Some(Rgba::TRANSPARENT));
        assert_eq!(parse_colour("#FFFFFF"), Some(Rgba([255, 255, 255, 255])));
        assert_eq!(parse_colour("#12345"), None);
        assert_eq!(parse_colour("#gg0000"), None);
    }

    #[test]
    fn test_rgb_function() {
        assert_eq!(parse_colour("rgb(255, 128, 0)"), Some(Rgba([255, 128, 0, 255])));
        assert_eq!(parse_colour("rgb(300, -4, 0)"), Some(Rgba([255, 0, 0, 255])));
        assert_eq!(parse_colour("rgb(1, 2)"), None);
        assert_eq!(parse_colour("rgb(1, 2, 3"), None);
    }

    #[test]
    fn test_transparent() {
        assert!(parse_colour("transparent").unwrap().is_transparent());
    }

    #[test]
    fn test_cache_hits_and_eviction() {
        let mut cache = ColourCache::new(2);
        assert_eq!(cache.resolve("red"), (Some(Rgba([255, 0, 0, 255])), true));
        assert_eq!(cache.resolve("red"), (Some(Rgba([255, 0, 0, 255])), false));
        assert_eq!(cache.resolve("nope"), (None, true));
        assert_eq!(cache.resolve("nope"), (None, false));
        cache.get("blue");
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.stats(), (2, 3));
        // "red" was least recently used
        assert!(cache.resolve("red").1);
    }

    #[test]
    fn test_zero_capacity_is_one() {
        assert_eq!(ColourCache::new(0).capacity(), 1);
    }
}
