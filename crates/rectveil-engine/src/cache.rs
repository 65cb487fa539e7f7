#![forbid(unsafe_code)]

//! Two-tier memo tables for faked scalars and rectangles.
//!
//! The geometry cache maps whole-rectangle digests to faked rectangles; the
//! four value caches map scalar digests to faked scalars, one cache per
//! coordinate slot. Both tiers insert under the original digest *and* the
//! faked digest, so re-submitting an already-faked value is a hit that
//! returns itself (idempotence).
//!
//! Splitting the tiers is what preserves relative layout: two rectangles
//! sharing an `x` fake that `x` identically even when the rest of their
//! components differ.
//!
//! Entries live for the engine's lifetime; there is no eviction. [`clear`]
//! and the hit/miss [`CacheStats`] let a host bound memory externally if a
//! session runs long enough to need it.
//!
//! [`clear`]: GeometryCache::clear

use rectveil_core::{Digest, DomRect};
use rustc_hash::FxHashMap;

/// Coordinate slot of a rectangle component.
///
/// Each slot owns its own value cache: the same raw number may need
/// different treatment depending on which component it appears in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    /// Horizontal origin.
    X,
    /// Vertical origin.
    Y,
    /// Width.
    Width,
    /// Height.
    Height,
}

impl Slot {
    /// All slots in component order.
    pub const ALL: [Slot; 4] = [Slot::X, Slot::Y, Slot::Width, Slot::Height];

    /// Index into a `[f64; 4]` of components.
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Slot::X => 0,
            Slot::Y => 1,
            Slot::Width => 2,
            Slot::Height => 3,
        }
    }
}

/// Hit/miss counters for one cache.
#[derive(Debug, Clone, Default)]
pub struct CacheStats {
    /// Number of entries currently in the cache.
    pub entries: usize,
    /// Total cache hits since creation or last clear.
    pub hits: u64,
    /// Total cache misses since creation or last clear.
    pub misses: u64,
    /// Hit rate as a fraction (0.0 to 1.0).
    pub hit_rate: f64,
}

impl CacheStats {
    fn new(entries: usize, hits: u64, misses: u64) -> Self {
        let total = hits + misses;
        Self {
            entries,
            hits,
            misses,
            hit_rate: if total > 0 {
                hits as f64 / total as f64
            } else {
                0.0
            },
        }
    }
}

/// Memo table from scalar digests to faked scalars.
#[derive(Debug, Default)]
pub struct ValueCache {
    entries: FxHashMap<Digest, f64>,
    hits: u64,
    misses: u64,
}

impl ValueCache {
    /// Empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a faked scalar, counting the hit or miss.
    pub fn lookup(&mut self, digest: &Digest) -> Option<f64> {
        match self.entries.get(digest) {
            Some(&value) => {
                self.hits += 1;
                Some(value)
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    /// Record an unperturbed value: it maps to itself under its own digest.
    pub fn insert_fixed_point(&mut self, digest: Digest, value: f64) {
        self.entries.insert(digest, value);
    }

    /// Record a perturbed value under both the original and faked digests,
    /// making the faked value a fixed point of later lookups.
    pub fn insert_perturbed(&mut self, original: Digest, faked_digest: Digest, faked: f64) {
        self.entries.insert(original, faked);
        self.entries.insert(faked_digest, faked);
    }

    /// Current counters.
    pub fn stats(&self) -> CacheStats {
        CacheStats::new(self.entries.len(), self.hits, self.misses)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if no entries are cached.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop all entries and counters.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.hits = 0;
        self.misses = 0;
    }
}

/// Memo table from whole-rectangle digests to faked rectangles.
#[derive(Debug, Default)]
pub struct GeometryCache {
    entries: FxHashMap<Digest, DomRect>,
    hits: u64,
    misses: u64,
}

impl GeometryCache {
    /// Empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a faked rectangle, counting the hit or miss.
    pub fn lookup(&mut self, digest: &Digest) -> Option<DomRect> {
        match self.entries.get(digest) {
            Some(&rect) => {
                self.hits += 1;
                Some(rect)
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    /// Record a faked rectangle under both the original tuple's digest and
    /// its own, so re-submitting the fake returns itself.
    pub fn insert(&mut self, original: Digest, faked_digest: Digest, faked: DomRect) {
        self.entries.insert(original, faked);
        self.entries.insert(faked_digest, faked);
    }

    /// Current counters.
    pub fn stats(&self) -> CacheStats {
        CacheStats::new(self.entries.len(), self.hits, self.misses)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if no entries are cached.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop all entries and counters.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.hits = 0;
        self.misses = 0;
    }
}
