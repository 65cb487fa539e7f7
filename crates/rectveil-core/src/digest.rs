#![forbid(unsafe_code)]

//! Stable digests of numeric vectors.
//!
//! The engine's memo tables are keyed by content digests rather than by the
//! raw floats, so the same number always lands in the same bucket while the
//! key stays `Eq + Hash` without any float-equality pitfalls.
//!
//! Whole rectangles are digested over their four f64 bit patterns. Scalars
//! are digested over the value narrowed to f32 bits: nearby f64 readouts
//! that round to the same f32 share one value-cache bucket, which keeps the
//! per-slot caches from fragmenting across sub-ULP readout noise.

use std::fmt;

use crate::geometry::DomRect;

/// A 32-byte content digest used as a memo-table key.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Digest([u8; 32]);

impl Digest {
    /// Digest of raw bytes.
    #[inline]
    pub fn of(bytes: &[u8]) -> Self {
        Self(*blake3::hash(bytes).as_bytes())
    }

    /// The digest bytes.
    #[inline]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // First eight bytes are plenty to tell digests apart in logs.
        write!(f, "Digest(")?;
        for byte in &self.0[..8] {
            write!(f, "{byte:02x}")?;
        }
        write!(f, "..)")
    }
}

/// Digest of a rectangle's four primary components.
///
/// The kind is excluded: a mutable and a read-only rectangle with equal
/// components digest identically.
pub fn rect_digest(rect: &DomRect) -> Digest {
    let mut bytes = [0u8; 32];
    for (chunk, component) in bytes.chunks_exact_mut(8).zip(rect.components()) {
        chunk.copy_from_slice(&component.to_le_bytes());
    }
    Digest::of(&bytes)
}

/// Digest of a single scalar, narrowed to f32 bits.
pub fn scalar_digest(value: f64) -> Digest {
    Digest::of(&(value as f32).to_le_bytes())
}
