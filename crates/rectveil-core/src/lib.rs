#![forbid(unsafe_code)]

//! Geometry primitives and stable digests for rectveil.
//!
//! This crate carries the value types the spoofing engine operates on:
//! [`DomRect`] snapshots of host rectangles and the [`Digest`] keys used by
//! the engine's memo tables. It knows nothing about registration, caching,
//! or policy; those live in `rectveil-engine`.

pub mod digest;
pub mod geometry;

pub use digest::{Digest, rect_digest, scalar_digest};
pub use geometry::{DomRect, RectKind};
