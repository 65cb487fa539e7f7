#![forbid(unsafe_code)]

//! Randomness supply contract and the deterministic default.
//!
//! The engine consumes randomness through the [`RandomSupply`] trait only:
//! one batch of integer draws per geometry-cache miss, scoped to the
//! requesting context. The supplier's generation algorithm is its own
//! business; the engine relies solely on the contract that the same context
//! yields a reproducible stream and distinct contexts yield unlinkable
//! streams.

use std::cell::RefCell;
use std::fmt;

use rustc_hash::FxHashMap;

use crate::ContextId;
use crate::cache::Slot;

/// Draws for one fake computation, one integer per coordinate slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotDraws(Vec<u32>);

impl SlotDraws {
    /// Wrap raw draws. Slot `i` reads `draws[i]`.
    pub fn new(draws: Vec<u32>) -> Self {
        Self(draws)
    }

    /// Raw draw for the given slot.
    ///
    /// # Panics
    ///
    /// Panics if fewer draws were requested than the slot index requires;
    /// the engine always requests one per slot.
    pub fn get(&self, slot: Slot) -> u32 {
        self.0[slot.index()]
    }

    /// Draw for the given slot, normalized to `[-0.5, 0.5)`.
    pub fn normalized(&self, slot: Slot) -> f64 {
        f64::from(self.get(slot)) / 4_294_967_296.0 - 0.5
    }
}

/// Source of per-context deterministic randomness.
pub trait RandomSupply: fmt::Debug {
    /// Yield `count` independent draws scoped to `ctx`.
    ///
    /// Repeated calls for the same context continue that context's stream;
    /// they are not required to repeat earlier draws.
    fn slot_draws(&self, count: usize, ctx: ContextId) -> SlotDraws;
}

/// Deterministic xorshift64-based supply.
///
/// Each context gets its own stream, seeded from the supply seed mixed with
/// the context id and advanced on every draw. Two supplies built with the
/// same seed replay identical per-context streams, which is what the test
/// harness leans on.
#[derive(Debug)]
pub struct DeterministicSupply {
    seed: u64,
    states: RefCell<FxHashMap<ContextId, u64>>,
}

impl DeterministicSupply {
    /// Create a supply from a seed.
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            states: RefCell::new(FxHashMap::default()),
        }
    }

    /// The configured seed.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Initial stream state for a context (splitmix64 finalizer).
    fn stream_seed(seed: u64, ctx: ContextId) -> u64 {
        let mut z = seed ^ ctx.0.wrapping_mul(0x9e37_79b9_7f4a_7c15);
        z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
        z ^= z >> 31;
        // xorshift64 has an all-zero fixed point.
        if z == 0 { 1 } else { z }
    }
}

impl RandomSupply for DeterministicSupply {
    fn slot_draws(&self, count: usize, ctx: ContextId) -> SlotDraws {
        let mut states = self.states.borrow_mut();
        let state = states
            .entry(ctx)
            .or_insert_with(|| Self::stream_seed(self.seed, ctx));
        let mut draws = Vec::with_capacity(count);
        for _ in 0..count {
            *state ^= *state << 13;
            *state ^= *state >> 7;
            *state ^= *state << 17;
            draws.push((*state >> 32) as u32);
        }
        SlotDraws::new(draws)
    }
}
