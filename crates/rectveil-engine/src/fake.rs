#![forbid(unsafe_code)]

//! The faking algorithm and the engine that owns its state.
//!
//! [`SpoofEngine::fake_rect`] turns an original four-component rectangle
//! into a stable faked counterpart:
//!
//! 1. Geometry-cache hit on the whole tuple's digest returns the cached
//!    rectangle; no notification fires, no randomness is drawn.
//! 2. On a miss, the one-shot notifier fires with [`FAKED_READOUT`], four
//!    draws are taken from the context's randomness stream, and each
//!    component is faked independently through its slot's value cache.
//! 3. A component whose product with the policy's integer factor is an
//!    integer is pixel-aligned and passes through as a fixed point.
//!    Anything else is perturbed by at most half of 0.01 and cached under
//!    both its original and faked digests.
//! 4. The faked rectangle keeps the original's concrete kind and is cached
//!    under both tuple digests, so re-submitting a fake returns itself.

use std::cell::RefCell;
use std::rc::Rc;

use rectveil_core::{DomRect, rect_digest, scalar_digest};

use crate::ContextId;
use crate::cache::{CacheStats, GeometryCache, Slot, ValueCache};
use crate::error::{EngineError, Result};
use crate::policy::PolicyAccessor;
use crate::registry::{OneShotNotifier, RectRegistry};
use crate::rng::{RandomSupply, SlotDraws};
use crate::tracked::TrackedRect;

/// Notification key reported when a rectangle readout is faked.
pub const FAKED_READOUT: &str = "fakedDOMRectReadout";

/// Maximum perturbation magnitude is half of this step.
const JITTER_STEP: f64 = 0.01;

/// The spoofing engine: registry, memo caches, and the injected randomness
/// source.
///
/// Single-threaded by design; all interior state is `RefCell`-guarded and
/// every operation runs to completion before another can observe it.
#[derive(Debug, Default)]
pub struct SpoofEngine {
    supply: RefCell<Option<Rc<dyn RandomSupply>>>,
    registry: RectRegistry,
    geometry: RefCell<GeometryCache>,
    values: RefCell<[ValueCache; 4]>,
}

impl SpoofEngine {
    /// Engine with no randomness source yet.
    ///
    /// A source must be injected via [`set_random_supply`] before the first
    /// cache-missing fake, or that fake fails with
    /// [`EngineError::RandomSupplyMissing`].
    ///
    /// [`set_random_supply`]: SpoofEngine::set_random_supply
    pub fn new() -> Self {
        Self::default()
    }

    /// Engine with a randomness source already injected.
    pub fn with_supply(supply: Rc<dyn RandomSupply>) -> Self {
        let engine = Self::new();
        engine.set_random_supply(supply);
        engine
    }

    /// Inject or replace the randomness source.
    pub fn set_random_supply(&self, supply: Rc<dyn RandomSupply>) {
        *self.supply.borrow_mut() = Some(supply);
    }

    /// The registration registry.
    pub fn registry(&self) -> &RectRegistry {
        &self.registry
    }

    /// Register a live rectangle for later faking.
    pub fn register_rect(
        &self,
        rect: &Rc<TrackedRect>,
        notify: Rc<dyn Fn(&str)>,
        context: ContextId,
        policy: Rc<dyn PolicyAccessor>,
    ) {
        self.registry.register(rect, notify, context, policy);
    }

    /// Geometry cache counters.
    pub fn geometry_stats(&self) -> CacheStats {
        self.geometry.borrow().stats()
    }

    /// Value cache counters for one slot.
    pub fn value_stats(&self, slot: Slot) -> CacheStats {
        self.values.borrow()[slot.index()].stats()
    }

    /// Drop every cached scalar and rectangle.
    ///
    /// Determinism for entries that were cached does not survive a clear;
    /// this exists for hosts that must bound memory, not for routine use.
    pub fn clear_caches(&self) {
        self.geometry.borrow_mut().clear();
        for cache in self.values.borrow_mut().iter_mut() {
            cache.clear();
        }
    }

    /// Produce (or retrieve) the faked counterpart of `rect`.
    ///
    /// A rectangle containing a non-finite component bypasses the geometry
    /// cache; its finite components still resolve through the per-slot
    /// value caches and non-finite ones pass through untouched.
    pub fn fake_rect(
        &self,
        ctx: ContextId,
        rect: &DomRect,
        policy: &dyn PolicyAccessor,
        notify: &OneShotNotifier,
    ) -> Result<DomRect> {
        let finite = rect.is_finite();
        if finite {
            let digest = rect_digest(rect);
            if let Some(hit) = self.geometry.borrow_mut().lookup(&digest) {
                return Ok(hit);
            }
        }

        // Fail before the notifier fires: a call that cannot fake must not
        // surface a "value was faked" event.
        let supply = self
            .supply
            .borrow()
            .clone()
            .ok_or(EngineError::RandomSupplyMissing)?;
        let factor = policy.integer_factor(ctx)?;

        notify.notify(FAKED_READOUT);
        let draws = supply.slot_draws(Slot::ALL.len(), ctx);

        #[cfg(feature = "tracing")]
        tracing::trace!(ctx = ctx.0, factor, "geometry cache miss, faking rectangle");

        let components = rect.components();
        let mut faked = [0.0f64; 4];
        {
            let mut values = self.values.borrow_mut();
            for slot in Slot::ALL {
                faked[slot.index()] = Self::fake_scalar(
                    &mut values[slot.index()],
                    components[slot.index()],
                    slot,
                    factor,
                    &draws,
                );
            }
        }

        let out = DomRect::new(rect.kind, faked[0], faked[1], faked[2], faked[3]);
        if finite {
            self.geometry
                .borrow_mut()
                .insert(rect_digest(rect), rect_digest(&out), out);
        }
        Ok(out)
    }

    /// Fake one scalar through its slot's value cache.
    fn fake_scalar(
        cache: &mut ValueCache,
        value: f64,
        slot: Slot,
        factor: f64,
        draws: &SlotDraws,
    ) -> f64 {
        if !value.is_finite() {
            // Perturbing a non-finite number is meaningless; pass it
            // through without touching the cache.
            return value;
        }

        let digest = scalar_digest(value);
        if let Some(hit) = cache.lookup(&digest) {
            return hit;
        }

        if (value * factor).fract() == 0.0 {
            // Pixel-aligned under the current scaling: a fixed point.
            cache.insert_fixed_point(digest, value);
            value
        } else {
            let faked = value + JITTER_STEP * draws.normalized(slot);
            #[cfg(feature = "tracing")]
            tracing::trace!(?slot, value, faked, "perturbed sub-pixel component");
            cache.insert_perturbed(digest, scalar_digest(faked), faked);
            faked
        }
    }
}
