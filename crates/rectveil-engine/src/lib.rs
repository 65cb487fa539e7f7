#![forbid(unsafe_code)]

//! Deterministic DOMRect spoofing engine.
//!
//! rectveil substitutes perturbed-but-stable values for the sub-pixel
//! geometry that browser APIs report, so scripts cannot use rectangle
//! readouts as a device fingerprint while layout-dependent code keeps
//! working.
//!
//! # Data flow
//!
//! 1. An installer binds the wrappers produced by the declarative tables in
//!    [`intercept`] and [`property`] onto the host runtime.
//! 2. A geometry-returning call goes through a [`intercept::TrackedOperation`]
//!    wrapper, which registers every returned rectangle in the
//!    [`registry::RectRegistry`] and returns the result unmodified.
//! 3. A later property read on a registered rectangle resolves through
//!    [`fake::SpoofEngine::fake_rect`], which memoizes faked rectangles and
//!    scalars in the two-tier caches of [`cache`].
//! 4. A property write materializes the faked snapshot into the live object
//!    and removes the registration; the instance is never faked again.
//!
//! The engine is single-threaded and synchronous throughout: shared state
//! lives behind `Rc`/`RefCell`/`Cell`, and no operation has a suspension
//! point.

pub mod cache;
pub mod error;
pub mod fake;
pub mod intercept;
pub mod policy;
pub mod property;
pub mod registry;
pub mod rng;
pub mod tracked;

pub use cache::{CacheStats, GeometryCache, Slot, ValueCache};
pub use error::{EngineError, PolicyError, Result};
pub use fake::{FAKED_READOUT, SpoofEngine};
pub use intercept::{
    CallContext, HostType, OriginalOp, ResultShape, TRACKED_OPERATIONS, TrackedOperation,
    WrappedOp, tracked_operation,
};
pub use policy::{PolicyAccessor, PolicySettings, ReadoutStatus, SettingsPolicy, readout_status};
pub use property::{
    OriginalSetter, PropertyKind, ReadAccessor, RectProperty, RectTarget, TRACKED_PROPERTIES,
    TrackedProperty, WriteAccessor, tracked_property,
};
pub use registry::{OneShotNotifier, RectId, RectRegistry, Registration};
pub use rng::{DeterministicSupply, RandomSupply, SlotDraws};
pub use tracked::TrackedRect;

/// Opaque handle identifying a browsing context.
///
/// The engine never owns the context; it only scopes randomness streams and
/// policy lookups by it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContextId(pub u64);
