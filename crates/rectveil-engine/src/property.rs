#![forbid(unsafe_code)]

//! Declarative property override table for rectangle accessors.
//!
//! Reads of a registered rectangle resolve transparently through the faking
//! algorithm using the registration's context, policy, and notifier; reads
//! of anything else pass through. A write to a primary property
//! materializes the faked snapshot into the live object, removes the
//! registration, and forwards nothing — the instance is never faked again.
//! Writes to unregistered rectangles forward to the original setter
//! unchanged.
//!
//! Three IntersectionObserverEntry getters produce rectangles of their own;
//! they are handled exactly like an intercepted operation: register the
//! result, return it unmodified.

use std::rc::Rc;

use rectveil_core::{DomRect, RectKind};

use crate::ContextId;
use crate::cache::Slot;
use crate::error::{EngineError, Result};
use crate::fake::SpoofEngine;
use crate::intercept::WrappedOp;
use crate::policy::PolicyAccessor;
use crate::tracked::TrackedRect;

/// Scalar rectangle properties the engine overrides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RectProperty {
    /// Primary `x`.
    X,
    /// Primary `y`.
    Y,
    /// Primary `width`.
    Width,
    /// Primary `height`.
    Height,
    /// Derived `left`.
    Left,
    /// Derived `right`.
    Right,
    /// Derived `top`.
    Top,
    /// Derived `bottom`.
    Bottom,
}

impl RectProperty {
    /// Property name as the host exposes it.
    pub const fn name(self) -> &'static str {
        match self {
            Self::X => "x",
            Self::Y => "y",
            Self::Width => "width",
            Self::Height => "height",
            Self::Left => "left",
            Self::Right => "right",
            Self::Top => "top",
            Self::Bottom => "bottom",
        }
    }

    /// Coordinate slot for primary properties; derived properties have
    /// none.
    pub const fn slot(self) -> Option<Slot> {
        match self {
            Self::X => Some(Slot::X),
            Self::Y => Some(Slot::Y),
            Self::Width => Some(Slot::Width),
            Self::Height => Some(Slot::Height),
            _ => None,
        }
    }

    /// Primary properties are writable; derived ones are not.
    pub const fn writable(self) -> bool {
        self.slot().is_some()
    }

    /// Value of this property on a snapshot.
    pub fn read(self, rect: &DomRect) -> f64 {
        match self {
            Self::X => rect.x,
            Self::Y => rect.y,
            Self::Width => rect.width,
            Self::Height => rect.height,
            Self::Left => rect.left(),
            Self::Right => rect.right(),
            Self::Top => rect.top(),
            Self::Bottom => rect.bottom(),
        }
    }
}

/// Prototype probes a property override installs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RectTarget {
    /// `DOMRect.prototype`.
    DomRect,
    /// `DOMRectReadOnly.prototype`.
    DomRectReadOnly,
    /// `IntersectionObserverEntry.prototype`.
    IntersectionObserverEntry,
}

/// What a tracked property yields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyKind {
    /// A scalar component resolved through the faking algorithm.
    Scalar(RectProperty),
    /// A rectangle-valued getter; its result is registered like an
    /// intercepted operation's.
    RectSource,
}

/// One tracked property override.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackedProperty {
    /// Property name as the host exposes it.
    pub name: &'static str,
    /// Prototypes the installer probes for this accessor.
    pub targets: &'static [RectTarget],
    /// Scalar or rectangle-valued.
    pub kind: PropertyKind,
}

/// A bound read accessor for a scalar property.
pub type ReadAccessor = Box<dyn Fn(&Rc<TrackedRect>) -> Result<f64>>;

/// A bound write accessor for a primary property.
pub type WriteAccessor = Box<dyn Fn(&Rc<TrackedRect>, f64) -> Result<()>>;

/// The host's unwrapped setter for one component.
pub type OriginalSetter = Rc<dyn Fn(&TrackedRect, f64)>;

impl TrackedProperty {
    /// True for the four primary scalar properties.
    pub const fn writable(&self) -> bool {
        match self.kind {
            PropertyKind::Scalar(property) => property.writable(),
            PropertyKind::RectSource => false,
        }
    }

    /// Getter for a scalar property; `None` for rect-valued entries, which
    /// bind through [`rect_source_factory`] instead.
    ///
    /// [`rect_source_factory`]: TrackedProperty::rect_source_factory
    pub fn read_factory(&self, engine: &Rc<SpoofEngine>) -> Option<ReadAccessor> {
        let PropertyKind::Scalar(property) = self.kind else {
            return None;
        };
        let engine = Rc::clone(engine);
        Some(Box::new(move |rect| engine.read_scalar(rect, property)))
    }

    /// Setter for a primary property; `None` for derived and rect-valued
    /// entries.
    ///
    /// Mirrors the install-time shape of the host setter: the context and
    /// policy are captured where the setter is installed, while the
    /// notifier comes from the rectangle's registration.
    pub fn write_factory(
        &self,
        engine: &Rc<SpoofEngine>,
        ctx: ContextId,
        original: OriginalSetter,
        policy: Rc<dyn PolicyAccessor>,
    ) -> Option<WriteAccessor> {
        let PropertyKind::Scalar(property) = self.kind else {
            return None;
        };
        if !property.writable() {
            return None;
        }
        let engine = Rc::clone(engine);
        Some(Box::new(move |rect, new_value| {
            engine.write_scalar(rect, property, new_value, ctx, policy.as_ref(), original.as_ref())
        }))
    }

    /// Wrapper for the rect-valued getters; registers the produced
    /// rectangle and returns it unmodified. `None` for scalar entries.
    pub fn rect_source_factory(&self, engine: &Rc<SpoofEngine>) -> Option<WrappedOp> {
        if self.kind != PropertyKind::RectSource {
            return None;
        }
        let engine = Rc::clone(engine);
        Some(Box::new(move |call, args| {
            let result = (call.original)(args);
            for rect in &result {
                engine.register_rect(
                    rect,
                    Rc::clone(&call.notify),
                    call.context,
                    Rc::clone(&call.policy),
                );
            }
            result
        }))
    }
}

impl SpoofEngine {
    /// Read one scalar property, resolving registered rectangles through
    /// the faking algorithm and passing everything else through.
    pub fn read_scalar(&self, rect: &Rc<TrackedRect>, property: RectProperty) -> Result<f64> {
        match self.registry().lookup(rect) {
            Some(registration) => {
                let faked = self.fake_rect(
                    registration.context,
                    &rect.snapshot(),
                    registration.policy.as_ref(),
                    registration.notify.as_ref(),
                )?;
                Ok(property.read(&faked))
            }
            None => Ok(property.read(&rect.snapshot())),
        }
    }

    /// Write one primary property.
    ///
    /// Registered: resolve the faked rectangle, remove the registration,
    /// then bake the written value into the target slot and the faked
    /// values into the other three. Unregistered: forward to the original
    /// setter unchanged.
    pub fn write_scalar(
        &self,
        rect: &Rc<TrackedRect>,
        property: RectProperty,
        new_value: f64,
        ctx: ContextId,
        policy: &dyn PolicyAccessor,
        original: &dyn Fn(&TrackedRect, f64),
    ) -> Result<()> {
        let Some(slot) = property.slot() else {
            return Err(EngineError::ReadOnlyWrite {
                property: property.name(),
            });
        };
        if rect.kind() == RectKind::ReadOnly {
            return Err(EngineError::ReadOnlyWrite {
                property: property.name(),
            });
        }

        match self.registry().lookup(rect) {
            Some(registration) => {
                let faked = self.fake_rect(
                    ctx,
                    &rect.snapshot(),
                    policy,
                    registration.notify.as_ref(),
                )?;
                self.registry().unregister(rect);
                #[cfg(feature = "tracing")]
                tracing::debug!(property = property.name(), "materializing faked rectangle");
                for s in Slot::ALL {
                    if s == slot {
                        rect.set_component(s, new_value);
                    } else {
                        rect.set_component(s, faked.components()[s.index()]);
                    }
                }
                Ok(())
            }
            None => {
                original(rect, new_value);
                Ok(())
            }
        }
    }
}

/// The tracked property overrides, in installation order.
pub const TRACKED_PROPERTIES: &[TrackedProperty] = &[
    TrackedProperty {
        name: "x",
        targets: &[RectTarget::DomRect, RectTarget::DomRectReadOnly],
        kind: PropertyKind::Scalar(RectProperty::X),
    },
    TrackedProperty {
        name: "y",
        targets: &[RectTarget::DomRect, RectTarget::DomRectReadOnly],
        kind: PropertyKind::Scalar(RectProperty::Y),
    },
    TrackedProperty {
        name: "width",
        targets: &[RectTarget::DomRect, RectTarget::DomRectReadOnly],
        kind: PropertyKind::Scalar(RectProperty::Width),
    },
    TrackedProperty {
        name: "height",
        targets: &[RectTarget::DomRect, RectTarget::DomRectReadOnly],
        kind: PropertyKind::Scalar(RectProperty::Height),
    },
    TrackedProperty {
        name: "left",
        targets: &[RectTarget::DomRectReadOnly],
        kind: PropertyKind::Scalar(RectProperty::Left),
    },
    TrackedProperty {
        name: "right",
        targets: &[RectTarget::DomRectReadOnly],
        kind: PropertyKind::Scalar(RectProperty::Right),
    },
    TrackedProperty {
        name: "top",
        targets: &[RectTarget::DomRectReadOnly],
        kind: PropertyKind::Scalar(RectProperty::Top),
    },
    TrackedProperty {
        name: "bottom",
        targets: &[RectTarget::DomRectReadOnly],
        kind: PropertyKind::Scalar(RectProperty::Bottom),
    },
    TrackedProperty {
        name: "intersectionRect",
        targets: &[RectTarget::IntersectionObserverEntry],
        kind: PropertyKind::RectSource,
    },
    TrackedProperty {
        name: "boundingClientRect",
        targets: &[RectTarget::IntersectionObserverEntry],
        kind: PropertyKind::RectSource,
    },
    TrackedProperty {
        name: "rootBounds",
        targets: &[RectTarget::IntersectionObserverEntry],
        kind: PropertyKind::RectSource,
    },
];

/// Look up a tracked property by name.
pub fn tracked_property(name: &str) -> Option<&'static TrackedProperty> {
    TRACKED_PROPERTIES.iter().find(|p| p.name == name)
}
