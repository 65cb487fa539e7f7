#![forbid(unsafe_code)]

//! Declarative interception table for geometry-returning operations.
//!
//! The engine never touches the host runtime's dispatch itself. It exposes
//! [`TRACKED_OPERATIONS`] as static data; an external installer walks the
//! table, binds each wrapper built by [`TrackedOperation::factory`] in
//! place of the original operation, and supplies a [`CallContext`] bundle
//! per call. The wrapper invokes the original unchanged, registers every
//! rectangle in the result, and returns the result unmodified — faking is
//! deferred to the first property read, never performed eagerly.

use std::fmt;
use std::rc::Rc;

use crate::ContextId;
use crate::fake::SpoofEngine;
use crate::policy::PolicyAccessor;
use crate::tracked::TrackedRect;

/// Host prototypes a tracked operation is patched on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostType {
    /// `Element.prototype`.
    Element,
    /// `Range.prototype`.
    Range,
    /// `DOMQuad.prototype`.
    DomQuad,
    /// `SVGGraphicsElement.prototype`.
    SvgGraphicsElement,
    /// `SVGTextContentElement.prototype`.
    SvgTextContentElement,
}

/// Whether an operation returns one rectangle or a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultShape {
    /// One rectangle.
    Single,
    /// A list of rectangles, each registered individually.
    List,
}

/// Underlying native operation, supplied by the installer per call site.
///
/// Arguments are forwarded opaquely; the tracked operations are either
/// zero-argument or take numeric arguments (`getExtentOfChar`).
pub type OriginalOp = Rc<dyn Fn(&[f64]) -> Vec<Rc<TrackedRect>>>;

/// Per-call bundle the installer hands to every wrapped operation.
#[derive(Clone)]
pub struct CallContext {
    /// Policy accessor for this call's scope.
    pub policy: Rc<dyn PolicyAccessor>,
    /// Notification callback; wrapped in a one-shot guard per rectangle at
    /// registration time.
    pub notify: Rc<dyn Fn(&str)>,
    /// Window/session context of the call.
    pub context: ContextId,
    /// The unwrapped original operation.
    pub original: OriginalOp,
}

impl fmt::Debug for CallContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallContext")
            .field("policy", &self.policy)
            .field("context", &self.context)
            .finish_non_exhaustive()
    }
}

/// One tracked geometry-returning operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackedOperation {
    /// Name of the patched operation.
    pub name: &'static str,
    /// Prototypes the installer patches.
    pub targets: &'static [HostType],
    /// Single rectangle or collection result.
    pub shape: ResultShape,
}

/// A wrapped operation bound to an engine.
pub type WrappedOp = Box<dyn Fn(&CallContext, &[f64]) -> Vec<Rc<TrackedRect>>>;

impl TrackedOperation {
    /// Build the wrapper the installer binds in place of the original.
    pub fn factory(&self, engine: &Rc<SpoofEngine>) -> WrappedOp {
        let engine = Rc::clone(engine);
        #[cfg(feature = "tracing")]
        let name = self.name;
        Box::new(move |call, args| {
            let result = (call.original)(args);
            #[cfg(feature = "tracing")]
            tracing::trace!(op = name, rects = result.len(), "registering readout result");
            for rect in &result {
                engine.register_rect(
                    rect,
                    Rc::clone(&call.notify),
                    call.context,
                    Rc::clone(&call.policy),
                );
            }
            result
        })
    }
}

/// The tracked geometry-returning operations, one entry per spoofed API.
pub const TRACKED_OPERATIONS: &[TrackedOperation] = &[
    TrackedOperation {
        name: "getClientRects",
        targets: &[HostType::Range, HostType::Element],
        shape: ResultShape::List,
    },
    TrackedOperation {
        name: "getBoundingClientRect",
        targets: &[HostType::Range, HostType::Element],
        shape: ResultShape::Single,
    },
    TrackedOperation {
        name: "getBounds",
        targets: &[HostType::DomQuad],
        shape: ResultShape::Single,
    },
    TrackedOperation {
        name: "getBBox",
        targets: &[HostType::SvgGraphicsElement],
        shape: ResultShape::Single,
    },
    TrackedOperation {
        name: "getExtentOfChar",
        targets: &[HostType::SvgTextContentElement],
        shape: ResultShape::Single,
    },
];

/// Look up a tracked operation by name.
pub fn tracked_operation(name: &str) -> Option<&'static TrackedOperation> {
    TRACKED_OPERATIONS.iter().find(|op| op.name == name)
}
