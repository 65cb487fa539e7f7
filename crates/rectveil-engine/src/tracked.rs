#![forbid(unsafe_code)]

//! Live host-side rectangle objects.

use std::cell::Cell;
use std::rc::Rc;

use rectveil_core::{DomRect, RectKind};

use crate::cache::Slot;

/// A live rectangle instance as page script holds it.
///
/// Components are interior-mutable so the write path can bake a faked
/// snapshot into the same instance a script already references. Shared as
/// `Rc<TrackedRect>`; identity (not value) is what the registry keys on.
#[derive(Debug)]
pub struct TrackedRect {
    kind: RectKind,
    x: Cell<f64>,
    y: Cell<f64>,
    width: Cell<f64>,
    height: Cell<f64>,
}

impl TrackedRect {
    /// Create a live rectangle of the given kind.
    pub fn new(kind: RectKind, x: f64, y: f64, width: f64, height: f64) -> Rc<Self> {
        Rc::new(Self {
            kind,
            x: Cell::new(x),
            y: Cell::new(y),
            width: Cell::new(width),
            height: Cell::new(height),
        })
    }

    /// Create a live `DOMRect`.
    pub fn mutable(x: f64, y: f64, width: f64, height: f64) -> Rc<Self> {
        Self::new(RectKind::Mutable, x, y, width, height)
    }

    /// Create a live `DOMRectReadOnly`.
    pub fn read_only(x: f64, y: f64, width: f64, height: f64) -> Rc<Self> {
        Self::new(RectKind::ReadOnly, x, y, width, height)
    }

    /// Concrete host kind.
    #[inline]
    pub fn kind(&self) -> RectKind {
        self.kind
    }

    /// Value snapshot of the current components.
    pub fn snapshot(&self) -> DomRect {
        DomRect::new(
            self.kind,
            self.x.get(),
            self.y.get(),
            self.width.get(),
            self.height.get(),
        )
    }

    /// Current raw value of one component.
    pub fn component(&self, slot: Slot) -> f64 {
        match slot {
            Slot::X => self.x.get(),
            Slot::Y => self.y.get(),
            Slot::Width => self.width.get(),
            Slot::Height => self.height.get(),
        }
    }

    /// Overwrite one component in place.
    ///
    /// This is the "original setter" of the host object; the engine's write
    /// accessors guard it behind the kind check, direct callers are the
    /// installer's business.
    pub fn set_component(&self, slot: Slot, value: f64) {
        match slot {
            Slot::X => self.x.set(value),
            Slot::Y => self.y.set(value),
            Slot::Width => self.width.set(value),
            Slot::Height => self.height.set(value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_reflects_current_components() {
        let rect = TrackedRect::mutable(1.0, 2.0, 3.0, 4.0);
        assert_eq!(rect.snapshot(), DomRect::mutable(1.0, 2.0, 3.0, 4.0));

        rect.set_component(Slot::X, 42.0);
        assert_eq!(rect.component(Slot::X), 42.0);
        assert_eq!(rect.snapshot().x, 42.0);
    }

    #[test]
    fn kind_follows_constructor() {
        assert_eq!(TrackedRect::mutable(0.0, 0.0, 0.0, 0.0).kind(), RectKind::Mutable);
        assert_eq!(
            TrackedRect::read_only(0.0, 0.0, 0.0, 0.0).kind(),
            RectKind::ReadOnly
        );
    }
}
