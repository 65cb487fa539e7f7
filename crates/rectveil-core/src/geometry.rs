#![forbid(unsafe_code)]

//! Geometric primitives.

/// Concrete kind of a host rectangle.
///
/// The engine constructs every faked rectangle with the same kind as the
/// original it replaces, so the kind travels with the value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RectKind {
    /// Host `DOMRect`: primary components have setters.
    #[default]
    Mutable,
    /// Host `DOMRectReadOnly`: no setters exist.
    ReadOnly,
}

/// A host rectangle snapshot.
///
/// Four 64-bit primary components plus the concrete [`RectKind`]. The
/// derived edges follow the CSSOM rule (`left = min(x, x + width)` and so
/// on), so rectangles with negative width or height report the same edges
/// the host rectangle type would.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DomRect {
    /// Concrete host kind, preserved through faking.
    pub kind: RectKind,
    /// Horizontal origin.
    pub x: f64,
    /// Vertical origin.
    pub y: f64,
    /// Width; may be negative.
    pub width: f64,
    /// Height; may be negative.
    pub height: f64,
}

impl DomRect {
    /// Create a rectangle of the given kind.
    #[inline]
    pub const fn new(kind: RectKind, x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            kind,
            x,
            y,
            width,
            height,
        }
    }

    /// Create a mutable (`DOMRect`) snapshot.
    #[inline]
    pub const fn mutable(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::new(RectKind::Mutable, x, y, width, height)
    }

    /// Create a read-only (`DOMRectReadOnly`) snapshot.
    #[inline]
    pub const fn read_only(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::new(RectKind::ReadOnly, x, y, width, height)
    }

    /// Left edge.
    #[inline]
    pub fn left(&self) -> f64 {
        self.x.min(self.x + self.width)
    }

    /// Right edge.
    #[inline]
    pub fn right(&self) -> f64 {
        self.x.max(self.x + self.width)
    }

    /// Top edge.
    #[inline]
    pub fn top(&self) -> f64 {
        self.y.min(self.y + self.height)
    }

    /// Bottom edge.
    #[inline]
    pub fn bottom(&self) -> f64 {
        self.y.max(self.y + self.height)
    }

    /// The four primary components in slot order `x, y, width, height`.
    #[inline]
    pub const fn components(&self) -> [f64; 4] {
        [self.x, self.y, self.width, self.height]
    }

    /// True if every primary component is finite.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.width.is_finite() && self.height.is_finite()
    }
}
