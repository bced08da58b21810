//! Geometry primitives shared by the conversion, constraint and animation code.
//!
//! Two coordinate families coexist:
//! - logical pixels (`Point`, `Size`, `Rect`, all `f64`), the DPI-independent
//!   unit application code speaks
//! - physical pixels (`PhysicalRect`, `ShadowMargins`, `i32` edges), the unit
//!   the OS windowing system speaks

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

// ============================================================================
// Logical Types
// ============================================================================

/// A point in logical pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self { Self { x, y } }
}

/// A size in logical pixels (or physical pixels, when documented as such).
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self { Self { width, height } }

    #[must_use]
    pub const fn zero() -> Self { Self::new(0.0, 0.0) }

    /// Check if two sizes are approximately equal (within epsilon).
    #[must_use]
    pub fn approx_eq(&self, other: &Self, epsilon: f64) -> bool {
        (self.width - other.width).abs() < epsilon && (self.height - other.height).abs() < epsilon
    }
}

/// A rectangle with position and size, in logical pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    /// Create a new rectangle.
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Create a rectangle from an origin and a size.
    #[must_use]
    pub const fn from_origin_size(origin: Point, size: Size) -> Self {
        Self::new(origin.x, origin.y, size.width, size.height)
    }

    /// Create a zero-sized rectangle at origin.
    #[must_use]
    pub const fn zero() -> Self { Self::new(0.0, 0.0, 0.0, 0.0) }

    #[must_use]
    pub const fn origin(&self) -> Point { Point::new(self.x, self.y) }

    #[must_use]
    pub const fn size(&self) -> Size { Size::new(self.width, self.height) }

    /// Check if two rectangles are approximately equal (within epsilon).
    #[must_use]
    pub fn approx_eq(&self, other: &Self, epsilon: f64) -> bool {
        (self.x - other.x).abs() < epsilon
            && (self.y - other.y).abs() < epsilon
            && (self.width - other.width).abs() < epsilon
            && (self.height - other.height).abs() < epsilon
    }
}

// ============================================================================
// Physical Types
// ============================================================================

/// A rectangle in physical pixels, stored as edges the way the OS reports it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct PhysicalRect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl PhysicalRect {
    #[must_use]
    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self { left, top, right, bottom }
    }

    /// Create a rectangle from its top-left corner and extent.
    #[must_use]
    pub const fn from_origin_size(left: i32, top: i32, width: i32, height: i32) -> Self {
        Self::new(left, top, left + width, top + height)
    }

    #[must_use]
    pub const fn width(&self) -> i32 { self.right - self.left }

    #[must_use]
    pub const fn height(&self) -> i32 { self.bottom - self.top }

    #[must_use]
    pub const fn is_empty(&self) -> bool { self.width() <= 0 || self.height() <= 0 }

    /// Returns the same extent moved so its top-left corner is at `(left, top)`.
    #[must_use]
    pub const fn moved_to(&self, left: i32, top: i32) -> Self {
        Self::from_origin_size(left, top, self.width(), self.height())
    }

    /// Returns the same origin with a new extent.
    #[must_use]
    pub const fn resized(&self, width: i32, height: i32) -> Self {
        Self::from_origin_size(self.left, self.top, width, height)
    }

    /// Check if `other` lies entirely inside this rectangle.
    #[must_use]
    pub const fn contains_rect(&self, other: &Self) -> bool {
        other.left >= self.left
            && other.top >= self.top
            && other.right <= self.right
            && other.bottom <= self.bottom
    }

    /// Check if this rectangle contains a point.
    #[must_use]
    pub const fn contains_point(&self, x: i32, y: i32) -> bool {
        x >= self.left && x < self.right && y >= self.top && y < self.bottom
    }

    /// Area shared with `other`, zero when they do not overlap.
    #[must_use]
    pub fn intersection_area(&self, other: &Self) -> i64 {
        let width = i64::from(self.right.min(other.right)) - i64::from(self.left.max(other.left));
        let height =
            i64::from(self.bottom.min(other.bottom)) - i64::from(self.top.max(other.top));
        if width <= 0 || height <= 0 { 0 } else { width * height }
    }

    /// Get the center point of this rectangle.
    #[must_use]
    pub const fn center(&self) -> (i32, i32) {
        (self.left + self.width() / 2, self.top + self.height() / 2)
    }
}

impl std::fmt::Display for PhysicalRect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}@({}, {})", self.width(), self.height(), self.left, self.top)
    }
}

/// Invisible drop-shadow margins between a raw window rect and its visible frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct ShadowMargins {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl ShadowMargins {
    pub const ZERO: Self = Self::new(0, 0, 0, 0);

    #[must_use]
    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self { left, top, right, bottom }
    }

    /// Total horizontal margin (left + right).
    #[must_use]
    pub const fn horizontal(&self) -> i32 { self.left + self.right }

    /// Total vertical margin (top + bottom).
    #[must_use]
    pub const fn vertical(&self) -> i32 { self.top + self.bottom }
}

// ============================================================================
// Constraints
// ============================================================================

/// Minimum and maximum client size of a window, in logical pixels.
///
/// Replaced wholesale when the application sets new constraints. When both
/// bounds are present callers keep `smallest <= biggest` per axis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct BoxConstraints {
    pub smallest: Option<Size>,
    pub biggest: Option<Size>,
}

impl BoxConstraints {
    #[must_use]
    pub const fn new(smallest: Option<Size>, biggest: Option<Size>) -> Self {
        Self { smallest, biggest }
    }

    /// No constraints at all.
    #[must_use]
    pub const fn unconstrained() -> Self { Self::new(None, None) }

    /// Builds constraints from raw application limits.
    ///
    /// The minimum is always taken; the maximum only when both of its
    /// dimensions are positive, since a zero maximum means "unbounded".
    #[must_use]
    pub fn from_limits(min: Size, max: Size) -> Self {
        let biggest = (max.width > 0.0 && max.height > 0.0).then_some(max);
        Self::new(Some(min), biggest)
    }
}

// ============================================================================
// Tests
// ============================================================================
