//! Animated properties and their per-property interpolation and application.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::easing::{EasingType, ease, ease_raw, lerp};
use super::spring::SpringParams;
use crate::geometry::{FrameMetrics, Point, Rect, Size};
use crate::host::{ApplyFlags, BoundsUpdate, WindowHandle, WindowHost};

/// A window attribute that can be animated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnimationProperty {
    Position,
    Size,
    Bounds,
    Opacity,
}

impl AnimationProperty {
    /// Whether two properties write overlapping window attributes.
    ///
    /// Position and size are disjoint; bounds overlaps both and itself;
    /// opacity only overlaps opacity.
    #[must_use]
    pub const fn conflicts_with(self, other: Self) -> bool {
        match (self, other) {
            (Self::Opacity, Self::Opacity) => true,
            (Self::Opacity, _)
            | (_, Self::Opacity)
            | (Self::Position, Self::Size)
            | (Self::Size, Self::Position) => false,
            _ => true,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Position => "position",
            Self::Size => "size",
            Self::Bounds => "bounds",
            Self::Opacity => "opacity",
        }
    }
}

impl fmt::Display for AnimationProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

/// A value of one animated property, in logical pixels (or `[0, 1]` opacity).
///
/// Position, size and bounds describe the visible frame, not the raw window
/// rect with its drop shadow.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "property")]
pub enum AnimationValue {
    Position(Point),
    Size(Size),
    Bounds(Rect),
    Opacity { value: f64 },
}

impl AnimationValue {
    #[must_use]
    pub const fn opacity(value: f64) -> Self { Self::Opacity { value } }

    #[must_use]
    pub const fn property(&self) -> AnimationProperty {
        match self {
            Self::Position(_) => AnimationProperty::Position,
            Self::Size(_) => AnimationProperty::Size,
            Self::Bounds(_) => AnimationProperty::Bounds,
            Self::Opacity { .. } => AnimationProperty::Opacity,
        }
    }

    /// Reads the property from a visible frame rect and the tracked opacity.
    #[must_use]
    pub const fn read(property: AnimationProperty, frame: &Rect, opacity: f64) -> Self {
        match property {
            AnimationProperty::Position => Self::Position(frame.origin()),
            AnimationProperty::Size => Self::Size(frame.size()),
            AnimationProperty::Bounds => Self::Bounds(*frame),
            AnimationProperty::Opacity => Self::opacity(opacity),
        }
    }
}

/// Alpha channel value for an opacity in `[0, 1]`.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn opacity_to_alpha(opacity: f64) -> u8 {
    let opacity = if opacity.is_nan() { 1.0 } else { opacity.clamp(0.0, 1.0) };
    (opacity * f64::from(u8::MAX)).round() as u8
}

// ============================================================================
// Tracks
// ============================================================================

/// Start and target of one animated property.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnimationTrack {
    Position { from: Point, to: Point },
    Size { from: Size, to: Size },
    Bounds { from: Rect, to: Rect },
    Opacity { from: f64, to: f64 },
}

impl AnimationTrack {
    /// Pairs a start value with a target of the same property.
    #[must_use]
    pub fn between(from: AnimationValue, to: AnimationValue) -> Option<Self> {
        match (from, to) {
            (AnimationValue::Position(from), AnimationValue::Position(to)) => {
                Some(Self::Position { from, to })
            }
            (AnimationValue::Size(from), AnimationValue::Size(to)) => Some(Self::Size { from, to }),
            (AnimationValue::Bounds(from), AnimationValue::Bounds(to)) => {
                Some(Self::Bounds { from, to })
            }
            (AnimationValue::Opacity { value: from }, AnimationValue::Opacity { value: to }) => {
                Some(Self::Opacity { from, to: to.clamp(0.0, 1.0) })
            }
            _ => None,
        }
    }

    #[must_use]
    pub const fn property(&self) -> AnimationProperty {
        match self {
            Self::Position { .. } => AnimationProperty::Position,
            Self::Size { .. } => AnimationProperty::Size,
            Self::Bounds { .. } => AnimationProperty::Bounds,
            Self::Opacity { .. } => AnimationProperty::Opacity,
        }
    }

    #[must_use]
    pub const fn target(&self) -> AnimationValue {
        match *self {
            Self::Position { to, .. } => AnimationValue::Position(to),
            Self::Size { to, .. } => AnimationValue::Size(to),
            Self::Bounds { to, .. } => AnimationValue::Bounds(to),
            Self::Opacity { to, .. } => AnimationValue::opacity(to),
        }
    }

    /// Interpolated value at normalized time `t`.
    ///
    /// Geometric tracks follow the raw curve so overshooting easings move the
    /// window past its target; opacity follows the clamped curve.
    #[must_use]
    pub fn sample(&self, t: f64, easing: EasingType, spring: &SpringParams) -> AnimationValue {
        match *self {
            Self::Position { from, to } => {
                let p = ease_raw(t, easing, spring);
                AnimationValue::Position(Point::new(lerp(from.x, to.x, p), lerp(from.y, to.y, p)))
            }
            Self::Size { from, to } => {
                let p = ease_raw(t, easing, spring);
                AnimationValue::Size(Size::new(
                    lerp(from.width, to.width, p).max(0.0),
                    lerp(from.height, to.height, p).max(0.0),
                ))
            }
            Self::Bounds { from, to } => {
                let p = ease_raw(t, easing, spring);
                AnimationValue::Bounds(Rect::new(
                    lerp(from.x, to.x, p),
                    lerp(from.y, to.y, p),
                    lerp(from.width, to.width, p).max(0.0),
                    lerp(from.height, to.height, p).max(0.0),
                ))
            }
            Self::Opacity { from, to } => {
                AnimationValue::opacity(lerp(from, to, ease(t, easing, spring)))
            }
        }
    }
}

// ============================================================================
// Application
// ============================================================================

/// Writes a property value to a window using previously captured metrics.
///
/// Position writes never resize and size writes never move.
pub fn apply_value(
    host: &dyn WindowHost,
    window: WindowHandle,
    value: &AnimationValue,
    metrics: &FrameMetrics,
) {
    match value {
        AnimationValue::Position(origin) => {
            let (x, y) = metrics.window_origin_for_frame_origin(*origin);
            host.apply_bounds(window, BoundsUpdate::move_to(x, y));
        }
        AnimationValue::Size(size) => {
            let (width, height) = metrics.window_size_for_frame_size(*size);
            host.apply_bounds(window, BoundsUpdate::resize_to(width, height));
        }
        AnimationValue::Bounds(frame) => {
            let rect = metrics.window_rect_for_frame(frame);
            host.apply_bounds(window, BoundsUpdate::place(&rect, ApplyFlags::placement()));
        }
        AnimationValue::Opacity { value } => {
            host.set_opacity_channel(window, opacity_to_alpha(*value));
        }
    }
}
