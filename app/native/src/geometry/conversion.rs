//! Conversions between logical pixels, physical pixels and frame coordinates.
//!
//! The frame of a window is its raw OS rect minus the invisible drop-shadow
//! margins. Application code positions frames in logical pixels; the OS
//! positions raw rects in physical pixels.

use super::types::{PhysicalRect, Point, Rect, ShadowMargins, Size};

/// The reference DPI at which one logical pixel equals one physical pixel.
pub const BASE_DPI: u32 = 96;

/// Converts a DPI value to a scale factor. A zero DPI is treated as the base DPI.
#[must_use]
pub fn scale_factor_for_dpi(dpi: u32) -> f64 {
    let dpi = if dpi == 0 { BASE_DPI } else { dpi };
    f64::from(dpi) / f64::from(BASE_DPI)
}

#[must_use]
pub fn to_physical(logical: f64, scale: f64) -> f64 { logical * scale }

#[must_use]
pub fn to_logical(physical: f64, scale: f64) -> f64 {
    if scale > 0.0 { physical / scale } else { physical }
}

/// Converts a logical value to a whole physical pixel count, rounding to nearest.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn to_physical_px(logical: f64, scale: f64) -> i32 {
    to_physical(logical, scale).round() as i32
}

/// Scales a physical size from one DPI to another, rounding to the nearest pixel.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn rescale_px(value: i32, from_dpi: u32, to_dpi: u32) -> i32 {
    if from_dpi == 0 || from_dpi == to_dpi {
        return value;
    }
    (f64::from(value) * f64::from(to_dpi) / f64::from(from_dpi)).round() as i32
}

/// Shadow margins implied by a raw window rect and its visible frame.
///
/// Negative results (a frame wider than the window) are reported as zero.
#[must_use]
pub fn shadow_margins(window_rect: &PhysicalRect, frame_rect: &PhysicalRect) -> ShadowMargins {
    ShadowMargins::new(
        (frame_rect.left - window_rect.left).max(0),
        (frame_rect.top - window_rect.top).max(0),
        (window_rect.right - frame_rect.right).max(0),
        (window_rect.bottom - frame_rect.bottom).max(0),
    )
}

/// Removes the shadow margins from a raw window rect.
#[must_use]
pub const fn frame_from_window_rect(window_rect: &PhysicalRect, margins: &ShadowMargins) -> PhysicalRect {
    PhysicalRect::new(
        window_rect.left + margins.left,
        window_rect.top + margins.top,
        window_rect.right - margins.right,
        window_rect.bottom - margins.bottom,
    )
}

/// Adds the shadow margins back around a visible frame.
#[must_use]
pub const fn window_rect_from_frame(frame: &PhysicalRect, margins: &ShadowMargins) -> PhysicalRect {
    PhysicalRect::new(
        frame.left - margins.left,
        frame.top - margins.top,
        frame.right + margins.right,
        frame.bottom + margins.bottom,
    )
}

/// Converts a physical rect to logical pixels.
#[must_use]
pub fn logical_rect(rect: &PhysicalRect, scale: f64) -> Rect {
    Rect::new(
        to_logical(f64::from(rect.left), scale),
        to_logical(f64::from(rect.top), scale),
        to_logical(f64::from(rect.width()), scale),
        to_logical(f64::from(rect.height()), scale),
    )
}

/// Converts a logical rect to physical pixels.
///
/// Origin and extent are rounded separately so the physical size of a rect
/// does not depend on where it sits.
#[must_use]
pub fn physical_rect(rect: &Rect, scale: f64) -> PhysicalRect {
    PhysicalRect::from_origin_size(
        to_physical_px(rect.x, scale),
        to_physical_px(rect.y, scale),
        to_physical_px(rect.width, scale),
        to_physical_px(rect.height, scale),
    )
}

// ============================================================================
// Frame Metrics
// ============================================================================

/// Scale factor and shadow margins of one window, captured at a point in time.
///
/// Animations keep the metrics they captured on start for their whole life.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameMetrics {
    pub scale_factor: f64,
    pub margins: ShadowMargins,
}

impl Default for FrameMetrics {
    fn default() -> Self { Self::identity() }
}

impl FrameMetrics {
    #[must_use]
    pub const fn new(scale_factor: f64, margins: ShadowMargins) -> Self {
        Self { scale_factor, margins }
    }

    /// Base DPI and no shadow.
    #[must_use]
    pub const fn identity() -> Self { Self::new(1.0, ShadowMargins::ZERO) }

    /// Raw physical window rect for a visible frame given in logical pixels.
    #[must_use]
    pub fn window_rect_for_frame(&self, frame: &Rect) -> PhysicalRect {
        window_rect_from_frame(&physical_rect(frame, self.scale_factor), &self.margins)
    }

    /// Visible frame, in logical pixels, of a raw physical window rect.
    #[must_use]
    pub fn frame_for_window_rect(&self, window_rect: &PhysicalRect) -> Rect {
        logical_rect(&frame_from_window_rect(window_rect, &self.margins), self.scale_factor)
    }

    /// Physical window origin that puts the visible frame at a logical point.
    #[must_use]
    pub fn window_origin_for_frame_origin(&self, origin: Point) -> (i32, i32) {
        (
            to_physical_px(origin.x, self.scale_factor) - self.margins.left,
            to_physical_px(origin.y, self.scale_factor) - self.margins.top,
        )
    }

    /// Physical window extent that gives the visible frame a logical size.
    #[must_use]
    pub fn window_size_for_frame_size(&self, size: Size) -> (i32, i32) {
        (
            to_physical_px(size.width, self.scale_factor) + self.margins.horizontal(),
            to_physical_px(size.height, self.scale_factor) + self.margins.vertical(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCALES: [f64; 4] = [1.0, 1.25, 1.5, 2.0];

    #[test]
    fn test_scale_factor_for_dpi() {
        assert!((scale_factor_for_dpi(96) - 1.0).abs() < f64::EPSILON);
        assert!((scale_factor_for_dpi(120) - 1.25).abs() < f64::EPSILON);
        assert!((scale_factor_for_dpi(144) - 1.5).abs() < f64::EPSILON);
        assert!((scale_factor_for_dpi(192) - 2.0).abs() < f64::EPSILON);
        assert!((scale_factor_for_dpi(0) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_logical_physical_round_trip() {
        for scale in SCALES {
            for value in [0.0, 1.0, 13.5, 640.0, 1919.25, -300.0] {
                let back = to_logical(to_physical(value, scale), scale);
                assert!((back - value).abs() < 1e-9, "scale {scale}: {value} -> {back}");
            }
        }
    }

    #[test]
    fn test_to_physical_px_rounds_to_nearest() {
        assert_eq!(to_physical_px(10.2, 1.25), 13);
        assert_eq!(to_physical_px(10.0, 1.25), 13);
        assert_eq!(to_physical_px(-10.0, 1.5), -15);
    }

    #[test]
    fn test_frame_window_rect_inverse() {
        let margins = ShadowMargins::new(7, 0, 7, 7);
        let window = PhysicalRect::new(93, 100, 907, 707);
        let frame = frame_from_window_rect(&window, &margins);
        assert_eq!(frame, PhysicalRect::new(100, 100, 900, 700));
        assert_eq!(window_rect_from_frame(&frame, &margins), window);
        assert_eq!(shadow_margins(&window, &frame), margins);
    }

    #[test]
    fn test_shadow_margins_never_negative() {
        let window = PhysicalRect::new(0, 0, 100, 100);
        let frame = PhysicalRect::new(-5, 0, 105, 100);
        assert_eq!(shadow_margins(&window, &frame), ShadowMargins::ZERO);
    }

    #[test]
    fn test_frame_metrics_round_trip() {
        let metrics = FrameMetrics::new(1.5, ShadowMargins::new(11, 0, 11, 11));
        let frame = Rect::new(100.0, 50.0, 800.0, 600.0);
        let window = metrics.window_rect_for_frame(&frame);
        assert_eq!(window, PhysicalRect::new(139, 75, 1361, 986));
        assert!(metrics.frame_for_window_rect(&window).approx_eq(&frame, 1e-9));
    }

    #[test]
    fn test_rescale_px() {
        assert_eq!(rescale_px(800, 96, 144), 1200);
        assert_eq!(rescale_px(800, 144, 96), 533);
        assert_eq!(rescale_px(800, 0, 144), 800);
    }

    #[test]
    fn test_rescale_px_rounds_fractional_scales() {
        assert_eq!(rescale_px(803, 96, 120), 1004);
        assert_eq!(rescale_px(801, 96, 120), 1001);
    }
}
