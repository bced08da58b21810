//! Size clamping against the virtual screen and per-window min/max constraints.
//!
//! All sizes produced here are physical window sizes: the client area scaled to
//! physical pixels plus the non-client overhead (caption, borders).

use super::types::{BoxConstraints, PhysicalRect, Size};

/// Physical minimum and maximum window size reported to the OS track-size query.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrackSize {
    pub min: Size,
    pub max: Size,
}

/// Clamps a physical size to `[0, extent]` on each axis independently.
#[must_use]
pub fn clamp_to_virtual_screen(size: Size, extent: Size) -> Size {
    Size::new(
        size.width.clamp(0.0, extent.width.max(0.0)),
        size.height.clamp(0.0, extent.height.max(0.0)),
    )
}

/// Converts a logical client size to a physical window size.
fn to_window_size(client: Size, scale: f64, overhead: Size) -> Size {
    Size::new(client.width * scale + overhead.width, client.height * scale + overhead.height)
}

/// Physical window bounds implied by a set of logical constraints.
///
/// A missing minimum means "no overhead beyond the frame"; a missing maximum
/// means the virtual screen.
#[must_use]
pub fn min_max_track_size(
    constraints: &BoxConstraints,
    scale: f64,
    overhead: Size,
    extent: Size,
) -> TrackSize {
    let min = clamp_to_virtual_screen(
        to_window_size(constraints.smallest.unwrap_or_else(Size::zero), scale, overhead),
        extent,
    );
    let max = constraints.biggest.map_or(extent, |biggest| {
        clamp_to_virtual_screen(to_window_size(biggest, scale, overhead), extent)
    });
    TrackSize { min, max }
}

/// Clamps a candidate physical window size into the constraint range.
///
/// The minimum is applied first, then the maximum, so the result is stable
/// under repeated application even when a caller passes a minimum above the
/// maximum.
#[must_use]
pub fn apply_constraints(
    candidate: Size,
    constraints: &BoxConstraints,
    scale: f64,
    overhead: Size,
    extent: Size,
) -> Size {
    let mut width = candidate.width;
    let mut height = candidate.height;

    if let Some(smallest) = constraints.smallest {
        let min = clamp_to_virtual_screen(to_window_size(smallest, scale, overhead), extent);
        width = width.max(min.width);
        height = height.max(min.height);
    }
    if let Some(biggest) = constraints.biggest {
        let max = clamp_to_virtual_screen(to_window_size(biggest, scale, overhead), extent);
        width = width.min(max.width);
        height = height.min(max.height);
    }

    Size::new(width, height)
}

/// Physical window size that gives a window the requested logical client size,
/// honoring its constraints.
#[must_use]
pub fn window_size_for_client_size(
    client: Size,
    constraints: &BoxConstraints,
    scale: f64,
    overhead: Size,
    extent: Size,
) -> Size {
    apply_constraints(to_window_size(client, scale, overhead), constraints, scale, overhead, extent)
}

// ============================================================================
// Segment Fitting
// ============================================================================

/// Fits the segment `[origin, origin + size)` inside `[dst_origin, dst_origin + dst_size)`.
///
/// An oversized segment is shrunk to the destination first. The segment then
/// keeps its origin when it already fits, otherwise it slides the minimal
/// distance needed to come fully inside.
#[must_use]
pub fn adjust_along_axis(dst_origin: i32, dst_size: i32, origin: i32, size: i32) -> (i32, i32) {
    let size = size.min(dst_size);
    let origin = if origin < dst_origin {
        dst_origin
    } else {
        (dst_origin + dst_size).min(origin + size) - size
    };
    (origin, size)
}

/// Fits `child` inside `parent`, one axis at a time.
#[must_use]
pub fn adjust_to_fit(parent: &PhysicalRect, child: &PhysicalRect) -> PhysicalRect {
    let (x, width) = adjust_along_axis(parent.left, parent.width(), child.left, child.width());
    let (y, height) = adjust_along_axis(parent.top, parent.height(), child.top, child.height());
    PhysicalRect::from_origin_size(x, y, width, height)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXTENT: Size = Size::new(3840.0, 2160.0);
    const OVERHEAD: Size = Size::new(16.0, 39.0);

    fn constraints() -> BoxConstraints {
        BoxConstraints::new(Some(Size::new(200.0, 100.0)), Some(Size::new(1000.0, 800.0)))
    }

    #[test]
    fn test_clamp_to_virtual_screen_per_axis() {
        let clamped = clamp_to_virtual_screen(Size::new(5000.0, -10.0), EXTENT);
        assert_eq!(clamped, Size::new(3840.0, 0.0));
        let inside = clamp_to_virtual_screen(Size::new(800.0, 600.0), EXTENT);
        assert_eq!(inside, Size::new(800.0, 600.0));
    }

    #[test]
    fn test_apply_constraints_clamps_into_range() {
        let small = apply_constraints(Size::new(10.0, 10.0), &constraints(), 1.5, OVERHEAD, EXTENT);
        assert_eq!(small, Size::new(316.0, 189.0));

        let big = apply_constraints(Size::new(9000.0, 9000.0), &constraints(), 1.5, OVERHEAD, EXTENT);
        assert_eq!(big, Size::new(1516.0, 1239.0));
    }

    #[test]
    fn test_apply_constraints_is_idempotent() {
        let candidates = [
            Size::new(0.0, 0.0),
            Size::new(640.0, 480.0),
            Size::new(9999.0, 50.0),
            Size::new(317.5, 2000.0),
        ];
        let inverted = BoxConstraints::new(Some(Size::new(900.0, 900.0)), Some(Size::new(100.0, 100.0)));
        for set in [constraints(), inverted, BoxConstraints::unconstrained()] {
            for candidate in candidates {
                let once = apply_constraints(candidate, &set, 1.25, OVERHEAD, EXTENT);
                let twice = apply_constraints(once, &set, 1.25, OVERHEAD, EXTENT);
                assert_eq!(once, twice, "{candidate:?} with {set:?}");
            }
        }
    }

    #[test]
    fn test_constraint_maximum_is_bounded_by_virtual_screen() {
        let huge = BoxConstraints::new(None, Some(Size::new(10_000.0, 10_000.0)));
        let size = apply_constraints(Size::new(20_000.0, 20_000.0), &huge, 1.0, OVERHEAD, EXTENT);
        assert_eq!(size, EXTENT);
    }

    #[test]
    fn test_window_size_for_client_size_adds_overhead() {
        let size = window_size_for_client_size(
            Size::new(400.0, 300.0),
            &BoxConstraints::unconstrained(),
            2.0,
            OVERHEAD,
            EXTENT,
        );
        assert_eq!(size, Size::new(816.0, 639.0));
    }

    #[test]
    fn test_min_max_track_size_defaults() {
        let track = min_max_track_size(&BoxConstraints::unconstrained(), 1.0, OVERHEAD, EXTENT);
        assert_eq!(track.min, OVERHEAD);
        assert_eq!(track.max, EXTENT);

        let track = min_max_track_size(&constraints(), 1.0, OVERHEAD, EXTENT);
        assert_eq!(track.min, Size::new(216.0, 139.0));
        assert_eq!(track.max, Size::new(1016.0, 839.0));
    }

    #[test]
    fn test_adjust_along_axis_keeps_origin_when_fitting() {
        assert_eq!(adjust_along_axis(0, 1000, 100, 400), (100, 400));
    }

    #[test]
    fn test_adjust_along_axis_slides_minimal_distance() {
        assert_eq!(adjust_along_axis(0, 1000, 800, 400), (600, 400));
        assert_eq!(adjust_along_axis(100, 1000, 50, 400), (100, 400));
    }

    #[test]
    fn test_adjust_along_axis_shrinks_oversized_segment() {
        assert_eq!(adjust_along_axis(0, 1000, 200, 1400), (0, 1000));
    }

    #[test]
    fn test_adjust_to_fit_work_area() {
        let work_area = PhysicalRect::new(0, 0, 1920, 1040);
        let window = PhysicalRect::from_origin_size(100, 600, 800, 600);
        let fitted = adjust_to_fit(&work_area, &window);
        assert_eq!(fitted, PhysicalRect::from_origin_size(100, 440, 800, 600));
        assert!(work_area.contains_rect(&fitted));
    }
}
