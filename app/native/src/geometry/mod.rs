//! Pixel-space geometry: primitives, DPI conversion and size constraints.

pub mod constraints;
pub mod conversion;
pub mod types;

pub use constraints::{
    TrackSize, adjust_along_axis, adjust_to_fit, apply_constraints, clamp_to_virtual_screen,
    min_max_track_size, window_size_for_client_size,
};
pub use conversion::{
    BASE_DPI, FrameMetrics, frame_from_window_rect, logical_rect, physical_rect,
    scale_factor_for_dpi, shadow_margins, to_logical, to_physical, window_rect_from_frame,
};
pub use types::{BoxConstraints, PhysicalRect, Point, Rect, ShadowMargins, Size};
