//! The window-hosting collaborator the geometry core drives.
//!
//! [`WindowHost`] is the seam between the core and the OS windowing system.
//! Every query is fallible in the OS sense (the window may be gone, the
//! compositor may not report frame bounds) and returns `Option`; the helpers
//! at the bottom of this module turn those into the documented fallbacks.

pub mod memory;

use std::fmt;

pub use memory::InMemoryHost;
use serde::{Deserialize, Serialize};

use crate::geometry::{
    BASE_DPI, FrameMetrics, PhysicalRect, ShadowMargins, Size, scale_factor_for_dpi,
    shadow_margins,
};

// ============================================================================
// Handles
// ============================================================================

/// Opaque identity of a top-level window. Never reused while the window lives.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WindowHandle(pub u64);

impl WindowHandle {
    pub const NULL: Self = Self(0);

    #[must_use]
    pub const fn is_null(self) -> bool { self.0 == 0 }
}

impl fmt::Display for WindowHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{:#x}", self.0) }
}

/// Opaque identity of a monitor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MonitorHandle(pub u64);

impl MonitorHandle {
    pub const NULL: Self = Self(0);
}

impl fmt::Display for MonitorHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{:#x}", self.0) }
}

/// Application-facing display identifier, resolved to a monitor by the host.
pub type DisplayId = u64;

/// A monitor descriptor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitorInfo {
    pub handle: MonitorHandle,
    /// Full monitor bounds in physical pixels.
    pub bounds: PhysicalRect,
    /// Bounds minus reserved system UI.
    pub work_area: PhysicalRect,
    pub dpi: u32,
}

// ============================================================================
// Styles and Flags
// ============================================================================

/// Window style bits as the OS stores them.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowStyle {
    pub style: u32,
    pub ex_style: u32,
}

impl WindowStyle {
    pub const CAPTION: u32 = 0x00C0_0000;
    pub const THICK_FRAME: u32 = 0x0004_0000;
    pub const MAXIMIZE_BOX: u32 = 0x0001_0000;
    pub const VISIBLE: u32 = 0x1000_0000;

    pub const EX_DLG_MODAL_FRAME: u32 = 0x0000_0001;
    pub const EX_TOPMOST: u32 = 0x0000_0008;
    pub const EX_WINDOW_EDGE: u32 = 0x0000_0100;
    pub const EX_CLIENT_EDGE: u32 = 0x0000_0200;
    pub const EX_STATIC_EDGE: u32 = 0x0002_0000;
    pub const EX_LAYERED: u32 = 0x0008_0000;

    const FRAME_BITS: u32 = Self::CAPTION | Self::THICK_FRAME;
    const RESIZE_BITS: u32 = Self::THICK_FRAME | Self::MAXIMIZE_BOX;
    const EX_FRAME_BITS: u32 =
        Self::EX_DLG_MODAL_FRAME | Self::EX_WINDOW_EDGE | Self::EX_CLIENT_EDGE | Self::EX_STATIC_EDGE;

    #[must_use]
    pub const fn new(style: u32, ex_style: u32) -> Self { Self { style, ex_style } }

    /// A visible, captioned, resizable window.
    #[must_use]
    pub const fn decorated() -> Self {
        Self::new(
            Self::CAPTION | Self::THICK_FRAME | Self::MAXIMIZE_BOX | Self::VISIBLE,
            Self::EX_WINDOW_EDGE,
        )
    }

    /// The same style with caption, resize frame and edge bits removed.
    #[must_use]
    pub const fn frameless(self) -> Self {
        Self::new(self.style & !Self::FRAME_BITS, self.ex_style & !Self::EX_FRAME_BITS)
    }

    #[must_use]
    pub const fn with_visible(self) -> Self { Self::new(self.style | Self::VISIBLE, self.ex_style) }

    /// The same style with the resize frame and maximize box added or removed.
    #[must_use]
    pub const fn with_resizable(self, resizable: bool) -> Self {
        let style =
            if resizable { self.style | Self::RESIZE_BITS } else { self.style & !Self::RESIZE_BITS };
        Self::new(style, self.ex_style)
    }

    #[must_use]
    pub const fn is_resizable(self) -> bool { self.style & Self::THICK_FRAME != 0 }

    #[must_use]
    pub const fn is_topmost(self) -> bool { self.ex_style & Self::EX_TOPMOST != 0 }

    #[must_use]
    pub const fn has_frame(self) -> bool { self.style & Self::FRAME_BITS != 0 }

    #[must_use]
    pub const fn is_layered(self) -> bool { self.ex_style & Self::EX_LAYERED != 0 }
}

/// Show state of a top-level window.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShowState {
    #[default]
    Normal,
    Minimized,
    Maximized,
}

/// Flags accompanying a bounds update.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[allow(clippy::struct_excessive_bools)]
pub struct ApplyFlags {
    /// Keep the current position; `x`/`y` are ignored.
    pub no_move: bool,
    /// Keep the current size; `width`/`height` are ignored.
    pub no_size: bool,
    pub no_activate: bool,
    pub no_z_order: bool,
    /// Re-evaluate the non-client frame after a style change.
    pub frame_changed: bool,
}

impl ApplyFlags {
    /// Flags for a plain move-and-resize that leaves focus and stacking alone.
    #[must_use]
    pub const fn placement() -> Self {
        Self {
            no_move: false,
            no_size: false,
            no_activate: true,
            no_z_order: true,
            frame_changed: false,
        }
    }

    #[must_use]
    pub const fn move_only() -> Self { Self { no_size: true, ..Self::placement() } }

    #[must_use]
    pub const fn resize_only() -> Self { Self { no_move: true, ..Self::placement() } }

    /// Flush a style change without moving or resizing.
    #[must_use]
    pub const fn frame_flush() -> Self {
        Self {
            no_move: true,
            no_size: true,
            no_activate: false,
            no_z_order: true,
            frame_changed: true,
        }
    }

    #[must_use]
    pub const fn with_frame_changed(self) -> Self { Self { frame_changed: true, ..self } }
}

/// One physical bounds write.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundsUpdate {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub flags: ApplyFlags,
}

impl BoundsUpdate {
    /// Move and resize to exactly `rect`.
    #[must_use]
    pub const fn place(rect: &PhysicalRect, flags: ApplyFlags) -> Self {
        Self {
            x: rect.left,
            y: rect.top,
            width: rect.width(),
            height: rect.height(),
            flags,
        }
    }

    #[must_use]
    pub const fn move_to(x: i32, y: i32) -> Self {
        Self { x, y, width: 0, height: 0, flags: ApplyFlags::move_only() }
    }

    #[must_use]
    pub const fn resize_to(width: i32, height: i32) -> Self {
        Self { x: 0, y: 0, width, height, flags: ApplyFlags::resize_only() }
    }

    #[must_use]
    pub const fn frame_flush() -> Self {
        Self { x: 0, y: 0, width: 0, height: 0, flags: ApplyFlags::frame_flush() }
    }
}

// ============================================================================
// Host Trait
// ============================================================================

/// Operations the core needs from the OS windowing system.
///
/// All coordinates are physical pixels. Query methods return `None` when the
/// window or monitor is unknown, or when the OS cannot answer.
pub trait WindowHost: Send + Sync {
    fn is_window(&self, window: WindowHandle) -> bool;

    fn dpi_for_window(&self, window: WindowHandle) -> Option<u32>;

    /// Size of the bounding box of all monitors.
    fn virtual_screen_extent(&self) -> Size;

    /// Raw window rect, including any drop shadow.
    fn window_rect(&self, window: WindowHandle) -> Option<PhysicalRect>;

    /// Client rect in window-relative coordinates (origin is always zero).
    fn client_rect(&self, window: WindowHandle) -> Option<PhysicalRect>;

    /// Visible frame bounds excluding the drop shadow.
    fn extended_frame_bounds(&self, window: WindowHandle) -> Option<PhysicalRect>;

    fn monitor_for_window(&self, window: WindowHandle) -> Option<MonitorInfo>;

    /// The monitor that contains most of `rect`, or the nearest one.
    fn monitor_from_rect(&self, rect: &PhysicalRect) -> Option<MonitorInfo>;

    fn monitor_for_display(&self, display: DisplayId) -> Option<MonitorInfo>;

    fn monitor_under_cursor(&self) -> Option<MonitorInfo>;

    fn window_style(&self, window: WindowHandle) -> Option<WindowStyle>;

    fn apply_bounds(&self, window: WindowHandle, update: BoundsUpdate);

    fn set_style(&self, window: WindowHandle, style: u32);

    fn set_extended_style(&self, window: WindowHandle, ex_style: u32);

    fn set_opacity_channel(&self, window: WindowHandle, alpha: u8);

    /// Marks the window as able to carry an opacity channel. Idempotent.
    fn enable_translucency(&self, window: WindowHandle);

    /// Moves the window into or out of the topmost band without moving or
    /// resizing it. Reflected in the `EX_TOPMOST` bit of its style.
    fn set_topmost(&self, window: WindowHandle, topmost: bool);

    fn show_state(&self, window: WindowHandle) -> Option<ShowState>;

    /// Brings a minimized or maximized window back to its normal placement.
    fn restore(&self, window: WindowHandle);
}

// ============================================================================
// Fallback Helpers
// ============================================================================

/// DPI of a window, falling back to the base DPI.
#[must_use]
pub fn dpi_or_default(host: &dyn WindowHost, window: WindowHandle) -> u32 {
    host.dpi_for_window(window).filter(|dpi| *dpi > 0).unwrap_or_else(|| {
        tracing::trace!(window = %window, "DPI query failed, using base DPI");
        BASE_DPI
    })
}

/// Scale factor of a window, falling back to 1.0.
#[must_use]
pub fn scale_factor(host: &dyn WindowHost, window: WindowHandle) -> f64 {
    scale_factor_for_dpi(dpi_or_default(host, window))
}

/// Live scale factor and shadow margins of a window.
///
/// Without extended frame bounds the margins are zero.
#[must_use]
pub fn frame_metrics(host: &dyn WindowHost, window: WindowHandle) -> FrameMetrics {
    let margins = match (host.window_rect(window), host.extended_frame_bounds(window)) {
        (Some(window_rect), Some(frame)) => shadow_margins(&window_rect, &frame),
        _ => {
            tracing::trace!(window = %window, "frame bounds unavailable, assuming no shadow");
            ShadowMargins::ZERO
        }
    };
    FrameMetrics::new(scale_factor(host, window), margins)
}

/// Visible frame in physical pixels: extended frame bounds, then the raw rect.
#[must_use]
pub fn visible_frame_rect(host: &dyn WindowHost, window: WindowHandle) -> Option<PhysicalRect> {
    host.extended_frame_bounds(window).or_else(|| host.window_rect(window))
}

/// Physical size of the non-client area: window rect minus client rect.
#[must_use]
pub fn non_client_overhead(host: &dyn WindowHost, window: WindowHandle) -> Size {
    match (host.window_rect(window), host.client_rect(window)) {
        (Some(window_rect), Some(client)) => Size::new(
            f64::from((window_rect.width() - client.width()).max(0)),
            f64::from((window_rect.height() - client.height()).max(0)),
        ),
        _ => Size::zero(),
    }
}
