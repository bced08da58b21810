//! Windowed/fullscreen transitions with snapshot and restore of window placement.
//!
//! Entering fullscreen snapshots the style, raw window rect, logical client
//! size, DPI and monitor of the window, strips the frame and covers the full
//! bounds of the target monitor. Leaving restores the snapshot, re-fitting the
//! saved rect when its monitor changed underneath it and re-applying it once
//! more when the DPI in effect after the move disagrees with the DPIs seen
//! before.

use serde::Serialize;

use crate::geometry::conversion::rescale_px;
use crate::geometry::{PhysicalRect, Size, adjust_to_fit, scale_factor_for_dpi, to_logical};
use crate::host::{
    self, ApplyFlags, BoundsUpdate, DisplayId, MonitorHandle, WindowHandle, WindowHost, WindowStyle,
};

/// Whether a window covers its monitor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FullscreenState {
    #[default]
    Windowed,
    Fullscreen,
}

/// Placement of a window captured when it entered fullscreen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedWindowInfo {
    pub style: WindowStyle,
    /// Raw window rect, drop shadow included.
    pub rect: PhysicalRect,
    /// Client size in logical pixels.
    pub client_size: Size,
    pub dpi: u32,
    pub monitor: MonitorHandle,
    pub work_area: PhysicalRect,
}

impl SavedWindowInfo {
    /// Physical non-client size of the saved placement.
    #[must_use]
    pub fn non_client_overhead(&self) -> Size {
        let scale = scale_factor_for_dpi(self.dpi);
        Size::new(
            (f64::from(self.rect.width()) - self.client_size.width * scale).max(0.0),
            (f64::from(self.rect.height()) - self.client_size.height * scale).max(0.0),
        )
    }
}

/// Fullscreen state of one window.
#[derive(Debug, Clone, Default)]
pub struct FullscreenStateMachine {
    state: FullscreenState,
    saved: Option<SavedWindowInfo>,
}

impl FullscreenStateMachine {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    #[must_use]
    pub const fn state(&self) -> FullscreenState { self.state }

    #[must_use]
    pub fn is_fullscreen(&self) -> bool { self.state == FullscreenState::Fullscreen }

    /// The snapshot taken on the last entry, if any.
    #[must_use]
    pub const fn saved(&self) -> Option<&SavedWindowInfo> { self.saved.as_ref() }

    /// Rewrites the size of the placement restored on exit.
    ///
    /// Used while fullscreen, when the application resizes a window it cannot
    /// currently see at its windowed size.
    pub fn resize_saved(&mut self, width: i32, height: i32, client_size: Option<Size>) {
        if let Some(saved) = self.saved.as_mut() {
            saved.rect = saved.rect.resized(width, height);
            if let Some(client_size) = client_size {
                saved.client_size = client_size;
            }
        }
    }

    /// Rewrites the style restored on exit.
    pub fn restyle_saved(&mut self, restyle: impl FnOnce(WindowStyle) -> WindowStyle) {
        if let Some(saved) = self.saved.as_mut() {
            saved.style = restyle(saved.style);
        }
    }

    /// Enters or leaves fullscreen. Returns whether the state changed.
    ///
    /// Requesting the current state is a no-op. `target_display` picks the
    /// monitor to cover; unknown displays fall back to the window's monitor.
    pub fn set_fullscreen(
        &mut self,
        host: &dyn WindowHost,
        window: WindowHandle,
        enable: bool,
        target_display: Option<DisplayId>,
    ) -> bool {
        if !host.is_window(window) {
            tracing::trace!(window = %window, "fullscreen target is not a live window");
            return false;
        }
        if enable == self.is_fullscreen() {
            return false;
        }

        if enable { self.enter(host, window, target_display) } else { self.exit(host, window) }
    }

    fn enter(&mut self, host: &dyn WindowHost, window: WindowHandle, target_display: Option<DisplayId>) -> bool {
        let (Some(style), Some(rect), Some(current)) = (
            host.window_style(window),
            host.window_rect(window),
            host.monitor_for_window(window),
        ) else {
            tracing::warn!(window = %window, "cannot enter fullscreen: window or monitor info unavailable");
            return false;
        };

        let dpi = host::dpi_or_default(host, window);
        let scale = scale_factor_for_dpi(dpi);
        let client_size = host.client_rect(window).map_or_else(Size::zero, |client| {
            Size::new(
                to_logical(f64::from(client.width()), scale),
                to_logical(f64::from(client.height()), scale),
            )
        });

        let saved = SavedWindowInfo {
            style,
            rect,
            client_size,
            dpi,
            monitor: current.handle,
            work_area: current.work_area,
        };

        let target = target_display
            .and_then(|display_id| {
                let monitor = host.monitor_for_display(display_id);
                if monitor.is_none() {
                    tracing::debug!(display_id, "unknown target display, using the window's monitor");
                }
                monitor
            })
            .unwrap_or(current);

        // The style change is flushed on its own so size queries made during
        // the resize already see the frameless style.
        let frameless = style.frameless();
        host.set_style(window, frameless.style);
        host.set_extended_style(window, frameless.ex_style);
        host.apply_bounds(window, BoundsUpdate::frame_flush());
        host.apply_bounds(
            window,
            BoundsUpdate::place(&target.bounds, ApplyFlags::placement().with_frame_changed()),
        );

        tracing::debug!(
            window = %window,
            monitor = %target.handle,
            bounds = %target.bounds,
            saved_rect = %rect,
            dpi,
            "entered fullscreen"
        );

        self.saved = Some(saved);
        self.state = FullscreenState::Fullscreen;
        true
    }

    fn exit(&mut self, host: &dyn WindowHost, window: WindowHandle) -> bool {
        let Some(saved) = self.saved else {
            self.state = FullscreenState::Windowed;
            return true;
        };

        host.set_style(window, saved.style.with_visible().style);
        host.set_extended_style(window, saved.style.ex_style);
        host.apply_bounds(window, BoundsUpdate::frame_flush());

        let monitor = host.monitor_from_rect(&saved.rect);
        let mut rect = saved.rect;

        if let Some(monitor) = monitor.filter(|monitor| {
            monitor.handle != saved.monitor || monitor.work_area != saved.work_area
        }) {
            rect = adjust_to_fit(&monitor.work_area, &rect);
            tracing::debug!(
                window = %window,
                saved_rect = %saved.rect,
                fitted_rect = %rect,
                work_area = %monitor.work_area,
                "monitor changed during fullscreen, re-fitted restore rect"
            );
        }

        let fullscreen_dpi = host::dpi_or_default(host, window);
        let placement = ApplyFlags::placement().with_frame_changed();
        host.apply_bounds(window, BoundsUpdate::place(&rect, placement));
        let final_dpi = host::dpi_or_default(host, window);

        if final_dpi != saved.dpi || final_dpi != fullscreen_dpi {
            if final_dpi != saved.dpi {
                // Rounds to the nearest pixel. A truncating rescale can come
                // out 1px smaller on fractional scales (803px at 120 DPI is
                // 1004px here, 1003px truncated).
                rect = rect.resized(
                    rescale_px(rect.width(), saved.dpi, final_dpi),
                    rescale_px(rect.height(), saved.dpi, final_dpi),
                );
                if let Some(monitor) = monitor {
                    rect = adjust_to_fit(&monitor.work_area, &rect);
                }
            }
            host.apply_bounds(window, BoundsUpdate::place(&rect, placement));
            tracing::debug!(
                window = %window,
                saved_dpi = saved.dpi,
                fullscreen_dpi,
                final_dpi,
                rect = %rect,
                "re-applied restore rect after DPI change"
            );
        }

        tracing::debug!(window = %window, rect = %rect, "left fullscreen");
        self.state = FullscreenState::Windowed;
        true
    }
}
