//! Per-window facade over geometry, constraints, fullscreen and animation.
//!
//! A [`ManagedWindow`] speaks logical pixels and visible-frame coordinates to
//! its caller and physical window rects to the host. Drop shadows are
//! compensated on every write, so a caller asking for a frame at (100, 50)
//! sees the visible edge land there rather than the invisible shadow edge.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::animation::{AnimationId, AnimationProperty, AnimationRequest, WindowAnimator};
use crate::fullscreen::{FullscreenState, FullscreenStateMachine};
use crate::geometry::{
    BoxConstraints, PhysicalRect, Point, Rect, Size, TrackSize, logical_rect, min_max_track_size,
    scale_factor_for_dpi, to_logical, window_size_for_client_size,
};
use crate::host::{
    self, ApplyFlags, BoundsUpdate, DisplayId, ShowState, WindowHandle, WindowHost, WindowStyle,
};
use crate::scheduler::SchedulerHandle;

/// Immediate placement of a window's visible frame, in logical pixels.
///
/// Absent parts are left untouched.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WindowBoundsRequest {
    pub position: Option<Point>,
    pub size: Option<Size>,
}

impl WindowBoundsRequest {
    #[must_use]
    pub const fn position(position: Point) -> Self { Self { position: Some(position), size: None } }

    #[must_use]
    pub const fn size(size: Size) -> Self { Self { position: None, size: Some(size) } }

    #[must_use]
    pub const fn bounds(rect: &Rect) -> Self {
        Self { position: Some(rect.origin()), size: Some(rect.size()) }
    }

    /// The animatable property an immediate write of this request overrides.
    const fn property(&self) -> Option<AnimationProperty> {
        match (self.position, self.size) {
            (Some(_), Some(_)) => Some(AnimationProperty::Bounds),
            (Some(_), None) => Some(AnimationProperty::Position),
            (None, Some(_)) => Some(AnimationProperty::Size),
            (None, None) => None,
        }
    }
}

#[allow(clippy::cast_possible_truncation)]
fn whole_px(value: f64) -> i32 { value.round() as i32 }

/// One top-level window and the state the core keeps for it.
pub struct ManagedWindow {
    host: Arc<dyn WindowHost>,
    handle: WindowHandle,
    constraints: BoxConstraints,
    resizable: bool,
    fullscreen: FullscreenStateMachine,
    animator: WindowAnimator,
}

impl std::fmt::Debug for ManagedWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ManagedWindow")
            .field("handle", &self.handle)
            .field("constraints", &self.constraints)
            .field("resizable", &self.resizable)
            .field("fullscreen", &self.fullscreen.state())
            .field("animator", &self.animator)
            .finish_non_exhaustive()
    }
}

impl ManagedWindow {
    #[must_use]
    pub fn new(host: Arc<dyn WindowHost>, handle: WindowHandle, scheduler: SchedulerHandle) -> Self {
        let animator = WindowAnimator::new(Arc::clone(&host), handle, scheduler);
        let resizable = host.window_style(handle).is_none_or(WindowStyle::is_resizable);
        Self {
            host,
            handle,
            constraints: BoxConstraints::unconstrained(),
            resizable,
            fullscreen: FullscreenStateMachine::new(),
            animator,
        }
    }

    #[must_use]
    pub const fn handle(&self) -> WindowHandle { self.handle }

    #[must_use]
    pub const fn constraints(&self) -> &BoxConstraints { &self.constraints }

    #[must_use]
    pub fn is_live(&self) -> bool { self.host.is_window(self.handle) }

    fn ensure_live(&self, operation: &'static str) -> bool {
        let live = self.is_live();
        if !live {
            tracing::trace!(window = %self.handle, operation, "target is not a live window");
        }
        live
    }

    // ========================================================================
    // Bounds
    // ========================================================================

    /// Places the visible frame immediately.
    ///
    /// In-flight animations of the overridden property are canceled without
    /// running their callbacks.
    pub fn set_bounds(&self, request: WindowBoundsRequest) {
        if !self.ensure_live("set_bounds") {
            return;
        }
        let Some(property) = request.property() else {
            return;
        };
        self.animator.cancel_conflicting(property);

        let metrics = host::frame_metrics(self.host.as_ref(), self.handle);
        let (x, y) = request
            .position
            .map_or((0, 0), |position| metrics.window_origin_for_frame_origin(position));
        let (width, height) =
            request.size.map_or((0, 0), |size| metrics.window_size_for_frame_size(size));
        let flags = ApplyFlags {
            no_move: request.position.is_none(),
            no_size: request.size.is_none(),
            ..ApplyFlags::placement()
        };

        self.host.apply_bounds(self.handle, BoundsUpdate { x, y, width, height, flags });
    }

    /// Visible frame in logical pixels.
    ///
    /// Falls back to the raw window rect when the compositor does not report
    /// frame bounds, and to an empty rect when the window is gone.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        let scale = host::scale_factor(self.host.as_ref(), self.handle);
        host::visible_frame_rect(self.host.as_ref(), self.handle)
            .map_or_else(Rect::zero, |frame| logical_rect(&frame, scale))
    }

    #[must_use]
    pub fn position(&self) -> Point { self.bounds().origin() }

    /// Logical client size, or zero when the window is gone.
    #[must_use]
    pub fn content_size(&self) -> Size {
        let scale = host::scale_factor(self.host.as_ref(), self.handle);
        self.host.client_rect(self.handle).map_or_else(Size::zero, |client| {
            Size::new(
                to_logical(f64::from(client.width()), scale),
                to_logical(f64::from(client.height()), scale),
            )
        })
    }

    /// Resizes the window so its client area has the given logical size.
    ///
    /// While fullscreen only the placement restored on exit changes.
    pub fn set_content_size(&mut self, size: Size) {
        if !self.ensure_live("set_content_size") {
            return;
        }
        let extent = self.host.virtual_screen_extent();

        if let Some(saved) = self.saved_while_fullscreen() {
            let window_size = window_size_for_client_size(
                size,
                &self.constraints,
                scale_factor_for_dpi(saved.dpi),
                saved.non_client_overhead(),
                extent,
            );
            self.fullscreen.resize_saved(
                whole_px(window_size.width),
                whole_px(window_size.height),
                Some(size),
            );
            tracing::debug!(window = %self.handle, width = size.width, height = size.height, "resized restore placement");
            return;
        }

        let window_size = window_size_for_client_size(
            size,
            &self.constraints,
            host::scale_factor(self.host.as_ref(), self.handle),
            host::non_client_overhead(self.host.as_ref(), self.handle),
            extent,
        );
        self.animator.cancel_conflicting(AnimationProperty::Size);
        self.host.apply_bounds(
            self.handle,
            BoundsUpdate::resize_to(whole_px(window_size.width), whole_px(window_size.height)),
        );
    }

    /// Replaces the size constraints and re-clamps the current size.
    ///
    /// While fullscreen the saved client size is re-clamped into the restore
    /// placement instead.
    pub fn set_constraints(&mut self, constraints: BoxConstraints) {
        self.constraints = constraints;
        if !self.ensure_live("set_constraints") {
            return;
        }
        let extent = self.host.virtual_screen_extent();

        if let Some(saved) = self.saved_while_fullscreen() {
            let window_size = window_size_for_client_size(
                saved.client_size,
                &self.constraints,
                scale_factor_for_dpi(saved.dpi),
                saved.non_client_overhead(),
                extent,
            );
            self.fullscreen.resize_saved(whole_px(window_size.width), whole_px(window_size.height), None);
            return;
        }

        let Some(current) = self.host.window_rect(self.handle) else {
            return;
        };
        let window_size = window_size_for_client_size(
            self.content_size(),
            &self.constraints,
            host::scale_factor(self.host.as_ref(), self.handle),
            host::non_client_overhead(self.host.as_ref(), self.handle),
            extent,
        );
        let (width, height) = (whole_px(window_size.width), whole_px(window_size.height));
        if (width, height) != (current.width(), current.height()) {
            tracing::debug!(window = %self.handle, width, height, "re-clamped window to new constraints");
            self.host.apply_bounds(self.handle, BoundsUpdate::resize_to(width, height));
        }
    }

    /// Physical min/max window size for the OS track-size query.
    #[must_use]
    pub fn min_max_track_size(&self) -> TrackSize {
        min_max_track_size(
            &self.constraints,
            host::scale_factor(self.host.as_ref(), self.handle),
            host::non_client_overhead(self.host.as_ref(), self.handle),
            self.host.virtual_screen_extent(),
        )
    }

    /// Centers the visible frame in the work area of the monitor under the
    /// cursor, keeping its size.
    pub fn center_on_monitor(&self) {
        if !self.ensure_live("center_on_monitor") {
            return;
        }
        let Some(monitor) = self.host.monitor_under_cursor() else {
            tracing::trace!(window = %self.handle, "no monitor under the cursor");
            return;
        };
        let (Some(frame), Some(window_rect)) = (
            host::visible_frame_rect(self.host.as_ref(), self.handle),
            self.host.window_rect(self.handle),
        ) else {
            return;
        };

        let work = monitor.work_area;
        let frame_x = work.left + (work.width() - frame.width()) / 2;
        let frame_y = work.top + (work.height() - frame.height()) / 2;
        let x = frame_x - (frame.left - window_rect.left);
        let y = frame_y - (frame.top - window_rect.top);

        self.animator.cancel_conflicting(AnimationProperty::Position);
        self.host.apply_bounds(
            self.handle,
            BoundsUpdate { flags: ApplyFlags::move_only().with_frame_changed(), ..BoundsUpdate::move_to(x, y) },
        );
    }

    /// Applies the rect the OS suggests after a DPI change, verbatim.
    pub fn on_dpi_changed(&self, suggested: &PhysicalRect) {
        tracing::debug!(window = %self.handle, rect = %suggested, "applying DPI-change rect");
        self.host.apply_bounds(self.handle, BoundsUpdate::place(suggested, ApplyFlags::placement()));
    }

    /// Stretches the window across the whole virtual screen.
    pub fn fill_virtual_screen(&self) {
        if !self.ensure_live("fill_virtual_screen") {
            return;
        }
        let extent = self.host.virtual_screen_extent();
        let rect = PhysicalRect::from_origin_size(0, 0, whole_px(extent.width), whole_px(extent.height));
        self.animator.cancel_conflicting(AnimationProperty::Bounds);
        self.host.apply_bounds(self.handle, BoundsUpdate::place(&rect, ApplyFlags::placement().with_frame_changed()));
    }

    // ========================================================================
    // Chrome
    // ========================================================================

    /// Removes the caption, resize frame and edges.
    ///
    /// While fullscreen the style restored on exit loses its frame instead.
    /// Whether the window counts as resizable is left alone.
    pub fn set_no_frame(&mut self) {
        if !self.ensure_live("set_no_frame") {
            return;
        }
        if self.fullscreen.is_fullscreen() {
            self.fullscreen.restyle_saved(WindowStyle::frameless);
            return;
        }
        if let Some(style) = self.host.window_style(self.handle) {
            self.apply_style(style.frameless());
        }
    }

    /// Adds or removes the resize frame and maximize box.
    ///
    /// While fullscreen the style restored on exit changes instead.
    pub fn set_resizable(&mut self, resizable: bool) {
        self.resizable = resizable;
        if !self.ensure_live("set_resizable") {
            return;
        }
        if self.fullscreen.is_fullscreen() {
            self.fullscreen.restyle_saved(|style| style.with_resizable(resizable));
            return;
        }
        if let Some(style) = self.host.window_style(self.handle) {
            self.apply_style(style.with_resizable(resizable));
        }
    }

    #[must_use]
    pub const fn is_resizable(&self) -> bool { self.resizable }

    pub fn set_always_on_top(&self, always_on_top: bool) {
        if self.ensure_live("set_always_on_top") {
            self.host.set_topmost(self.handle, always_on_top);
        }
    }

    #[must_use]
    pub fn is_always_on_top(&self) -> bool {
        self.host.window_style(self.handle).is_some_and(WindowStyle::is_topmost)
    }

    #[must_use]
    pub fn is_minimized(&self) -> bool { self.host.show_state(self.handle) == Some(ShowState::Minimized) }

    /// Restores a minimized or maximized window. Normal windows are left alone.
    pub fn restore(&self) {
        let Some(show_state) = self.host.show_state(self.handle) else {
            tracing::trace!(window = %self.handle, operation = "restore", "target is not a live window");
            return;
        };
        if show_state != ShowState::Normal {
            tracing::debug!(window = %self.handle, ?show_state, "restoring window");
            self.host.restore(self.handle);
        }
    }

    fn apply_style(&self, style: WindowStyle) {
        self.host.set_style(self.handle, style.style);
        self.host.set_extended_style(self.handle, style.ex_style);
        self.host.apply_bounds(self.handle, BoundsUpdate::frame_flush());
    }

    // ========================================================================
    // Opacity
    // ========================================================================

    /// Writes the opacity immediately, canceling any opacity animation.
    pub fn set_opacity(&self, opacity: f64) { self.animator.set_opacity(opacity); }

    #[must_use]
    pub fn opacity(&self) -> f64 { self.animator.opacity() }

    // ========================================================================
    // Fullscreen
    // ========================================================================

    /// Enters or leaves fullscreen. Returns whether the state changed.
    ///
    /// Animations in flight are canceled first so the snapshot sees a settled
    /// window.
    pub fn set_fullscreen(&mut self, enable: bool, target_display: Option<DisplayId>) -> bool {
        if enable != self.fullscreen.is_fullscreen() {
            let canceled = self.animator.stop_all();
            if canceled > 0 {
                tracing::debug!(window = %self.handle, canceled, "canceled animations for fullscreen transition");
            }
        }
        self.fullscreen.set_fullscreen(self.host.as_ref(), self.handle, enable, target_display)
    }

    #[must_use]
    pub fn is_fullscreen(&self) -> bool { self.fullscreen.is_fullscreen() }

    #[must_use]
    pub const fn fullscreen_state(&self) -> FullscreenState { self.fullscreen.state() }

    #[must_use]
    pub const fn fullscreen(&self) -> &FullscreenStateMachine { &self.fullscreen }

    fn saved_while_fullscreen(&self) -> Option<crate::fullscreen::SavedWindowInfo> {
        self.fullscreen.saved().copied().filter(|_| self.fullscreen.is_fullscreen())
    }

    // ========================================================================
    // Animation
    // ========================================================================

    pub fn animate(&self, request: AnimationRequest) -> AnimationId { self.animator.start(request) }

    pub fn stop_animation(&self, id: AnimationId) -> bool { self.animator.stop(id) }

    pub fn stop_all_animations(&self) -> usize { self.animator.stop_all() }

    #[must_use]
    pub fn is_animating(&self) -> bool { self.animator.is_animating() }

    #[must_use]
    pub fn is_animation_active(&self, id: AnimationId) -> bool { self.animator.is_active(id) }
}
