//! A complete [`WindowHost`] kept in memory.
//!
//! Used by the scenario tests and the `simulate` CLI commands. Windows carry a
//! drop shadow and a non-client inset only while their style has a frame,
//! which mirrors how the compositor treats captioned windows. A window takes
//! the DPI of the monitor holding most of its rect.

use std::collections::BTreeMap;

use parking_lot::Mutex;

use super::{
    BoundsUpdate, DisplayId, MonitorHandle, MonitorInfo, ShowState, WindowHandle, WindowHost,
    WindowStyle,
};
use crate::geometry::{BASE_DPI, PhysicalRect, ShadowMargins, Size};

/// Drop shadow a framed window gets unless told otherwise.
pub const DEFAULT_SHADOW: ShadowMargins = ShadowMargins::new(7, 0, 7, 7);

/// Border and caption inside the visible frame of a framed window.
pub const DEFAULT_FRAME_INSET: ShadowMargins = ShadowMargins::new(1, 31, 1, 1);

#[derive(Clone, Debug)]
struct SimWindow {
    rect: PhysicalRect,
    style: WindowStyle,
    shadow: ShadowMargins,
    frame_inset: ShadowMargins,
    alpha: u8,
    translucency_requests: usize,
    show_state: ShowState,
    restore_requests: usize,
    updates: Vec<BoundsUpdate>,
}

impl SimWindow {
    fn effective_shadow(&self) -> ShadowMargins {
        if self.style.has_frame() { self.shadow } else { ShadowMargins::ZERO }
    }

    fn effective_inset(&self) -> ShadowMargins {
        if self.style.has_frame() { self.frame_inset } else { ShadowMargins::ZERO }
    }
}

#[derive(Debug, Default)]
struct HostState {
    monitors: BTreeMap<MonitorHandle, MonitorInfo>,
    windows: BTreeMap<WindowHandle, SimWindow>,
    cursor: Option<(i32, i32)>,
    frame_bounds_unavailable: bool,
    next_window: u64,
    next_monitor: u64,
}

impl HostState {
    /// Monitor holding the largest part of `rect`, or the one nearest its center.
    fn monitor_from_rect(&self, rect: &PhysicalRect) -> Option<MonitorInfo> {
        let best = self
            .monitors
            .values()
            .map(|monitor| (monitor.bounds.intersection_area(rect), monitor))
            .filter(|(area, _)| *area > 0)
            .max_by_key(|(area, _)| *area)
            .map(|(_, monitor)| *monitor);

        best.or_else(|| {
            let (cx, cy) = rect.center();
            self.nearest_monitor(cx, cy)
        })
    }

    fn nearest_monitor(&self, x: i32, y: i32) -> Option<MonitorInfo> {
        self.monitors
            .values()
            .min_by_key(|monitor| {
                let dx = i64::from((monitor.bounds.left - x).max(x - monitor.bounds.right + 1).max(0));
                let dy = i64::from((monitor.bounds.top - y).max(y - monitor.bounds.bottom + 1).max(0));
                dx * dx + dy * dy
            })
            .copied()
    }
}

/// In-memory window host.
#[derive(Debug, Default)]
pub struct InMemoryHost {
    state: Mutex<HostState>,
}

impl InMemoryHost {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// A single 1920x1080 monitor at base DPI with a 40px taskbar at the bottom.
    #[must_use]
    pub fn single_monitor() -> Self {
        let host = Self::new();
        host.add_monitor(
            PhysicalRect::new(0, 0, 1920, 1080),
            PhysicalRect::new(0, 0, 1920, 1040),
            BASE_DPI,
        );
        host
    }

    // ========================================================================
    // Monitors
    // ========================================================================

    /// Adds a monitor. Its display id equals its handle value.
    pub fn add_monitor(&self, bounds: PhysicalRect, work_area: PhysicalRect, dpi: u32) -> MonitorHandle {
        let mut state = self.state.lock();
        state.next_monitor += 1;
        let handle = MonitorHandle(state.next_monitor);
        state.monitors.insert(handle, MonitorInfo { handle, bounds, work_area, dpi });
        handle
    }

    pub fn set_work_area(&self, monitor: MonitorHandle, work_area: PhysicalRect) {
        if let Some(info) = self.state.lock().monitors.get_mut(&monitor) {
            info.work_area = work_area;
        }
    }

    pub fn set_monitor_dpi(&self, monitor: MonitorHandle, dpi: u32) {
        if let Some(info) = self.state.lock().monitors.get_mut(&monitor) {
            info.dpi = dpi;
        }
    }

    pub fn remove_monitor(&self, monitor: MonitorHandle) { self.state.lock().monitors.remove(&monitor); }

    #[must_use]
    pub fn monitor(&self, monitor: MonitorHandle) -> Option<MonitorInfo> {
        self.state.lock().monitors.get(&monitor).copied()
    }

    pub fn set_cursor(&self, x: i32, y: i32) { self.state.lock().cursor = Some((x, y)); }

    /// Simulates a compositor that cannot report extended frame bounds.
    pub fn set_frame_bounds_available(&self, available: bool) {
        self.state.lock().frame_bounds_unavailable = !available;
    }

    // ========================================================================
    // Windows
    // ========================================================================

    /// Creates a window whose raw rect (shadow included) is `rect`.
    pub fn create_window(&self, rect: PhysicalRect, style: WindowStyle) -> WindowHandle {
        let mut state = self.state.lock();
        state.next_window += 1;
        let handle = WindowHandle(state.next_window);
        state.windows.insert(handle, SimWindow {
            rect,
            style,
            shadow: DEFAULT_SHADOW,
            frame_inset: DEFAULT_FRAME_INSET,
            alpha: u8::MAX,
            translucency_requests: 0,
            show_state: ShowState::Normal,
            restore_requests: 0,
            updates: Vec::new(),
        });
        handle
    }

    /// Creates a decorated window whose visible frame is `frame`.
    pub fn create_framed_window(&self, frame: PhysicalRect) -> WindowHandle {
        let rect = crate::geometry::window_rect_from_frame(&frame, &DEFAULT_SHADOW);
        self.create_window(rect, WindowStyle::decorated())
    }

    pub fn destroy_window(&self, window: WindowHandle) { self.state.lock().windows.remove(&window); }

    pub fn set_shadow(&self, window: WindowHandle, shadow: ShadowMargins) {
        if let Some(sim) = self.state.lock().windows.get_mut(&window) {
            sim.shadow = shadow;
        }
    }

    pub fn set_frame_inset(&self, window: WindowHandle, inset: ShadowMargins) {
        if let Some(sim) = self.state.lock().windows.get_mut(&window) {
            sim.frame_inset = inset;
        }
    }

    /// Current opacity channel of a window.
    #[must_use]
    pub fn alpha(&self, window: WindowHandle) -> Option<u8> {
        self.state.lock().windows.get(&window).map(|sim| sim.alpha)
    }

    /// Number of times translucency was requested for a window.
    #[must_use]
    pub fn translucency_requests(&self, window: WindowHandle) -> usize {
        self.state.lock().windows.get(&window).map_or(0, |sim| sim.translucency_requests)
    }

    /// Simulates the user minimizing or maximizing a window.
    pub fn set_show_state(&self, window: WindowHandle, show_state: ShowState) {
        if let Some(sim) = self.state.lock().windows.get_mut(&window) {
            sim.show_state = show_state;
        }
    }

    /// Number of restore requests that reached a window.
    #[must_use]
    pub fn restore_requests(&self, window: WindowHandle) -> usize {
        self.state.lock().windows.get(&window).map_or(0, |sim| sim.restore_requests)
    }

    /// Every bounds update applied to a window, oldest first.
    #[must_use]
    pub fn applied_updates(&self, window: WindowHandle) -> Vec<BoundsUpdate> {
        self.state.lock().windows.get(&window).map(|sim| sim.updates.clone()).unwrap_or_default()
    }

    pub fn clear_applied_updates(&self, window: WindowHandle) {
        if let Some(sim) = self.state.lock().windows.get_mut(&window) {
            sim.updates.clear();
        }
    }
}

impl WindowHost for InMemoryHost {
    fn is_window(&self, window: WindowHandle) -> bool {
        !window.is_null() && self.state.lock().windows.contains_key(&window)
    }

    fn dpi_for_window(&self, window: WindowHandle) -> Option<u32> {
        let state = self.state.lock();
        let sim = state.windows.get(&window)?;
        Some(state.monitor_from_rect(&sim.rect).map_or(BASE_DPI, |monitor| monitor.dpi))
    }

    fn virtual_screen_extent(&self) -> Size {
        let state = self.state.lock();
        let mut monitors = state.monitors.values();
        let Some(first) = monitors.next() else {
            return Size::zero();
        };
        let bounds = monitors.fold(first.bounds, |acc, monitor| {
            PhysicalRect::new(
                acc.left.min(monitor.bounds.left),
                acc.top.min(monitor.bounds.top),
                acc.right.max(monitor.bounds.right),
                acc.bottom.max(monitor.bounds.bottom),
            )
        });
        Size::new(f64::from(bounds.width()), f64::from(bounds.height()))
    }

    fn window_rect(&self, window: WindowHandle) -> Option<PhysicalRect> {
        self.state.lock().windows.get(&window).map(|sim| sim.rect)
    }

    fn client_rect(&self, window: WindowHandle) -> Option<PhysicalRect> {
        let state = self.state.lock();
        let sim = state.windows.get(&window)?;
        let shadow = sim.effective_shadow();
        let inset = sim.effective_inset();
        let width = (sim.rect.width() - shadow.horizontal() - inset.horizontal()).max(0);
        let height = (sim.rect.height() - shadow.vertical() - inset.vertical()).max(0);
        Some(PhysicalRect::new(0, 0, width, height))
    }

    fn extended_frame_bounds(&self, window: WindowHandle) -> Option<PhysicalRect> {
        let state = self.state.lock();
        if state.frame_bounds_unavailable {
            return None;
        }
        let sim = state.windows.get(&window)?;
        Some(crate::geometry::frame_from_window_rect(&sim.rect, &sim.effective_shadow()))
    }

    fn monitor_for_window(&self, window: WindowHandle) -> Option<MonitorInfo> {
        let state = self.state.lock();
        let sim = state.windows.get(&window)?;
        state.monitor_from_rect(&sim.rect)
    }

    fn monitor_from_rect(&self, rect: &PhysicalRect) -> Option<MonitorInfo> {
        self.state.lock().monitor_from_rect(rect)
    }

    fn monitor_for_display(&self, display: DisplayId) -> Option<MonitorInfo> {
        self.state.lock().monitors.get(&MonitorHandle(display)).copied()
    }

    fn monitor_under_cursor(&self) -> Option<MonitorInfo> {
        let state = self.state.lock();
        let (x, y) = state.cursor.unwrap_or((0, 0));
        state
            .monitors
            .values()
            .find(|monitor| monitor.bounds.contains_point(x, y))
            .copied()
            .or_else(|| state.nearest_monitor(x, y))
    }

    fn window_style(&self, window: WindowHandle) -> Option<WindowStyle> {
        self.state.lock().windows.get(&window).map(|sim| sim.style)
    }

    fn apply_bounds(&self, window: WindowHandle, update: BoundsUpdate) {
        let mut state = self.state.lock();
        let Some(sim) = state.windows.get_mut(&window) else {
            return;
        };
        let mut rect = sim.rect;
        if !update.flags.no_move {
            rect = rect.moved_to(update.x, update.y);
        }
        if !update.flags.no_size {
            rect = rect.resized(update.width.max(0), update.height.max(0));
        }
        sim.rect = rect;
        sim.updates.push(update);
    }

    fn set_style(&self, window: WindowHandle, style: u32) {
        if let Some(sim) = self.state.lock().windows.get_mut(&window) {
            sim.style.style = style;
        }
    }

    /// The topmost bit only changes through `set_topmost`, as with the OS.
    fn set_extended_style(&self, window: WindowHandle, ex_style: u32) {
        if let Some(sim) = self.state.lock().windows.get_mut(&window) {
            let topmost = sim.style.ex_style & WindowStyle::EX_TOPMOST;
            sim.style.ex_style = (ex_style & !WindowStyle::EX_TOPMOST) | topmost;
        }
    }

    fn set_opacity_channel(&self, window: WindowHandle, alpha: u8) {
        if let Some(sim) = self.state.lock().windows.get_mut(&window) {
            sim.alpha = alpha;
        }
    }

    fn enable_translucency(&self, window: WindowHandle) {
        if let Some(sim) = self.state.lock().windows.get_mut(&window) {
            sim.style.ex_style |= WindowStyle::EX_LAYERED;
            sim.translucency_requests += 1;
        }
    }

    fn set_topmost(&self, window: WindowHandle, topmost: bool) {
        if let Some(sim) = self.state.lock().windows.get_mut(&window) {
            if topmost {
                sim.style.ex_style |= WindowStyle::EX_TOPMOST;
            } else {
                sim.style.ex_style &= !WindowStyle::EX_TOPMOST;
            }
        }
    }

    fn show_state(&self, window: WindowHandle) -> Option<ShowState> {
        self.state.lock().windows.get(&window).map(|sim| sim.show_state)
    }

    fn restore(&self, window: WindowHandle) {
        if let Some(sim) = self.state.lock().windows.get_mut(&window) {
            sim.show_state = ShowState::Normal;
            sim.restore_requests += 1;
        }
    }
}
