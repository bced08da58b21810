//! Fullscreen round trips across monitor and DPI changes.

mod common;

use casement::geometry::BoxConstraints;
use casement::host::{ShowState, WindowStyle};
use casement::{AnimationRequest, AnimationValue, FullscreenState, InMemoryHost, PhysicalRect, Point, Rect, Size, WindowHost};
use common::{CallCounter, Desktop};

const FRAME: PhysicalRect = PhysicalRect::new(200, 150, 1000, 750);

fn two_monitors() -> InMemoryHost {
    let host = InMemoryHost::single_monitor();
    host.add_monitor(PhysicalRect::new(1920, 0, 4480, 1440), PhysicalRect::new(1920, 0, 4480, 1400), 96);
    host
}

// ============================================================================
// Round Trips
// ============================================================================

#[test]
fn test_round_trip_restores_client_size() {
    let desktop = Desktop::single_monitor();
    let mut window = desktop.window(FRAME);
    let before_bounds = window.bounds();
    let before_client = window.content_size();

    assert!(window.set_fullscreen(true, None));
    assert_eq!(window.fullscreen_state(), FullscreenState::Fullscreen);
    assert_eq!(desktop.host.window_rect(window.handle()), Some(PhysicalRect::new(0, 0, 1920, 1080)));
    assert_eq!(window.content_size(), Size::new(1920.0, 1080.0));

    assert!(window.set_fullscreen(false, None));
    assert_eq!(window.fullscreen_state(), FullscreenState::Windowed);
    assert_eq!(window.content_size(), before_client);
    assert_eq!(window.bounds(), before_bounds);
    assert!(desktop.host.window_style(window.handle()).is_some_and(WindowStyle::has_frame));
}

#[test]
fn test_round_trip_on_high_dpi_monitor() {
    let host = InMemoryHost::new();
    host.add_monitor(PhysicalRect::new(0, 0, 2880, 1620), PhysicalRect::new(0, 0, 2880, 1560), 144);
    let desktop = Desktop::with_host(host);
    let mut window = desktop.window(PhysicalRect::new(300, 300, 1500, 1200));
    let before = window.content_size();

    window.set_fullscreen(true, None);
    assert_eq!(window.bounds(), Rect::new(0.0, 0.0, 1920.0, 1080.0));
    window.set_fullscreen(false, None);

    assert_eq!(window.content_size(), before);
    assert_eq!(window.position(), Point::new(200.0, 200.0));
}

#[test]
fn test_repeated_requests_are_noops() {
    let desktop = Desktop::single_monitor();
    let mut window = desktop.window(FRAME);

    assert!(!window.set_fullscreen(false, None));
    assert!(window.set_fullscreen(true, None));
    let updates = desktop.host.applied_updates(window.handle()).len();
    assert!(!window.set_fullscreen(true, None));
    assert_eq!(desktop.host.applied_updates(window.handle()).len(), updates);
}

#[test]
fn test_fullscreen_on_target_display_returns_home() {
    let desktop = Desktop::with_host(two_monitors());
    let mut window = desktop.window(FRAME);
    let before = desktop.host.window_rect(window.handle());

    window.set_fullscreen(true, Some(2));
    assert_eq!(desktop.host.window_rect(window.handle()), Some(PhysicalRect::new(1920, 0, 4480, 1440)));

    window.set_fullscreen(false, None);
    assert_eq!(desktop.host.window_rect(window.handle()), before);
}

// ============================================================================
// Monitor Changes While Fullscreen
// ============================================================================

#[test]
fn test_work_area_shrink_keeps_origin_when_it_fits() {
    let desktop = Desktop::single_monitor();
    let mut window = desktop.window(PhysicalRect::new(100, 100, 900, 700));
    let saved = desktop.host.window_rect(window.handle()).unwrap();

    window.set_fullscreen(true, None);
    let work_area = PhysicalRect::new(0, 0, 1920, 800);
    desktop.host.set_work_area(casement::host::MonitorHandle(1), work_area);
    window.set_fullscreen(false, None);

    let restored = desktop.host.window_rect(window.handle()).unwrap();
    assert!(work_area.contains_rect(&restored));
    assert_eq!(restored, saved);
}

#[test]
fn test_work_area_shrink_slides_rect_inside() {
    let desktop = Desktop::single_monitor();
    let mut window = desktop.window(FRAME);

    window.set_fullscreen(true, None);
    let work_area = PhysicalRect::new(0, 0, 1920, 640);
    desktop.host.set_work_area(casement::host::MonitorHandle(1), work_area);
    window.set_fullscreen(false, None);

    let restored = desktop.host.window_rect(window.handle()).unwrap();
    assert!(work_area.contains_rect(&restored));
    assert_eq!(restored.left, 193);
    assert_eq!((restored.width(), restored.height()), (814, 607));
    assert_eq!(restored.bottom, 640);
}

#[test]
fn test_oversized_rect_shrinks_to_work_area() {
    let desktop = Desktop::single_monitor();
    let mut window = desktop.window(PhysicalRect::new(50, 50, 1850, 1000));

    window.set_fullscreen(true, None);
    let work_area = PhysicalRect::new(0, 0, 1280, 720);
    desktop.host.set_work_area(casement::host::MonitorHandle(1), work_area);
    window.set_fullscreen(false, None);

    let restored = desktop.host.window_rect(window.handle()).unwrap();
    assert_eq!(restored, work_area);
}

#[test]
fn test_removed_monitor_restores_onto_remaining_one() {
    let desktop = Desktop::with_host(two_monitors());
    let mut window = desktop.window(PhysicalRect::new(2500, 300, 3300, 900));

    window.set_fullscreen(true, None);
    desktop.host.remove_monitor(casement::host::MonitorHandle(2));
    window.set_fullscreen(false, None);

    let restored = desktop.host.window_rect(window.handle()).unwrap();
    assert!(PhysicalRect::new(0, 0, 1920, 1040).contains_rect(&restored));
    assert_eq!((restored.width(), restored.height()), (814, 607));
}

#[test]
fn test_dpi_change_rescales_restore_rect() {
    let desktop = Desktop::single_monitor();
    let mut window = desktop.window(FRAME);
    let saved = desktop.host.window_rect(window.handle()).unwrap();

    window.set_fullscreen(true, None);
    desktop.host.set_monitor_dpi(casement::host::MonitorHandle(1), 144);
    window.set_fullscreen(false, None);

    let restored = desktop.host.window_rect(window.handle()).unwrap();
    assert_eq!(restored.width(), 1221);
    assert_eq!(restored.height(), 911);
    assert_eq!(restored.left, saved.left);
    assert!(PhysicalRect::new(0, 0, 1920, 1040).contains_rect(&restored));
    assert_eq!(desktop.host.dpi_for_window(window.handle()), Some(144));
}

// ============================================================================
// Interaction With Other Operations
// ============================================================================

#[test]
fn test_fullscreen_cancels_running_animations() {
    let desktop = Desktop::single_monitor();
    let mut window = desktop.window(FRAME);
    let counter = CallCounter::default();

    window.animate(
        AnimationRequest::new(AnimationValue::Position(Point::new(0.0, 0.0))).on_complete(counter.callback()),
    );
    desktop.tick(100.0);
    let mid_animation = desktop.host.window_rect(window.handle());

    window.set_fullscreen(true, None);
    desktop.tick(500.0);
    assert_eq!(counter.count(), 0);
    assert!(!window.is_animating());

    window.set_fullscreen(false, None);
    assert_eq!(desktop.host.window_rect(window.handle()), mid_animation);
}

#[test]
fn test_content_size_set_while_fullscreen_applies_on_exit() {
    let desktop = Desktop::single_monitor();
    let mut window = desktop.window(FRAME);
    window.set_constraints(BoxConstraints::from_limits(Size::new(200.0, 200.0), Size::new(1000.0, 700.0)));

    window.set_fullscreen(true, None);
    window.set_content_size(Size::new(1200.0, 500.0));
    assert_eq!(desktop.host.window_rect(window.handle()), Some(PhysicalRect::new(0, 0, 1920, 1080)));

    window.set_fullscreen(false, None);
    assert_eq!(window.content_size(), Size::new(1000.0, 500.0));
}

// ============================================================================
// Window Chrome Across Fullscreen
// ============================================================================

#[test]
fn test_fixed_size_window_stays_fixed_after_fullscreen() {
    let desktop = Desktop::single_monitor();
    let mut window = desktop.window(FRAME);
    window.set_resizable(false);

    window.set_fullscreen(true, None);
    window.set_fullscreen(false, None);

    let style = desktop.host.window_style(window.handle()).unwrap();
    assert!(style.has_frame());
    assert!(!style.is_resizable());
    assert!(!window.is_resizable());
}

#[test]
fn test_resizable_change_while_fullscreen_applies_on_exit() {
    let desktop = Desktop::single_monitor();
    let mut window = desktop.window(FRAME);

    window.set_fullscreen(true, None);
    let fullscreen_style = desktop.host.window_style(window.handle());
    window.set_resizable(false);
    assert_eq!(desktop.host.window_style(window.handle()), fullscreen_style);

    window.set_fullscreen(false, None);
    let style = desktop.host.window_style(window.handle()).unwrap();
    assert!(style.has_frame());
    assert!(!style.is_resizable());

    window.set_resizable(true);
    assert_eq!(desktop.host.window_style(window.handle()), Some(WindowStyle::decorated()));
}

#[test]
fn test_frameless_choice_survives_fullscreen() {
    let desktop = Desktop::single_monitor();
    let mut window = desktop.window(FRAME);
    let saved = desktop.host.window_rect(window.handle());

    window.set_fullscreen(true, None);
    window.set_no_frame();
    window.set_fullscreen(false, None);

    assert!(!desktop.host.window_style(window.handle()).is_some_and(WindowStyle::has_frame));
    assert_eq!(desktop.host.window_rect(window.handle()), saved);
}

#[test]
fn test_always_on_top_survives_fullscreen() {
    let desktop = Desktop::single_monitor();
    let mut window = desktop.window(FRAME);
    window.set_always_on_top(true);

    window.set_fullscreen(true, None);
    assert!(window.is_always_on_top());
    window.set_fullscreen(false, None);
    assert!(window.is_always_on_top());
}

#[test]
fn test_minimized_window_restores_to_normal() {
    let desktop = Desktop::single_monitor();
    let window = desktop.window(FRAME);
    desktop.host.set_show_state(window.handle(), ShowState::Minimized);

    assert!(window.is_minimized());
    window.restore();
    assert!(!window.is_minimized());
    assert_eq!(desktop.host.show_state(window.handle()), Some(ShowState::Normal));
}
