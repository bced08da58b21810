//! `casement simulate`: drive the engine against the in-memory host.

use std::sync::Arc;

use clap::Subcommand;
use colored::Colorize;
use serde::Serialize;
use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Modify, Style};
use tabled::{Table, Tabled};

use super::types::{EasingArg, PropertyArg, ValueList};
use crate::animation::{AnimationRequest, EasingType};
use crate::cli::output;
use crate::config::{AnimationConfig, SchedulerConfig, get_config};
use crate::error::{CasementError, CasementResult};
use crate::geometry::{PhysicalRect, Rect, Size};
use crate::host::{InMemoryHost, WindowHost};
use crate::scheduler::{QueuedTaskRunner, TimerScheduler};
use crate::window::ManagedWindow;

/// Visible frame the simulated window starts with.
const START_FRAME: PhysicalRect = PhysicalRect::new(200, 150, 1000, 750);

/// Upper bound on simulated frames.
const MAX_FRAMES: usize = 10_000;

/// Simulation commands.
#[derive(Subcommand, Debug)]
#[command(next_display_order = None)]
pub enum SimulateCommands {
    /// Animate one property of a window and print every frame.
    ///
    /// The window starts with its visible frame at 200, 150 sized 800×600 on
    /// a single 1920×1080 monitor at 96 DPI.
    #[command(after_long_help = r#"Examples:
  casement simulate animate --property position --to 0,0
  casement simulate animate --property bounds --to 0,0,400,300 --easing spring-bounce
  casement simulate animate --property opacity --to 0 --duration 300 --frame-ms 150"#)]
    Animate {
        /// Property to animate.
        #[arg(long, short, value_enum)]
        property: PropertyArg,

        /// Target value: `x,y`, `w,h`, `x,y,w,h` or a single opacity.
        #[arg(long, short, value_name = "VALUES", allow_hyphen_values = true)]
        to: ValueList,

        /// Duration in milliseconds. Defaults to the configured duration.
        #[arg(long, short, value_name = "MS")]
        duration: Option<f64>,

        /// Easing curve. Defaults to the configured easing.
        #[arg(long, short, value_enum)]
        easing: Option<EasingArg>,

        /// Simulated frame length in milliseconds.
        #[arg(long, default_value_t = 16.0, value_name = "MS")]
        frame_ms: f64,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Enter and leave fullscreen, optionally changing the monitor in between.
    Fullscreen {
        /// Shrink the work area from the bottom while fullscreen, in pixels.
        #[arg(long, value_name = "PX")]
        shrink_work_area: Option<i32>,

        /// Change the monitor DPI while fullscreen.
        #[arg(long, value_name = "DPI")]
        target_dpi: Option<u32>,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },
}

/// Executes simulation subcommands.
///
/// # Errors
///
/// Returns an error if the arguments are out of range.
pub fn execute(cmd: &SimulateCommands) -> CasementResult<()> {
    match cmd {
        SimulateCommands::Animate { property, to, duration, easing, frame_ms, json } => {
            let mut defaults = get_config().animation.clone();
            if let Some(duration) = duration {
                defaults.duration_ms = parse_duration(*duration)?;
            }
            if let Some(easing) = easing {
                defaults.easing = EasingType::from(*easing);
            }
            let request = AnimationRequest::with_defaults(property.target(to)?, &defaults);
            let frames = simulate_animation(request, *frame_ms)?;
            print_frames(&frames, &defaults, *json);
            Ok(())
        }
        SimulateCommands::Fullscreen { shrink_work_area, target_dpi, json } => {
            let report = simulate_fullscreen(*shrink_work_area, *target_dpi)?;
            print_fullscreen(&report, *json);
            Ok(())
        }
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn parse_duration(duration: f64) -> CasementResult<u32> {
    if !duration.is_finite() || duration < 0.0 || duration > f64::from(u32::MAX) {
        return Err(CasementError::InvalidArguments(format!("invalid duration: {duration}")));
    }
    Ok(duration.round() as u32)
}

/// A window parked on a simulated single-monitor desktop.
struct Desktop {
    host: Arc<InMemoryHost>,
    scheduler: TimerScheduler,
    window: ManagedWindow,
}

impl Desktop {
    fn new() -> Self {
        let host = Arc::new(InMemoryHost::single_monitor());
        let handle = host.create_framed_window(START_FRAME);
        let scheduler =
            TimerScheduler::new(Arc::new(QueuedTaskRunner::new()), &SchedulerConfig::default());
        let window = ManagedWindow::new(host.clone(), handle, scheduler.handle());
        Self { host, scheduler, window }
    }
}

// ============================================================================
// Animation
// ============================================================================

/// State of the simulated window after one frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimationFrame {
    pub frame: usize,
    pub elapsed_ms: f64,
    /// Visible frame in logical pixels.
    pub bounds: Rect,
    pub opacity: f64,
    pub alpha: Option<u8>,
}

/// Runs `request` to completion with a fixed frame length.
///
/// The first entry is the state before the first tick.
///
/// # Errors
///
/// Returns an error if `frame_ms` is not a positive number.
pub fn simulate_animation(request: AnimationRequest, frame_ms: f64) -> CasementResult<Vec<AnimationFrame>> {
    if !frame_ms.is_finite() || frame_ms <= 0.0 {
        return Err(CasementError::InvalidArguments(format!("invalid frame length: {frame_ms}")));
    }

    let desktop = Desktop::new();
    let snapshot = |frame: usize, elapsed_ms: f64| AnimationFrame {
        frame,
        elapsed_ms,
        bounds: desktop.window.bounds(),
        opacity: desktop.window.opacity(),
        alpha: desktop.host.alpha(desktop.window.handle()),
    };

    let mut frames = vec![snapshot(0, 0.0)];
    desktop.window.animate(request);

    let clock = desktop.scheduler.handle();
    let mut elapsed_ms = 0.0;
    while desktop.window.is_animating() && frames.len() <= MAX_FRAMES {
        clock.tick_now(frame_ms);
        elapsed_ms += frame_ms;
        frames.push(snapshot(frames.len(), elapsed_ms));
    }

    if desktop.window.is_animating() {
        tracing::warn!(frames = frames.len(), "simulation stopped before the animation finished");
    }
    Ok(frames)
}

#[derive(Tabled)]
struct FrameRow {
    #[tabled(rename = "Frame")]
    frame: usize,
    #[tabled(rename = "Elapsed")]
    elapsed: String,
    #[tabled(rename = "Frame (logical)")]
    bounds: String,
    #[tabled(rename = "Opacity")]
    opacity: String,
    #[tabled(rename = "Alpha")]
    alpha: String,
}

fn print_frames(frames: &[AnimationFrame], settings: &AnimationConfig, json: bool) {
    if json {
        output::print_json(&frames);
        return;
    }

    let rows: Vec<FrameRow> = frames
        .iter()
        .map(|frame| FrameRow {
            frame: frame.frame,
            elapsed: format!("{}ms", output::format_number(frame.elapsed_ms, 2)),
            bounds: output::format_rect(&frame.bounds),
            opacity: output::format_number(frame.opacity, 3),
            alpha: frame.alpha.map_or_else(|| "-".dimmed().to_string(), |alpha| alpha.to_string()),
        })
        .collect();

    let table = Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(0..2)).with(Alignment::right()))
        .with(Modify::new(Columns::new(3..5)).with(Alignment::right()))
        .to_string();

    let title = format!("{} over {}ms", settings.easing, settings.duration_ms);
    println!("{}", title.bold());
    println!("{table}");
}

// ============================================================================
// Fullscreen
// ============================================================================

/// Placement of the simulated window at one point of the round trip.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacementSnapshot {
    pub stage: &'static str,
    pub window_rect: PhysicalRect,
    pub frame: Rect,
    pub client_size: Size,
    pub dpi: u32,
}

/// Outcome of a fullscreen round trip.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FullscreenReport {
    pub stages: Vec<PlacementSnapshot>,
    pub work_area: PhysicalRect,
    pub fits_work_area: bool,
}

/// Enters fullscreen, reconfigures the monitor, then leaves fullscreen.
///
/// # Errors
///
/// Returns an error if the shrink amount is negative or the DPI is zero.
pub fn simulate_fullscreen(shrink_work_area: Option<i32>, target_dpi: Option<u32>) -> CasementResult<FullscreenReport> {
    if shrink_work_area.is_some_and(|px| px < 0) {
        return Err(CasementError::InvalidArguments("work area shrink must not be negative".into()));
    }
    if target_dpi == Some(0) {
        return Err(CasementError::InvalidArguments("target DPI must be positive".into()));
    }

    let mut desktop = Desktop::new();
    let handle = desktop.window.handle();
    let monitor = desktop
        .host
        .monitor_for_window(handle)
        .ok_or_else(|| CasementError::InvalidArguments("simulated window has no monitor".into()))?;

    let snapshot = |desktop: &Desktop, stage: &'static str| PlacementSnapshot {
        stage,
        window_rect: desktop.host.window_rect(handle).unwrap_or_default(),
        frame: desktop.window.bounds(),
        client_size: desktop.window.content_size(),
        dpi: crate::host::dpi_or_default(desktop.host.as_ref(), handle),
    };

    let mut stages = vec![snapshot(&desktop, "windowed")];
    desktop.window.set_fullscreen(true, None);
    stages.push(snapshot(&desktop, "fullscreen"));

    let mut work_area = monitor.work_area;
    if let Some(px) = shrink_work_area {
        work_area.bottom = (work_area.bottom - px).max(work_area.top + 1);
        desktop.host.set_work_area(monitor.handle, work_area);
    }
    if let Some(dpi) = target_dpi {
        desktop.host.set_monitor_dpi(monitor.handle, dpi);
    }

    desktop.window.set_fullscreen(false, None);
    let restored = snapshot(&desktop, "restored");
    stages.push(restored);

    Ok(FullscreenReport { stages, work_area, fits_work_area: work_area.contains_rect(&restored.window_rect) })
}

#[derive(Tabled)]
struct PlacementRow {
    #[tabled(rename = "Stage")]
    stage: &'static str,
    #[tabled(rename = "Window rect")]
    window_rect: String,
    #[tabled(rename = "Frame (logical)")]
    frame: String,
    #[tabled(rename = "Client")]
    client: String,
    #[tabled(rename = "DPI")]
    dpi: u32,
}

fn print_fullscreen(report: &FullscreenReport, json: bool) {
    if json {
        output::print_json(report);
        return;
    }

    let rows: Vec<PlacementRow> = report
        .stages
        .iter()
        .map(|stage| PlacementRow {
            stage: stage.stage,
            window_rect: output::format_physical_rect(&stage.window_rect),
            frame: output::format_rect(&stage.frame),
            client: format!(
                "{}×{}",
                output::format_number(stage.client_size.width, 2),
                output::format_number(stage.client_size.height, 2)
            ),
            dpi: stage.dpi,
        })
        .collect();

    let table = Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::last()).with(Alignment::right()))
        .to_string();

    println!("{}", "Fullscreen round trip".bold());
    println!("{table}");
    println!(
        "Work area {}  restored rect fits: {}",
        output::format_physical_rect(&report.work_area),
        output::format_bool(report.fits_work_area)
    );
}
