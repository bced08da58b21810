//! Casement - window geometry, fullscreen and animation engine.
//!
//! The library keeps top-level windows placed correctly across monitors with
//! different DPIs, moves them in and out of fullscreen without losing their
//! windowed placement, and animates their position, size, bounds and opacity
//! from a shared clock. The OS windowing system is reached only through the
//! [`host::WindowHost`] trait; [`host::InMemoryHost`] implements it for tests
//! and the diagnostic CLI.

// Core modules
pub mod animation;
pub mod fullscreen;
pub mod geometry;
pub mod host;
pub mod scheduler;
pub mod window;

// Ambient modules
pub mod cli;
pub mod config;
pub mod error;

mod utils;

pub use animation::{
    AnimationId, AnimationProperty, AnimationRequest, AnimationValue, EasingType, SpringParams,
    WindowAnimator,
};
pub use error::{CasementError, CasementResult};
pub use fullscreen::{FullscreenState, FullscreenStateMachine};
pub use geometry::{BoxConstraints, PhysicalRect, Point, Rect, Size};
pub use host::{InMemoryHost, WindowHandle, WindowHost};
pub use scheduler::{QueuedTaskRunner, SchedulerHandle, TaskRunner, TimerScheduler};
pub use window::{ManagedWindow, WindowBoundsRequest};
