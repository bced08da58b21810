//! Property animations for window position, size, bounds and opacity.
//!
//! # Architecture
//!
//! - `easing` - normalized easing curves, including the overshoot curve
//! - `spring` - damped harmonic oscillator easing
//! - `value` - animated properties, conflict groups and per-property application
//! - `state` - animation requests and the per-animation record
//! - `engine` - the arena of in-flight animations and per-tick evaluation
//! - `animator` - one window's engine bound to the shared clock
//!
//! # Usage
//!
//! ```rust,ignore
//! let animator = WindowAnimator::new(host, window, scheduler.handle());
//! let id = animator.start(
//!     AnimationRequest::new(AnimationValue::Position(Point::new(100.0, 100.0)))
//!         .easing(EasingType::SpringBounce)
//!         .on_complete(|| tracing::info!("landed")),
//! );
//! ```

mod animator;
mod easing;
mod engine;
mod spring;
mod state;
mod value;

pub use animator::WindowAnimator;
pub use easing::{
    EasingType, OVERSHOOT_C1, OVERSHOOT_C3, ParseEasingError, apply_easing, ease, ease_in,
    ease_in_out, ease_linear, ease_out, ease_overshoot, ease_raw, lerp,
};
pub use engine::AnimationEngine;
pub use spring::{
    DEFAULT_DAMPING_RATIO, DEFAULT_STIFFNESS, MAX_DAMPING_RATIO, MAX_STIFFNESS,
    MIN_DAMPING_RATIO, MIN_STIFFNESS, SpringParams,
};
pub use state::{
    AnimationId, AnimationPhase, AnimationRequest, AnimationState, CompletionCallback,
    DEFAULT_DURATION_MS,
};
pub use value::{AnimationProperty, AnimationTrack, AnimationValue, apply_value, opacity_to_alpha};
