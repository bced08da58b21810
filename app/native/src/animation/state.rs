//! Animation requests and the per-animation record the engine keeps.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use super::easing::EasingType;
use super::spring::SpringParams;
use super::value::{AnimationTrack, AnimationValue};
use crate::config::{AnimationConfig, get_config};
use crate::geometry::FrameMetrics;
use crate::host::WindowHandle;

// ============================================================================
// Constants
// ============================================================================

/// Duration used when a request does not name one.
pub const DEFAULT_DURATION_MS: f64 = 300.0;

// ============================================================================
// Identity
// ============================================================================

/// Identifier of a started animation. `AnimationId::NONE` means "not started".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AnimationId(pub u64);

impl AnimationId {
    pub const NONE: Self = Self(0);

    #[must_use]
    pub const fn is_none(self) -> bool { self.0 == 0 }

    /// Allocates a process-unique id. Never returns `NONE`.
    pub(crate) fn next() -> Self {
        static NEXT_ID: AtomicU64 = AtomicU64::new(1);
        Self(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for AnimationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "#{}", self.0) }
}

/// Lifecycle of one animation. Terminal phases never change again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnimationPhase {
    Created,
    Active,
    Completed,
    Canceled,
}

impl AnimationPhase {
    #[must_use]
    pub const fn is_terminal(self) -> bool { matches!(self, Self::Completed | Self::Canceled) }
}

/// Invoked once when an animation reaches its target. Never invoked on cancel.
pub type CompletionCallback = Box<dyn FnOnce() + Send + 'static>;

// ============================================================================
// Requests
// ============================================================================

/// A request to animate one property of a window to a target value.
pub struct AnimationRequest {
    pub target: AnimationValue,
    pub duration_ms: f64,
    pub easing: EasingType,
    pub spring: SpringParams,
    pub on_complete: Option<CompletionCallback>,
}

impl fmt::Debug for AnimationRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnimationRequest")
            .field("target", &self.target)
            .field("duration_ms", &self.duration_ms)
            .field("easing", &self.easing)
            .field("spring", &self.spring)
            .field("on_complete", &self.on_complete.is_some())
            .finish()
    }
}

impl AnimationRequest {
    /// Creates a request with the built-in defaults: 300ms, ease-out.
    #[must_use]
    pub fn new(target: AnimationValue) -> Self {
        Self {
            target,
            duration_ms: DEFAULT_DURATION_MS,
            easing: EasingType::default(),
            spring: SpringParams::default(),
            on_complete: None,
        }
    }

    /// Creates a request using the animation defaults of the loaded configuration.
    #[must_use]
    pub fn from_config(target: AnimationValue) -> Self {
        Self::with_defaults(target, &get_config().animation)
    }

    /// Creates a request using the given animation defaults.
    #[must_use]
    pub fn with_defaults(target: AnimationValue, defaults: &AnimationConfig) -> Self {
        Self {
            target,
            duration_ms: f64::from(defaults.duration_ms),
            easing: defaults.easing,
            spring: defaults.spring.clamped(),
            on_complete: None,
        }
    }

    #[must_use]
    pub const fn duration_ms(mut self, duration_ms: f64) -> Self {
        self.duration_ms = duration_ms;
        self
    }

    #[must_use]
    pub const fn easing(mut self, easing: EasingType) -> Self {
        self.easing = easing;
        self
    }

    /// Tunes the spring. Values are clamped to their supported ranges.
    #[must_use]
    pub fn spring(mut self, damping_ratio: f64, stiffness: f64) -> Self {
        self.spring = SpringParams::new(damping_ratio, stiffness);
        self
    }

    #[must_use]
    pub fn on_complete<F>(mut self, callback: F) -> Self
    where F: FnOnce() + Send + 'static {
        self.on_complete = Some(Box::new(callback));
        self
    }
}

// ============================================================================
// State
// ============================================================================

/// One in-flight property animation.
///
/// The frame metrics are captured when the animation starts and every frame
/// is applied with them, even if the window's DPI changes mid-flight.
pub struct AnimationState {
    pub id: AnimationId,
    pub window: WindowHandle,
    pub track: AnimationTrack,
    pub easing: EasingType,
    pub spring: SpringParams,
    pub duration_ms: f64,
    /// Scheduler time accumulated since the animation became active.
    pub elapsed_ms: f64,
    pub metrics: FrameMetrics,
    pub phase: AnimationPhase,
    on_complete: Option<CompletionCallback>,
}

impl fmt::Debug for AnimationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnimationState")
            .field("id", &self.id)
            .field("window", &self.window)
            .field("track", &self.track)
            .field("easing", &self.easing)
            .field("duration_ms", &self.duration_ms)
            .field("elapsed_ms", &self.elapsed_ms)
            .field("phase", &self.phase)
            .finish_non_exhaustive()
    }
}

impl AnimationState {
    pub(crate) fn new(
        window: WindowHandle,
        track: AnimationTrack,
        request: AnimationRequest,
        metrics: FrameMetrics,
    ) -> Self {
        Self {
            id: AnimationId::next(),
            window,
            track,
            easing: request.easing,
            spring: request.spring,
            duration_ms: request.duration_ms,
            elapsed_ms: 0.0,
            metrics,
            phase: AnimationPhase::Created,
            on_complete: request.on_complete,
        }
    }

    /// Normalized progress. A non-positive or invalid duration is already done.
    #[must_use]
    pub fn progress(&self) -> f64 {
        if self.duration_ms <= 0.0 || !self.duration_ms.is_finite() {
            return 1.0;
        }
        (self.elapsed_ms / self.duration_ms).clamp(0.0, 1.0)
    }

    /// Moves the animation to a new phase unless it is already terminal.
    pub(crate) fn transition(&mut self, phase: AnimationPhase) {
        if !self.phase.is_terminal() {
            self.phase = phase;
        }
    }

    /// Marks the animation completed and hands back its callback, once.
    pub(crate) fn complete(&mut self) -> Option<CompletionCallback> {
        if self.phase.is_terminal() {
            return None;
        }
        self.phase = AnimationPhase::Completed;
        self.on_complete.take()
    }

    /// Marks the animation canceled and drops its callback unrun.
    pub(crate) fn cancel(&mut self) {
        if !self.phase.is_terminal() {
            self.phase = AnimationPhase::Canceled;
            self.on_complete = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::AtomicUsize;

    use super::*;
    use crate::geometry::Point;

    fn state(duration_ms: f64) -> AnimationState {
        let target = AnimationValue::Position(Point::new(10.0, 10.0));
        let track = AnimationTrack::between(AnimationValue::Position(Point::default()), target);
        AnimationState::new(
            WindowHandle(1),
            track.unwrap(),
            AnimationRequest::new(target).duration_ms(duration_ms),
            FrameMetrics::identity(),
        )
    }

    #[test]
    fn test_request_defaults() {
        let request = AnimationRequest::new(AnimationValue::opacity(0.0));
        assert!((request.duration_ms - 300.0).abs() < f64::EPSILON);
        assert_eq!(request.easing, EasingType::EaseOut);
        assert!(request.on_complete.is_none());
    }

    #[test]
    fn test_request_spring_is_clamped() {
        let request = AnimationRequest::new(AnimationValue::opacity(0.0)).spring(0.0, 1_000.0);
        assert!((request.spring.damping_ratio - 0.1).abs() < f64::EPSILON);
        assert!((request.spring.stiffness - 500.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_ids_are_unique_and_never_none() {
        let a = AnimationId::next();
        let b = AnimationId::next();
        assert_ne!(a, b);
        assert!(!a.is_none());
        assert!(AnimationId::NONE.is_none());
    }

    #[test]
    fn test_progress_handles_degenerate_duration() {
        assert!((state(0.0).progress() - 1.0).abs() < f64::EPSILON);
        assert!((state(-5.0).progress() - 1.0).abs() < f64::EPSILON);
        assert!((state(f64::NAN).progress() - 1.0).abs() < f64::EPSILON);

        let mut running = state(200.0);
        running.elapsed_ms = 50.0;
        assert!((running.progress() - 0.25).abs() < f64::EPSILON);
        running.elapsed_ms = 500.0;
        assert!((running.progress() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_complete_yields_callback_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let target = AnimationValue::opacity(0.0);
        let mut animation = AnimationState::new(
            WindowHandle(1),
            AnimationTrack::Opacity { from: 1.0, to: 0.0 },
            AnimationRequest::new(target).on_complete(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            }),
            FrameMetrics::identity(),
        );

        animation.transition(AnimationPhase::Active);
        if let Some(callback) = animation.complete() {
            callback();
        }
        assert!(animation.complete().is_none());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(animation.phase, AnimationPhase::Completed);
    }

    #[test]
    fn test_terminal_phases_are_final() {
        let mut animation = state(100.0);
        animation.cancel();
        animation.transition(AnimationPhase::Active);
        assert_eq!(animation.phase, AnimationPhase::Canceled);
        assert!(animation.complete().is_none());
    }
}
