//! The set of in-flight property animations and their per-tick evaluation.
//!
//! Animations live in an arena keyed by [`AnimationId`]. A tick walks a
//! snapshot of the ids taken when the tick begins, so records removed while
//! the tick runs are skipped instead of invalidating the walk.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use smallvec::SmallVec;

use super::state::{AnimationId, AnimationPhase, AnimationRequest, AnimationState, CompletionCallback};
use super::value::{AnimationProperty, AnimationTrack, AnimationValue, apply_value};
use crate::geometry::FrameMetrics;
use crate::host::{self, WindowHandle, WindowHost};

/// Opacity a window is assumed to have before anything sets it.
const FULLY_OPAQUE: f64 = 1.0;

/// Owns every active animation for the windows of one host.
pub struct AnimationEngine {
    host: Arc<dyn WindowHost>,
    animations: BTreeMap<AnimationId, AnimationState>,
    opacity: BTreeMap<WindowHandle, f64>,
    translucent: BTreeSet<WindowHandle>,
}

impl std::fmt::Debug for AnimationEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnimationEngine")
            .field("animations", &self.animations)
            .field("opacity", &self.opacity)
            .finish_non_exhaustive()
    }
}

impl AnimationEngine {
    #[must_use]
    pub fn new(host: Arc<dyn WindowHost>) -> Self {
        Self {
            host,
            animations: BTreeMap::new(),
            opacity: BTreeMap::new(),
            translucent: BTreeSet::new(),
        }
    }

    #[must_use]
    pub fn is_idle(&self) -> bool { self.animations.is_empty() }

    #[must_use]
    pub fn len(&self) -> usize { self.animations.len() }

    #[must_use]
    pub fn is_empty(&self) -> bool { self.animations.is_empty() }

    #[must_use]
    pub fn is_active(&self, id: AnimationId) -> bool { self.animations.contains_key(&id) }

    #[must_use]
    pub fn state(&self, id: AnimationId) -> Option<&AnimationState> { self.animations.get(&id) }

    /// Last opacity written to a window, 1.0 if none was.
    #[must_use]
    pub fn opacity(&self, window: WindowHandle) -> f64 {
        self.opacity.get(&window).copied().unwrap_or(FULLY_OPAQUE)
    }

    /// Starts animating one property of `window`.
    ///
    /// Returns `AnimationId::NONE` without side effects when the window is not
    /// live. Conflicting animations on the same window are canceled without
    /// their callbacks, and the start value is read from the live window.
    pub fn start(&mut self, window: WindowHandle, request: AnimationRequest) -> AnimationId {
        let host = Arc::clone(&self.host);
        if !host.is_window(window) {
            tracing::trace!(window = %window, "animation target is not a live window");
            return AnimationId::NONE;
        }

        let property = request.target.property();
        self.cancel_conflicting(window, property);

        let metrics = host::frame_metrics(host.as_ref(), window);
        let Some(current) = self.read_live(window, property, &metrics) else {
            tracing::trace!(window = %window, "window rect unavailable, animation not started");
            return AnimationId::NONE;
        };
        let Some(track) = AnimationTrack::between(current, request.target) else {
            return AnimationId::NONE;
        };

        if property == AnimationProperty::Opacity {
            self.ensure_translucent(window);
        }

        let mut state = AnimationState::new(window, track, request, metrics);
        state.transition(AnimationPhase::Active);
        let id = state.id;

        tracing::debug!(
            animation = %id,
            window = %window,
            property = %property,
            easing = %state.easing,
            duration_ms = state.duration_ms,
            "animation started"
        );

        self.animations.insert(id, state);
        id
    }

    /// Advances every animation by `delta_ms` and applies the new values.
    ///
    /// Returns the completion callbacks of the animations that finished; the
    /// caller runs them once it no longer holds the engine.
    pub fn tick(&mut self, delta_ms: f64) -> Vec<CompletionCallback> {
        let ids: SmallVec<[AnimationId; 8]> = self.animations.keys().copied().collect();
        let mut completed = Vec::new();

        for id in ids {
            let Some(state) = self.animations.get_mut(&id) else {
                continue;
            };
            let window = state.window;

            if !self.host.is_window(window) {
                self.cancel_window(window);
                continue;
            }

            state.elapsed_ms += delta_ms.max(0.0);
            let progress = state.progress();

            if progress >= 1.0 {
                let target = state.track.target();
                let metrics = state.metrics;
                let callback = state.complete();
                self.animations.remove(&id);
                self.write(window, &target, &metrics);
                tracing::debug!(animation = %id, window = %window, "animation completed");
                completed.extend(callback);
            } else {
                let value = state.track.sample(progress, state.easing, &state.spring);
                let metrics = state.metrics;
                self.write(window, &value, &metrics);
            }
        }

        completed
    }

    /// Cancels one animation. Its callback is dropped.
    pub fn stop(&mut self, id: AnimationId) -> bool {
        let Some(mut state) = self.animations.remove(&id) else {
            return false;
        };
        state.cancel();
        tracing::debug!(animation = %id, window = %state.window, "animation canceled");
        true
    }

    /// Cancels every animation. No callbacks run.
    pub fn stop_all(&mut self) -> usize {
        let count = self.animations.len();
        for (id, mut state) in std::mem::take(&mut self.animations) {
            state.cancel();
            tracing::debug!(animation = %id, window = %state.window, "animation canceled");
        }
        count
    }

    /// Cancels every animation on `window` that writes attributes `property` writes.
    pub fn cancel_conflicting(&mut self, window: WindowHandle, property: AnimationProperty) -> usize {
        self.cancel_where(|state| {
            state.window == window && state.track.property().conflicts_with(property)
        })
    }

    /// Sets opacity immediately, canceling any opacity animation on the window.
    pub fn set_opacity(&mut self, window: WindowHandle, opacity: f64) {
        if !self.host.is_window(window) {
            tracing::trace!(window = %window, "opacity target is not a live window");
            return;
        }
        self.cancel_conflicting(window, AnimationProperty::Opacity);
        self.ensure_translucent(window);
        self.write(window, &AnimationValue::opacity(opacity), &FrameMetrics::identity());
    }

    /// Cancels everything on a window that went away and forgets it.
    fn cancel_window(&mut self, window: WindowHandle) {
        let canceled = self.cancel_where(|state| state.window == window);
        self.opacity.remove(&window);
        self.translucent.remove(&window);
        tracing::debug!(window = %window, canceled, "window destroyed during animation");
    }

    fn cancel_where<F>(&mut self, mut predicate: F) -> usize
    where F: FnMut(&AnimationState) -> bool {
        let ids: SmallVec<[AnimationId; 4]> = self
            .animations
            .values()
            .filter(|state| predicate(*state))
            .map(|state| state.id)
            .collect();
        ids.into_iter().filter(|id| self.stop(*id)).count()
    }

    fn read_live(
        &self,
        window: WindowHandle,
        property: AnimationProperty,
        metrics: &FrameMetrics,
    ) -> Option<AnimationValue> {
        if property == AnimationProperty::Opacity {
            return Some(AnimationValue::opacity(self.opacity(window)));
        }
        let window_rect = self.host.window_rect(window)?;
        let frame = metrics.frame_for_window_rect(&window_rect);
        Some(AnimationValue::read(property, &frame, self.opacity(window)))
    }

    fn ensure_translucent(&mut self, window: WindowHandle) {
        if self.translucent.insert(window) {
            self.host.enable_translucency(window);
        }
    }

    fn write(&mut self, window: WindowHandle, value: &AnimationValue, metrics: &FrameMetrics) {
        if let AnimationValue::Opacity { value } = value {
            self.opacity.insert(window, value.clamp(0.0, 1.0));
        }
        apply_value(self.host.as_ref(), window, value, metrics);
    }
}
