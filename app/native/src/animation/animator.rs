//! Binds one window's animations to the shared animation clock.

use std::sync::Arc;

use parking_lot::Mutex;

use super::engine::AnimationEngine;
use super::state::{AnimationId, AnimationRequest};
use super::value::AnimationProperty;
use crate::host::{WindowHandle, WindowHost};
use crate::scheduler::{ConsumerId, SchedulerHandle, TickConsumer};

struct AnimatorInner {
    id: ConsumerId,
    window: WindowHandle,
    engine: Mutex<AnimationEngine>,
    scheduler: SchedulerHandle,
}

impl AnimatorInner {
    fn unregister_if_idle(&self, engine: &AnimationEngine) {
        if engine.is_idle() {
            self.scheduler.unregister(self.id);
        }
    }
}

impl TickConsumer for AnimatorInner {
    fn on_animation_tick(&self, delta_ms: f64) {
        let callbacks = {
            let mut engine = self.engine.lock();
            let callbacks = engine.tick(delta_ms);
            self.unregister_if_idle(&engine);
            callbacks
        };

        // The engine lock is released, so callbacks may start new animations.
        for callback in callbacks {
            callback();
        }
    }
}

/// Runs property animations for one window.
///
/// Registers with the scheduler while it has animations in flight and
/// unregisters once the last one finishes or is canceled. Dropping the
/// animator cancels everything without running callbacks.
pub struct WindowAnimator {
    inner: Arc<AnimatorInner>,
}

impl std::fmt::Debug for WindowAnimator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WindowAnimator")
            .field("window", &self.inner.window)
            .field("active", &self.active_count())
            .finish()
    }
}

impl WindowAnimator {
    #[must_use]
    pub fn new(host: Arc<dyn WindowHost>, window: WindowHandle, scheduler: SchedulerHandle) -> Self {
        Self {
            inner: Arc::new(AnimatorInner {
                id: ConsumerId::next(),
                window,
                engine: Mutex::new(AnimationEngine::new(host)),
                scheduler,
            }),
        }
    }

    #[must_use]
    pub fn window(&self) -> WindowHandle { self.inner.window }

    /// Starts an animation and makes sure the clock ticks this window.
    ///
    /// Returns `AnimationId::NONE` if the window is not live.
    pub fn start(&self, request: AnimationRequest) -> AnimationId {
        let id = self.inner.engine.lock().start(self.inner.window, request);
        if !id.is_none() {
            let inner: Arc<dyn TickConsumer> = self.inner.clone();
            self.inner.scheduler.register(self.inner.id, Arc::downgrade(&inner));
        }
        id
    }

    /// Cancels one animation without running its callback.
    pub fn stop(&self, id: AnimationId) -> bool {
        let mut engine = self.inner.engine.lock();
        let stopped = engine.stop(id);
        self.inner.unregister_if_idle(&engine);
        stopped
    }

    /// Cancels every animation without running callbacks.
    pub fn stop_all(&self) -> usize {
        let mut engine = self.inner.engine.lock();
        let stopped = engine.stop_all();
        self.inner.unregister_if_idle(&engine);
        stopped
    }

    /// Cancels animations that write attributes `property` writes.
    pub fn cancel_conflicting(&self, property: AnimationProperty) -> usize {
        let mut engine = self.inner.engine.lock();
        let canceled = engine.cancel_conflicting(self.inner.window, property);
        self.inner.unregister_if_idle(&engine);
        canceled
    }

    /// Sets opacity immediately, canceling an opacity animation in flight.
    pub fn set_opacity(&self, opacity: f64) {
        let mut engine = self.inner.engine.lock();
        engine.set_opacity(self.inner.window, opacity);
        self.inner.unregister_if_idle(&engine);
    }

    #[must_use]
    pub fn opacity(&self) -> f64 { self.inner.engine.lock().opacity(self.inner.window) }

    #[must_use]
    pub fn is_animating(&self) -> bool { !self.inner.engine.lock().is_idle() }

    #[must_use]
    pub fn is_active(&self, id: AnimationId) -> bool { self.inner.engine.lock().is_active(id) }

    #[must_use]
    pub fn active_count(&self) -> usize { self.inner.engine.lock().len() }
}

impl Drop for WindowAnimator {
    fn drop(&mut self) {
        self.inner.engine.lock().stop_all();
        self.inner.scheduler.unregister(self.inner.id);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::animation::AnimationValue;
    use crate::config::SchedulerConfig;
    use crate::geometry::{PhysicalRect, Point};
    use crate::host::{InMemoryHost, WindowStyle};
    use crate::scheduler::{QueuedTaskRunner, TimerScheduler};

    fn setup() -> (Arc<InMemoryHost>, TimerScheduler, WindowAnimator) {
        let host = Arc::new(InMemoryHost::single_monitor());
        let window = host.create_window(PhysicalRect::new(0, 0, 200, 200), WindowStyle::default());
        let scheduler =
            TimerScheduler::new(Arc::new(QueuedTaskRunner::new()), &SchedulerConfig::default());
        let animator = WindowAnimator::new(host.clone(), window, scheduler.handle());
        (host, scheduler, animator)
    }

    #[test]
    fn test_registers_while_animating() {
        let (_host, scheduler, animator) = setup();
        let handle = scheduler.handle();
        assert_eq!(handle.consumer_count(), 0);

        animator.start(AnimationRequest::new(AnimationValue::opacity(0.0)).duration_ms(32.0));
        animator.start(AnimationRequest::new(AnimationValue::Position(Point::new(9.0, 9.0))));
        assert_eq!(handle.consumer_count(), 1);

        handle.tick_now(16.0);
        assert_eq!(handle.consumer_count(), 1);
        animator.stop_all();
        assert_eq!(handle.consumer_count(), 0);
    }

    #[test]
    fn test_unregisters_after_last_completion() {
        let (_host, scheduler, animator) = setup();
        let handle = scheduler.handle();
        animator.start(AnimationRequest::new(AnimationValue::opacity(0.0)).duration_ms(20.0));

        handle.tick_now(16.0);
        assert!(animator.is_animating());
        handle.tick_now(16.0);
        assert!(!animator.is_animating());
        assert_eq!(handle.consumer_count(), 0);
    }

    #[test]
    fn test_invalid_window_does_not_register() {
        let (host, scheduler, animator) = setup();
        host.destroy_window(animator.window());
        let id = animator.start(AnimationRequest::new(AnimationValue::opacity(0.0)));
        assert!(id.is_none());
        assert_eq!(scheduler.handle().consumer_count(), 0);
    }

    #[test]
    fn test_callback_can_chain_another_animation() {
        let (_host, scheduler, animator) = setup();
        let animator = Arc::new(animator);
        let handle = scheduler.handle();
        let chained = Arc::new(AtomicUsize::new(0));

        let weak = Arc::downgrade(&animator);
        let counter = Arc::clone(&chained);
        animator.start(AnimationRequest::new(AnimationValue::opacity(0.0)).duration_ms(0.0).on_complete(
            move || {
                if let Some(animator) = weak.upgrade() {
                    let id = animator.start(AnimationRequest::new(AnimationValue::opacity(1.0)));
                    if !id.is_none() {
                        counter.fetch_add(1, Ordering::SeqCst);
                    }
                }
            },
        ));

        handle.tick_now(16.0);
        assert_eq!(chained.load(Ordering::SeqCst), 1);
        assert!(animator.is_animating());
        assert_eq!(handle.consumer_count(), 1);
    }

    #[test]
    fn test_drop_cancels_and_unregisters() {
        let (_host, scheduler, animator) = setup();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        animator.start(AnimationRequest::new(AnimationValue::opacity(0.0)).on_complete(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        }));
        drop(animator);

        scheduler.handle().tick_now(1_000.0);
        assert_eq!(scheduler.handle().consumer_count(), 0);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }
}
