//! Shared fixtures for the scenario tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use casement::config::SchedulerConfig;
use casement::{InMemoryHost, ManagedWindow, PhysicalRect, QueuedTaskRunner, TimerScheduler};

/// A simulated desktop with one animation clock driven by hand.
pub struct Desktop {
    pub host: Arc<InMemoryHost>,
    pub runner: Arc<QueuedTaskRunner>,
    pub scheduler: TimerScheduler,
}

impl Desktop {
    /// One 1920×1080 monitor at 96 DPI with a 40px taskbar.
    pub fn single_monitor() -> Self { Self::with_host(InMemoryHost::single_monitor()) }

    pub fn with_host(host: InMemoryHost) -> Self {
        Self::with_config(host, &SchedulerConfig::default())
    }

    pub fn with_config(host: InMemoryHost, config: &SchedulerConfig) -> Self {
        let runner = Arc::new(QueuedTaskRunner::new());
        let scheduler = TimerScheduler::new(runner.clone(), config);
        Self { host: Arc::new(host), runner, scheduler }
    }

    /// Creates a decorated window whose visible frame is `frame`.
    pub fn window(&self, frame: PhysicalRect) -> ManagedWindow {
        let handle = self.host.create_framed_window(frame);
        ManagedWindow::new(self.host.clone(), handle, self.scheduler.handle())
    }

    /// Delivers one synchronous clock tick.
    pub fn tick(&self, delta_ms: f64) { self.scheduler.handle().tick_now(delta_ms); }
}

/// Counts how many times completion callbacks ran.
#[derive(Clone, Default)]
pub struct CallCounter(Arc<AtomicUsize>);

impl CallCounter {
    pub fn callback(&self) -> impl FnOnce() + Send + 'static {
        let count = self.0.clone();
        move || {
            count.fetch_add(1, Ordering::SeqCst);
        }
    }

    pub fn count(&self) -> usize { self.0.load(Ordering::SeqCst) }
}
