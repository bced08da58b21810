//! The process-wide animation clock shared by every window.
//!
//! A [`TimerScheduler`] owns one background clock thread. Each period the
//! thread measures the frame delta and, when anything is registered, posts a
//! task to the UI thread through a [`TaskRunner`]; that task delivers the
//! delta to every registered [`TickConsumer`]. No new task is posted while the
//! previous one is still queued. The clock thread never touches window or
//! animation state itself.
//!
//! Registrations are kept in a mutex-guarded map. The clock thread iterates an
//! immutable snapshot of it, rebuilt only after a registration changed.

mod clock;
mod runner;

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Weak};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

pub use clock::{DeltaClock, clamp_delta};
use parking_lot::{Mutex, RwLock};
pub use runner::{QueuedTaskRunner, Task, TaskRunner};

use crate::config::{SchedulerConfig, get_config};
use crate::utils::thread::spawn_named_thread;

/// Name of the clock thread, after the crate prefix.
const CLOCK_THREAD_NAME: &str = "animation-clock";

// ============================================================================
// Consumers
// ============================================================================

/// Something that advances its animations when the shared clock ticks.
pub trait TickConsumer: Send + Sync {
    /// Called on the UI thread with the clamped time since the previous tick.
    fn on_animation_tick(&self, delta_ms: f64);
}

/// Registration key of a consumer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ConsumerId(u64);

impl ConsumerId {
    /// Allocates a process-unique id.
    #[must_use]
    pub fn next() -> Self {
        static NEXT_ID: AtomicU64 = AtomicU64::new(1);
        Self(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

type ConsumerList = Arc<[Weak<dyn TickConsumer>]>;

#[derive(Default)]
struct Registry {
    consumers: Mutex<BTreeMap<ConsumerId, Weak<dyn TickConsumer>>>,
    count: AtomicUsize,
    dirty: AtomicBool,
    snapshot: RwLock<Option<ConsumerList>>,
}

impl Registry {
    fn register(&self, id: ConsumerId, consumer: Weak<dyn TickConsumer>) -> bool {
        let mut consumers = self.consumers.lock();
        let added = consumers.insert(id, consumer).is_none();
        self.count.store(consumers.len(), Ordering::Release);
        self.dirty.store(true, Ordering::Release);
        added
    }

    fn unregister(&self, id: ConsumerId) -> bool {
        let mut consumers = self.consumers.lock();
        let removed = consumers.remove(&id).is_some();
        if removed {
            self.count.store(consumers.len(), Ordering::Release);
            self.dirty.store(true, Ordering::Release);
        }
        removed
    }

    /// Stable copy of the consumer set, rebuilt only after a change.
    fn snapshot(&self) -> ConsumerList {
        if self.dirty.swap(false, Ordering::AcqRel) {
            let list: ConsumerList = self.consumers.lock().values().cloned().collect();
            *self.snapshot.write() = Some(Arc::clone(&list));
            return list;
        }
        if let Some(list) = self.snapshot.read().as_ref() {
            return Arc::clone(list);
        }
        let list: ConsumerList = self.consumers.lock().values().cloned().collect();
        *self.snapshot.write() = Some(Arc::clone(&list));
        list
    }
}

fn deliver(consumers: &[Weak<dyn TickConsumer>], delta_ms: f64) {
    for consumer in consumers.iter().filter_map(Weak::upgrade) {
        consumer.on_animation_tick(delta_ms);
    }
}

// ============================================================================
// Handle
// ============================================================================

/// Cheap, cloneable access to a scheduler's registrations.
#[derive(Clone)]
pub struct SchedulerHandle {
    registry: Arc<Registry>,
}

impl std::fmt::Debug for SchedulerHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchedulerHandle").field("consumers", &self.consumer_count()).finish()
    }
}

impl SchedulerHandle {
    /// Registers a consumer. Registering the same id again is a no-op.
    pub fn register(&self, id: ConsumerId, consumer: Weak<dyn TickConsumer>) -> bool {
        let added = self.registry.register(id, consumer);
        if added {
            tracing::trace!(consumer = id.0, "tick consumer registered");
        }
        added
    }

    /// Unregisters a consumer. Unknown ids are ignored.
    pub fn unregister(&self, id: ConsumerId) -> bool {
        let removed = self.registry.unregister(id);
        if removed {
            tracing::trace!(consumer = id.0, "tick consumer unregistered");
        }
        removed
    }

    #[must_use]
    pub fn consumer_count(&self) -> usize { self.registry.count.load(Ordering::Acquire) }

    /// Delivers one tick synchronously on the calling thread.
    ///
    /// Lets a UI thread drive animations from its own frame source.
    pub fn tick_now(&self, delta_ms: f64) {
        if self.consumer_count() > 0 {
            deliver(&self.registry.snapshot(), delta_ms);
        }
    }
}

// ============================================================================
// Scheduler
// ============================================================================

struct ClockThread {
    running: Arc<AtomicBool>,
    handle: JoinHandle<()>,
}

/// One shared periodic clock with an explicit start/stop lifecycle.
pub struct TimerScheduler {
    handle: SchedulerHandle,
    runner: Arc<dyn TaskRunner>,
    config: SchedulerConfig,
    clock: Mutex<Option<ClockThread>>,
}

impl std::fmt::Debug for TimerScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimerScheduler")
            .field("config", &self.config)
            .field("running", &self.is_running())
            .field("consumers", &self.handle.consumer_count())
            .finish_non_exhaustive()
    }
}

impl TimerScheduler {
    /// Creates a stopped scheduler that posts ticks through `runner`.
    #[must_use]
    pub fn new(runner: Arc<dyn TaskRunner>, config: &SchedulerConfig) -> Self {
        Self {
            handle: SchedulerHandle { registry: Arc::new(Registry::default()) },
            runner,
            config: config.clone(),
            clock: Mutex::new(None),
        }
    }

    /// Creates a stopped scheduler using the loaded configuration.
    #[must_use]
    pub fn from_config(runner: Arc<dyn TaskRunner>) -> Self {
        Self::new(runner, &get_config().scheduler)
    }

    #[must_use]
    pub fn handle(&self) -> SchedulerHandle { self.handle.clone() }

    #[must_use]
    pub const fn config(&self) -> &SchedulerConfig { &self.config }

    #[must_use]
    pub fn is_running(&self) -> bool { self.clock.lock().is_some() }

    /// Starts the clock thread. Does nothing if it is already running.
    pub fn start(&self) -> bool {
        let mut clock = self.clock.lock();
        if clock.is_some() {
            return false;
        }

        let running = Arc::new(AtomicBool::new(true));
        let period = Duration::from_millis(u64::from(self.config.period_ms.max(1)));
        let mut delta_clock = DeltaClock::new(&self.config);
        delta_clock.reset(Instant::now());

        let registry = Arc::clone(&self.handle.registry);
        let runner = Arc::clone(&self.runner);
        let flag = Arc::clone(&running);
        let in_flight = Arc::new(AtomicBool::new(false));

        let Some(handle) = spawn_named_thread(CLOCK_THREAD_NAME, move || {
            while flag.load(Ordering::Acquire) {
                thread::park_timeout(period);
                if !flag.load(Ordering::Acquire) {
                    break;
                }

                // At most one tick waits on the UI thread. The clock is not
                // sampled meanwhile, so the next delta spans the whole stall.
                if in_flight.load(Ordering::Acquire) {
                    continue;
                }

                let delta_ms = delta_clock.tick();
                if registry.count.load(Ordering::Acquire) == 0 {
                    continue;
                }
                let consumers = registry.snapshot();
                let delivered = Arc::clone(&in_flight);
                in_flight.store(true, Ordering::Release);
                runner.post(Box::new(move || {
                    delivered.store(false, Ordering::Release);
                    deliver(&consumers, delta_ms);
                }));
            }
        }) else {
            return false;
        };

        tracing::debug!(period_ms = self.config.period_ms, "animation clock started");
        *clock = Some(ClockThread { running, handle });
        true
    }

    /// Stops the clock thread and waits for it. Does nothing if it is stopped.
    pub fn stop(&self) -> bool {
        let Some(clock) = self.clock.lock().take() else {
            return false;
        };
        clock.running.store(false, Ordering::Release);
        clock.handle.thread().unpark();
        if clock.handle.join().is_err() {
            tracing::warn!("animation clock thread panicked");
        }
        tracing::debug!("animation clock stopped");
        true
    }
}

impl Drop for TimerScheduler {
    fn drop(&mut self) { self.stop(); }
}
