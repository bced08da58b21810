//! Frame delta measurement for the shared animation clock.

use std::time::Instant;

use crate::config::SchedulerConfig;

/// Measures the time between consecutive ticks.
///
/// Deltas larger than the configured maximum (system sleep, a debugger
/// pause) are reported as one nominal frame instead.
#[derive(Debug, Clone)]
pub struct DeltaClock {
    last: Option<Instant>,
    max_delta_ms: f64,
    nominal_frame_ms: f64,
}

impl DeltaClock {
    #[must_use]
    pub fn new(config: &SchedulerConfig) -> Self {
        Self {
            last: None,
            max_delta_ms: f64::from(config.max_delta_ms),
            nominal_frame_ms: f64::from(config.nominal_frame_ms),
        }
    }

    /// Sets the reference point the next delta is measured from.
    pub fn reset(&mut self, now: Instant) { self.last = Some(now); }

    /// Delta since the previous tick, in milliseconds.
    pub fn tick(&mut self) -> f64 { self.tick_at(Instant::now()) }

    /// Delta between the previous tick and `now`, in milliseconds.
    ///
    /// The first tick after construction reports one nominal frame.
    pub fn tick_at(&mut self, now: Instant) -> f64 {
        let raw = self
            .last
            .map_or(self.nominal_frame_ms, |last| now.saturating_duration_since(last).as_secs_f64() * 1_000.0);
        self.last = Some(now);
        clamp_delta(raw, self.max_delta_ms, self.nominal_frame_ms)
    }
}

/// Replaces anomalous deltas with the nominal frame delta.
#[must_use]
pub fn clamp_delta(delta_ms: f64, max_delta_ms: f64, nominal_frame_ms: f64) -> f64 {
    if delta_ms.is_finite() && (0.0..=max_delta_ms).contains(&delta_ms) {
        delta_ms
    } else {
        tracing::debug!(delta_ms, nominal_frame_ms, "clock delta out of range, using nominal frame");
        nominal_frame_ms
    }
}
