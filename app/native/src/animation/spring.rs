//! Spring physics for physically-based easing.
//!
//! Closed-form solution of the damped harmonic oscillator released from rest
//! at 0 towards a target of 1:
//! ```text
//! x''(t) + 2ζω x'(t) + ω² x(t) = ω²,   ω = √k
//! ```
//! `t` is the animation's normalized time, so one unit of `t` is the whole
//! animation duration.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

// ============================================================================
// Constants
// ============================================================================

pub const MIN_DAMPING_RATIO: f64 = 0.1;
pub const MAX_DAMPING_RATIO: f64 = 2.0;
pub const MIN_STIFFNESS: f64 = 10.0;
pub const MAX_STIFFNESS: f64 = 500.0;

pub const DEFAULT_DAMPING_RATIO: f64 = 0.7;
pub const DEFAULT_STIFFNESS: f64 = 100.0;

/// Damping ratios this close to 1.0 use the critically damped solution.
const CRITICAL_DAMPING_TOLERANCE: f64 = 1e-3;

// ============================================================================
// Spring Physics
// ============================================================================

/// Spring tuning. Always within the supported ranges once constructed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct SpringParams {
    /// Damping ratio ζ in `[0.1, 2.0]`. Below 1.0 the spring overshoots.
    pub damping_ratio: f64,
    /// Stiffness k in `[10, 500]`.
    pub stiffness: f64,
}

impl Default for SpringParams {
    fn default() -> Self {
        Self {
            damping_ratio: DEFAULT_DAMPING_RATIO,
            stiffness: DEFAULT_STIFFNESS,
        }
    }
}

impl SpringParams {
    /// Creates spring parameters, clamping both values to their ranges.
    ///
    /// Non-finite values fall back to the defaults.
    #[must_use]
    pub fn new(damping_ratio: f64, stiffness: f64) -> Self {
        let damping_ratio = if damping_ratio.is_finite() {
            damping_ratio.clamp(MIN_DAMPING_RATIO, MAX_DAMPING_RATIO)
        } else {
            DEFAULT_DAMPING_RATIO
        };
        let stiffness = if stiffness.is_finite() {
            stiffness.clamp(MIN_STIFFNESS, MAX_STIFFNESS)
        } else {
            DEFAULT_STIFFNESS
        };
        Self { damping_ratio, stiffness }
    }

    /// Re-clamps parameters that may have been deserialized out of range.
    #[must_use]
    pub fn clamped(self) -> Self { Self::new(self.damping_ratio, self.stiffness) }

    /// Natural angular frequency ω = √k.
    #[must_use]
    pub fn omega(&self) -> f64 { self.stiffness.sqrt() }

    /// Calculates the spring position at normalized time `t`.
    #[must_use]
    pub fn position(&self, t: f64) -> f64 {
        let omega = self.omega();
        let zeta = self.damping_ratio;

        if (zeta - 1.0).abs() < CRITICAL_DAMPING_TOLERANCE {
            critically_damped_position(t, omega)
        } else if zeta < 1.0 {
            underdamped_position(t, omega, zeta)
        } else {
            overdamped_position(t, omega, zeta)
        }
    }
}

/// Position for an underdamped spring (ζ < 1).
#[inline]
#[must_use]
pub fn underdamped_position(t: f64, omega: f64, zeta: f64) -> f64 {
    let omega_d = omega * zeta.mul_add(-zeta, 1.0).sqrt();
    let decay = (-zeta * omega * t).exp();
    let cos_term = (omega_d * t).cos();
    let sin_term = (zeta * omega / omega_d) * (omega_d * t).sin();

    decay.mul_add(-(cos_term + sin_term), 1.0)
}

/// Position for a critically damped spring (ζ = 1).
#[inline]
#[must_use]
pub fn critically_damped_position(t: f64, omega: f64) -> f64 {
    let decay = (-omega * t).exp();
    decay.mul_add(-omega.mul_add(t, 1.0), 1.0)
}

/// Position for an overdamped spring (ζ > 1).
#[inline]
#[must_use]
pub fn overdamped_position(t: f64, omega: f64, zeta: f64) -> f64 {
    let root = zeta.mul_add(zeta, -1.0).sqrt();
    let s1 = -omega * (zeta - root);
    let s2 = -omega * (zeta + root);

    1.0 - s2.mul_add((s1 * t).exp(), -(s1 * (s2 * t).exp())) / (s2 - s1)
}

// ============================================================================
// Tests
// ============================================================================
