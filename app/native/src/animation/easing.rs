//! Easing functions for time-based animations.
//!
//! Every curve maps normalized time `t ∈ [0, 1]` to normalized progress.
//! [`ease`] is the public entry point and always lands in `[0, 1]`;
//! [`ease_raw`] keeps the overshoot of the `Overshoot` and `SpringBounce`
//! curves for geometric animations that are meant to swing past the target.

use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::spring::SpringParams;

/// Overshoot curve constant.
pub const OVERSHOOT_C1: f64 = 1.701_58;
/// `OVERSHOOT_C1 + 1`.
pub const OVERSHOOT_C3: f64 = OVERSHOOT_C1 + 1.0;

/// Easing curve of an animation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum EasingType {
    /// Constant speed.
    Linear,
    /// Quadratic, slow start.
    EaseIn,
    /// Quadratic, slow end.
    #[default]
    EaseOut,
    /// Quadratic, slow start and end.
    EaseInOut,
    /// Cubic back-out: passes the target, then settles on it.
    Overshoot,
    /// Damped harmonic oscillator.
    SpringBounce,
}

impl EasingType {
    pub const ALL: [Self; 6] = [
        Self::Linear,
        Self::EaseIn,
        Self::EaseOut,
        Self::EaseInOut,
        Self::Overshoot,
        Self::SpringBounce,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::EaseIn => "ease-in",
            Self::EaseOut => "ease-out",
            Self::EaseInOut => "ease-in-out",
            Self::Overshoot => "overshoot",
            Self::SpringBounce => "spring-bounce",
        }
    }

    /// Whether the raw curve may leave `[0, 1]`.
    #[must_use]
    pub const fn can_overshoot(self) -> bool { matches!(self, Self::Overshoot | Self::SpringBounce) }
}

impl fmt::Display for EasingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

/// Error returned when parsing an unknown easing name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown easing '{0}'")]
pub struct ParseEasingError(String);

impl FromStr for EasingType {
    type Err = ParseEasingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|easing| easing.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseEasingError(s.to_string()))
    }
}

// ============================================================================
// Easing Functions
// ============================================================================

/// Linear interpolation between two values.
#[inline]
#[must_use]
pub fn lerp(start: f64, end: f64, t: f64) -> f64 { (end - start).mul_add(t, start) }

/// Linear easing (no acceleration).
#[inline]
#[must_use]
pub const fn ease_linear(t: f64) -> f64 { t }

/// Ease-in (slow start, accelerates).
#[inline]
#[must_use]
pub fn ease_in(t: f64) -> f64 { t * t }

/// Ease-out (fast start, decelerates).
#[inline]
#[must_use]
pub fn ease_out(t: f64) -> f64 {
    let inv = 1.0 - t;
    inv.mul_add(-inv, 1.0)
}

/// Ease-in-out (slow start and end).
#[inline]
#[must_use]
pub fn ease_in_out(t: f64) -> f64 {
    if t < 0.5 {
        2.0 * t * t
    } else {
        let t1 = (-2.0f64).mul_add(t, 2.0);
        (t1 * t1).mul_add(-0.5, 1.0)
    }
}

/// Cubic overshoot (back-out).
#[inline]
#[must_use]
pub fn ease_overshoot(t: f64) -> f64 {
    let t1 = t - 1.0;
    let t1_sq = t1 * t1;
    (OVERSHOOT_C3 * t1).mul_add(t1_sq, OVERSHOOT_C1.mul_add(t1_sq, 1.0))
}

/// Applies an easing curve without any range handling.
#[inline]
#[must_use]
pub fn apply_easing(t: f64, easing: EasingType, spring: &SpringParams) -> f64 {
    match easing {
        EasingType::Linear => ease_linear(t),
        EasingType::EaseIn => ease_in(t),
        EasingType::EaseOut => ease_out(t),
        EasingType::EaseInOut => ease_in_out(t),
        EasingType::Overshoot => ease_overshoot(t),
        EasingType::SpringBounce => spring.position(t),
    }
}

/// Evaluates a curve at `t`, clamping `t` into `[0, 1]` first.
///
/// Returns exactly 0 at `t <= 0` and exactly 1 at `t >= 1` for every curve,
/// including a spring that has not settled by the end of the animation. The
/// result between the ends may leave `[0, 1]` for overshooting curves.
#[must_use]
pub fn ease_raw(t: f64, easing: EasingType, spring: &SpringParams) -> f64 {
    if t.is_nan() || t <= 0.0 {
        return 0.0;
    }
    if t >= 1.0 {
        return 1.0;
    }

    let value = apply_easing(t, easing, spring);
    if value.is_finite() { value } else { t }
}

/// Evaluates a curve at `t` and clamps the result into `[0, 1]`.
#[must_use]
pub fn ease(t: f64, easing: EasingType, spring: &SpringParams) -> f64 {
    ease_raw(t, easing, spring).clamp(0.0, 1.0)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use rand::Rng;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::animation::spring::{
        MAX_DAMPING_RATIO, MAX_STIFFNESS, MIN_DAMPING_RATIO, MIN_STIFFNESS,
    };

    #[test]
    fn test_lerp() {
        assert!((lerp(0.0, 100.0, 0.0) - 0.0).abs() < f64::EPSILON);
        assert!((lerp(0.0, 100.0, 0.5) - 50.0).abs() < f64::EPSILON);
        assert!((lerp(0.0, 100.0, 1.0) - 100.0).abs() < f64::EPSILON);
        assert!((lerp(50.0, 150.0, 0.25) - 75.0).abs() < f64::EPSILON);
        assert!((lerp(100.0, 0.0, 0.75) - 25.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_quadratic_curves() {
        assert!((ease_in(0.5) - 0.25).abs() < f64::EPSILON);
        assert!((ease_out(0.5) - 0.75).abs() < f64::EPSILON);
        assert!((ease_in_out(0.25) - 0.125).abs() < f64::EPSILON);
        assert!((ease_in_out(0.5) - 0.5).abs() < f64::EPSILON);
        assert!((ease_in_out(0.75) - 0.875).abs() < f64::EPSILON);
    }

    #[test]
    fn test_overshoot_passes_target() {
        assert!(ease_overshoot(0.0).abs() < 1e-12);
        assert!((ease_overshoot(1.0) - 1.0).abs() < f64::EPSILON);
        assert!(ease_overshoot(0.7) > 1.0);
    }

    #[test]
    fn test_boundaries_are_exact_for_every_curve() {
        let spring = SpringParams::new(0.1, 10.0);
        for easing in EasingType::ALL {
            assert!(ease(0.0, easing, &spring).abs() < f64::EPSILON, "{easing}");
            assert!((ease(1.0, easing, &spring) - 1.0).abs() < f64::EPSILON, "{easing}");
            assert!((ease_raw(1.0, easing, &spring) - 1.0).abs() < f64::EPSILON, "{easing}");
        }
    }

    #[test]
    fn test_out_of_range_time_is_clamped() {
        let spring = SpringParams::default();
        for easing in EasingType::ALL {
            assert!(ease(-3.0, easing, &spring).abs() < f64::EPSILON);
            assert!((ease(7.5, easing, &spring) - 1.0).abs() < f64::EPSILON);
            assert!(ease(f64::NAN, easing, &spring).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn test_ease_stays_in_unit_range_across_spring_ranges() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        for _ in 0..2_000 {
            let spring = SpringParams::new(
                rng.random_range(MIN_DAMPING_RATIO..=MAX_DAMPING_RATIO),
                rng.random_range(MIN_STIFFNESS..=MAX_STIFFNESS),
            );
            let t = rng.random_range(0.0..=1.0);
            for easing in EasingType::ALL {
                let value = ease(t, easing, &spring);
                assert!(value.is_finite());
                assert!((0.0..=1.0).contains(&value), "{easing} at {t}: {value}");
            }
        }
    }

    #[test]
    fn test_raw_spring_keeps_overshoot() {
        let spring = SpringParams::new(0.7, 100.0);
        let raw = ease_raw(0.44, EasingType::SpringBounce, &spring);
        assert!(raw > 1.0);
        assert!((ease(0.44, EasingType::SpringBounce, &spring) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_easing_type_parse_and_display() {
        for easing in EasingType::ALL {
            assert_eq!(easing.to_string().parse::<EasingType>(), Ok(easing));
        }
        assert_eq!("Spring-Bounce".parse::<EasingType>(), Ok(EasingType::SpringBounce));
        assert!("bouncy".parse::<EasingType>().is_err());
        assert_eq!(EasingType::default(), EasingType::EaseOut);
    }

    #[test]
    fn test_easing_type_serde_names() {
        let json = serde_json::to_string(&EasingType::EaseInOut).unwrap();
        assert_eq!(json, "\"ease-in-out\"");
        let parsed: EasingType = serde_json::from_str("\"spring-bounce\"").unwrap();
        assert_eq!(parsed, EasingType::SpringBounce);
    }
}
