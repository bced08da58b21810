//! Shared types for CLI commands.

use std::str::FromStr;

use crate::animation::{AnimationProperty, AnimationValue, EasingType};
use crate::error::CasementError;
use crate::geometry::{Point, Rect, Size};

/// Easing curve selectable from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum EasingArg {
    Linear,
    EaseIn,
    EaseOut,
    EaseInOut,
    Overshoot,
    SpringBounce,
}

impl From<EasingArg> for EasingType {
    fn from(arg: EasingArg) -> Self {
        match arg {
            EasingArg::Linear => Self::Linear,
            EasingArg::EaseIn => Self::EaseIn,
            EasingArg::EaseOut => Self::EaseOut,
            EasingArg::EaseInOut => Self::EaseInOut,
            EasingArg::Overshoot => Self::Overshoot,
            EasingArg::SpringBounce => Self::SpringBounce,
        }
    }
}

/// Animatable window property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum PropertyArg {
    Position,
    Size,
    Bounds,
    Opacity,
}

impl From<PropertyArg> for AnimationProperty {
    fn from(arg: PropertyArg) -> Self {
        match arg {
            PropertyArg::Position => Self::Position,
            PropertyArg::Size => Self::Size,
            PropertyArg::Bounds => Self::Bounds,
            PropertyArg::Opacity => Self::Opacity,
        }
    }
}

impl PropertyArg {
    /// Number of values a target of this property takes.
    #[must_use]
    pub const fn arity(self) -> usize {
        match self {
            Self::Position | Self::Size => 2,
            Self::Bounds => 4,
            Self::Opacity => 1,
        }
    }

    /// Builds the animation target from parsed values.
    ///
    /// # Errors
    ///
    /// Returns an error if the number of values does not match the property.
    pub fn target(self, values: &ValueList) -> Result<AnimationValue, CasementError> {
        let v = values.as_slice();
        if v.len() != self.arity() {
            return Err(CasementError::InvalidArguments(format!(
                "expected {} values for {}, got {}",
                self.arity(),
                AnimationProperty::from(self),
                v.len()
            )));
        }

        Ok(match self {
            Self::Position => AnimationValue::Position(Point::new(v[0], v[1])),
            Self::Size => AnimationValue::Size(Size::new(v[0], v[1])),
            Self::Bounds => AnimationValue::Bounds(Rect::new(v[0], v[1], v[2], v[3])),
            Self::Opacity => AnimationValue::opacity(v[0]),
        })
    }
}

/// Comma-separated list of numbers, e.g. `100,50` or `0.5`.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueList(Vec<f64>);

impl ValueList {
    #[must_use]
    pub fn as_slice(&self) -> &[f64] { &self.0 }
}

impl FromStr for ValueList {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.split(',')
            .map(|part| {
                let part = part.trim();
                part.parse::<f64>()
                    .ok()
                    .filter(|value| value.is_finite())
                    .ok_or_else(|| format!("Invalid number '{part}'. Expected a comma-separated list of numbers."))
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }
}
