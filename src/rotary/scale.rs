//! Rotary scale — linear map between sweep angle and a bounded value.

use super::sweep::{self, Point};
use crate::params::ParamRange;

/// How a knob's value is rounded after mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quantize {
    /// Nearest whole number (color channels).
    Integer,
    /// One decimal place (speed, intensity).
    Tenths,
}

impl Quantize {
    pub fn apply(self, value: f64) -> f64 {
        match self {
            Quantize::Integer => value.round(),
            Quantize::Tenths => (value * 10.0).round() / 10.0,
        }
    }
}

/// Maps angles on the 270° sweep onto a `ParamRange`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotaryScale {
    pub range: ParamRange,
    pub quantize: Quantize,
}

impl RotaryScale {
    pub fn new(range: ParamRange, quantize: Quantize) -> Self {
        Self {
            range: range.normalized(),
            quantize,
        }
    }

    /// Unrounded value for an angle (normalized into the sweep first).
    pub fn raw_value(&self, angle_deg: f64) -> f64 {
        self.range.min + sweep::sweep_fraction(angle_deg) * self.range.span()
    }

    /// Rounded, clamped value for an angle.
    pub fn value_at_angle(&self, angle_deg: f64) -> f64 {
        self.range
            .clamp(self.quantize.apply(self.raw_value(angle_deg)))
    }

    /// Indicator angle for a value. Inverse of [`raw_value`](Self::raw_value).
    pub fn angle_for(&self, value: f64) -> f64 {
        sweep::angle_at_fraction(self.range.fraction_of(value))
    }

    /// Value for a pointer position around a knob centered at `center`.
    ///
    /// `None` when the pointer is on the center; callers keep the
    /// previous value in that case.
    pub fn value_at_pointer(&self, pointer: Point, center: Point) -> Option<f64> {
        sweep::pointer_angle(pointer, center).map(|angle| self.value_at_angle(angle))
    }
}
