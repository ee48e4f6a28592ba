//! Inclusive numeric ranges for bounded parameters.

use serde::{Deserialize, Serialize};

/// An inclusive `[min, max]` range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParamRange {
    pub min: f64,
    pub max: f64,
}

impl ParamRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Width of the range.
    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// Clamp a value into the range. NaN collapses to `min`.
    pub fn clamp(&self, value: f64) -> f64 {
        if value.is_nan() {
            return self.min;
        }
        value.clamp(self.min, self.max)
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Position of `value` inside the range as 0.0–1.0 (clamped).
    pub fn fraction_of(&self, value: f64) -> f64 {
        if self.span() <= 0.0 {
            return 0.0;
        }
        (self.clamp(value) - self.min) / self.span()
    }

    /// Swap the bounds if they were given in the wrong order.
    pub fn normalized(self) -> Self {
        if self.min <= self.max {
            self
        } else {
            Self::new(self.max, self.min)
        }
    }
}

/// Ranges that differ between the local and remote control surfaces.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParamLimits {
    pub speed: ParamRange,
    pub intensity: ParamRange,
}

impl ParamLimits {
    /// Speed 0.1–5.0, intensity 0.1–3.0.
    pub const fn local() -> Self {
        Self {
            speed: ParamRange::new(0.1, 5.0),
            intensity: ParamRange::new(0.1, 3.0),
        }
    }

    /// Speed and intensity both 0.1–10.0.
    pub const fn remote() -> Self {
        Self {
            speed: ParamRange::new(0.1, 10.0),
            intensity: ParamRange::new(0.1, 10.0),
        }
    }

    pub fn normalized(self) -> Self {
        Self {
            speed: self.speed.normalized(),
            intensity: self.intensity.normalized(),
        }
    }
}

impl Default for ParamLimits {
    fn default() -> Self {
        Self::local()
    }
}

/// Volume is always 0–100.
pub const VOLUME_RANGE: ParamRange = ParamRange::new(0.0, 100.0);

/// Each color channel is 0–255.
pub const CHANNEL_RANGE: ParamRange = ParamRange::new(0.0, 255.0);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_keeps_values_inside() {
        let range = ParamRange::new(0.1, 5.0);
        assert_eq!(range.clamp(-3.0), 0.1);
        assert_eq!(range.clamp(9.0), 5.0);
        assert_eq!(range.clamp(2.0), 2.0);
        assert_eq!(range.clamp(f64::NAN), 0.1);
    }

    #[test]
    fn fraction_of_endpoints() {
        let range = ParamRange::new(0.0, 100.0);
        assert_eq!(range.fraction_of(0.0), 0.0);
        assert_eq!(range.fraction_of(100.0), 1.0);
        assert_eq!(range.fraction_of(50.0), 0.5);
    }

    #[test]
    fn degenerate_range_fraction_is_zero() {
        let range = ParamRange::new(1.0, 1.0);
        assert_eq!(range.fraction_of(1.0), 0.0);
    }

    #[test]
    fn normalized_swaps_reversed_bounds() {
        let range = ParamRange::new(5.0, 0.1).normalized();
        assert_eq!(range, ParamRange::new(0.1, 5.0));
    }

    #[test]
    fn local_and_remote_profiles_differ() {
        assert_eq!(ParamLimits::local().speed.max, 5.0);
        assert_eq!(ParamLimits::local().intensity.max, 3.0);
        assert_eq!(ParamLimits::remote().speed.max, 10.0);
        assert_eq!(ParamLimits::remote().intensity.max, 10.0);
    }
}
