//! Parameter model — the bounded values the control surface edits.
//!
//! `ParameterSet` is the single mutable piece of state. Every setter clamps
//! into the declared range and reports what changed, so callers know when a
//! new snapshot has to be published.

pub mod channel;
pub mod effect;
pub mod range;

pub use channel::{ColorChannel, MusicCommand, Rgb};
pub use effect::{Effect, EffectCategory};
pub use range::{ParamLimits, ParamRange, CHANNEL_RANGE, VOLUME_RANGE};

use std::fmt;

use crate::rotary::{Point, Quantize, RotaryScale};

/// The four rotary controls on the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KnobId {
    Volume,
    Color,
    Speed,
    Intensity,
}

impl KnobId {
    /// Focus order for keyboard navigation.
    pub const ALL: [KnobId; 4] = [KnobId::Volume, KnobId::Color, KnobId::Speed, KnobId::Intensity];

    pub fn label(self) -> &'static str {
        match self {
            KnobId::Volume => "VOLUME",
            KnobId::Color => "RGB VALUE",
            KnobId::Speed => "SPEED",
            KnobId::Intensity => "INTENSITY",
        }
    }

    pub fn next(self) -> Self {
        match self {
            KnobId::Volume => KnobId::Color,
            KnobId::Color => KnobId::Speed,
            KnobId::Speed => KnobId::Intensity,
            KnobId::Intensity => KnobId::Volume,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            KnobId::Volume => KnobId::Intensity,
            KnobId::Color => KnobId::Volume,
            KnobId::Speed => KnobId::Color,
            KnobId::Intensity => KnobId::Speed,
        }
    }
}

/// Description of an accepted mutation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParamChange {
    Effect(Effect),
    ActiveChannel(ColorChannel),
    Channel(ColorChannel, u8),
    Speed(f64),
    Intensity(f64),
    Volume(f64),
}

impl fmt::Display for ParamChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamChange::Effect(e) => write!(f, "effect {e}"),
            ParamChange::ActiveChannel(c) => write!(f, "channel {c} selected"),
            ParamChange::Channel(c, v) => write!(f, "{c} = {v}"),
            ParamChange::Speed(v) => write!(f, "speed = {v:.1}"),
            ParamChange::Intensity(v) => write!(f, "intensity = {v:.1}"),
            ParamChange::Volume(v) => write!(f, "volume = {v:.0}"),
        }
    }
}

/// The full set of visualizer parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterSet {
    effect: Effect,
    color: Rgb,
    active_channel: ColorChannel,
    speed: f64,
    intensity: f64,
    volume: f64,
    limits: ParamLimits,
}

impl ParameterSet {
    /// Defaults: effect 1, white, red channel active, speed and intensity 1.0, volume 50.
    pub fn new(limits: ParamLimits) -> Self {
        let limits = limits.normalized();
        Self {
            effect: Effect::default(),
            color: Rgb::WHITE,
            active_channel: ColorChannel::Red,
            speed: limits.speed.clamp(1.0),
            intensity: limits.intensity.clamp(1.0),
            volume: 50.0,
            limits,
        }
    }

    pub fn effect(&self) -> Effect {
        self.effect
    }

    pub fn color(&self) -> Rgb {
        self.color
    }

    pub fn active_channel(&self) -> ColorChannel {
        self.active_channel
    }

    pub fn is_channel_active(&self, channel: ColorChannel) -> bool {
        self.active_channel == channel
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn intensity(&self) -> f64 {
        self.intensity
    }

    pub fn volume(&self) -> f64 {
        self.volume
    }

    pub fn limits(&self) -> ParamLimits {
        self.limits
    }

    pub fn set_effect(&mut self, effect: Effect) -> Option<ParamChange> {
        if self.effect == effect {
            return None;
        }
        self.effect = effect;
        Some(ParamChange::Effect(effect))
    }

    /// Make `channel` the one edited by the RGB knob.
    pub fn select_channel(&mut self, channel: ColorChannel) -> Option<ParamChange> {
        if self.active_channel == channel {
            return None;
        }
        self.active_channel = channel;
        Some(ParamChange::ActiveChannel(channel))
    }

    pub fn set_channel_value(&mut self, channel: ColorChannel, value: u8) -> Option<ParamChange> {
        if self.color.get(channel) == value {
            return None;
        }
        self.color.set(channel, value);
        Some(ParamChange::Channel(channel, value))
    }

    pub fn set_speed(&mut self, value: f64) -> Option<ParamChange> {
        let value = self.limits.speed.clamp(Quantize::Tenths.apply(value));
        if value == self.speed {
            return None;
        }
        self.speed = value;
        Some(ParamChange::Speed(value))
    }

    pub fn set_intensity(&mut self, value: f64) -> Option<ParamChange> {
        let value = self.limits.intensity.clamp(Quantize::Tenths.apply(value));
        if value == self.intensity {
            return None;
        }
        self.intensity = value;
        Some(ParamChange::Intensity(value))
    }

    pub fn set_volume(&mut self, value: f64) -> Option<ParamChange> {
        let value = VOLUME_RANGE.clamp(Quantize::Integer.apply(value));
        if value == self.volume {
            return None;
        }
        self.volume = value;
        Some(ParamChange::Volume(value))
    }

    /// Scale used by a knob, derived from the current limits.
    pub fn knob_scale(&self, knob: KnobId) -> RotaryScale {
        match knob {
            KnobId::Volume => RotaryScale::new(VOLUME_RANGE, Quantize::Integer),
            KnobId::Color => RotaryScale::new(CHANNEL_RANGE, Quantize::Integer),
            KnobId::Speed => RotaryScale::new(self.limits.speed, Quantize::Tenths),
            KnobId::Intensity => RotaryScale::new(self.limits.intensity, Quantize::Tenths),
        }
    }

    /// Current value behind a knob. The color knob shows the active channel.
    pub fn knob_value(&self, knob: KnobId) -> f64 {
        match knob {
            KnobId::Volume => self.volume,
            KnobId::Color => f64::from(self.color.get(self.active_channel)),
            KnobId::Speed => self.speed,
            KnobId::Intensity => self.intensity,
        }
    }

    /// Set a knob's value directly (clamped and rounded).
    pub fn set_knob(&mut self, knob: KnobId, value: f64) -> Option<ParamChange> {
        match knob {
            KnobId::Volume => self.set_volume(value),
            KnobId::Color => {
                let v = CHANNEL_RANGE.clamp(value.round()) as u8;
                self.set_channel_value(self.active_channel, v)
            }
            KnobId::Speed => self.set_speed(value),
            KnobId::Intensity => self.set_intensity(value),
        }
    }

    /// Step a knob by `steps` increments: 1 for color and volume, 0.1 otherwise.
    pub fn nudge_knob(&mut self, knob: KnobId, steps: i32) -> Option<ParamChange> {
        let step = match self.knob_scale(knob).quantize {
            Quantize::Integer => 1.0,
            Quantize::Tenths => 0.1,
        };
        let value = self.knob_value(knob) + f64::from(steps) * step;
        self.set_knob(knob, value)
    }

    /// Set a knob from a pointer position relative to the knob's center.
    ///
    /// A pointer exactly on the center leaves the value untouched.
    pub fn drag_knob(&mut self, knob: KnobId, pointer: Point, center: Point) -> Option<ParamChange> {
        let value = self.knob_scale(knob).value_at_pointer(pointer, center)?;
        self.set_knob(knob, value)
    }

    /// Indicator angle for a knob's current value.
    pub fn knob_angle(&self, knob: KnobId) -> f64 {
        self.knob_scale(knob).angle_for(self.knob_value(knob))
    }
}

impl Default for ParameterSet {
    fn default() -> Self {
        Self::new(ParamLimits::local())
    }
}
