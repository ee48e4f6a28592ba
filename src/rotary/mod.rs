//! Rotary control math — pointer angle to bounded value and back.

pub mod scale;
pub mod sweep;

pub use scale::{Quantize, RotaryScale};
pub use sweep::{
    normalize_to_sweep, pointer_angle, Point, SWEEP_END_DEG, SWEEP_SPAN_DEG, SWEEP_START_DEG,
};
