//! Lumius — a terminal control surface for a real-time visual synthesizer.

pub mod config;
pub mod launch;
pub mod logging;
pub mod params;
pub mod publish;
pub mod rotary;
pub mod tui;
