//! RGB color channels and the one-shot music command.

use std::fmt;

/// One of the three color channels edited through the shared RGB knob.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ColorChannel {
    #[default]
    Red,
    Green,
    Blue,
}

impl ColorChannel {
    pub const ALL: [ColorChannel; 3] = [ColorChannel::Red, ColorChannel::Green, ColorChannel::Blue];

    /// Control-file key for this channel.
    pub fn key(self) -> &'static str {
        match self {
            ColorChannel::Red => "rgb_r",
            ColorChannel::Green => "rgb_g",
            ColorChannel::Blue => "rgb_b",
        }
    }

    /// Single-letter button label.
    pub fn label(self) -> &'static str {
        match self {
            ColorChannel::Red => "R",
            ColorChannel::Green => "G",
            ColorChannel::Blue => "B",
        }
    }
}

impl fmt::Display for ColorChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The three color channel values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb {
        r: 255,
        g: 255,
        b: 255,
    };

    pub fn get(&self, channel: ColorChannel) -> u8 {
        match channel {
            ColorChannel::Red => self.r,
            ColorChannel::Green => self.g,
            ColorChannel::Blue => self.b,
        }
    }

    pub fn set(&mut self, channel: ColorChannel, value: u8) {
        match channel {
            ColorChannel::Red => self.r = value,
            ColorChannel::Green => self.g = value,
            ColorChannel::Blue => self.b = value,
        }
    }
}

impl Default for Rgb {
    fn default() -> Self {
        Self::WHITE
    }
}

/// Transport request for the visualizer's music player.
///
/// Attached to the next published snapshot only; never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MusicCommand {
    Play,
    Pause,
}

impl MusicCommand {
    pub fn as_str(self) -> &'static str {
        match self {
            MusicCommand::Play => "play",
            MusicCommand::Pause => "pause",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "play" => Some(MusicCommand::Play),
            "pause" => Some(MusicCommand::Pause),
            _ => None,
        }
    }
}

impl fmt::Display for MusicCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
