//! Control-file snapshot — the line-oriented text the visualizer polls.
//!
//! ```text
//! effect:1
//! rgb_r:255
//! rgb_g:255
//! rgb_b:255
//! speed:1.0
//! intensity:1.0
//! volume:50
//! music:play        (only right after a music command)
//! ```

use std::fmt::Write as _;

use crate::params::{ColorChannel, Effect, MusicCommand, ParameterSet, Rgb};

use super::error::SnapshotError;

/// Standalone line that tells the visualizer to exit.
pub const SHUTDOWN_SENTINEL: &str = "system:shutdown";

/// Full contents of a shutdown write.
pub fn shutdown_text() -> String {
    format!("{SHUTDOWN_SENTINEL}\n")
}

/// An immutable capture of every parameter plus an optional music command.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub effect: Effect,
    pub color: Rgb,
    pub speed: f64,
    pub intensity: f64,
    pub volume: f64,
    pub music: Option<MusicCommand>,
}

impl Snapshot {
    pub fn capture(params: &ParameterSet, music: Option<MusicCommand>) -> Self {
        Self {
            effect: params.effect(),
            color: params.color(),
            speed: params.speed(),
            intensity: params.intensity(),
            volume: params.volume(),
            music,
        }
    }

    /// Render the snapshot. Identical snapshots render byte-identically.
    pub fn render(&self) -> String {
        let mut out = String::with_capacity(96);
        // Writing into a String cannot fail.
        let _ = writeln!(out, "effect:{}", self.effect.id());
        for channel in ColorChannel::ALL {
            let _ = writeln!(out, "{}:{}", channel.key(), self.color.get(channel));
        }
        let _ = writeln!(out, "speed:{:.1}", self.speed);
        let _ = writeln!(out, "intensity:{:.1}", self.intensity);
        let _ = writeln!(out, "volume:{:.0}", self.volume);
        if let Some(music) = self.music {
            let _ = writeln!(out, "music:{music}");
        }
        out
    }

    /// Parse a snapshot written by [`render`](Self::render).
    ///
    /// Lines that are not `key:value` and unknown keys are skipped, the way
    /// the visualizer reads the file. Every parameter key must be present.
    pub fn parse(text: &str) -> Result<Self, SnapshotError> {
        let mut effect = None;
        let mut color = [None::<u8>; 3];
        let mut speed = None;
        let mut intensity = None;
        let mut volume = None;
        let mut music = None;

        for line in text.lines() {
            let Some((key, value)) = line.trim().split_once(':') else {
                continue;
            };
            let value = value.trim();
            match key.trim() {
                "effect" => {
                    let id: u8 = parse_number(key, value)?;
                    effect = Some(Effect::from_id(id).ok_or_else(|| invalid(key, value))?);
                }
                "rgb_r" => color[0] = Some(parse_number(key, value)?),
                "rgb_g" => color[1] = Some(parse_number(key, value)?),
                "rgb_b" => color[2] = Some(parse_number(key, value)?),
                "speed" => speed = Some(parse_number(key, value)?),
                "intensity" => intensity = Some(parse_number(key, value)?),
                "volume" => volume = Some(parse_number(key, value)?),
                "music" => music = Some(MusicCommand::parse(value).ok_or_else(|| invalid(key, value))?),
                _ => {}
            }
        }

        Ok(Self {
            effect: effect.ok_or(SnapshotError::MissingKey("effect"))?,
            color: Rgb {
                r: color[0].ok_or(SnapshotError::MissingKey("rgb_r"))?,
                g: color[1].ok_or(SnapshotError::MissingKey("rgb_g"))?,
                b: color[2].ok_or(SnapshotError::MissingKey("rgb_b"))?,
            },
            speed: speed.ok_or(SnapshotError::MissingKey("speed"))?,
            intensity: intensity.ok_or(SnapshotError::MissingKey("intensity"))?,
            volume: volume.ok_or(SnapshotError::MissingKey("volume"))?,
            music,
        })
    }
}

/// What a control file currently says.
#[derive(Debug, Clone, PartialEq)]
pub enum ControlMessage {
    State(Snapshot),
    Shutdown,
}

impl ControlMessage {
    pub fn parse(text: &str) -> Result<Self, SnapshotError> {
        if text.trim().is_empty() {
            return Err(SnapshotError::Empty);
        }
        if text.lines().any(|line| line.trim() == SHUTDOWN_SENTINEL) {
            return Ok(ControlMessage::Shutdown);
        }
        Snapshot::parse(text).map(ControlMessage::State)
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, SnapshotError> {
    value.parse().map_err(|_| invalid(key, value))
}

fn invalid(key: &str, value: &str) -> SnapshotError {
    SnapshotError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::ParamLimits;

    #[test]
    fn default_state_renders_reference_text() {
        let params = ParameterSet::default();
        let text = Snapshot::capture(&params, None).render();
        assert_eq!(
            text,
            "effect:1\nrgb_r:255\nrgb_g:255\nrgb_b:255\nspeed:1.0\nintensity:1.0\nvolume:50\n"
        );
    }

    #[test]
    fn music_line_only_when_present() {
        let params = ParameterSet::default();
        let text = Snapshot::capture(&params, Some(MusicCommand::Pause)).render();
        assert!(text.ends_with("volume:50\nmusic:pause\n"));
        let text = Snapshot::capture(&params, None).render();
        assert!(!text.contains("music"));
    }

    #[test]
    fn render_is_deterministic() {
        let mut params = ParameterSet::new(ParamLimits::remote());
        params.set_effect(Effect::DepthScanner);
        params.set_speed(7.25);
        params.set_volume(33.3);
        let a = Snapshot::capture(&params, None).render();
        let b = Snapshot::capture(&params.clone(), None).render();
        assert_eq!(a, b);
        assert!(a.contains("effect:6\n"));
        assert!(a.contains("speed:7.3\n") || a.contains("speed:7.2\n"));
        assert!(a.contains("volume:33\n"));
    }

    #[test]
    fn parse_reads_rendered_text() {
        let mut params = ParameterSet::default();
        params.set_channel_value(ColorChannel::Blue, 7);
        let snapshot = Snapshot::capture(&params, Some(MusicCommand::Play));
        let parsed = Snapshot::parse(&snapshot.render()).unwrap();
        assert_eq!(parsed.effect, Effect::NeuralWaves);
        assert_eq!(parsed.color.b, 7);
        assert_eq!(parsed.music, Some(MusicCommand::Play));
    }

    #[test]
    fn parse_skips_unknown_and_malformed_lines() {
        let text = "# comment\neffect:2\nrgb_r:1\nrgb_g:2\nrgb_b:3\nfoo:bar\nspeed:1.5\nintensity:0.5\nvolume:10\na:b:c\n";
        let parsed = Snapshot::parse(text).unwrap();
        assert_eq!(parsed.effect, Effect::ChladniPatterns);
        assert_eq!(parsed.volume, 10.0);
    }

    #[test]
    fn parse_reports_missing_key() {
        let err = Snapshot::parse("effect:1\n").unwrap_err();
        assert!(matches!(err, SnapshotError::MissingKey("rgb_r")));
    }

    #[test]
    fn parse_rejects_unknown_effect() {
        let err = Snapshot::parse("effect:9\n").unwrap_err();
        assert!(matches!(err, SnapshotError::InvalidValue { .. }));
    }

    #[test]
    fn control_message_detects_shutdown() {
        assert_eq!(
            ControlMessage::parse(&shutdown_text()).unwrap(),
            ControlMessage::Shutdown
        );
        assert!(matches!(
            ControlMessage::parse("  \n"),
            Err(SnapshotError::Empty)
        ));
    }
}
