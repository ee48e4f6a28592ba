//! Theme overrides — optional ~/.lumius/theme.yaml layered over a builtin.

use ratatui::style::Color;
use serde::Deserialize;

use super::Theme;

/// YAML representation; every field optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ThemeOverrides {
    name: Option<String>,
    background: Option<String>,
    text: Option<String>,
    dim: Option<String>,
    title: Option<String>,
    border: Option<String>,
    border_focused: Option<String>,
    generative: Option<String>,
    camera: Option<String>,
    audio: Option<String>,
    rgb: Option<String>,
    control: Option<String>,
    status: Option<String>,
    knob_ring: Option<String>,
    knob_inner: Option<String>,
    knob_indicator: Option<String>,
    knob_value: Option<String>,
    ok: Option<String>,
    warn: Option<String>,
    error: Option<String>,
}

/// Parse a color string: "#RRGGBB" hex or a named color.
pub fn parse_color(s: &str) -> Option<Color> {
    let s = s.trim();
    if let Some(hex) = s.strip_prefix('#') {
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
        return Some(Color::Rgb(r, g, b));
    }
    match s.to_lowercase().as_str() {
        "black" => Some(Color::Black),
        "red" => Some(Color::Red),
        "green" => Some(Color::Green),
        "yellow" => Some(Color::Yellow),
        "blue" => Some(Color::Blue),
        "magenta" => Some(Color::Magenta),
        "cyan" => Some(Color::Cyan),
        "gray" | "grey" => Some(Color::Gray),
        "darkgray" | "darkgrey" => Some(Color::DarkGray),
        "white" => Some(Color::White),
        "reset" => Some(Color::Reset),
        _ => None,
    }
}

/// Apply ~/.lumius/theme.yaml to `base`. `None` if the file is absent or invalid.
pub fn load_theme_overrides(base: &Theme) -> Option<Theme> {
    let path = crate::config::config_dir().join("theme.yaml");
    let content = std::fs::read_to_string(path).ok()?;
    apply_overrides(base, &content)
}

fn apply_overrides(base: &Theme, yaml: &str) -> Option<Theme> {
    let o: ThemeOverrides = serde_yaml::from_str(yaml).ok()?;
    let pick = |opt: Option<String>, fallback: Color| -> Color {
        opt.and_then(|s| parse_color(&s)).unwrap_or(fallback)
    };
    let b = base.clone();
    Some(Theme {
        name: o.name.unwrap_or_else(|| b.name.clone()),
        background: pick(o.background, b.background),
        text: pick(o.text, b.text),
        dim: pick(o.dim, b.dim),
        title: pick(o.title, b.title),
        border: pick(o.border, b.border),
        border_focused: pick(o.border_focused, b.border_focused),
        generative: pick(o.generative, b.generative),
        camera: pick(o.camera, b.camera),
        audio: pick(o.audio, b.audio),
        rgb: pick(o.rgb, b.rgb),
        control: pick(o.control, b.control),
        status: pick(o.status, b.status),
        knob_ring: pick(o.knob_ring, b.knob_ring),
        knob_inner: pick(o.knob_inner, b.knob_inner),
        knob_indicator: pick(o.knob_indicator, b.knob_indicator),
        knob_value: pick(o.knob_value, b.knob_value),
        ok: pick(o.ok, b.ok),
        warn: pick(o.warn, b.warn),
        error: pick(o.error, b.error),
        ..b
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::theme::builtin;

    #[test]
    fn parse_hex_color() {
        assert_eq!(parse_color("#ff00ff"), Some(Color::Rgb(255, 0, 255)));
        assert_eq!(parse_color(" #0a0a0a "), Some(Color::Rgb(10, 10, 10)));
    }

    #[test]
    fn parse_invalid_color_returns_none() {
        assert_eq!(parse_color("#xyz"), None);
        assert_eq!(parse_color("#12345"), None);
        assert_eq!(parse_color("chartreuse"), None);
    }

    #[test]
    fn partial_overrides_keep_base() {
        let base = builtin::neon();
        let yaml = "name: Stage\nknob_indicator: \"#ff0000\"\nborder: darkgrey\n";
        let theme = apply_overrides(&base, yaml).unwrap();
        assert_eq!(theme.name, "Stage");
        assert_eq!(theme.knob_indicator, Color::Rgb(255, 0, 0));
        assert_eq!(theme.border, Color::DarkGray);
        assert_eq!(theme.generative, base.generative);
    }

    #[test]
    fn bad_color_falls_back() {
        let base = builtin::mono();
        let theme = apply_overrides(&base, "title: \"#zz0000\"\n").unwrap();
        assert_eq!(theme.title, base.title);
    }

    #[test]
    fn invalid_yaml_returns_none() {
        assert!(apply_overrides(&builtin::neon(), "{{invalid").is_none());
    }
}
