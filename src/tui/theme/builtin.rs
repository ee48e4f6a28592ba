//! Built-in themes.

use ratatui::style::Color;

use super::Theme;

/// Neon — the LUMIUS palette: per-panel accents on near-black.
pub fn neon() -> Theme {
    Theme {
        name: "Neon".to_string(),

        background: Color::Rgb(0x0a, 0x0a, 0x0a),
        text: Color::White,
        dim: Color::Rgb(0x66, 0x66, 0x66),
        title: Color::Rgb(0x00, 0xff, 0xff),
        border: Color::Rgb(0x33, 0x33, 0x33),
        border_focused: Color::Rgb(0x00, 0xff, 0xff),

        generative: Color::Rgb(0x00, 0xff, 0x00),
        camera: Color::Rgb(0xff, 0x66, 0x00),
        audio: Color::Rgb(0xff, 0x80, 0x00),
        rgb: Color::Rgb(0xff, 0x00, 0xff),
        control: Color::Rgb(0xff, 0xff, 0x00),
        status: Color::Rgb(0x00, 0xff, 0xff),

        button_fg: Color::Black,
        button_selected_bg: Color::Rgb(0x44, 0x44, 0x44),

        knob_ring: Color::Rgb(0x33, 0x33, 0x33),
        knob_inner: Color::Rgb(0x66, 0x66, 0x66),
        knob_indicator: Color::Rgb(0x00, 0xff, 0xff),
        knob_value: Color::Rgb(0x00, 0xff, 0xff),

        ok: Color::Rgb(0x00, 0xff, 0x00),
        warn: Color::Rgb(0xff, 0x66, 0x00),
        error: Color::Rgb(0xff, 0x00, 0x00),
    }
}

/// Mono — 16-color terminals and screenshots.
pub fn mono() -> Theme {
    Theme {
        name: "Mono".to_string(),

        background: Color::Reset,
        text: Color::White,
        dim: Color::DarkGray,
        title: Color::White,
        border: Color::DarkGray,
        border_focused: Color::White,

        generative: Color::Gray,
        camera: Color::Gray,
        audio: Color::Gray,
        rgb: Color::Gray,
        control: Color::Gray,
        status: Color::Gray,

        button_fg: Color::Black,
        button_selected_bg: Color::DarkGray,

        knob_ring: Color::DarkGray,
        knob_inner: Color::Gray,
        knob_indicator: Color::White,
        knob_value: Color::White,

        ok: Color::White,
        warn: Color::Gray,
        error: Color::White,
    }
}

pub fn by_name(name: &str) -> Option<Theme> {
    all_builtins()
        .into_iter()
        .find(|t| t.name.eq_ignore_ascii_case(name.trim()))
}

pub fn all_builtins() -> Vec<Theme> {
    vec![neon(), mono()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_case_insensitive() {
        assert_eq!(by_name("mono").unwrap().name, "Mono");
        assert_eq!(by_name(" NEON ").unwrap().name, "Neon");
        assert!(by_name("solarized").is_none());
    }

    #[test]
    fn builtin_names_are_unique() {
        let themes = all_builtins();
        let mut names: Vec<_> = themes.iter().map(|t| t.name.clone()).collect();
        names.dedup();
        assert_eq!(names.len(), themes.len());
    }
}
