//! Theme system — color schemes for the control surface.

pub mod builtin;
pub mod config;

use ratatui::style::Color;

/// A complete color theme.
#[derive(Debug, Clone)]
pub struct Theme {
    pub name: String,

    // Chrome
    pub background: Color,
    pub text: Color,
    pub dim: Color,
    pub title: Color,
    pub border: Color,
    pub border_focused: Color,

    // Panel accents
    pub generative: Color,
    pub camera: Color,
    pub audio: Color,
    pub rgb: Color,
    pub control: Color,
    pub status: Color,

    // Buttons
    pub button_fg: Color,
    pub button_selected_bg: Color,

    // Knobs
    pub knob_ring: Color,
    pub knob_inner: Color,
    pub knob_indicator: Color,
    pub knob_value: Color,

    // Indicators
    pub ok: Color,
    pub warn: Color,
    pub error: Color,
}

/// Load the theme named in the config, applying ~/.lumius/theme.yaml overrides.
pub fn load_theme(name: &str) -> Theme {
    let base = builtin::by_name(name).unwrap_or_else(builtin::neon);
    config::load_theme_overrides(&base).unwrap_or(base)
}

/// Cycle to the next theme in the list, wrapping around.
pub fn cycle_theme(current: &Theme, themes: &[Theme]) -> Theme {
    if themes.is_empty() {
        return current.clone();
    }
    let idx = themes
        .iter()
        .position(|t| t.name == current.name)
        .map(|i| (i + 1) % themes.len())
        .unwrap_or(0);
    themes[idx].clone()
}
