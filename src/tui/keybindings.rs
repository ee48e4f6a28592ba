//! Key bindings — maps key events to control surface actions.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::params::{ColorChannel, Effect, MusicCommand};

/// Knob nudge multiplier while Shift is held.
pub const COARSE_STEPS: i32 = 10;

/// Application-level actions triggered by keys and mouse clicks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    /// Shut the visualizer down and quit.
    Quit,
    SelectEffect(Effect),
    /// Choose which channel the RGB knob edits.
    SelectChannel(ColorChannel),
    Music(MusicCommand),
    FocusNextKnob,
    FocusPrevKnob,
    /// Step the focused knob by this many increments.
    Nudge(i32),
    OpenConnectForm,
    Disconnect,
    ToggleHelp,
    ToggleEventLog,
    CycleTheme,
    /// Close the topmost overlay.
    Escape,
    HelpScrollUp,
    HelpScrollDown,
    FormInsert(char),
    FormBackspace,
    FormNextField,
    FormPrevField,
    FormSubmit,
}

/// Which layer currently receives keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Surface,
    Help,
    EventLog,
    ConnectForm,
}

/// Map a key event to an action for the given input mode.
pub fn map_key(key: KeyEvent, mode: InputMode) -> Option<Action> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let shift = key.modifiers.contains(KeyModifiers::SHIFT);

    // Ctrl-Q quits from anywhere
    if ctrl && key.code == KeyCode::Char('q') {
        return Some(Action::Quit);
    }

    // The connection form takes every printable key
    if mode == InputMode::ConnectForm {
        return match key.code {
            KeyCode::Esc => Some(Action::Escape),
            KeyCode::Enter => Some(Action::FormSubmit),
            KeyCode::Tab | KeyCode::Down => Some(Action::FormNextField),
            KeyCode::BackTab | KeyCode::Up => Some(Action::FormPrevField),
            KeyCode::Backspace => Some(Action::FormBackspace),
            KeyCode::Char(c) if !ctrl => Some(Action::FormInsert(c)),
            _ => None,
        };
    }

    if ctrl {
        return match key.code {
            KeyCode::Char('l') => Some(Action::ToggleEventLog),
            KeyCode::Char('t') => Some(Action::CycleTheme),
            _ => None,
        };
    }

    match mode {
        InputMode::Help => {
            return match key.code {
                KeyCode::Esc | KeyCode::Char('?') => Some(Action::ToggleHelp),
                KeyCode::Up => Some(Action::HelpScrollUp),
                KeyCode::Down => Some(Action::HelpScrollDown),
                KeyCode::Char('q') => Some(Action::Quit),
                _ => None,
            };
        }
        InputMode::EventLog => {
            return match key.code {
                KeyCode::Esc => Some(Action::Escape),
                KeyCode::Char('?') => Some(Action::ToggleHelp),
                KeyCode::Char('q') => Some(Action::Quit),
                _ => None,
            };
        }
        InputMode::Surface | InputMode::ConnectForm => {}
    }

    let step = if shift { COARSE_STEPS } else { 1 };
    match key.code {
        KeyCode::Char(c @ '1'..='7') => {
            let id = c.to_digit(10).and_then(|d| u8::try_from(d).ok())?;
            Effect::from_id(id).map(Action::SelectEffect)
        }
        KeyCode::Char('r') => Some(Action::SelectChannel(ColorChannel::Red)),
        KeyCode::Char('g') => Some(Action::SelectChannel(ColorChannel::Green)),
        KeyCode::Char('b') => Some(Action::SelectChannel(ColorChannel::Blue)),
        KeyCode::Char('p') => Some(Action::Music(MusicCommand::Play)),
        KeyCode::Char('s') => Some(Action::Music(MusicCommand::Pause)),
        KeyCode::Tab => Some(Action::FocusNextKnob),
        KeyCode::BackTab => Some(Action::FocusPrevKnob),
        KeyCode::Up | KeyCode::Right => Some(Action::Nudge(step)),
        KeyCode::Down | KeyCode::Left => Some(Action::Nudge(-step)),
        KeyCode::Char('+') | KeyCode::Char('=') => Some(Action::Nudge(1)),
        KeyCode::Char('-') | KeyCode::Char('_') => Some(Action::Nudge(-1)),
        KeyCode::Char('c') => Some(Action::OpenConnectForm),
        KeyCode::Char('d') => Some(Action::Disconnect),
        KeyCode::Char('?') => Some(Action::ToggleHelp),
        KeyCode::Esc => Some(Action::Escape),
        KeyCode::Char('q') => Some(Action::Quit),
        _ => None,
    }
}
