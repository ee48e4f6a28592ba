//! Control surface — ratatui panels, mouse-driven knobs and the event loop.
//!
//! The App owns the single [`ParameterSet`] and the [`Publisher`]. Every
//! accepted mutation is published before the next input is read.

pub mod connect_form;
pub mod event_log;
pub mod help;
pub mod keybindings;
pub mod knob;
pub mod layout;
pub mod splash;
pub mod status;
pub mod theme;

pub use connect_form::{ConnectForm, Credentials, FormField};
pub use event_log::{EventEntry, EventLevel, EventLog};
pub use help::HelpScreen;
pub use keybindings::{map_key, Action, InputMode};
pub use knob::Knob;
pub use layout::{HitMap, HitTarget, SurfaceLayout};
pub use splash::{run_splash, SplashScreen};
pub use status::{AudioState, Headline, StatusInfo};

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crossterm::event::{
    self, Event as CrosstermEvent, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;
use tracing::{debug, info, warn};

use crate::config::LumiusConfig;
use crate::params::{
    ColorChannel, Effect, EffectCategory, KnobId, MusicCommand, ParamChange, ParameterSet,
};
use crate::publish::{Connection, Delivery, LocalSink, Publisher, RemoteShell, RemoteSink};

/// Input poll timeout; bounds how long a quit request waits.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// The control surface state.
pub struct App {
    pub params: ParameterSet,
    publisher: Publisher,
    pub status: StatusInfo,
    pub event_log: EventLog,
    pub event_log_visible: bool,
    pub help_screen: HelpScreen,
    pub connect_form: ConnectForm,
    /// Knob that receives keyboard nudges.
    pub focus: KnobId,
    pub theme: theme::Theme,
    available_themes: Vec<theme::Theme>,
    kill_patterns: Vec<String>,
    hit_map: HitMap,
    /// Knob grabbed by the last left press, with its dial area.
    dragging: Option<(KnobId, Rect)>,
    pub should_quit: bool,
}

impl App {
    /// Build a surface around an existing publisher.
    pub fn new(params: ParameterSet, mut publisher: Publisher, kill_patterns: Vec<String>) -> Self {
        let (remote, host, user) = match publisher.sink_mut().as_remote_mut() {
            Some(sink) => (
                true,
                sink.target().host.clone(),
                sink.target().user.clone(),
            ),
            None => (false, String::new(), String::new()),
        };
        let status = StatusInfo::new(
            remote,
            publisher.connection(),
            publisher.sink().destination(),
        );
        Self {
            params,
            publisher,
            status,
            event_log: EventLog::default(),
            event_log_visible: false,
            help_screen: HelpScreen::new(remote),
            connect_form: ConnectForm::new(&host, &user),
            focus: KnobId::Volume,
            theme: theme::builtin::neon(),
            available_themes: theme::builtin::all_builtins(),
            kill_patterns,
            hit_map: HitMap::default(),
            dragging: None,
            should_quit: false,
        }
    }

    /// Surface writing the local control file.
    pub fn local(config: &LumiusConfig) -> Self {
        let sink = LocalSink::new(&config.control_file);
        let params = ParameterSet::new(config.limits);
        Self::new(
            params,
            Publisher::new(Box::new(sink)),
            config.kill_patterns.clone(),
        )
        .with_theme(theme::load_theme(&config.theme))
    }

    /// Surface writing the control file on the configured remote host.
    pub fn remote(config: &LumiusConfig) -> Self {
        let sink = RemoteSink::new(config.remote.target());
        let params = ParameterSet::new(config.remote.limits);
        Self::new(
            params,
            Publisher::new(Box::new(sink)),
            config.kill_patterns.clone(),
        )
        .with_theme(theme::load_theme(&config.theme))
    }

    pub fn with_theme(mut self, theme: theme::Theme) -> Self {
        if !self.available_themes.iter().any(|t| t.name == theme.name) {
            self.available_themes.push(theme.clone());
        }
        self.theme = theme;
        self
    }

    pub fn publisher(&self) -> &Publisher {
        &self.publisher
    }

    pub fn is_remote(&self) -> bool {
        self.status.remote
    }

    pub fn hit_map(&self) -> &HitMap {
        &self.hit_map
    }

    /// Which layer receives keys: the topmost open overlay, else the surface.
    pub fn input_mode(&self) -> InputMode {
        if self.connect_form.visible {
            InputMode::ConnectForm
        } else if self.help_screen.visible {
            InputMode::Help
        } else if self.event_log_visible {
            InputMode::EventLog
        } else {
            InputMode::Surface
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if let Some(action) = map_key(key, self.input_mode()) {
            self.handle_action(action);
        }
    }

    pub fn handle_action(&mut self, action: Action) {
        match action {
            Action::Quit => self.quit(),
            Action::SelectEffect(effect) => {
                let change = self.params.set_effect(effect);
                if change.is_some() {
                    self.status.headline = Headline::EffectActive(effect.id());
                }
                self.apply(change);
            }
            Action::SelectChannel(channel) => {
                if let Some(change) = self.params.select_channel(channel) {
                    // The snapshot does not carry the active channel.
                    debug!(%change, "channel selected");
                }
                self.focus = KnobId::Color;
            }
            Action::Music(command) => self.send_music(command),
            Action::FocusNextKnob => self.focus = self.focus.next(),
            Action::FocusPrevKnob => self.focus = self.focus.prev(),
            Action::Nudge(steps) => {
                let change = self.params.nudge_knob(self.focus, steps);
                self.apply(change);
            }
            Action::OpenConnectForm => {
                if self.status.remote {
                    self.connect_form.show();
                } else {
                    self.event_log.info("local surface has no remote connection");
                }
            }
            Action::Disconnect => self.disconnect(),
            Action::ToggleHelp => self.help_screen.toggle(),
            Action::ToggleEventLog => self.event_log_visible = !self.event_log_visible,
            Action::CycleTheme => {
                self.theme = theme::cycle_theme(&self.theme, &self.available_themes);
                self.event_log.info(format!("theme: {}", self.theme.name));
            }
            Action::Escape => {
                if self.connect_form.visible {
                    self.connect_form.hide();
                } else if self.help_screen.visible {
                    self.help_screen.hide();
                } else if self.event_log_visible {
                    self.event_log_visible = false;
                }
            }
            Action::HelpScrollUp => self.help_screen.scroll_up(),
            Action::HelpScrollDown => self.help_screen.scroll_down(10),
            Action::FormInsert(c) => self.connect_form.insert(c),
            Action::FormBackspace => self.connect_form.backspace(),
            Action::FormNextField => self.connect_form.next_field(),
            Action::FormPrevField => self.connect_form.prev_field(),
            Action::FormSubmit => self.submit_connect_form(),
        }
    }

    /// Route a mouse event. Overlays swallow the mouse.
    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        if self.input_mode() != InputMode::Surface {
            self.dragging = None;
            return;
        }
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                let Some((target, area)) = self.hit_map.hit(mouse.column, mouse.row) else {
                    return;
                };
                match target {
                    HitTarget::Knob(knob) => {
                        self.focus = knob;
                        self.dragging = Some((knob, area));
                        self.drag_to(knob, area, mouse.column, mouse.row);
                    }
                    HitTarget::Effect(effect) => self.handle_action(Action::SelectEffect(effect)),
                    HitTarget::Channel(channel) => {
                        self.handle_action(Action::SelectChannel(channel))
                    }
                    HitTarget::Music(command) => self.handle_action(Action::Music(command)),
                    HitTarget::Connection => {
                        if self.publisher.connection().is_ready() {
                            self.handle_action(Action::Disconnect);
                        } else {
                            self.handle_action(Action::OpenConnectForm);
                        }
                    }
                }
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                // The drag stays bound to the knob where it started.
                if let Some((knob, area)) = self.dragging {
                    self.drag_to(knob, area, mouse.column, mouse.row);
                }
            }
            MouseEventKind::Up(MouseButton::Left) => self.dragging = None,
            MouseEventKind::ScrollUp | MouseEventKind::ScrollDown => {
                if let Some((HitTarget::Knob(knob), _)) = self.hit_map.hit(mouse.column, mouse.row)
                {
                    let steps = if mouse.kind == MouseEventKind::ScrollUp {
                        1
                    } else {
                        -1
                    };
                    self.focus = knob;
                    let change = self.params.nudge_knob(knob, steps);
                    self.apply(change);
                }
            }
            _ => {}
        }
    }

    fn drag_to(&mut self, knob: KnobId, dial: Rect, column: u16, row: u16) {
        let change = self.params.drag_knob(
            knob,
            knob::cell_point(column, row),
            knob::dial_center(dial),
        );
        self.apply(change);
    }

    /// Publish after an accepted mutation; no-ops publish nothing.
    fn apply(&mut self, change: Option<ParamChange>) {
        let Some(change) = change else {
            return;
        };
        debug!(%change, "parameter changed");
        self.publish(None);
    }

    fn send_music(&mut self, command: MusicCommand) {
        if self.publish(Some(command)) == Some(Delivery::Written) {
            self.status.headline = Headline::Music(command);
            self.status.audio = command.into();
            self.event_log.info(format!("music {command}"));
        }
    }

    fn publish(&mut self, music: Option<MusicCommand>) -> Option<Delivery> {
        let result = self.publisher.publish(&self.params, music);
        self.refresh_connection();
        match result {
            Ok(delivery) => {
                if delivery == Delivery::Written && self.status.headline.is_error() {
                    self.status.headline = Headline::Ready;
                }
                Some(delivery)
            }
            Err(e) => {
                self.status.headline = if self.status.remote {
                    Headline::WriteError
                } else {
                    Headline::Error(e.short())
                };
                self.event_log.error(format!("write failed: {e}"));
                None
            }
        }
    }

    fn refresh_connection(&mut self) {
        let connection = self.publisher.connection();
        if self.status.connection != connection {
            if connection == Connection::Disconnected {
                self.status.audio = AudioState::Ready;
            }
            self.status.connection = connection;
        }
        self.status.destination = self.publisher.sink().destination();
    }

    fn submit_connect_form(&mut self) {
        let Some(creds) = self.connect_form.submit() else {
            return;
        };
        let Some(sink) = self.publisher.sink_mut().as_remote_mut() else {
            return;
        };
        match sink.connect(&creds.host, &creds.user, &creds.password) {
            Ok(()) => {
                self.connect_form.hide();
                self.session_established();
            }
            Err(e) => {
                warn!(host = %creds.host, error = %e, "connect failed");
                self.connect_form.message = Some(format!("ERROR: {}", e.short()));
                self.event_log
                    .error(format!("connect to {} failed: {e}", creds.host));
                self.refresh_connection();
            }
        }
    }

    /// Hand the remote surface an already open session. No-op on a local surface.
    pub fn attach_session(&mut self, shell: Box<dyn RemoteShell>) {
        let Some(sink) = self.publisher.sink_mut().as_remote_mut() else {
            return;
        };
        sink.attach(shell);
        self.session_established();
    }

    /// Bring the remote file up to date with edits made while disconnected.
    fn session_established(&mut self) {
        let target = self.publisher.sink().destination();
        info!(%target, "remote session established");
        self.event_log.info(format!("connected to {target}"));
        self.status.audio = AudioState::Ready;
        self.status.headline = Headline::Ready;
        self.publish(None);
    }

    fn disconnect(&mut self) {
        let Some(sink) = self.publisher.sink_mut().as_remote_mut() else {
            return;
        };
        if sink.is_connected() {
            sink.disconnect();
            self.event_log.info("disconnected");
        }
        self.refresh_connection();
    }

    /// Stop the visualizer, write the shutdown sentinel and leave the loop.
    fn quit(&mut self) {
        info!("control surface shutting down");
        self.publisher.shutdown(&self.kill_patterns);
        self.should_quit = true;
    }

    pub fn draw(&mut self, frame: &mut Frame) {
        let area = frame.area();
        let mut hits = std::mem::take(&mut self.hit_map);
        hits.clear();

        frame.render_widget(
            Block::default().style(Style::default().bg(self.theme.background)),
            area,
        );

        let layout = SurfaceLayout::compute(area, self.status.remote);
        self.draw_header(frame, layout.header);
        if let Some(bar) = layout.connection_bar {
            self.draw_connection_bar(frame, bar, &mut hits);
        }
        self.draw_effects(frame, layout.generative, EffectCategory::Generative, &mut hits);
        self.draw_effects(frame, layout.camera, EffectCategory::CameraReactive, &mut hits);
        self.draw_audio(frame, layout.audio, &mut hits);
        self.draw_rgb(frame, layout.rgb, &mut hits);
        self.draw_control(frame, layout.control, &mut hits);
        self.draw_status(frame, layout.status);
        self.draw_footer(frame, layout.footer);

        // Overlay priority: connect form > help > event log
        if self.event_log_visible {
            self.draw_event_log(frame, area);
        }
        if self.help_screen.visible {
            self.draw_help(frame, area);
        }
        if self.connect_form.visible {
            self.draw_connect_form(frame, area);
        }

        self.hit_map = hits;
    }

    fn panel(&self, title: &str, accent: Color) -> Block<'static> {
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(accent))
            .title(Span::styled(
                format!(" ◆ {title} "),
                Style::default().fg(accent).add_modifier(Modifier::BOLD),
            ))
    }

    fn draw_button(&self, frame: &mut Frame, area: Rect, label: &str, selected: bool, accent: Color) {
        let style = if selected {
            Style::default()
                .fg(self.theme.button_fg)
                .bg(accent)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(accent)
        };
        let block = if area.height >= 3 {
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(accent))
        } else {
            Block::default()
        };
        let inner = block.inner(area);
        let mut lines: Vec<Line> = (0..inner.height.saturating_sub(1) / 2)
            .map(|_| Line::raw(""))
            .collect();
        lines.push(Line::raw(label.to_string()));
        frame.render_widget(
            Paragraph::new(lines)
                .block(block)
                .style(style)
                .alignment(Alignment::Center),
            area,
        );
    }

    fn draw_knob(&self, frame: &mut Frame, area: Rect, knob_id: KnobId, hits: &mut HitMap) {
        let value = self.params.knob_value(knob_id);
        let value_text = match knob_id {
            KnobId::Color | KnobId::Volume => format!("{value:.0}"),
            _ => format!("{value:.1}"),
        };
        frame.render_widget(
            Knob {
                label: knob_id.label(),
                value_text,
                angle_deg: self.params.knob_angle(knob_id),
                focused: self.focus == knob_id,
                theme: &self.theme,
            },
            area,
        );
        hits.push(knob::dial_area(area), HitTarget::Knob(knob_id));
    }

    fn draw_header(&self, frame: &mut Frame, area: Rect) {
        let theme = &self.theme;
        let lines = vec![
            Line::from(Span::styled(
                "◢ LUMIUS VISUAL SYNTHESIS ◣",
                Style::default().fg(theme.title).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                "GENERATIVE & CAMERA REACTIVE VISUALS",
                Style::default().fg(theme.dim),
            )),
            Line::from(Span::styled(
                "REAL-TIME AUDIO VISUAL SYNTHESIS",
                Style::default().fg(theme.dim),
            )),
        ];
        frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), area);
    }

    fn draw_connection_bar(&self, frame: &mut Frame, area: Rect, hits: &mut HitMap) {
        let theme = &self.theme;
        let block = self.panel("REMOTE CONNECTION", theme.status);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Min(10),
                Constraint::Length(14),
                Constraint::Length(24),
            ])
            .split(inner);

        let target = Line::from(vec![
            Span::styled(" IP: ", Style::default().fg(theme.text)),
            Span::styled(
                self.connect_form.host().to_string(),
                Style::default().fg(theme.title),
            ),
            Span::styled("  User: ", Style::default().fg(theme.text)),
            Span::styled(
                self.connect_form.user().to_string(),
                Style::default().fg(theme.title),
            ),
        ]);
        frame.render_widget(Paragraph::new(target), cols[0]);

        let connected = self.status.connection.is_ready();
        let (label, color) = if connected {
            ("DISCONNECT", theme.warn)
        } else {
            ("CONNECT", theme.ok)
        };
        self.draw_button(frame, cols[1], label, false, color);
        hits.push(cols[1], HitTarget::Connection);

        let (text, color) = match (&self.connect_form.message, connected) {
            (_, true) => ("CONNECTED".to_string(), theme.ok),
            (Some(message), false) => (message.clone(), theme.warn),
            (None, false) => ("DISCONNECTED".to_string(), theme.error),
        };
        frame.render_widget(
            Paragraph::new(Span::styled(
                format!(" {text}"),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )),
            cols[2],
        );
    }

    fn draw_effects(
        &self,
        frame: &mut Frame,
        area: Rect,
        category: EffectCategory,
        hits: &mut HitMap,
    ) {
        let (title, accent) = match category {
            EffectCategory::Generative => ("GENERATIVE ART", self.theme.generative),
            EffectCategory::CameraReactive => ("CAMERA REACTIVE", self.theme.camera),
        };
        let block = self.panel(title, accent);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let effects: Vec<Effect> = Effect::in_category(category).collect();
        let buttons = layout::stacked_buttons(inner, effects.len() as u16, 3);
        for (effect, rect) in effects.into_iter().zip(buttons) {
            let selected = self.params.effect() == effect;
            self.draw_button(frame, rect, effect.name(), selected, accent);
            hits.push(rect, HitTarget::Effect(effect));
        }
    }

    fn draw_audio(&self, frame: &mut Frame, area: Rect, hits: &mut HitMap) {
        let accent = self.theme.audio;
        let block = self.panel("AUDIO MATRIX", accent);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(3)])
            .split(inner);
        let buttons = layout::row_buttons(rows[0], 2);
        for (command, rect) in [MusicCommand::Play, MusicCommand::Pause]
            .into_iter()
            .zip(buttons)
        {
            let selected = self.status.audio == AudioState::from(command);
            let label = command.as_str().to_uppercase();
            self.draw_button(frame, rect, &label, selected, accent);
            hits.push(rect, HitTarget::Music(command));
        }
        self.draw_knob(frame, rows[1], KnobId::Volume, hits);
    }

    fn draw_rgb(&self, frame: &mut Frame, area: Rect, hits: &mut HitMap) {
        let theme = &self.theme;
        let block = self.panel("RGB MATRIX", theme.rgb);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Min(3),
            ])
            .split(inner);

        let color = self.params.color();
        let leds: Vec<Span> = ColorChannel::ALL
            .iter()
            .flat_map(|&channel| {
                let lit = self.params.is_channel_active(channel);
                let led_color = if lit {
                    channel_color(channel)
                } else {
                    theme.dim
                };
                [
                    Span::styled(" ● ", Style::default().fg(led_color)),
                    Span::styled(
                        format!("{:>3} ", color.get(channel)),
                        Style::default().fg(theme.text),
                    ),
                ]
            })
            .collect();
        frame.render_widget(
            Paragraph::new(Line::from(leds)).alignment(Alignment::Center),
            rows[0],
        );

        let buttons = layout::row_buttons(rows[1], 3);
        for (channel, rect) in ColorChannel::ALL.into_iter().zip(buttons) {
            let selected = self.params.is_channel_active(channel);
            self.draw_button(frame, rect, channel.label(), selected, channel_color(channel));
            hits.push(rect, HitTarget::Channel(channel));
        }
        self.draw_knob(frame, rows[2], KnobId::Color, hits);
    }

    fn draw_control(&self, frame: &mut Frame, area: Rect, hits: &mut HitMap) {
        let block = self.panel("SYSTEM CONTROL", self.theme.control);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let halves = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(inner);
        self.draw_knob(frame, halves[0], KnobId::Speed, hits);
        self.draw_knob(frame, halves[1], KnobId::Intensity, hits);
    }

    fn draw_status(&self, frame: &mut Frame, area: Rect) {
        let theme = &self.theme;
        let status = &self.status;
        let block = self.panel("SYSTEM STATUS", theme.status);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let camera_color = if status.camera_active(&self.params) {
            theme.ok
        } else {
            theme.error
        };
        let audio_color = match (status.connection.is_ready(), status.audio) {
            (false, _) => theme.error,
            (true, AudioState::Ready) => theme.text,
            (true, _) => theme.ok,
        };
        let led_color = if status.connection.is_ready() {
            theme.ok
        } else {
            theme.error
        };
        let headline_color = if status.headline.is_error() {
            theme.error
        } else {
            theme.title
        };
        let lines = vec![
            Line::from(Span::styled(
                status.title(),
                Style::default().fg(theme.status).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                status.effect_line(&self.params),
                Style::default().fg(theme.text),
            )),
            Line::from(Span::styled(
                status.shader_line(&self.params),
                Style::default().fg(theme.text),
            )),
            Line::from(Span::styled(
                status.camera_line(&self.params),
                Style::default().fg(camera_color),
            )),
            Line::from(Span::styled(
                status.audio_line(),
                Style::default().fg(audio_color),
            )),
            Line::from(vec![
                Span::styled("● ", Style::default().fg(led_color)),
                Span::styled(status.connection_line(), Style::default().fg(led_color)),
            ]),
            Line::raw(""),
            Line::from(Span::styled(
                status.headline.text(),
                Style::default()
                    .fg(headline_color)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                status.destination.clone(),
                Style::default().fg(theme.dim),
            )),
        ];
        frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), inner);
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let mut hint =
            String::from(" 1-7 effect  r/g/b channel  p/s play/pause  Tab knob  ←/→ adjust");
        if self.status.remote {
            hint.push_str("  c connect  d disconnect");
        }
        hint.push_str("  ? help  q quit");
        frame.render_widget(
            Paragraph::new(Span::styled(hint, Style::default().fg(self.theme.dim))),
            area,
        );
    }

    fn draw_help(&self, frame: &mut Frame, area: Rect) {
        let overlay = layout::centered(
            area,
            (area.width * 60 / 100).max(50),
            (area.height * 70 / 100).max(15),
        );
        frame.render_widget(Clear, overlay);
        let block = Block::default()
            .style(Style::default().bg(Color::Black))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.border_focused))
            .title(" Help (? or Esc to close) ");
        let inner = block.inner(overlay);
        frame.render_widget(block, overlay);

        let lines: Vec<Line> = self
            .help_screen
            .lines()
            .iter()
            .skip(self.help_screen.scroll_offset)
            .take(inner.height as usize)
            .map(|hl| {
                let style = if hl.is_header {
                    Style::default()
                        .fg(self.theme.title)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(self.theme.text)
                };
                Line::from(Span::styled(hl.text.as_str(), style))
            })
            .collect();
        frame.render_widget(Paragraph::new(lines), inner);
    }

    fn draw_event_log(&self, frame: &mut Frame, area: Rect) {
        let overlay = layout::centered(
            area,
            (area.width * 70 / 100).max(50),
            (area.height * 50 / 100).max(10),
        );
        frame.render_widget(Clear, overlay);
        let block = Block::default()
            .style(Style::default().bg(Color::Black))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.border_focused))
            .title(" Event Log (Ctrl-L or Esc to close) ");
        let inner = block.inner(overlay);
        frame.render_widget(block, overlay);

        if self.event_log.is_empty() {
            frame.render_widget(
                Paragraph::new("(no events recorded)").style(Style::default().fg(self.theme.dim)),
                inner,
            );
            return;
        }
        let theme = &self.theme;
        let lines: Vec<Line> = self
            .event_log
            .recent(inner.height as usize)
            .map(|entry| {
                let elapsed = entry
                    .timestamp
                    .elapsed()
                    .map(|d| format!("{:.0}s ago", d.as_secs_f64()))
                    .unwrap_or_else(|_| "?".to_string());
                let color = match entry.level {
                    EventLevel::Info => theme.text,
                    EventLevel::Error => theme.error,
                };
                Line::from(vec![
                    Span::styled(format!("[{elapsed}] "), Style::default().fg(theme.dim)),
                    Span::styled(entry.message.as_str(), Style::default().fg(color)),
                ])
            })
            .collect();
        frame.render_widget(Paragraph::new(lines), inner);
    }

    fn draw_connect_form(&self, frame: &mut Frame, area: Rect) {
        let theme = &self.theme;
        let overlay = layout::centered(area, 46, 9);
        frame.render_widget(Clear, overlay);
        let block = Block::default()
            .style(Style::default().bg(Color::Black))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.status))
            .title(" ◢ REMOTE CONNECTION ◣ ");
        let inner = block.inner(overlay);
        frame.render_widget(block, overlay);

        let form = &self.connect_form;
        let mut lines: Vec<Line> = [FormField::Host, FormField::User, FormField::Password]
            .into_iter()
            .map(|field| {
                let focused = form.focus == field;
                let cursor = if focused { "_" } else { "" };
                let label_style = if focused {
                    Style::default()
                        .fg(theme.border_focused)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(theme.text)
                };
                Line::from(vec![
                    Span::styled(format!(" {:<6}", field.label()), label_style),
                    Span::styled(
                        format!("{}{cursor}", form.display(field)),
                        Style::default().fg(theme.title),
                    ),
                ])
            })
            .collect();
        lines.push(Line::raw(""));
        let (message, color) = match &form.message {
            Some(message) => (message.clone(), theme.warn),
            None => ("Enter connect · Tab next field · Esc cancel".to_string(), theme.dim),
        };
        lines.push(Line::from(Span::styled(
            format!(" {message}"),
            Style::default().fg(color),
        )));
        frame.render_widget(Paragraph::new(lines), inner);
    }

    /// Run the event loop until quit or `interrupted` is raised.
    pub fn run(
        &mut self,
        terminal: &mut ratatui::Terminal<impl ratatui::backend::Backend>,
        interrupted: &AtomicBool,
    ) -> io::Result<()> {
        while !self.should_quit {
            terminal
                .draw(|frame| self.draw(frame))
                .map_err(|e| io::Error::other(e.to_string()))?;

            if interrupted.load(Ordering::Relaxed) {
                self.handle_action(Action::Quit);
                break;
            }

            if event::poll(POLL_INTERVAL)? {
                match event::read()? {
                    CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => {
                        self.handle_key(key);
                    }
                    CrosstermEvent::Mouse(mouse) => self.handle_mouse(mouse),
                    _ => {}
                }
            }
        }
        Ok(())
    }
}

fn channel_color(channel: ColorChannel) -> Color {
    match channel {
        ColorChannel::Red => Color::Rgb(0xff, 0x33, 0x33),
        ColorChannel::Green => Color::Rgb(0x33, 0xff, 0x33),
        ColorChannel::Blue => Color::Rgb(0x33, 0x66, 0xff),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};
    use crate::publish::RemoteTarget;

    fn local_app(dir: &tempfile::TempDir) -> App {
        let sink = LocalSink::new(dir.path().join("data").join("control.txt"));
        App::new(
            ParameterSet::default(),
            Publisher::new(Box::new(sink)),
            Vec::new(),
        )
    }

    fn remote_app() -> App {
        let target = RemoteTarget {
            host: "192.0.2.10".to_string(),
            port: 22,
            user: "lumius".to_string(),
            control_file: "/tmp/control.txt".to_string(),
            timeout: Duration::from_millis(100),
        };
        App::new(
            ParameterSet::default(),
            Publisher::new(Box::new(RemoteSink::new(target))),
            Vec::new(),
        )
    }

    fn read_control(dir: &tempfile::TempDir) -> String {
        std::fs::read_to_string(dir.path().join("data").join("control.txt")).unwrap()
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn effect_key_publishes() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = local_app(&dir);
        app.handle_key(key(KeyCode::Char('3')));
        assert!(read_control(&dir).starts_with("effect:3\n"));
        assert_eq!(app.status.headline, Headline::EffectActive(3));
    }

    #[test]
    fn unchanged_effect_does_not_publish() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = local_app(&dir);
        app.handle_action(Action::SelectEffect(Effect::NeuralWaves));
        assert!(app.publisher().last_written().is_none());
    }

    #[test]
    fn channel_selection_is_exclusive_and_not_published() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = local_app(&dir);
        app.handle_key(key(KeyCode::Char('g')));
        app.handle_key(key(KeyCode::Char('b')));
        assert!(app.params.is_channel_active(ColorChannel::Blue));
        assert!(!app.params.is_channel_active(ColorChannel::Green));
        assert!(!app.params.is_channel_active(ColorChannel::Red));
        assert_eq!(app.focus, KnobId::Color);
        assert!(app.publisher().last_written().is_none());
    }

    #[test]
    fn nudge_moves_focused_knob() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = local_app(&dir);
        app.handle_action(Action::FocusNextKnob);
        app.handle_action(Action::FocusNextKnob);
        assert_eq!(app.focus, KnobId::Speed);
        app.handle_action(Action::Nudge(3));
        assert!(read_control(&dir).contains("speed:1.3\n"));
    }

    #[test]
    fn music_is_one_shot() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = local_app(&dir);
        app.handle_key(key(KeyCode::Char('p')));
        assert!(read_control(&dir).ends_with("music:play\n"));
        assert_eq!(app.status.audio, AudioState::Playing);
        app.handle_key(key(KeyCode::Char('5')));
        assert!(!read_control(&dir).contains("music:"));
    }

    #[test]
    fn quit_writes_shutdown_sentinel() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = local_app(&dir);
        app.handle_key(key(KeyCode::Char('q')));
        assert!(app.should_quit);
        assert_eq!(read_control(&dir), "system:shutdown\n");
    }

    #[test]
    fn write_failure_becomes_status() {
        let dir = tempfile::tempdir().unwrap();
        // A file where the parent directory should be.
        let blocker = dir.path().join("data");
        std::fs::write(&blocker, "").unwrap();
        let mut app = local_app(&dir);
        app.handle_action(Action::SelectEffect(Effect::QuantumField));
        assert!(app.status.headline.is_error());
        assert_eq!(app.event_log.latest().unwrap().level, EventLevel::Error);
        // The model still holds the new value; the next write retries.
        assert_eq!(app.params.effect(), Effect::QuantumField);
    }

    #[test]
    fn remote_without_session_keeps_model() {
        let mut app = remote_app();
        assert!(app.is_remote());
        app.handle_action(Action::SelectEffect(Effect::DepthScanner));
        assert_eq!(app.params.effect(), Effect::DepthScanner);
        assert!(app.publisher().last_written().is_none());
        assert!(!app.status.camera_active(&app.params));
        assert_eq!(app.status.connection, Connection::Disconnected);
    }

    #[test]
    fn connect_form_requires_password() {
        let mut app = remote_app();
        app.handle_key(key(KeyCode::Char('c')));
        assert_eq!(app.input_mode(), InputMode::ConnectForm);
        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.connect_form.message.as_deref(), Some("ENTER PASSWORD"));
        // Letters go to the form, not the surface.
        app.handle_key(key(KeyCode::Char('3')));
        assert_eq!(app.params.effect(), Effect::NeuralWaves);
        app.handle_key(key(KeyCode::Esc));
        assert_eq!(app.input_mode(), InputMode::Surface);
    }

    #[test]
    fn local_surface_ignores_connect() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = local_app(&dir);
        app.handle_key(key(KeyCode::Char('c')));
        assert_eq!(app.input_mode(), InputMode::Surface);
    }

    #[test]
    fn escape_closes_topmost_overlay() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = local_app(&dir);
        app.handle_action(Action::ToggleEventLog);
        app.handle_action(Action::ToggleHelp);
        assert_eq!(app.input_mode(), InputMode::Help);
        app.handle_action(Action::Escape);
        assert_eq!(app.input_mode(), InputMode::EventLog);
        app.handle_action(Action::Escape);
        assert_eq!(app.input_mode(), InputMode::Surface);
    }

    #[test]
    fn cycle_theme_changes_name() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = local_app(&dir);
        let before = app.theme.name.clone();
        app.handle_action(Action::CycleTheme);
        assert_ne!(app.theme.name, before);
    }
}
