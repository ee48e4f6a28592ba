//! Launch splash — title, progress bar and stage text while the visualizer starts.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crossterm::event::{self, Event as CrosstermEvent, KeyCode, KeyEventKind, KeyModifiers};
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Gauge, Paragraph};
use ratatui::Frame;

use super::theme::Theme;
use crate::launch::{LaunchError, LaunchEvent, LaunchHandle, LaunchReceiver, Progress};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// How long the final frame stays up after success.
pub const SUCCESS_HOLD: Duration = Duration::from_secs(2);
/// How long the final frame stays up after a failure.
pub const FAILURE_HOLD: Duration = Duration::from_secs(3);

pub struct SplashScreen {
    pub progress: Progress,
    /// Set once the worker reports its result.
    pub outcome: Option<Result<(), LaunchError>>,
    theme: Theme,
}

impl SplashScreen {
    pub fn new(theme: Theme) -> Self {
        Self {
            progress: Progress::initial(),
            outcome: None,
            theme,
        }
    }

    pub fn apply(&mut self, event: LaunchEvent) {
        match event {
            LaunchEvent::Progress(progress) => self.progress = progress,
            LaunchEvent::Finished(result) => self.outcome = Some(result),
        }
    }

    pub fn is_finished(&self) -> bool {
        self.outcome.is_some()
    }

    fn hold(&self) -> Duration {
        match &self.outcome {
            Some(Ok(())) => SUCCESS_HOLD,
            _ => FAILURE_HOLD,
        }
    }

    pub fn draw(&self, frame: &mut Frame) {
        let theme = &self.theme;
        let area = frame.area();
        frame.render_widget(
            Block::default().style(Style::default().bg(theme.background)),
            area,
        );

        let width = area.width.clamp(20, 64);
        let boxed = super::layout::centered(area, width, 14);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.status));
        let inner = block.inner(boxed);
        frame.render_widget(block, boxed);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Spacer
                Constraint::Length(1), // Title
                Constraint::Length(1), // Subtitle
                Constraint::Length(1), // Version
                Constraint::Length(1), // Spacer
                Constraint::Length(1), // Status
                Constraint::Length(1), // Gauge
                Constraint::Length(1), // Detail
                Constraint::Min(0),
            ])
            .split(inner);

        let centered_line = |frame: &mut Frame, area: Rect, text: &str, style: Style| {
            frame.render_widget(
                Paragraph::new(Line::from(Span::styled(text.to_string(), style)))
                    .alignment(Alignment::Center),
                area,
            );
        };

        centered_line(
            frame,
            rows[1],
            "◢ LUMIUS ◣",
            Style::default().fg(theme.title).add_modifier(Modifier::BOLD),
        );
        centered_line(
            frame,
            rows[2],
            "PICO ENCODER VISUAL SYSTEM",
            Style::default().fg(theme.text),
        );
        centered_line(
            frame,
            rows[3],
            "v1.0 - NEURAL MATRIX",
            Style::default().fg(theme.dim),
        );

        let progress = &self.progress;
        let accent = if progress.failed {
            theme.error
        } else {
            theme.ok
        };
        centered_line(
            frame,
            rows[5],
            &progress.status,
            Style::default().fg(accent).add_modifier(Modifier::BOLD),
        );

        let bar = Rect {
            x: rows[6].x + 2,
            width: rows[6].width.saturating_sub(4),
            ..rows[6]
        };
        frame.render_widget(
            Gauge::default()
                .gauge_style(Style::default().fg(accent).bg(theme.background))
                .percent(progress.percent.min(100))
                .label(format!("{}%", progress.percent)),
            bar,
        );

        centered_line(
            frame,
            rows[7],
            &progress.detail,
            Style::default().fg(theme.dim),
        );
    }
}

/// Show the splash until the launch finishes (plus a short hold) and return its result.
///
/// `q`, Esc or Ctrl-C cancel the launch; the worker reports `Cancelled`.
pub fn run_splash(
    terminal: &mut ratatui::Terminal<impl ratatui::backend::Backend>,
    splash: &mut SplashScreen,
    rx: &LaunchReceiver,
    handle: &LaunchHandle,
    interrupted: &AtomicBool,
) -> io::Result<Result<(), LaunchError>> {
    let mut finished_at: Option<Instant> = None;
    loop {
        for launch_event in rx.drain() {
            splash.apply(launch_event);
        }
        if splash.is_finished() && finished_at.is_none() {
            finished_at = Some(Instant::now());
        }

        terminal
            .draw(|frame| splash.draw(frame))
            .map_err(|e| io::Error::other(e.to_string()))?;

        if let Some(at) = finished_at {
            if at.elapsed() >= splash.hold() {
                break;
            }
        } else if handle.is_finished() {
            // The worker always reports before exiting; pick up a late event.
            match rx.poll() {
                Some(launch_event) => splash.apply(launch_event),
                None => {
                    splash.outcome = Some(Err(LaunchError::Io(io::Error::other(
                        "launch worker exited without a result",
                    ))));
                }
            }
            continue;
        }

        if interrupted.swap(false, Ordering::Relaxed) {
            handle.cancel();
        }

        if event::poll(POLL_INTERVAL)? {
            if let CrosstermEvent::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                let ctrl_c =
                    key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c');
                match key.code {
                    _ if ctrl_c => handle.cancel(),
                    KeyCode::Char('q') | KeyCode::Esc => {
                        if finished_at.is_some() {
                            break;
                        }
                        handle.cancel();
                    }
                    _ => {}
                }
            }
        }
    }
    Ok(splash
        .outcome
        .take()
        .unwrap_or(Err(LaunchError::Cancelled)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::launch::Stage;
    use crate::tui::theme::builtin;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        let mut text = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                text.push_str(buffer[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    #[test]
    fn initial_frame_shows_title() {
        let splash = SplashScreen::new(builtin::neon());
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal.draw(|f| splash.draw(f)).unwrap();
        let text = screen_text(&terminal);
        assert!(text.contains("LUMIUS"));
        assert!(text.contains("PICO ENCODER VISUAL SYSTEM"));
        assert!(text.contains("INITIALIZING SYSTEM..."));
    }

    #[test]
    fn progress_event_updates_text() {
        let mut splash = SplashScreen::new(builtin::neon());
        splash.apply(LaunchEvent::Progress(Progress::at(Stage::Build)));
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal.draw(|f| splash.draw(f)).unwrap();
        let text = screen_text(&terminal);
        assert!(text.contains("COMPILING VISUAL ENGINE..."));
        assert!(text.contains("55%"));
        assert!(!splash.is_finished());
    }

    #[test]
    fn failure_holds_longer() {
        let mut splash = SplashScreen::new(builtin::neon());
        splash.apply(LaunchEvent::Finished(Ok(())));
        assert_eq!(splash.hold(), SUCCESS_HOLD);
        splash.apply(LaunchEvent::Finished(Err(LaunchError::Cancelled)));
        assert_eq!(splash.hold(), FAILURE_HOLD);
    }
}
