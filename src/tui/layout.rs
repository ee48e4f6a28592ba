//! Layout — panel arrangement, button geometry and mouse hit-testing.

use ratatui::layout::{Constraint, Direction, Layout, Position, Rect};

use crate::params::{ColorChannel, Effect, KnobId, MusicCommand};

/// Something the mouse can press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitTarget {
    Effect(Effect),
    Channel(ColorChannel),
    Music(MusicCommand),
    Knob(KnobId),
    /// Connect / disconnect button on the remote bar.
    Connection,
}

/// Clickable regions recorded during the last draw.
#[derive(Debug, Clone, Default)]
pub struct HitMap {
    regions: Vec<(Rect, HitTarget)>,
}

impl HitMap {
    pub fn clear(&mut self) {
        self.regions.clear();
    }

    pub fn push(&mut self, area: Rect, target: HitTarget) {
        if area.width > 0 && area.height > 0 {
            self.regions.push((area, target));
        }
    }

    /// Topmost target under a cell, with its region.
    pub fn hit(&self, column: u16, row: u16) -> Option<(HitTarget, Rect)> {
        let pos = Position::new(column, row);
        self.regions
            .iter()
            .rev()
            .find(|(area, _)| area.contains(pos))
            .map(|(area, target)| (*target, *area))
    }

    /// Region of a target, if it was drawn.
    pub fn area_of(&self, target: HitTarget) -> Option<Rect> {
        self.regions
            .iter()
            .find(|(_, t)| *t == target)
            .map(|(area, _)| *area)
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}

/// Outer areas of the control surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceLayout {
    pub header: Rect,
    /// Remote surfaces only.
    pub connection_bar: Option<Rect>,
    pub generative: Rect,
    pub camera: Rect,
    pub audio: Rect,
    pub rgb: Rect,
    pub control: Rect,
    pub status: Rect,
    pub footer: Rect,
}

impl SurfaceLayout {
    /// Two rows of three panels; the top row gets the larger share.
    pub fn compute(area: Rect, remote: bool) -> Self {
        let bar_height = if remote { 3 } else { 0 };
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),          // Title
                Constraint::Length(bar_height), // Connection bar
                Constraint::Percentage(50),     // Effects and audio
                Constraint::Min(8),             // RGB, control, status
                Constraint::Length(1),          // Key hints
            ])
            .split(area);

        let thirds = [
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ];
        let top = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(thirds)
            .split(rows[2]);
        let bottom = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(thirds)
            .split(rows[3]);

        Self {
            header: rows[0],
            connection_bar: remote.then_some(rows[1]),
            generative: top[0],
            camera: top[1],
            audio: top[2],
            rgb: bottom[0],
            control: bottom[1],
            status: bottom[2],
            footer: rows[4],
        }
    }
}

/// Split `area` into `n` equal stacked buttons, each at most `max_height` rows.
pub fn stacked_buttons(area: Rect, n: u16, max_height: u16) -> Vec<Rect> {
    if n == 0 || area.height == 0 {
        return Vec::new();
    }
    let height = (area.height / n).clamp(1, max_height.max(1));
    (0..n)
        .map(|i| Rect::new(area.x, area.y + i * height, area.width, height))
        .filter(|r| r.bottom() <= area.bottom())
        .collect()
}

/// Split `area` into `n` equal side-by-side buttons.
pub fn row_buttons(area: Rect, n: u32) -> Vec<Rect> {
    if n == 0 {
        return Vec::new();
    }
    let constraints: Vec<Constraint> = (0..n).map(|_| Constraint::Ratio(1, n)).collect();
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .split(area)
        .to_vec()
}

/// Centered sub-rectangle no larger than `width` x `height`.
pub fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    Rect::new(
        area.x + (area.width - w) / 2,
        area.y + (area.height - h) / 2,
        w,
        h,
    )
}
