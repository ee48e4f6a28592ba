//! Rotary knob widget — braille canvas dial plus label and value lines.
//!
//! Terminal cells are about twice as tall as they are wide, so geometry is
//! computed in "physical" units where one row is [`CELL_ASPECT`] columns.

use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::symbols::Marker;
use ratatui::widgets::canvas::{Canvas, Circle, Line as CanvasLine};
use ratatui::widgets::{Paragraph, Widget};

use super::theme::Theme;
use crate::rotary::Point;

/// Height of a cell measured in cell widths.
pub const CELL_ASPECT: f64 = 2.0;

const RING_RADIUS: f64 = 0.92;
const INNER_RADIUS: f64 = 0.7;
const INDICATOR_LENGTH: f64 = 0.78;

/// Dial area inside a knob widget: everything except the label and value rows.
pub fn dial_area(area: Rect) -> Rect {
    if area.height < 3 {
        return Rect::new(area.x, area.y, area.width, 0);
    }
    Rect::new(area.x, area.y + 1, area.width, area.height - 2)
}

/// Center of a dial in physical units.
pub fn dial_center(dial: Rect) -> Point {
    Point::new(
        f64::from(dial.x) + f64::from(dial.width) / 2.0,
        (f64::from(dial.y) + f64::from(dial.height) / 2.0) * CELL_ASPECT,
    )
}

/// Center of a terminal cell in physical units.
pub fn cell_point(column: u16, row: u16) -> Point {
    Point::new(
        f64::from(column) + 0.5,
        (f64::from(row) + 0.5) * CELL_ASPECT,
    )
}

/// End of the indicator for `angle_deg` in canvas units (y grows upward).
pub fn indicator_tip(angle_deg: f64, length: f64) -> (f64, f64) {
    let rad = angle_deg.to_radians();
    (length * rad.cos(), -length * rad.sin())
}

pub struct Knob<'a> {
    pub label: &'a str,
    pub value_text: String,
    pub angle_deg: f64,
    pub focused: bool,
    pub theme: &'a Theme,
}

impl Widget for Knob<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }
        let theme = self.theme;
        let label_style = if self.focused {
            Style::default()
                .fg(theme.border_focused)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.text)
        };
        let label = if self.focused {
            format!("▸ {} ◂", self.label)
        } else {
            self.label.to_string()
        };
        Paragraph::new(label)
            .style(label_style)
            .alignment(Alignment::Center)
            .render(Rect::new(area.x, area.y, area.width, 1), buf);

        let dial = dial_area(area);
        if dial.height == 0 {
            return;
        }

        let x_half = f64::from(dial.width) / (f64::from(dial.height) * CELL_ASPECT);
        let (tip_x, tip_y) = indicator_tip(self.angle_deg, INDICATOR_LENGTH);
        let (start_x, start_y) = indicator_tip(crate::rotary::SWEEP_START_DEG, RING_RADIUS);
        let (end_x, end_y) = indicator_tip(crate::rotary::SWEEP_END_DEG, RING_RADIUS);
        let ring = theme.knob_ring;
        let inner = theme.knob_inner;
        let indicator = theme.knob_indicator;
        Canvas::default()
            .marker(Marker::Braille)
            .x_bounds([-x_half, x_half])
            .y_bounds([-1.0, 1.0])
            .paint(move |ctx| {
                ctx.draw(&Circle {
                    x: 0.0,
                    y: 0.0,
                    radius: RING_RADIUS,
                    color: ring,
                });
                ctx.draw(&Circle {
                    x: 0.0,
                    y: 0.0,
                    radius: INNER_RADIUS,
                    color: inner,
                });
                // Sweep end stops
                ctx.draw(&CanvasLine::new(
                    start_x * 0.8,
                    start_y * 0.8,
                    start_x,
                    start_y,
                    inner,
                ));
                ctx.draw(&CanvasLine::new(end_x * 0.8, end_y * 0.8, end_x, end_y, inner));
                ctx.draw(&CanvasLine::new(0.0, 0.0, tip_x, tip_y, indicator));
                ctx.draw(&Circle {
                    x: 0.0,
                    y: 0.0,
                    radius: 0.06,
                    color: indicator,
                });
            })
            .render(dial, buf);

        Paragraph::new(self.value_text)
            .style(
                Style::default()
                    .fg(theme.knob_value)
                    .add_modifier(Modifier::BOLD),
            )
            .alignment(Alignment::Center)
            .render(
                Rect::new(area.x, area.bottom().saturating_sub(1), area.width, 1),
                buf,
            );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rotary::pointer_angle;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn dial_excludes_label_rows() {
        let dial = dial_area(Rect::new(4, 10, 20, 8));
        assert_eq!(dial, Rect::new(4, 11, 20, 6));
        assert_eq!(dial_area(Rect::new(0, 0, 5, 2)).height, 0);
    }

    #[test]
    fn center_cell_has_no_angle() {
        let dial = Rect::new(0, 0, 11, 5);
        let center = dial_center(dial);
        // Odd sizes put a cell center exactly on the dial center.
        assert!(pointer_angle(cell_point(5, 2), center).is_none());
    }

    #[test]
    fn cell_above_center_points_up() {
        let dial = Rect::new(0, 0, 11, 5);
        let angle = pointer_angle(cell_point(5, 0), dial_center(dial)).unwrap();
        assert_approx_eq!(angle, -90.0);
        let angle = pointer_angle(cell_point(10, 2), dial_center(dial)).unwrap();
        assert_approx_eq!(angle, 0.0);
    }

    #[test]
    fn aspect_makes_diagonal_cells_square() {
        // Two columns right and one row down is 45 degrees physically.
        let dial = Rect::new(0, 0, 11, 5);
        let angle = pointer_angle(cell_point(7, 3), dial_center(dial)).unwrap();
        assert_approx_eq!(angle, 45.0);
    }

    #[test]
    fn indicator_tip_flips_y_for_canvas() {
        let (x, y) = indicator_tip(-90.0, 1.0);
        assert_approx_eq!(x, 0.0);
        assert_approx_eq!(y, 1.0);
        let (x, y) = indicator_tip(0.0, 0.5);
        assert_approx_eq!(x, 0.5);
        assert_approx_eq!(y, 0.0);
    }
}
