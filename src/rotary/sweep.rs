//! Sweep geometry — pointer angles and the 270° indicator range.
//!
//! Angles are in degrees in screen coordinates: x grows to the right and
//! y grows downward, so 0° points right, −90° points up and +90° points down.
//! The sweep runs from −135° (up-left) clockwise through 0° to +135°
//! (down-left). The 90° gap on the left, centered on 180°, is the dead zone.

/// First angle of the sweep (minimum value).
pub const SWEEP_START_DEG: f64 = -135.0;

/// Last angle of the sweep (maximum value).
pub const SWEEP_END_DEG: f64 = 135.0;

/// Angular width of the sweep.
pub const SWEEP_SPAN_DEG: f64 = SWEEP_END_DEG - SWEEP_START_DEG;

/// A 2D position in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Angle of the vector from `center` to `pointer`, in degrees.
///
/// Returns `None` when the pointer sits exactly on the center, where the
/// direction is undefined.
pub fn pointer_angle(pointer: Point, center: Point) -> Option<f64> {
    let dx = pointer.x - center.x;
    let dy = pointer.y - center.y;
    if dx == 0.0 && dy == 0.0 {
        return None;
    }
    Some(dy.atan2(dx).to_degrees())
}

/// Bring any angle into the sweep.
///
/// Angles below the sweep start wrap by +360°; anything left in the dead
/// zone snaps to whichever sweep boundary is nearer.
pub fn normalize_to_sweep(angle_deg: f64) -> f64 {
    if angle_deg.is_nan() {
        return SWEEP_START_DEG;
    }
    // Fold into [-180, 180) first so callers may pass unbounded angles.
    let mut angle = (angle_deg + 180.0).rem_euclid(360.0) - 180.0;
    if angle < SWEEP_START_DEG {
        angle += 360.0;
    }
    if angle <= SWEEP_END_DEG {
        return angle;
    }
    let past_end = angle - SWEEP_END_DEG;
    let before_start = (SWEEP_START_DEG + 360.0) - angle;
    if past_end <= before_start {
        SWEEP_END_DEG
    } else {
        SWEEP_START_DEG
    }
}

/// Position of a normalized angle along the sweep, 0.0–1.0.
pub fn sweep_fraction(angle_deg: f64) -> f64 {
    (normalize_to_sweep(angle_deg) - SWEEP_START_DEG) / SWEEP_SPAN_DEG
}

/// Angle for a position along the sweep (fraction clamped to 0.0–1.0).
pub fn angle_at_fraction(fraction: f64) -> f64 {
    SWEEP_START_DEG + fraction.clamp(0.0, 1.0) * SWEEP_SPAN_DEG
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn pointer_angle_cardinal_directions() {
        let c = Point::new(10.0, 10.0);
        assert_approx_eq!(pointer_angle(Point::new(20.0, 10.0), c).unwrap(), 0.0);
        assert_approx_eq!(pointer_angle(Point::new(10.0, 0.0), c).unwrap(), -90.0);
        assert_approx_eq!(pointer_angle(Point::new(10.0, 20.0), c).unwrap(), 90.0);
    }

    #[test]
    fn pointer_on_center_has_no_angle() {
        let c = Point::new(3.0, 4.0);
        assert_eq!(pointer_angle(c, c), None);
    }

    #[test]
    fn angles_inside_sweep_pass_through() {
        assert_eq!(normalize_to_sweep(0.0), 0.0);
        assert_eq!(normalize_to_sweep(-135.0), -135.0);
        assert_eq!(normalize_to_sweep(135.0), 135.0);
        assert_eq!(normalize_to_sweep(-90.0), -90.0);
    }

    #[test]
    fn dead_zone_snaps_to_nearest_boundary() {
        // Just below the start wraps to ~225°, nearest boundary is the start.
        assert_eq!(normalize_to_sweep(-140.0), SWEEP_START_DEG);
        assert_eq!(normalize_to_sweep(-179.0), SWEEP_START_DEG);
        // Just past the end stays at the end.
        assert_eq!(normalize_to_sweep(140.0), SWEEP_END_DEG);
        assert_eq!(normalize_to_sweep(179.0), SWEEP_END_DEG);
        // Exactly opposite the sweep middle is a tie, resolved toward the end.
        assert_eq!(normalize_to_sweep(180.0), SWEEP_END_DEG);
    }

    #[test]
    fn unbounded_angles_fold_first() {
        assert_approx_eq!(normalize_to_sweep(360.0), 0.0);
        assert_approx_eq!(normalize_to_sweep(-450.0), -90.0);
    }

    #[test]
    fn nan_angle_goes_to_start() {
        assert_eq!(normalize_to_sweep(f64::NAN), SWEEP_START_DEG);
    }

    #[test]
    fn fraction_and_angle_are_inverse() {
        for i in 0..=20 {
            let f = i as f64 / 20.0;
            assert_approx_eq!(sweep_fraction(angle_at_fraction(f)), f);
        }
    }
}
