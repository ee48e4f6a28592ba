//! Rotary mapping properties — sweep coverage, dead-zone snapping and the
//! value/angle inverse, checked across every knob's range.

use assert_approx_eq::assert_approx_eq;

use lumius::params::{KnobId, ParamLimits, ParameterSet};
use lumius::rotary::{normalize_to_sweep, pointer_angle, Point, SWEEP_END_DEG, SWEEP_START_DEG};

fn knob_sets() -> Vec<ParameterSet> {
    vec![
        ParameterSet::new(ParamLimits::local()),
        ParameterSet::new(ParamLimits::remote()),
    ]
}

#[test]
fn sweep_endpoints_hit_range_endpoints() {
    for params in knob_sets() {
        for knob in KnobId::ALL {
            let scale = params.knob_scale(knob);
            assert_approx_eq!(scale.value_at_angle(SWEEP_START_DEG), scale.range.min);
            assert_approx_eq!(scale.value_at_angle(SWEEP_END_DEG), scale.range.max);
        }
    }
}

#[test]
fn value_never_decreases_along_the_sweep() {
    for params in knob_sets() {
        for knob in KnobId::ALL {
            let scale = params.knob_scale(knob);
            let mut last = f64::NEG_INFINITY;
            for step in 0..=270 {
                let angle = SWEEP_START_DEG + f64::from(step);
                let value = scale.value_at_angle(angle);
                assert!(value >= last, "{knob:?} at {angle}: {value} < {last}");
                assert!(scale.range.contains(value));
                last = value;
            }
        }
    }
}

#[test]
fn dead_zone_snaps_to_nearest_end() {
    // 180° is the middle of the gap; either side resolves to its own end.
    assert_eq!(normalize_to_sweep(170.0), SWEEP_END_DEG);
    assert_eq!(normalize_to_sweep(-170.0), SWEEP_START_DEG);
    assert_eq!(normalize_to_sweep(136.0), SWEEP_END_DEG);
    assert_eq!(normalize_to_sweep(-136.0), SWEEP_START_DEG);
    for angle in [-135.0, -90.0, 0.0, 45.0, 135.0] {
        assert_eq!(normalize_to_sweep(angle), angle);
    }
    assert_eq!(normalize_to_sweep(360.0 + 45.0), 45.0);
}

#[test]
fn indicator_angle_inverts_value() {
    for params in knob_sets() {
        for knob in KnobId::ALL {
            let scale = params.knob_scale(knob);
            let step = scale.range.span() / 17.0;
            for i in 0..=17 {
                let value = scale.range.min + step * f64::from(i);
                let angle = scale.angle_for(value);
                assert!((SWEEP_START_DEG..=SWEEP_END_DEG).contains(&angle));
                assert_approx_eq!(scale.raw_value(angle), value, 1e-9);
            }
        }
    }
}

#[test]
fn pointer_on_center_keeps_value() {
    let center = Point::new(10.0, 10.0);
    assert!(pointer_angle(center, center).is_none());

    let mut params = ParameterSet::default();
    let before = params.clone();
    for knob in KnobId::ALL {
        assert!(params.drag_knob(knob, center, center).is_none());
    }
    assert_eq!(params, before);
}

#[test]
fn pointer_directions_map_to_expected_values() {
    let center = Point::new(0.0, 0.0);
    let mut params = ParameterSet::default();

    // Straight right is the middle of the sweep.
    params.drag_knob(KnobId::Volume, Point::new(5.0, 0.0), center);
    assert_eq!(params.volume(), 50.0);

    // Straight up is one sixth of the way, rounded to a whole percent.
    params.drag_knob(KnobId::Volume, Point::new(0.0, -5.0), center);
    assert_eq!(params.volume(), 17.0);

    // Halfway along the channel range rounds up.
    params.drag_knob(KnobId::Color, Point::new(3.0, 0.0), center);
    assert_eq!(params.color().r, 128);

    // Straight left sits in the dead zone; just below the axis is the max end.
    params.drag_knob(KnobId::Speed, Point::new(-5.0, 0.01), center);
    assert_eq!(params.speed(), 5.0);
    params.drag_knob(KnobId::Speed, Point::new(-5.0, -0.01), center);
    assert_eq!(params.speed(), 0.1);
}
