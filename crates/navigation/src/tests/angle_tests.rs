use super::*;

#[test]
fn first_sample_only_seeds_baseline() {
    let mut tracker = AngleDeltaTracker::default();
    assert!(!tracker.is_seeded());
    assert_eq!(tracker.observe(1.0), None);
    assert!(tracker.is_seeded());
}

#[test]
fn jitter_inside_dead_zone_is_suppressed() {
    let mut tracker = AngleDeltaTracker::default();
    tracker.observe(0.5);
    for sample in [0.55, 0.45, 0.58, 0.42, 0.5] {
        assert_eq!(tracker.observe(sample), None, "sample {sample}");
    }
}

#[test]
fn jitter_across_the_pi_boundary_is_suppressed() {
    let mut tracker = AngleDeltaTracker::default();
    tracker.observe(PI - 0.02);
    assert_eq!(tracker.observe(-PI + 0.02), None);
}

#[test]
fn increasing_samples_always_step_clockwise() {
    let mut tracker = AngleDeltaTracker::default();
    let mut angle = 0.0;
    tracker.observe(angle);
    for _ in 0..40 {
        angle += 0.25;
        assert_eq!(tracker.observe(angle), Some(RotationStep::Clockwise));
    }
}

#[test]
fn decreasing_samples_always_step_counter_clockwise() {
    let mut tracker = AngleDeltaTracker::default();
    let mut angle = 3.0;
    tracker.observe(angle);
    for _ in 0..40 {
        angle -= 0.25;
        assert_eq!(tracker.observe(angle), Some(RotationStep::CounterClockwise));
    }
}

#[test]
fn wrap_delta_takes_the_short_way_round() {
    let delta = wrap_delta(PI - 0.01, -PI + 0.01);
    assert!(delta > 0.0 && delta < 0.03, "delta was {delta}");

    let delta = wrap_delta(-PI + 0.01, PI - 0.01);
    assert!(delta < 0.0 && delta > -0.03, "delta was {delta}");
}

#[test]
fn crossing_pi_boundary_steps_in_direction_of_travel() {
    let mut tracker = AngleDeltaTracker::default();
    tracker.observe(PI - 0.1);
    assert_eq!(tracker.observe(-PI + 0.1), Some(RotationStep::Clockwise));
}

#[test]
fn unsigned_source_convention_is_accepted() {
    let mut tracker = AngleDeltaTracker::default();
    tracker.observe(6.2);
    assert_eq!(tracker.observe(0.2), Some(RotationStep::Clockwise));
}

#[test]
fn baseline_holds_until_threshold_is_crossed() {
    let mut tracker = AngleDeltaTracker::default();
    tracker.observe(0.0);
    assert_eq!(tracker.observe(0.08), None);
    assert_eq!(tracker.observe(0.11), Some(RotationStep::Clockwise));
    assert_eq!(tracker.observe(0.15), None);
}

#[test]
fn reset_discards_baseline() {
    let mut tracker = AngleDeltaTracker::default();
    tracker.observe(0.0);
    tracker.reset();
    assert_eq!(tracker.observe(2.0), None);
    assert_eq!(tracker.observe(2.5), Some(RotationStep::Clockwise));
}

#[test]
fn normalization_ranges() {
    assert!((normalize_signed(3.0 * PI / 2.0) + PI / 2.0).abs() < 1e-12);
    assert!((normalize_signed(PI) - PI).abs() < 1e-12);
    assert!((normalize_unsigned(-PI / 2.0) - 3.0 * PI / 2.0).abs() < 1e-12);
    assert_eq!(normalize_unsigned(-1e-300), 0.0);
}

#[test]
fn cyclic_cursor_wraps_at_both_ends() {
    assert_eq!(RotationStep::CounterClockwise.apply_cyclic(0, 3), 2);
    assert_eq!(RotationStep::Clockwise.apply_cyclic(2, 3), 0);
    assert_eq!(RotationStep::Clockwise.apply_cyclic(0, 0), 0);
}

#[test]
fn non_finite_samples_never_step_or_move_the_baseline() {
    let mut tracker = AngleDeltaTracker::default();
    assert_eq!(tracker.observe(f64::NAN), None);
    assert!(!tracker.is_seeded());

    tracker.observe(0.0);
    for sample in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
        assert_eq!(tracker.observe(sample), None);
    }
    for _ in 0..5 {
        assert_eq!(tracker.observe(0.0), None);
    }
    assert_eq!(tracker.observe(0.3), Some(RotationStep::Clockwise));
}

#[test]
fn non_finite_threshold_uses_default_dead_zone() {
    let mut tracker = AngleDeltaTracker::new(f64::NAN);
    tracker.observe(0.0);
    assert_eq!(tracker.observe(0.05), None);
    assert_eq!(tracker.observe(0.2), Some(RotationStep::Clockwise));
}
