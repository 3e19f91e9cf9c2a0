//! Relative-rotation tracking for the menu states.
//!
//! A marker twist is turned into at most one discrete [`RotationStep`] per
//! threshold crossing. The first sample after a [`AngleDeltaTracker::reset`]
//! only seeds the baseline.

use std::f64::consts::{PI, TAU};

/// Dead zone around the baseline, ~5.7 degrees.
pub const DEFAULT_ANGLE_THRESHOLD: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationStep {
    Clockwise,
    CounterClockwise,
}

impl RotationStep {
    /// Moves a cyclic cursor by one step inside `[0, len)`.
    pub fn apply_cyclic(self, index: usize, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        match self {
            Self::Clockwise => (index + 1) % len,
            Self::CounterClockwise => (index + len - 1) % len,
        }
    }
}

/// Normalizes any angle to signed radians in `(-pi, pi]`.
pub fn normalize_signed(angle: f64) -> f64 {
    let unsigned = normalize_unsigned(angle);
    if unsigned > PI {
        unsigned - TAU
    } else {
        unsigned
    }
}

/// Normalizes any angle to `[0, 2pi)`.
pub fn normalize_unsigned(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs.
    if wrapped >= TAU {
        0.0
    } else {
        wrapped
    }
}

/// Shortest signed rotation from `from` to `to`.
pub fn wrap_delta(from: f64, to: f64) -> f64 {
    let mut raw = to - from;
    if raw > PI {
        raw -= TAU;
    } else if raw < -PI {
        raw += TAU;
    }
    raw
}

#[derive(Debug, Clone)]
pub struct AngleDeltaTracker {
    baseline: Option<f64>,
    threshold: f64,
}

impl Default for AngleDeltaTracker {
    fn default() -> Self {
        Self::new(DEFAULT_ANGLE_THRESHOLD)
    }
}

impl AngleDeltaTracker {
    /// A non-finite threshold falls back to [`DEFAULT_ANGLE_THRESHOLD`].
    pub fn new(threshold: f64) -> Self {
        let threshold = if threshold.is_finite() {
            threshold.abs()
        } else {
            DEFAULT_ANGLE_THRESHOLD
        };
        Self {
            baseline: None,
            threshold,
        }
    }

    pub fn reset(&mut self) {
        self.baseline = None;
    }

    pub fn is_seeded(&self) -> bool {
        self.baseline.is_some()
    }

    /// Non-finite samples are ignored and leave the baseline untouched.
    pub fn observe(&mut self, angle: f64) -> Option<RotationStep> {
        if !angle.is_finite() {
            return None;
        }
        let angle = normalize_signed(angle);
        let Some(baseline) = self.baseline else {
            self.baseline = Some(angle);
            return None;
        };

        let delta = wrap_delta(baseline, angle);
        if delta.abs() <= self.threshold {
            return None;
        }

        self.baseline = Some(angle);
        Some(if delta > 0.0 {
            RotationStep::Clockwise
        } else {
            RotationStep::CounterClockwise
        })
    }
}

#[cfg(test)]
#[path = "tests/angle_tests.rs"]
mod tests;
