use std::f64::consts::TAU;

use crate::angle::normalize_unsigned;

/// Maps an absolute marker angle onto `[0, frame_count)`.
///
/// Returns `None` when there are no frames to show.
pub fn frame_index(angle: f64, frame_count: usize) -> Option<usize> {
    if frame_count == 0 {
        return None;
    }
    let turn = normalize_unsigned(angle) / TAU;
    let scaled = (turn * frame_count as f64).floor() as usize;
    Some(scaled % frame_count)
}

/// Frames bound to the car being inspected in the 360 view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CarouselContext {
    pub car_index: usize,
    pub frame_count: usize,
    pub frame_index: usize,
}

impl CarouselContext {
    pub fn new(car_index: usize, frame_count: usize) -> Self {
        Self {
            car_index,
            frame_count,
            frame_index: 0,
        }
    }

    pub fn track(&mut self, angle: f64) {
        if let Some(index) = frame_index(angle, self.frame_count) {
            self.frame_index = index;
        }
    }
}
