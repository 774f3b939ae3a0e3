use glam::Vec2;

use super::{SwipeDirection, TouchSlot};
use crate::config::VerticalAxis;

/// Tap ("dot") when the touch barely moved over its whole lifetime.
///
/// Only the cumulative per-axis travel counts; duration and trajectory length
/// are ignored.
pub fn tap(slot: &TouchSlot, threshold: f32) -> bool {
    slot.travel() <= threshold
}

/// Swipe direction from the net displacement of a finished touch.
///
/// The touch must have left at least `min_points` samples above the noise
/// threshold. The last sample's delta plays no part in the verdict.
pub fn swipe(slot: &TouchSlot, min_points: usize, axis: VerticalAxis) -> Option<SwipeDirection> {
    if slot.trajectory.len() < min_points {
        return None;
    }
    Some(direction(slot.displacement(), axis))
}

/// Dominant direction of `delta`; ties between the axes read as vertical.
pub fn direction(delta: Vec2, axis: VerticalAxis) -> SwipeDirection {
    if delta.x.abs() > delta.y.abs() {
        if delta.x > 0.0 {
            SwipeDirection::Right
        } else {
            SwipeDirection::Left
        }
    } else {
        let positive = delta.y > 0.0;
        match (axis, positive) {
            (VerticalAxis::Up, true) | (VerticalAxis::Down, false) => SwipeDirection::Up,
            (VerticalAxis::Up, false) | (VerticalAxis::Down, true) => SwipeDirection::Down,
        }
    }
}
