use glam::Vec2;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TouchPhase {
    #[default]
    Began,
    Moved,
    Stationary,
    Ended,
    Canceled,
}

impl TouchPhase {
    pub fn is_terminal(self) -> bool {
        matches!(self, TouchPhase::Ended | TouchPhase::Canceled)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Gesture {
    #[default]
    None,
    Tap,
    Swipe,
    Circle,
    Other,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SwipeDirection {
    Left,
    Right,
    Up,
    Down,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GestureCircle {
    pub center: Vec2,
    /// Mean distance of the trajectory points from `center`.
    pub radius: f32,
    /// Whole rotations; negative when the counter-clockwise reading won.
    pub rotates: i32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GestureParams {
    Swipe(SwipeDirection),
    Circle(GestureCircle),
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TrajectorySample {
    pub position: Vec2,
    /// Offset from the previously recorded sample (or the start position).
    pub delta: Vec2,
    pub distance_x: f32,
    pub distance_y: f32,
}

/// Per-finger record owned by the pointer pool.
///
/// Slots are allocated once and recycled: a new touch resets the slot through
/// [`TouchSlot::begin`], and [`TouchSlot::retire`] hands it back to the pool
/// after the terminal phase has been dispatched.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TouchSlot {
    pub valid: bool,
    pub pointer_id: u64,
    pub position: Vec2,
    pub start_position: Vec2,
    pub delta_position: Vec2,
    pub distance_x: f32,
    pub distance_y: f32,
    pub trajectory: Vec<TrajectorySample>,
    pub phase: TouchPhase,
    pub gesture: Gesture,
    pub gesture_params: Option<GestureParams>,
}

impl TouchSlot {
    /// Builds a finished touch from raw trajectory points.
    ///
    /// Accumulators are derived from consecutive points, which is what the
    /// pool would have recorded for the same path sampled above the noise
    /// threshold.
    pub fn from_points(start: Vec2, points: &[Vec2]) -> Self {
        let mut slot = TouchSlot::default();
        slot.begin(0, start, Vec2::ZERO);
        let mut last = start;
        for point in points {
            let delta = *point - last;
            slot.distance_x += delta.x.abs();
            slot.distance_y += delta.y.abs();
            slot.trajectory.push(TrajectorySample {
                position: *point,
                delta,
                distance_x: slot.distance_x,
                distance_y: slot.distance_y,
            });
            last = *point;
        }
        slot.position = last;
        slot.phase = TouchPhase::Ended;
        slot
    }

    pub fn trajectory_points(&self) -> impl ExactSizeIterator<Item = Vec2> + '_ {
        self.trajectory.iter().map(|sample| sample.position)
    }

    /// Net displacement since the touch began.
    pub fn displacement(&self) -> Vec2 {
        self.position - self.start_position
    }

    pub fn travel(&self) -> f32 {
        self.distance_x + self.distance_y
    }

    pub(crate) fn begin(&mut self, pointer_id: u64, position: Vec2, delta: Vec2) {
        self.valid = true;
        self.pointer_id = pointer_id;
        self.position = position;
        self.start_position = position;
        self.delta_position = delta;
        self.distance_x = 0.0;
        self.distance_y = 0.0;
        self.trajectory.clear();
        self.phase = TouchPhase::Began;
        self.gesture = Gesture::None;
        self.gesture_params = None;
    }

    pub(crate) fn advance(&mut self, position: Vec2, delta: Vec2, noise_threshold: f32) {
        self.phase = TouchPhase::Moved;
        self.position = position;
        self.delta_position = delta;
        self.distance_x += delta.x.abs();
        self.distance_y += delta.y.abs();
        self.record(noise_threshold);
    }

    pub(crate) fn hold(&mut self, position: Vec2, delta: Vec2) {
        self.phase = TouchPhase::Stationary;
        self.position = position;
        self.delta_position = delta;
    }

    pub(crate) fn release(
        &mut self,
        phase: TouchPhase,
        position: Vec2,
        delta: Vec2,
        noise_threshold: f32,
    ) {
        self.phase = phase;
        self.position = position;
        self.delta_position = delta;
        if phase == TouchPhase::Ended {
            self.record(noise_threshold);
        }
    }

    pub(crate) fn retire(&mut self) {
        self.valid = false;
        self.trajectory.clear();
    }

    fn record(&mut self, noise_threshold: f32) {
        let anchor = self
            .trajectory
            .last()
            .map_or(self.start_position, |sample| sample.position);
        let delta = self.position - anchor;
        if delta.length() <= noise_threshold {
            return;
        }
        self.trajectory.push(TrajectorySample {
            position: self.position,
            delta,
            distance_x: self.distance_x,
            distance_y: self.distance_y,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn begin_resets_previous_touch() {
        let mut slot = TouchSlot::from_points(Vec2::ZERO, &[Vec2::new(20.0, 0.0)]);
        slot.gesture = Gesture::Swipe;
        slot.gesture_params = Some(GestureParams::Swipe(SwipeDirection::Right));

        slot.begin(7, Vec2::new(5.0, 5.0), Vec2::ZERO);

        assert!(slot.valid);
        assert_eq!(slot.pointer_id, 7);
        assert_eq!(slot.start_position, Vec2::new(5.0, 5.0));
        assert!(slot.trajectory.is_empty());
        assert_eq!(slot.travel(), 0.0);
        assert_eq!(slot.phase, TouchPhase::Began);
        assert_eq!(slot.gesture, Gesture::None);
        assert_eq!(slot.gesture_params, None);
    }

    #[test]
    fn small_moves_accumulate_without_recording() {
        let mut slot = TouchSlot::default();
        slot.begin(0, Vec2::ZERO, Vec2::ZERO);

        slot.advance(Vec2::new(3.0, -1.0), Vec2::new(3.0, -1.0), 8.0);
        slot.advance(Vec2::new(1.0, 1.0), Vec2::new(-2.0, 2.0), 8.0);

        assert_eq!(slot.distance_x, 5.0);
        assert_eq!(slot.distance_y, 3.0);
        assert!(slot.trajectory.is_empty());
    }

    #[test]
    fn recording_is_anchored_on_last_kept_point() {
        let mut slot = TouchSlot::default();
        slot.begin(0, Vec2::ZERO, Vec2::ZERO);

        // Each step is below the threshold but the sum crosses it.
        for x in [5.0, 10.0, 15.0, 20.0] {
            slot.advance(Vec2::new(x, 0.0), Vec2::new(5.0, 0.0), 8.0);
        }

        let kept: Vec<Vec2> = slot.trajectory_points().collect();
        assert_eq!(kept, vec![Vec2::new(10.0, 0.0), Vec2::new(20.0, 0.0)]);
        assert_eq!(slot.trajectory[1].delta, Vec2::new(10.0, 0.0));
        assert_eq!(slot.trajectory[1].distance_x, 20.0);
    }

    #[test]
    fn retire_keeps_verdict_but_drops_trajectory() {
        let mut slot = TouchSlot::from_points(Vec2::ZERO, &[Vec2::new(20.0, 0.0)]);
        slot.gesture = Gesture::Other;

        slot.retire();

        assert!(!slot.valid);
        assert!(slot.trajectory.is_empty());
        assert_eq!(slot.gesture, Gesture::Other);
        assert_eq!(slot.phase, TouchPhase::Ended);
    }
}
