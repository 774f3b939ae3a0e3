use glam::{Vec2, Vec3};

use super::TouchPhase;

/// One platform pointer report for the current frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointerSample {
    pub id: u64,
    pub position: Vec2,
    pub delta: Vec2,
    pub phase: TouchPhase,
}

impl PointerSample {
    pub fn new(id: u64, phase: TouchPhase, position: Vec2, delta: Vec2) -> Self {
        Self {
            id,
            position,
            delta,
            phase,
        }
    }
}

/// Host input capability polled once per tick.
///
/// Sources without a mouse keep the default mouse methods, which report a
/// released button at the origin.
pub trait InputSource {
    /// Appends the currently active pointers to `out`.
    fn poll(&mut self, out: &mut Vec<PointerSample>);

    fn button_down(&self) -> bool {
        false
    }

    fn cursor_position(&self) -> Vec2 {
        Vec2::ZERO
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayHit {
    pub object_id: u64,
    pub world_point: Vec3,
}

/// Physics capability: first object hit by a ray cast from a screen point.
pub trait RayCaster {
    fn raycast(&self, origin: Vec2, max_distance: f32) -> Option<RayHit>;
}

/// Source that never reports a pointer.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoInput;

impl InputSource for NoInput {
    fn poll(&mut self, _out: &mut Vec<PointerSample>) {}
}

impl<F> RayCaster for F
where
    F: Fn(Vec2, f32) -> Option<RayHit>,
{
    fn raycast(&self, origin: Vec2, max_distance: f32) -> Option<RayHit> {
        self(origin, max_distance)
    }
}
