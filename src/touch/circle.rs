use glam::Vec2;

use super::{GestureCircle, TouchSlot};
use crate::config::CircleConfig;

/// Screen-axis quadrant of a vector: 0 `(+,+)`, 1 `(-,+)`, 2 `(-,-)`, 3 `(+,-)`.
///
/// Vectors lying on an axis fall into quadrant 0.
fn quadrant(v: Vec2) -> usize {
    match (v.x > 0.0, v.x < 0.0, v.y > 0.0, v.y < 0.0) {
        (true, _, true, _) => 0,
        (_, true, true, _) => 1,
        (_, true, _, true) => 2,
        (true, _, _, true) => 3,
        _ => 0,
    }
}

#[derive(Clone, Copy, Debug, Default)]
struct Hypothesis {
    wrong: usize,
    advances: usize,
}

/// Counts quarter turns of the step direction under both rotation senses.
#[derive(Clone, Copy, Debug, Default)]
struct QuarterWalk {
    clockwise: Hypothesis,
    counter_clockwise: Hypothesis,
}

impl QuarterWalk {
    fn step(&mut self, current: usize, next: usize) {
        if next == current {
            return;
        }
        if next == (current + 1) % 4 {
            self.counter_clockwise.advances += 1;
            self.clockwise.wrong += 1;
        } else if next == (current + 3) % 4 {
            self.clockwise.advances += 1;
            self.counter_clockwise.wrong += 1;
        } else {
            self.clockwise.wrong += 1;
            self.counter_clockwise.wrong += 1;
        }
    }

    /// Winning sense (`true` for clockwise) and its hypothesis. Ties go to
    /// counter-clockwise.
    fn verdict(&self) -> (bool, Hypothesis) {
        if self.counter_clockwise.wrong <= self.clockwise.wrong {
            (false, self.counter_clockwise)
        } else {
            (true, self.clockwise)
        }
    }
}

/// Circle classifier over a finished trajectory.
///
/// Returns the fitted circle when the step directions rotate consistently,
/// the points spread evenly around the centroid and every point stays inside
/// the configured radius band. `rotates` is positive for clockwise motion in
/// a y-up coordinate system.
///
/// Steps lying exactly on a screen axis bucket into quadrant 0 like a
/// `(+,+)` step. Integer pixel paths produce such steps often: a path made
/// only of axis-aligned steps reports no quarter turns, and near-axis float
/// jitter can read as a turn in the opposite sense.
pub fn classify(slot: &TouchSlot, config: &CircleConfig) -> Option<GestureCircle> {
    let points: Vec<Vec2> = slot.trajectory_points().collect();
    let count = points.len();
    if count < config.min_points || count < 3 {
        return None;
    }

    let center = points.iter().copied().sum::<Vec2>() / count as f32;
    let mean_radius = points.iter().map(|p| p.distance(center)).sum::<f32>() / count as f32;
    if mean_radius <= f32::EPSILON {
        return None;
    }

    let mut walk = QuarterWalk::default();
    let mut current = quadrant(points[1] - points[0]);
    for pair in points[1..].windows(2) {
        let next = quadrant(pair[1] - pair[0]);
        walk.step(current, next);
        current = next;
    }
    let (clockwise, winner) = walk.verdict();

    let wrong_percent = winner.wrong * 100 / count;
    if wrong_percent > config.max_wrong_percent as usize {
        log::trace!(
            "touch: circle_reject reason=wrong_turns wrong_percent={}",
            wrong_percent
        );
        return None;
    }

    let mut counts = [0usize; 4];
    for point in &points {
        counts[quadrant(*point - center)] += 1;
    }
    let mean_count = count / 4;
    if counts
        .iter()
        .any(|c| c.abs_diff(mean_count) > config.max_quadrant_skew)
    {
        log::trace!("touch: circle_reject reason=quadrant_skew counts={:?}", counts);
        return None;
    }

    let out_of_band = points.iter().any(|p| {
        let percent = p.distance(center) / mean_radius * 100.0;
        percent < config.min_radius_percent || percent > config.max_radius_percent
    });
    if out_of_band {
        log::trace!(
            "touch: circle_reject reason=radius_band mean_radius={}",
            mean_radius
        );
        return None;
    }

    let turns = (winner.advances as f32 / 4.0).round_ties_even() as i32;
    Some(GestureCircle {
        center,
        radius: mean_radius,
        rotates: if clockwise { turns } else { -turns },
    })
}
