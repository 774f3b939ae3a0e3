use glam::Vec2;

use super::TouchPhase;

/// Maps a platform-reported phase onto the slot state machine.
///
/// An invalid slot can only be entered through `Began`; stale move reports
/// resynchronize the slot by starting a new touch, while stale releases are
/// dropped. On a live slot the delta decides between `Moved` and
/// `Stationary` regardless of what the platform claimed.
pub fn normalize_phase(slot_valid: bool, reported: TouchPhase, delta: Vec2) -> Option<TouchPhase> {
    if !slot_valid {
        return match reported {
            TouchPhase::Began | TouchPhase::Moved | TouchPhase::Stationary => {
                Some(TouchPhase::Began)
            }
            TouchPhase::Ended | TouchPhase::Canceled => None,
        };
    }

    match reported {
        TouchPhase::Began => Some(TouchPhase::Began),
        TouchPhase::Moved | TouchPhase::Stationary => {
            if is_still(delta) {
                Some(TouchPhase::Stationary)
            } else {
                Some(TouchPhase::Moved)
            }
        }
        TouchPhase::Ended => Some(TouchPhase::Ended),
        TouchPhase::Canceled => Some(TouchPhase::Canceled),
    }
}

fn is_still(delta: Vec2) -> bool {
    delta.length_squared() <= f32::EPSILON * f32::EPSILON
}
