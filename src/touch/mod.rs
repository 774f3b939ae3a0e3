pub mod circle;
pub mod classify;
mod core;
mod events;
mod input;
mod mouse;
mod normalize;
mod slot;

pub use self::core::TouchManager;
pub use events::{EventKind, SubscriptionToken, TouchEvent};
pub use input::{InputSource, NoInput, PointerSample, RayCaster, RayHit};
pub use mouse::MOUSE_POINTER_ID;
pub use normalize::normalize_phase;
pub use slot::{
    Gesture, GestureCircle, GestureParams, SwipeDirection, TouchPhase, TouchSlot,
    TrajectorySample,
};
