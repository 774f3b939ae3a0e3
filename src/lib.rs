//! Pointer ingestion and gesture classification.
//!
//! A [`TouchManager`] owns a fixed pool of [`TouchSlot`]s. Each host frame it
//! polls an [`InputSource`] (or a single emulated mouse pointer), runs every
//! slot through one phase state machine, classifies finished touches as tap,
//! swipe or circle, and fans the results out to subscribed observers.

pub mod config;
pub mod touch;

pub use config::{CircleConfig, ConfigError, GestureConfig, VerticalAxis};
pub use touch::{
    circle, classify, normalize_phase, EventKind, Gesture, GestureCircle, GestureParams,
    InputSource, NoInput, PointerSample, RayCaster, RayHit, SubscriptionToken, SwipeDirection,
    TouchEvent, TouchManager, TouchPhase, TouchSlot, TrajectorySample, MOUSE_POINTER_ID,
};

pub use glam::{Vec2, Vec3};
