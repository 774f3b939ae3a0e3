use glam::Vec2;
use statig::{blocking::IntoStateMachineExt as _, prelude::*};

use super::{PointerSample, TouchPhase};

/// Pointer id used for the emulated mouse touch; always lands in slot 0.
pub const MOUSE_POINTER_ID: u64 = 0;

#[derive(Clone, Copy, Debug)]
enum MouseHsmEvent {
    Poll { down: bool, cursor: Vec2 },
}

#[derive(Clone, Copy, Debug, Default)]
struct EmitContext {
    sample: Option<PointerSample>,
}

impl EmitContext {
    fn emit(&mut self, phase: TouchPhase, cursor: Vec2, delta: Vec2) {
        self.sample = Some(PointerSample::new(MOUSE_POINTER_ID, phase, cursor, delta));
    }
}

/// Turns one mouse button's level state into a single-pointer sample stream.
pub(crate) struct MouseEmulator {
    machine: statig::blocking::StateMachine<MouseHsm>,
}

impl Default for MouseEmulator {
    fn default() -> Self {
        Self::new()
    }
}

impl MouseEmulator {
    pub(crate) fn new() -> Self {
        Self {
            machine: MouseHsm::new().state_machine(),
        }
    }

    /// Samples the button once; `None` while the button stays released.
    pub(crate) fn poll(&mut self, down: bool, cursor: Vec2) -> Option<PointerSample> {
        let mut context = EmitContext::default();
        self.machine
            .handle_with_context(&MouseHsmEvent::Poll { down, cursor }, &mut context);
        context.sample
    }

    pub(crate) fn reset(&mut self) {
        *self = Self::new();
    }
}

struct MouseHsm {
    last_cursor: Vec2,
}

impl MouseHsm {
    fn new() -> Self {
        Self {
            last_cursor: Vec2::ZERO,
        }
    }

    fn step(&mut self, cursor: Vec2) -> Vec2 {
        let delta = cursor - self.last_cursor;
        self.last_cursor = cursor;
        delta
    }
}

#[state_machine(initial = "State::released()")]
impl MouseHsm {
    #[state]
    fn released(&mut self, context: &mut EmitContext, event: &MouseHsmEvent) -> Outcome<State> {
        match event {
            MouseHsmEvent::Poll { down, cursor } => {
                if !*down {
                    return Handled;
                }
                self.last_cursor = *cursor;
                context.emit(TouchPhase::Began, *cursor, Vec2::ZERO);
                Transition(State::pressed())
            }
        }
    }

    #[state]
    fn pressed(&mut self, context: &mut EmitContext, event: &MouseHsmEvent) -> Outcome<State> {
        match event {
            MouseHsmEvent::Poll { down, cursor } => {
                let delta = self.step(*cursor);
                if *down {
                    // Zero deltas are folded into Stationary by the pool.
                    context.emit(TouchPhase::Moved, *cursor, delta);
                    Handled
                } else {
                    context.emit(TouchPhase::Ended, *cursor, delta);
                    Transition(State::released())
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn phase(sample: Option<PointerSample>) -> Option<TouchPhase> {
        sample.map(|s| s.phase)
    }

    #[test]
    fn idle_button_emits_nothing() {
        let mut mouse = MouseEmulator::new();
        assert_eq!(mouse.poll(false, Vec2::new(10.0, 10.0)), None);
        assert_eq!(mouse.poll(false, Vec2::new(30.0, 10.0)), None);
    }

    #[test]
    fn press_drag_release_maps_to_touch_phases() {
        let mut mouse = MouseEmulator::new();

        let began = mouse.poll(true, Vec2::new(10.0, 20.0)).expect("began");
        assert_eq!(began.phase, TouchPhase::Began);
        assert_eq!(began.id, MOUSE_POINTER_ID);
        assert_eq!(began.delta, Vec2::ZERO);

        let moved = mouse.poll(true, Vec2::new(14.0, 17.0)).expect("moved");
        assert_eq!(moved.phase, TouchPhase::Moved);
        assert_eq!(moved.delta, Vec2::new(4.0, -3.0));

        let held = mouse.poll(true, Vec2::new(14.0, 17.0)).expect("held");
        assert_eq!(held.delta, Vec2::ZERO);

        let ended = mouse.poll(false, Vec2::new(15.0, 17.0)).expect("ended");
        assert_eq!(ended.phase, TouchPhase::Ended);
        assert_eq!(ended.delta, Vec2::new(1.0, 0.0));

        assert_eq!(mouse.poll(false, Vec2::new(15.0, 17.0)), None);
    }

    #[test]
    fn reset_forgets_a_held_button() {
        let mut mouse = MouseEmulator::new();
        assert_eq!(phase(mouse.poll(true, Vec2::ZERO)), Some(TouchPhase::Began));

        mouse.reset();

        assert_eq!(phase(mouse.poll(true, Vec2::ZERO)), Some(TouchPhase::Began));
    }
}
