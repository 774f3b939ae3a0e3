use glam::Vec2;
use log::{debug, trace};

use super::{
    circle, classify,
    events::Subscribers,
    mouse::MouseEmulator,
    normalize_phase, EventKind, Gesture, GestureCircle, GestureParams, InputSource, NoInput,
    PointerSample, RayCaster, RayHit, SubscriptionToken, TouchEvent, TouchPhase, TouchSlot,
};
use crate::config::{ConfigError, GestureConfig};

/// Fixed-capacity pool of touch slots driven once per host frame.
///
/// Pointer ids map onto slots with `id % capacity`. Every sample runs through
/// [`normalize_phase`] and the per-slot state machine; finished touches are
/// classified and all resulting events are dispatched synchronously, before
/// the call that fed the sample returns.
pub struct TouchManager<S = NoInput> {
    config: GestureConfig,
    slots: Vec<TouchSlot>,
    subscribers: Subscribers,
    source: S,
    ray_caster: Option<Box<dyn RayCaster>>,
    mouse: MouseEmulator,
    mouse_emulation: bool,
    frame: Vec<PointerSample>,
}

impl TouchManager<NoInput> {
    /// Manager without a polling source, fed through
    /// [`TouchManager::process_pointers`] and [`TouchManager::process_mouse`].
    pub fn without_source(config: GestureConfig) -> Result<Self, ConfigError> {
        Self::new(config, NoInput)
    }
}

impl<S: InputSource> TouchManager<S> {
    /// Advances the pool by one host frame.
    ///
    /// With mouse emulation enabled the source's button and cursor drive
    /// slot 0; otherwise the source's pointer list is applied in order.
    pub fn tick(&mut self) {
        if self.mouse_emulation {
            let down = self.source.button_down();
            let cursor = self.source.cursor_position();
            self.process_mouse(down, cursor);
            return;
        }

        let mut frame = std::mem::take(&mut self.frame);
        frame.clear();
        self.source.poll(&mut frame);
        self.process_pointers(&frame);
        self.frame = frame;
    }
}

impl<S> TouchManager<S> {
    pub fn new(config: GestureConfig, source: S) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            slots: vec![TouchSlot::default(); config.capacity],
            subscribers: Subscribers::new(),
            source,
            ray_caster: None,
            mouse: MouseEmulator::new(),
            mouse_emulation: config.mouse_emulation,
            frame: Vec::with_capacity(config.capacity),
        })
    }

    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    pub fn set_ray_caster<R>(&mut self, ray_caster: R)
    where
        R: RayCaster + 'static,
    {
        self.ray_caster = Some(Box::new(ray_caster));
    }

    pub fn clear_ray_caster(&mut self) {
        self.ray_caster = None;
    }

    pub fn mouse_emulation(&self) -> bool {
        self.mouse_emulation
    }

    /// Switches between native pointers and the emulated mouse pointer.
    ///
    /// Touches live at the switch belong to the old source: each one fires
    /// `Canceled` and its slot is retired. A half-finished mouse press is
    /// forgotten.
    pub fn set_mouse_emulation(&mut self, enabled: bool) {
        if self.mouse_emulation == enabled {
            return;
        }
        debug!("touch: mouse_emulation enabled={}", enabled);
        self.cancel_live_slots();
        self.mouse.reset();
        self.mouse_emulation = enabled;
    }

    pub fn events_blocked(&self) -> bool {
        self.subscribers.is_blocked()
    }

    /// Suppresses dispatch while slots keep tracking their touches.
    pub fn set_events_blocked(&mut self, blocked: bool) {
        self.subscribers.set_blocked(blocked);
    }

    pub fn subscribe<F>(&mut self, kind: EventKind, observer: F) -> SubscriptionToken
    where
        F: FnMut(&TouchEvent<'_>) + 'static,
    {
        self.subscribers.subscribe(kind, observer)
    }

    pub fn unsubscribe(&mut self, token: SubscriptionToken) -> bool {
        self.subscribers.unsubscribe(token)
    }

    pub fn subscriber_count(&self, kind: EventKind) -> usize {
        self.subscribers.len(kind)
    }

    pub fn slot_index(&self, pointer_id: u64) -> usize {
        (pointer_id % self.slots.len() as u64) as usize
    }

    /// Every slot, live or not, in index order.
    pub fn slots(&self) -> &[TouchSlot] {
        &self.slots
    }

    /// Live slot at `index`; `None` when out of range or not tracking a touch.
    pub fn slot(&self, index: usize) -> Option<&TouchSlot> {
        self.slots.get(index).filter(|slot| slot.valid)
    }

    /// Live slot currently bound to `pointer_id`.
    pub fn slot_for_pointer(&self, pointer_id: u64) -> Option<&TouchSlot> {
        self.slot(self.slot_index(pointer_id))
            .filter(|slot| slot.pointer_id == pointer_id)
    }

    pub fn position(&self, index: usize) -> Option<Vec2> {
        self.slot(index).map(|slot| slot.position)
    }

    pub fn start_position(&self, index: usize) -> Option<Vec2> {
        self.slot(index).map(|slot| slot.start_position)
    }

    pub fn delta_position(&self, index: usize) -> Option<Vec2> {
        self.slot(index).map(|slot| slot.delta_position)
    }

    pub fn phase(&self, index: usize) -> Option<TouchPhase> {
        self.slot(index).map(|slot| slot.phase)
    }

    pub fn active_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.valid).count()
    }

    /// Raycasts from a live slot's current position.
    pub fn pick(&self, index: usize) -> Option<RayHit> {
        let slot = self.slot(index)?;
        let ray_caster = self.ray_caster.as_deref()?;
        ray_caster.raycast(slot.position, self.config.raycast_distance)
    }

    /// Runs the circle classifier over a live slot's trajectory so far.
    pub fn classify_circle(&self, index: usize) -> Option<GestureCircle> {
        self.slot(index)
            .and_then(|slot| circle::classify(slot, &self.config.circle))
    }

    /// Applies native pointer samples in order.
    ///
    /// Feeds the pool directly, whatever [`TouchManager::mouse_emulation`]
    /// says; only [`TouchManager::tick`] selects a source. Callers mixing
    /// this with [`TouchManager::process_mouse`] share slot 0 between pointer
    /// id 0 and the mouse.
    pub fn process_pointers(&mut self, samples: &[PointerSample]) {
        for sample in samples {
            self.apply(*sample);
        }
    }

    /// Samples the mouse adapter once. Like [`TouchManager::process_pointers`]
    /// this bypasses source selection.
    pub fn process_mouse(&mut self, button_down: bool, cursor: Vec2) {
        if let Some(sample) = self.mouse.poll(button_down, cursor) {
            self.apply(sample);
        }
    }

    fn apply(&mut self, sample: PointerSample) {
        let index = self.slot_index(sample.id);
        let slot_valid = self.slots[index].valid;
        let Some(phase) = normalize_phase(slot_valid, sample.phase, sample.delta) else {
            debug!(
                "touch: stale_release slot={} id={} phase={:?}",
                index, sample.id, sample.phase
            );
            return;
        };
        trace!(
            "touch: sample slot={} id={} phase={:?} x={} y={} dx={} dy={}",
            index,
            sample.id,
            phase,
            sample.position.x,
            sample.position.y,
            sample.delta.x,
            sample.delta.y
        );

        let noise_threshold = self.config.noise_threshold;
        match phase {
            TouchPhase::Began => {
                if slot_valid {
                    debug!(
                        "touch: restart slot={} id={} previous_id={}",
                        index, sample.id, self.slots[index].pointer_id
                    );
                } else if sample.phase != TouchPhase::Began {
                    debug!(
                        "touch: resync slot={} id={} reported={:?}",
                        index, sample.id, sample.phase
                    );
                }
                self.slots[index].begin(sample.id, sample.position, sample.delta);
                self.emit(index, EventKind::Began, None);
            }
            TouchPhase::Moved => {
                self.slots[index].advance(sample.position, sample.delta, noise_threshold);
                self.emit(index, EventKind::Moved, None);
                if sample.delta.length() > self.config.directional_threshold {
                    let direction = classify::direction(sample.delta, self.config.vertical_axis);
                    self.emit(index, EventKind::moved_towards(direction), None);
                }
            }
            TouchPhase::Stationary => {
                self.slots[index].hold(sample.position, sample.delta);
            }
            TouchPhase::Ended => {
                self.slots[index].release(
                    TouchPhase::Ended,
                    sample.position,
                    sample.delta,
                    noise_threshold,
                );
                self.resolve_gesture(index);
                self.emit(index, EventKind::Ended, None);
                self.slots[index].retire();
            }
            TouchPhase::Canceled => {
                self.slots[index].release(
                    TouchPhase::Canceled,
                    sample.position,
                    sample.delta,
                    noise_threshold,
                );
                self.emit(index, EventKind::Canceled, None);
                self.slots[index].retire();
            }
        }
    }

    fn cancel_live_slots(&mut self) {
        let noise_threshold = self.config.noise_threshold;
        for index in 0..self.slots.len() {
            if !self.slots[index].valid {
                continue;
            }
            debug!(
                "touch: source_switch_cancel slot={} id={}",
                index, self.slots[index].pointer_id
            );
            let position = self.slots[index].position;
            self.slots[index].release(
                TouchPhase::Canceled,
                position,
                Vec2::ZERO,
                noise_threshold,
            );
            self.emit(index, EventKind::Canceled, None);
            self.slots[index].retire();
        }
    }

    /// Release pipeline: tap, then circle when enabled, then swipe.
    fn resolve_gesture(&mut self, index: usize) {
        let config = self.config;

        if classify::tap(&self.slots[index], config.tap_threshold) {
            self.slots[index].gesture = Gesture::Tap;
            self.emit(index, EventKind::Tap, None);
            if self.subscribers.wants(EventKind::ObjectTap) {
                if let Some(hit) = self.pick(index) {
                    self.emit(index, EventKind::ObjectTap, Some(hit));
                }
            }
            return;
        }

        if config.circle_on_release {
            if let Some(found) = circle::classify(&self.slots[index], &config.circle) {
                let slot = &mut self.slots[index];
                slot.gesture = Gesture::Circle;
                slot.gesture_params = Some(GestureParams::Circle(found));
                self.emit(index, EventKind::Circle, None);
                return;
            }
        }

        let swipe = classify::swipe(
            &self.slots[index],
            config.swipe_min_points,
            config.vertical_axis,
        );
        if let Some(direction) = swipe {
            let slot = &mut self.slots[index];
            slot.gesture = Gesture::Swipe;
            slot.gesture_params = Some(GestureParams::Swipe(direction));
            self.emit(index, EventKind::Swipe, None);
            self.emit(index, EventKind::swiped_towards(direction), None);
            return;
        }

        let slot = &mut self.slots[index];
        debug!(
            "touch: unclassified slot={} points={} travel={}",
            index,
            slot.trajectory.len(),
            slot.travel()
        );
        slot.gesture = Gesture::Other;
    }

    fn emit(&mut self, index: usize, kind: EventKind, hit: Option<RayHit>) {
        let event = TouchEvent {
            kind,
            slot_index: index,
            touch: &self.slots[index],
            hit,
        };
        self.subscribers.dispatch(&event);
    }
}
