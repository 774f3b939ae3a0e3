use std::panic::{self, AssertUnwindSafe};

use super::{RayHit, SwipeDirection, TouchSlot};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    Began,
    Moved,
    Ended,
    Canceled,
    MoveRight,
    MoveLeft,
    MoveUp,
    MoveDown,
    Tap,
    ObjectTap,
    Swipe,
    SwipeRight,
    SwipeLeft,
    SwipeUp,
    SwipeDown,
    Circle,
}

impl EventKind {
    pub const COUNT: usize = 16;

    pub const ALL: [EventKind; Self::COUNT] = [
        EventKind::Began,
        EventKind::Moved,
        EventKind::Ended,
        EventKind::Canceled,
        EventKind::MoveRight,
        EventKind::MoveLeft,
        EventKind::MoveUp,
        EventKind::MoveDown,
        EventKind::Tap,
        EventKind::ObjectTap,
        EventKind::Swipe,
        EventKind::SwipeRight,
        EventKind::SwipeLeft,
        EventKind::SwipeUp,
        EventKind::SwipeDown,
        EventKind::Circle,
    ];

    pub fn moved_towards(direction: SwipeDirection) -> Self {
        match direction {
            SwipeDirection::Right => EventKind::MoveRight,
            SwipeDirection::Left => EventKind::MoveLeft,
            SwipeDirection::Up => EventKind::MoveUp,
            SwipeDirection::Down => EventKind::MoveDown,
        }
    }

    pub fn swiped_towards(direction: SwipeDirection) -> Self {
        match direction {
            SwipeDirection::Right => EventKind::SwipeRight,
            SwipeDirection::Left => EventKind::SwipeLeft,
            SwipeDirection::Up => EventKind::SwipeUp,
            SwipeDirection::Down => EventKind::SwipeDown,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            EventKind::Began => "began",
            EventKind::Moved => "moved",
            EventKind::Ended => "ended",
            EventKind::Canceled => "canceled",
            EventKind::MoveRight => "move_right",
            EventKind::MoveLeft => "move_left",
            EventKind::MoveUp => "move_up",
            EventKind::MoveDown => "move_down",
            EventKind::Tap => "tap",
            EventKind::ObjectTap => "object_tap",
            EventKind::Swipe => "swipe",
            EventKind::SwipeRight => "swipe_right",
            EventKind::SwipeLeft => "swipe_left",
            EventKind::SwipeUp => "swipe_up",
            EventKind::SwipeDown => "swipe_down",
            EventKind::Circle => "circle",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim().to_ascii_lowercase();
        Self::ALL.into_iter().find(|kind| kind.label() == label)
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// What an observer sees: the event kind plus a read-only view of the slot at
/// dispatch time.
#[derive(Clone, Copy, Debug)]
pub struct TouchEvent<'a> {
    pub kind: EventKind,
    pub slot_index: usize,
    pub touch: &'a TouchSlot,
    /// Object under the touch, only set for [`EventKind::ObjectTap`].
    pub hit: Option<RayHit>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionToken {
    kind: EventKind,
    id: u64,
}

impl SubscriptionToken {
    pub fn kind(&self) -> EventKind {
        self.kind
    }
}

type Observer = Box<dyn FnMut(&TouchEvent<'_>)>;

struct Subscription {
    id: u64,
    observer: Observer,
}

/// Observer registry, one ordered list per event kind.
pub(crate) struct Subscribers {
    lists: [Vec<Subscription>; EventKind::COUNT],
    next_id: u64,
    blocked: bool,
}

impl Default for Subscribers {
    fn default() -> Self {
        Self::new()
    }
}

impl Subscribers {
    pub(crate) fn new() -> Self {
        Self {
            lists: std::array::from_fn(|_| Vec::new()),
            next_id: 0,
            blocked: false,
        }
    }

    pub(crate) fn subscribe<F>(&mut self, kind: EventKind, observer: F) -> SubscriptionToken
    where
        F: FnMut(&TouchEvent<'_>) + 'static,
    {
        let id = self.next_id;
        self.next_id += 1;
        self.lists[kind.index()].push(Subscription {
            id,
            observer: Box::new(observer),
        });
        SubscriptionToken { kind, id }
    }

    pub(crate) fn unsubscribe(&mut self, token: SubscriptionToken) -> bool {
        let list = &mut self.lists[token.kind.index()];
        let before = list.len();
        list.retain(|subscription| subscription.id != token.id);
        list.len() != before
    }

    pub(crate) fn set_blocked(&mut self, blocked: bool) {
        self.blocked = blocked;
    }

    pub(crate) fn is_blocked(&self) -> bool {
        self.blocked
    }

    /// True when a dispatch of `kind` would reach at least one observer.
    pub(crate) fn wants(&self, kind: EventKind) -> bool {
        !self.blocked && !self.lists[kind.index()].is_empty()
    }

    pub(crate) fn len(&self, kind: EventKind) -> usize {
        self.lists[kind.index()].len()
    }

    /// Calls every observer of `event.kind` in registration order.
    ///
    /// A panicking observer is logged and skipped; the remaining observers
    /// still run.
    pub(crate) fn dispatch(&mut self, event: &TouchEvent<'_>) {
        if self.blocked {
            return;
        }
        for subscription in &mut self.lists[event.kind.index()] {
            let observer = &mut subscription.observer;
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| observer(event)));
            if let Err(payload) = outcome {
                log::error!(
                    "touch: observer_panic kind={} subscription={} slot={} msg={}",
                    event.kind.label(),
                    subscription.id,
                    event.slot_index,
                    panic_message(payload.as_ref())
                );
            }
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "<non-string panic payload>"
    }
}
