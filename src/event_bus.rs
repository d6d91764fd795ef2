//! Event Bus - Typed publish/subscribe
//!
//! Maps an event's kind to an ordered list of listeners and fans events
//! out to them synchronously.
//!
//! # API
//!
//! - `subscribe(kind, &listener)` - Register a listener (idempotent)
//! - `unsubscribe(kind, &listener)` - Remove a listener (no-op if absent)
//! - `dispatch(&event)` - Call every listener registered for `event.kind()`
//!
//! Listeners are identified by their `Rc` allocation, so keep the `Rc` you
//! subscribed with if you want to unsubscribe later.
//!
//! Dispatch works on a snapshot of the listener list: listeners added or
//! removed while a dispatch is running take effect from the next dispatch.
//! A panicking listener unwinds out of `dispatch` and the remaining
//! listeners of that pass are skipped. No borrow is held while listeners
//! run, so the bus stays usable afterwards.
//!
//! # Example
//!
//! ```ignore
//! use std::rc::Rc;
//! use drag_events::{EventBus, Listener};
//!
//! let bus = EventBus::new();
//! let listener: Listener<MyEvent> = Rc::new(|event: &MyEvent| println!("{:?}", event));
//! bus.subscribe(MyKind::Ping, &listener);
//! bus.dispatch(&MyEvent::Ping);
//! bus.unsubscribe(MyKind::Ping, &listener);
//! ```

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use std::rc::Rc;

// =============================================================================
// TYPES
// =============================================================================

/// An event that knows which listener list it belongs to.
pub trait BusEvent {
    type Kind: Copy + Eq + Hash + Debug;

    fn kind(&self) -> Self::Kind;
}

/// Listener callback. Shared so the same value can be passed to
/// `subscribe` and later to `unsubscribe`.
pub type Listener<E> = Rc<dyn Fn(&E)>;

// =============================================================================
// EVENT BUS
// =============================================================================

pub struct EventBus<E: BusEvent> {
    listeners: RefCell<HashMap<E::Kind, Vec<Listener<E>>>>,
}

impl<E: BusEvent> EventBus<E> {
    pub fn new() -> Self {
        Self {
            listeners: RefCell::new(HashMap::new()),
        }
    }

    /// Register `listener` under `kind`. Registering the same listener for
    /// the same kind twice is a no-op.
    pub fn subscribe(&self, kind: E::Kind, listener: &Listener<E>) {
        let mut listeners = self.listeners.borrow_mut();
        let list = listeners.entry(kind).or_default();
        if !list.iter().any(|l| Rc::ptr_eq(l, listener)) {
            list.push(Rc::clone(listener));
        }
    }

    /// Remove `listener` from `kind`. No-op if it was never registered.
    pub fn unsubscribe(&self, kind: E::Kind, listener: &Listener<E>) {
        let mut listeners = self.listeners.borrow_mut();
        if let Some(list) = listeners.get_mut(&kind) {
            list.retain(|l| !Rc::ptr_eq(l, listener));
            if list.is_empty() {
                listeners.remove(&kind);
            }
        }
    }

    pub fn has_listener(&self, kind: E::Kind, listener: &Listener<E>) -> bool {
        self.listeners
            .borrow()
            .get(&kind)
            .is_some_and(|list| list.iter().any(|l| Rc::ptr_eq(l, listener)))
    }

    pub fn listener_count(&self, kind: E::Kind) -> usize {
        self.listeners.borrow().get(&kind).map_or(0, Vec::len)
    }

    /// Drop every registration.
    pub fn clear(&self) {
        self.listeners.borrow_mut().clear();
    }

    /// Call every listener registered for the event's kind, in
    /// registration order.
    pub fn dispatch(&self, event: &E) {
        let snapshot: Vec<Listener<E>> = match self.listeners.borrow().get(&event.kind()) {
            Some(list) => list.clone(),
            None => return,
        };

        for listener in snapshot {
            listener(event);
        }
    }
}

impl<E: BusEvent> Default for EventBus<E> {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum Kind {
        Ping,
        Pong,
    }

    #[derive(Debug)]
    struct Event(Kind, u32);

    impl BusEvent for Event {
        type Kind = Kind;

        fn kind(&self) -> Kind {
            self.0
        }
    }

    fn counter() -> (Rc<Cell<u32>>, Listener<Event>) {
        let count = Rc::new(Cell::new(0));
        let count_clone = count.clone();
        let listener: Listener<Event> = Rc::new(move |_: &Event| count_clone.set(count_clone.get() + 1));
        (count, listener)
    }

    #[test]
    fn test_dispatch_reaches_matching_kind_only() {
        let bus = EventBus::new();
        let (count, listener) = counter();
        bus.subscribe(Kind::Ping, &listener);

        bus.dispatch(&Event(Kind::Ping, 0));
        bus.dispatch(&Event(Kind::Pong, 0));
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_subscribe_is_idempotent() {
        let bus = EventBus::new();
        let (count, listener) = counter();
        bus.subscribe(Kind::Ping, &listener);
        bus.subscribe(Kind::Ping, &listener);

        assert_eq!(bus.listener_count(Kind::Ping), 1);
        bus.dispatch(&Event(Kind::Ping, 0));
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_same_listener_under_two_kinds() {
        let bus = EventBus::new();
        let (count, listener) = counter();
        bus.subscribe(Kind::Ping, &listener);
        bus.subscribe(Kind::Pong, &listener);

        bus.dispatch(&Event(Kind::Ping, 0));
        bus.dispatch(&Event(Kind::Pong, 0));
        assert_eq!(count.get(), 2);

        bus.unsubscribe(Kind::Ping, &listener);
        assert!(!bus.has_listener(Kind::Ping, &listener));
        assert!(bus.has_listener(Kind::Pong, &listener));
    }

    #[test]
    fn test_unsubscribe_unknown_is_noop() {
        let bus: EventBus<Event> = EventBus::new();
        let (_, listener) = counter();
        bus.unsubscribe(Kind::Ping, &listener);
        assert_eq!(bus.listener_count(Kind::Ping), 0);
    }

    #[test]
    fn test_dispatch_order_is_registration_order() {
        let bus = EventBus::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        let listeners: Vec<Listener<Event>> = (0..3)
            .map(|i| {
                let log = log.clone();
                Rc::new(move |event: &Event| log.borrow_mut().push((i, event.1))) as Listener<Event>
            })
            .collect();
        for listener in &listeners {
            bus.subscribe(Kind::Ping, listener);
        }

        bus.dispatch(&Event(Kind::Ping, 7));
        assert_eq!(*log.borrow(), vec![(0, 7), (1, 7), (2, 7)]);
    }

    #[test]
    fn test_unsubscribe_during_dispatch_uses_snapshot() {
        let bus = Rc::new(EventBus::new());
        let (second_count, second) = counter();

        // First listener removes the second one mid-dispatch.
        let bus_clone = Rc::downgrade(&bus);
        let second_clone = second.clone();
        let first: Listener<Event> = Rc::new(move |_: &Event| {
            if let Some(bus) = bus_clone.upgrade() {
                bus.unsubscribe(Kind::Ping, &second_clone);
            }
        });

        bus.subscribe(Kind::Ping, &first);
        bus.subscribe(Kind::Ping, &second);

        bus.dispatch(&Event(Kind::Ping, 0));
        assert_eq!(second_count.get(), 1);

        bus.dispatch(&Event(Kind::Ping, 0));
        assert_eq!(second_count.get(), 1);
    }

    #[test]
    fn test_subscribe_during_dispatch_waits_for_next_pass() {
        let bus = Rc::new(EventBus::new());
        let (late_count, late) = counter();

        let bus_clone = Rc::downgrade(&bus);
        let late_clone = late.clone();
        let adder: Listener<Event> = Rc::new(move |_: &Event| {
            if let Some(bus) = bus_clone.upgrade() {
                bus.subscribe(Kind::Ping, &late_clone);
            }
        });
        bus.subscribe(Kind::Ping, &adder);

        bus.dispatch(&Event(Kind::Ping, 0));
        assert_eq!(late_count.get(), 0);

        bus.dispatch(&Event(Kind::Ping, 0));
        assert_eq!(late_count.get(), 1);
    }

    #[test]
    fn test_panicking_listener_aborts_pass_but_bus_survives() {
        let bus = EventBus::new();
        let (count, listener) = counter();
        let boom: Listener<Event> = Rc::new(|_: &Event| panic!("boom"));
        bus.subscribe(Kind::Ping, &boom);
        bus.subscribe(Kind::Ping, &listener);

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            bus.dispatch(&Event(Kind::Ping, 0));
        }));
        assert!(result.is_err());
        assert_eq!(count.get(), 0);

        bus.unsubscribe(Kind::Ping, &boom);
        bus.dispatch(&Event(Kind::Ping, 0));
        assert_eq!(count.get(), 1);
    }
}
