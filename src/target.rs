//! Input targets - Where raw pointer listeners live
//!
//! An [`EventTarget`] holds input listeners keyed by [`InputKind`]. A
//! [`Document`] owns the document-level target, knows whether touch input
//! exists in this environment, and routes events: dispatching to an element
//! runs the element's listeners and then bubbles to the document's.
//!
//! # API
//!
//! - `EventTarget::add_listener(kind, &listener, flags)` - Idempotent per (kind, listener)
//! - `EventTarget::remove_listener(kind, &listener)` - No-op if absent
//! - `Document::create_element_with_bounds(rect)` - Element that can be hit-tested
//! - `Document::dispatch_to(&element, &event)` - Element, then document
//! - `Document::dispatch_at(&event)` - Hit-test, then bubble
//!
//! # Example
//!
//! ```ignore
//! let document = Document::new();
//! let element = document.create_element_with_bounds(Rect::new(0.0, 0.0, 10.0, 4.0));
//! document.dispatch_at(&InputEvent::mouse_down(MouseButton::Left, 2.0, 1.0));
//! ```

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use crate::types::{InputEvent, InputKind, ListenerFlags, Rect};

// =============================================================================
// TYPES
// =============================================================================

/// Input listener callback. Identity is the `Rc` allocation.
pub type InputListener = Rc<dyn Fn(&InputEvent)>;

struct Registration {
    listener: InputListener,
    flags: ListenerFlags,
}

#[derive(Default)]
struct TargetInner {
    listeners: RefCell<HashMap<InputKind, Vec<Registration>>>,
    bounds: Cell<Option<Rect>>,
}

// =============================================================================
// EVENT TARGET
// =============================================================================

/// A listener registry for raw input. Clones share the same registry.
#[derive(Clone, Default)]
pub struct EventTarget {
    inner: Rc<TargetInner>,
}

impl EventTarget {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bounds(bounds: Rect) -> Self {
        let target = Self::new();
        target.set_bounds(Some(bounds));
        target
    }

    pub fn bounds(&self) -> Option<Rect> {
        self.inner.bounds.get()
    }

    pub fn set_bounds(&self, bounds: Option<Rect>) {
        self.inner.bounds.set(bounds);
    }

    /// Whether two handles refer to the same target.
    pub fn same_target(&self, other: &EventTarget) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// Attach `listener` for `kind`. Adding an already attached listener for
    /// the same kind keeps the first registration and its flags.
    pub fn add_listener(&self, kind: InputKind, listener: &InputListener, flags: ListenerFlags) {
        let mut listeners = self.inner.listeners.borrow_mut();
        let list = listeners.entry(kind).or_default();
        if !list.iter().any(|r| Rc::ptr_eq(&r.listener, listener)) {
            list.push(Registration {
                listener: Rc::clone(listener),
                flags,
            });
        }
    }

    pub fn remove_listener(&self, kind: InputKind, listener: &InputListener) {
        let mut listeners = self.inner.listeners.borrow_mut();
        if let Some(list) = listeners.get_mut(&kind) {
            list.retain(|r| !Rc::ptr_eq(&r.listener, listener));
            if list.is_empty() {
                listeners.remove(&kind);
            }
        }
    }

    pub fn has_listener(&self, kind: InputKind, listener: &InputListener) -> bool {
        self.inner
            .listeners
            .borrow()
            .get(&kind)
            .is_some_and(|list| list.iter().any(|r| Rc::ptr_eq(&r.listener, listener)))
    }

    pub fn listener_count(&self, kind: InputKind) -> usize {
        self.inner.listeners.borrow().get(&kind).map_or(0, Vec::len)
    }

    /// Run this target's listeners for `event.kind()` against a snapshot of
    /// the current registrations.
    pub fn dispatch(&self, event: &InputEvent) {
        let snapshot: Vec<(InputListener, ListenerFlags)> =
            match self.inner.listeners.borrow().get(&event.kind()) {
                Some(list) => list
                    .iter()
                    .map(|r| (Rc::clone(&r.listener), r.flags))
                    .collect(),
                None => return,
            };

        for (listener, flags) in snapshot {
            event.set_passive(flags.contains(ListenerFlags::PASSIVE));
            listener(event);
            event.set_passive(false);
        }
    }
}

impl std::fmt::Debug for EventTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let counts: HashMap<InputKind, usize> = self
            .inner
            .listeners
            .borrow()
            .iter()
            .map(|(kind, list)| (*kind, list.len()))
            .collect();
        f.debug_struct("EventTarget")
            .field("bounds", &self.bounds())
            .field("listeners", &counts)
            .finish()
    }
}

// =============================================================================
// DOCUMENT
// =============================================================================

/// The document-level target plus the elements created through it.
pub struct Document {
    root: EventTarget,
    touch_supported: bool,
    elements: RefCell<Vec<Weak<TargetInner>>>,
}

impl Document {
    /// A document in an environment with touch support.
    pub fn new() -> Self {
        Self {
            root: EventTarget::new(),
            touch_supported: true,
            elements: RefCell::new(Vec::new()),
        }
    }

    /// A document in an environment without touch input (a terminal, a
    /// desktop without a touch screen). Touch events are never delivered.
    pub fn without_touch() -> Self {
        Self {
            touch_supported: false,
            ..Self::new()
        }
    }

    pub fn supports_touch(&self) -> bool {
        self.touch_supported
    }

    /// Document-level listeners attach here.
    pub fn target(&self) -> &EventTarget {
        &self.root
    }

    /// Create an element without bounds. It only receives events sent to it
    /// with [`Document::dispatch_to`].
    pub fn create_element(&self) -> EventTarget {
        EventTarget::new()
    }

    /// Create an element that [`Document::dispatch_at`] can hit-test.
    /// Later elements sit on top of earlier ones.
    pub fn create_element_with_bounds(&self, bounds: Rect) -> EventTarget {
        let element = EventTarget::with_bounds(bounds);
        let mut elements = self.elements.borrow_mut();
        elements.retain(|e| e.strong_count() > 0);
        elements.push(Rc::downgrade(&element.inner));
        element
    }

    /// Topmost live element whose bounds contain the event position.
    pub fn hit_test(&self, event: &InputEvent) -> Option<EventTarget> {
        let position = event.position()?;
        self.elements
            .borrow()
            .iter()
            .rev()
            .filter_map(Weak::upgrade)
            .find(|inner| inner.bounds.get().is_some_and(|b| b.contains(position)))
            .map(|inner| EventTarget { inner })
    }

    /// Deliver `event` to `target`, then bubble it to the document.
    /// Returns false if the event was dropped.
    pub fn dispatch_to(&self, target: &EventTarget, event: &InputEvent) -> bool {
        if !self.accepts(event) {
            return false;
        }
        if !target.same_target(&self.root) {
            target.dispatch(event);
        }
        self.root.dispatch(event);
        true
    }

    /// Deliver `event` to the element under its position (if any), then
    /// bubble it to the document. Returns false if the event was dropped.
    pub fn dispatch_at(&self, event: &InputEvent) -> bool {
        match self.hit_test(event) {
            Some(element) => self.dispatch_to(&element, event),
            None => self.dispatch_to(&self.root, event),
        }
    }

    fn accepts(&self, event: &InputEvent) -> bool {
        if event.kind().is_touch() && !self.touch_supported {
            log::debug!("dropping {} in a document without touch support", event.kind());
            return false;
        }
        true
    }
}

impl Default for Document {
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
    use crate::types::{MouseButton, Point};

    fn recorder(log: &Rc<RefCell<Vec<&'static str>>>, name: &'static str) -> InputListener {
        let log = log.clone();
        Rc::new(move |_: &InputEvent| log.borrow_mut().push(name))
    }

    #[test]
    fn test_add_listener_is_idempotent() {
        let target = EventTarget::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        let listener = recorder(&log, "a");

        target.add_listener(InputKind::MouseDown, &listener, ListenerFlags::NONE);
        target.add_listener(InputKind::MouseDown, &listener, ListenerFlags::NONE);
        assert_eq!(target.listener_count(InputKind::MouseDown), 1);

        target.dispatch(&InputEvent::mouse_down(MouseButton::Left, 0.0, 0.0));
        assert_eq!(*log.borrow(), vec!["a"]);
    }

    #[test]
    fn test_remove_listener() {
        let target = EventTarget::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        let listener = recorder(&log, "a");

        target.add_listener(InputKind::MouseUp, &listener, ListenerFlags::NONE);
        target.remove_listener(InputKind::MouseUp, &listener);
        target.remove_listener(InputKind::MouseUp, &listener);
        assert!(!target.has_listener(InputKind::MouseUp, &listener));

        target.dispatch(&InputEvent::mouse_up(MouseButton::Left, 0.0, 0.0));
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_passive_listener_cannot_prevent_default() {
        let target = EventTarget::new();
        let listener: InputListener = Rc::new(|event: &InputEvent| event.prevent_default());

        target.add_listener(InputKind::TouchMove, &listener, ListenerFlags::PASSIVE);
        let event = InputEvent::touch_move(&[Point::new(1.0, 1.0)]);
        target.dispatch(&event);
        assert!(!event.default_prevented());

        target.remove_listener(InputKind::TouchMove, &listener);
        target.add_listener(InputKind::TouchMove, &listener, ListenerFlags::NONE);
        let event = InputEvent::touch_move(&[Point::new(1.0, 1.0)]);
        target.dispatch(&event);
        assert!(event.default_prevented());
    }

    #[test]
    fn test_dispatch_to_bubbles_to_document() {
        let document = Document::new();
        let element = document.create_element();
        let log = Rc::new(RefCell::new(Vec::new()));

        let on_element = recorder(&log, "element");
        let on_document = recorder(&log, "document");
        element.add_listener(InputKind::MouseUp, &on_element, ListenerFlags::NONE);
        document
            .target()
            .add_listener(InputKind::MouseUp, &on_document, ListenerFlags::NONE);

        document.dispatch_to(&element, &InputEvent::mouse_up(MouseButton::Left, 0.0, 0.0));
        assert_eq!(*log.borrow(), vec!["element", "document"]);
    }

    #[test]
    fn test_dispatch_at_hit_tests_topmost() {
        let document = Document::new();
        let below = document.create_element_with_bounds(Rect::new(0.0, 0.0, 20.0, 20.0));
        let above = document.create_element_with_bounds(Rect::new(5.0, 5.0, 5.0, 5.0));
        let log = Rc::new(RefCell::new(Vec::new()));

        let on_below = recorder(&log, "below");
        let on_above = recorder(&log, "above");
        below.add_listener(InputKind::MouseDown, &on_below, ListenerFlags::NONE);
        above.add_listener(InputKind::MouseDown, &on_above, ListenerFlags::NONE);

        document.dispatch_at(&InputEvent::mouse_down(MouseButton::Left, 6.0, 6.0));
        document.dispatch_at(&InputEvent::mouse_down(MouseButton::Left, 1.0, 1.0));
        document.dispatch_at(&InputEvent::mouse_down(MouseButton::Left, 50.0, 50.0));
        assert_eq!(*log.borrow(), vec!["above", "below"]);
    }

    #[test]
    fn test_dropped_elements_are_not_hit() {
        let document = Document::new();
        let element = document.create_element_with_bounds(Rect::new(0.0, 0.0, 10.0, 10.0));
        drop(element);

        let event = InputEvent::mouse_down(MouseButton::Left, 1.0, 1.0);
        assert!(document.hit_test(&event).is_none());
    }

    #[test]
    fn test_touch_dropped_without_touch_support() {
        let document = Document::without_touch();
        let log = Rc::new(RefCell::new(Vec::new()));
        let listener = recorder(&log, "touch");
        document
            .target()
            .add_listener(InputKind::TouchStart, &listener, ListenerFlags::NONE);

        let delivered = document.dispatch_at(&InputEvent::touch_start(&[Point::new(1.0, 1.0)]));
        assert!(!delivered);
        assert!(log.borrow().is_empty());
    }
}
