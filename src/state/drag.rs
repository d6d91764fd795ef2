//! Drag Module - Mouse and touch input as one drag gesture stream
//!
//! A [`DragEventDispatcher`] listens for presses on one element and turns the
//! press/move/release sequence that follows into four events:
//!
//! - `dragstart` - press accepted, session opened
//! - `dragmove` - pointer moved, with per-move delta and running offset
//! - `dragend` - pointer released anywhere in the document
//! - `dragcancel` - session ended by [`DragEventDispatcher::force_drag_end`]
//!
//! While idle only the element's press listeners exist. Document-level move
//! and release listeners are attached for the duration of a session and are
//! owned by a guard value, so every way out of a session detaches them.
//!
//! # Example
//!
//! ```ignore
//! use std::rc::Rc;
//! use drag_events::{Document, DragEvent, DragEventDispatcher, DragEventKind, DragListener};
//!
//! let document = Document::new();
//! let handle = document.create_element();
//! let drag = DragEventDispatcher::new(&handle, &document);
//!
//! let on_move: DragListener = Rc::new(|event: &DragEvent| {
//!     if let DragEvent::Move(m) = event {
//!         println!("moved by ({}, {})", m.delta.x, m.delta.y);
//!     }
//! });
//! drag.subscribe(DragEventKind::DragMove, &on_move);
//! ```

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};
use std::str::FromStr;

use spark_signals::{signal, Signal};

use super::pointer::{resolve_pointer, TouchList};
use crate::config::{DragOptions, InputSources};
use crate::error::DragError;
use crate::event_bus::{BusEvent, EventBus, Listener};
use crate::target::{Document, EventTarget, InputListener};
use crate::types::{InputEvent, InputKind, ListenerFlags, Point};

// =============================================================================
// EVENT TYPES
// =============================================================================

/// The four drag event kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DragEventKind {
    DragStart,
    DragMove,
    DragEnd,
    DragCancel,
}

impl DragEventKind {
    pub const ALL: [DragEventKind; 4] = [
        DragEventKind::DragStart,
        DragEventKind::DragMove,
        DragEventKind::DragEnd,
        DragEventKind::DragCancel,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DragEventKind::DragStart => "dragstart",
            DragEventKind::DragMove => "dragmove",
            DragEventKind::DragEnd => "dragend",
            DragEventKind::DragCancel => "dragcancel",
        }
    }
}

impl fmt::Display for DragEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DragEventKind {
    type Err = DragError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DragEventKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| DragError::UnknownEventKind(s.to_string()))
    }
}

/// Payload of `dragstart`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragStartEvent {
    /// Pointer position of the press.
    pub client: Point,
    /// Session origin; equal to `client`.
    pub drag_start: Point,
    /// Always zero.
    pub accumulated: Point,
}

/// Payload of `dragmove`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragMoveEvent {
    /// 1 for the first move of a session, then 2, 3, ...
    pub count: u32,
    pub client: Point,
    pub drag_start: Point,
    /// Displacement since the previous move (or the press).
    pub delta: Point,
    /// Sum of all deltas of this session so far.
    pub accumulated: Point,
}

/// Payload of `dragend`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragEndEvent {
    /// Pointer position of the release.
    pub client: Point,
    pub drag_start: Point,
    /// Always zero; the release itself does not move the drag.
    pub delta: Point,
    pub accumulated: Point,
}

/// Payload of `dragcancel`. There is no live pointer position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragCancelEvent {
    pub drag_start: Point,
    pub accumulated: Point,
}

/// A normalized drag event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragEvent {
    Start(DragStartEvent),
    Move(DragMoveEvent),
    End(DragEndEvent),
    Cancel(DragCancelEvent),
}

impl DragEvent {
    pub fn drag_start(&self) -> Point {
        match self {
            DragEvent::Start(e) => e.drag_start,
            DragEvent::Move(e) => e.drag_start,
            DragEvent::End(e) => e.drag_start,
            DragEvent::Cancel(e) => e.drag_start,
        }
    }

    pub fn accumulated(&self) -> Point {
        match self {
            DragEvent::Start(e) => e.accumulated,
            DragEvent::Move(e) => e.accumulated,
            DragEvent::End(e) => e.accumulated,
            DragEvent::Cancel(e) => e.accumulated,
        }
    }

    /// Live pointer position; `None` for `dragcancel`.
    pub fn client(&self) -> Option<Point> {
        match self {
            DragEvent::Start(e) => Some(e.client),
            DragEvent::Move(e) => Some(e.client),
            DragEvent::End(e) => Some(e.client),
            DragEvent::Cancel(_) => None,
        }
    }

    /// Per-move delta; `None` for `dragstart` and `dragcancel`.
    pub fn delta(&self) -> Option<Point> {
        match self {
            DragEvent::Move(e) => Some(e.delta),
            DragEvent::End(e) => Some(e.delta),
            DragEvent::Start(_) | DragEvent::Cancel(_) => None,
        }
    }
}

impl BusEvent for DragEvent {
    type Kind = DragEventKind;

    fn kind(&self) -> DragEventKind {
        match self {
            DragEvent::Start(_) => DragEventKind::DragStart,
            DragEvent::Move(_) => DragEventKind::DragMove,
            DragEvent::End(_) => DragEventKind::DragEnd,
            DragEvent::Cancel(_) => DragEventKind::DragCancel,
        }
    }
}

/// Listener for drag events.
pub type DragListener = Listener<DragEvent>;

// =============================================================================
// DOCUMENT LISTENERS GUARD
// =============================================================================

/// Document-level move and release listeners of one session.
/// Attached on construction, detached on drop.
struct DocumentListeners {
    document: EventTarget,
    on_move: InputListener,
    on_end: InputListener,
}

impl DocumentListeners {
    fn attach(document: &EventTarget, on_move: &InputListener, on_end: &InputListener) -> Self {
        document.add_listener(InputKind::MouseMove, on_move, ListenerFlags::NONE);
        // Must stay non-passive so the move handler can stop native scrolling.
        document.add_listener(InputKind::TouchMove, on_move, ListenerFlags::NONE);
        document.add_listener(InputKind::MouseUp, on_end, ListenerFlags::NONE);
        document.add_listener(InputKind::TouchEnd, on_end, ListenerFlags::NONE);

        Self {
            document: document.clone(),
            on_move: Rc::clone(on_move),
            on_end: Rc::clone(on_end),
        }
    }
}

impl Drop for DocumentListeners {
    fn drop(&mut self) {
        self.document.remove_listener(InputKind::MouseMove, &self.on_move);
        self.document.remove_listener(InputKind::TouchMove, &self.on_move);
        self.document.remove_listener(InputKind::MouseUp, &self.on_end);
        self.document.remove_listener(InputKind::TouchEnd, &self.on_end);
    }
}

// =============================================================================
// SESSION STATE
// =============================================================================

#[derive(Default)]
struct DragState {
    move_count: u32,
    drag_start: Point,
    drag_last: Point,
    accumulated: Point,
    /// Present exactly while dragging.
    session: Option<DocumentListeners>,
}

struct Inner {
    element: EventTarget,
    document: EventTarget,
    touch_supported: bool,
    options: DragOptions,
    bus: EventBus<DragEvent>,
    state: RefCell<DragState>,
    dragging: Signal<bool>,
    // Created once so attach and detach always see the same listener.
    on_drag_start: InputListener,
    on_drag_move: InputListener,
    on_drag_end: InputListener,
}

// =============================================================================
// DISPATCHER
// =============================================================================

/// Turns raw press/move/release input on one element into drag events.
///
/// Dropping the dispatcher detaches every listener it attached without
/// dispatching anything. Use [`DragEventDispatcher::teardown`] to also report
/// an open session as cancelled.
pub struct DragEventDispatcher {
    inner: Rc<Inner>,
}

impl DragEventDispatcher {
    /// Start listening for presses on `element`, with default options.
    pub fn new(element: &EventTarget, document: &Document) -> Self {
        Self::with_options(element, document, DragOptions::default())
    }

    pub fn with_options(element: &EventTarget, document: &Document, options: DragOptions) -> Self {
        let inner = Rc::new_cyclic(|weak: &Weak<Inner>| {
            let on_drag_start: InputListener = {
                let weak = weak.clone();
                Rc::new(move |event: &InputEvent| {
                    if let Some(inner) = weak.upgrade() {
                        inner.handle_drag_start(event);
                    }
                })
            };
            let on_drag_move: InputListener = {
                let weak = weak.clone();
                Rc::new(move |event: &InputEvent| {
                    if let Some(inner) = weak.upgrade() {
                        inner.handle_drag_move(event);
                    }
                })
            };
            let on_drag_end: InputListener = {
                let weak = weak.clone();
                Rc::new(move |event: &InputEvent| {
                    if let Some(inner) = weak.upgrade() {
                        inner.handle_drag_end(event);
                    }
                })
            };

            Inner {
                element: element.clone(),
                document: document.target().clone(),
                touch_supported: document.supports_touch(),
                options,
                bus: EventBus::new(),
                state: RefCell::new(DragState::default()),
                dragging: signal(false),
                on_drag_start,
                on_drag_move,
                on_drag_end,
            }
        });

        inner.attach_press_listeners();
        Self { inner }
    }

    /// Whether a session is open.
    pub fn is_dragging(&self) -> bool {
        self.inner.is_dragging()
    }

    /// Reactive view of [`is_dragging`](Self::is_dragging).
    pub fn dragging(&self) -> Signal<bool> {
        self.inner.dragging.clone()
    }

    pub fn options(&self) -> DragOptions {
        self.inner.options
    }

    /// Register `listener` for `kind`. Subscribing the same listener twice
    /// for the same kind is a no-op.
    pub fn subscribe(&self, kind: DragEventKind, listener: &DragListener) {
        self.inner.bus.subscribe(kind, listener);
    }

    pub fn unsubscribe(&self, kind: DragEventKind, listener: &DragListener) {
        self.inner.bus.unsubscribe(kind, listener);
    }

    /// End the current session and report it as cancelled.
    ///
    /// Callable while idle: the `dragcancel` then carries the values of the
    /// last session (or zeros).
    pub fn force_drag_end(&self) {
        self.inner.force_drag_end();
    }

    /// Stop listening for presses and force-end any open session.
    pub fn teardown(self) {
        self.inner.detach_press_listeners();
        self.inner.force_drag_end();
    }
}

impl fmt::Debug for DragEventDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DragEventDispatcher")
            .field("is_dragging", &self.is_dragging())
            .field("options", &self.inner.options)
            .finish()
    }
}

impl Inner {
    fn is_dragging(&self) -> bool {
        self.state.borrow().session.is_some()
    }

    fn attach_press_listeners(&self) {
        if self.options.sources.contains(InputSources::MOUSE) {
            self.element
                .add_listener(InputKind::MouseDown, &self.on_drag_start, ListenerFlags::NONE);
        }
        if self.options.sources.contains(InputSources::TOUCH) {
            self.element
                .add_listener(InputKind::TouchStart, &self.on_drag_start, ListenerFlags::NONE);
        }
    }

    fn detach_press_listeners(&self) {
        self.element.remove_listener(InputKind::MouseDown, &self.on_drag_start);
        self.element.remove_listener(InputKind::TouchStart, &self.on_drag_start);
    }

    /// Drop the session guard, if any. Returns whether one was attached.
    fn detach_document_listeners(&self) -> bool {
        let session = self.state.borrow_mut().session.take();
        session.is_some()
    }

    fn sync_dragging(&self) {
        self.dragging.set(self.is_dragging());
    }

    fn handle_drag_start(&self, event: &InputEvent) {
        if self.options.prevent_default {
            event.prevent_default();
        }

        let Some(point) = resolve_pointer(event, TouchList::Active, self.touch_supported) else {
            log::debug!("ignoring {} without a pointer position", event.kind());
            return;
        };

        if self.detach_document_listeners() {
            log::debug!("press while dragging, restarting session");
        }

        let session = DocumentListeners::attach(&self.document, &self.on_drag_move, &self.on_drag_end);
        let start = {
            let mut state = self.state.borrow_mut();
            state.move_count = 0;
            state.accumulated = Point::ZERO;
            state.drag_start = point;
            state.drag_last = point;
            state.session = Some(session);

            DragStartEvent {
                client: point,
                drag_start: point,
                accumulated: Point::ZERO,
            }
        };
        self.sync_dragging();

        log::debug!("dragstart at ({}, {}) from {}", point.x, point.y, event.kind());
        self.bus.dispatch(&DragEvent::Start(start));
    }

    fn handle_drag_move(&self, event: &InputEvent) {
        if self.options.prevent_default {
            event.prevent_default();
        }

        let Some(point) = resolve_pointer(event, TouchList::Active, self.touch_supported) else {
            log::debug!("ignoring {} without a pointer position", event.kind());
            return;
        };

        let moved = {
            let mut state = self.state.borrow_mut();
            if state.session.is_none() {
                return;
            }
            state.move_count += 1;
            let delta = point - state.drag_last;
            state.accumulated += delta;
            state.drag_last = point;

            DragMoveEvent {
                count: state.move_count,
                client: point,
                drag_start: state.drag_start,
                delta,
                accumulated: state.accumulated,
            }
        };

        log::trace!(
            "dragmove #{} delta ({}, {})",
            moved.count,
            moved.delta.x,
            moved.delta.y
        );
        self.bus.dispatch(&DragEvent::Move(moved));
    }

    fn handle_drag_end(&self, event: &InputEvent) {
        let ended = {
            let mut state = self.state.borrow_mut();
            if state.session.take().is_none() {
                return;
            }
            let client = resolve_pointer(event, TouchList::Changed, self.touch_supported)
                .unwrap_or(state.drag_last);

            DragEndEvent {
                client,
                drag_start: state.drag_start,
                delta: Point::ZERO,
                accumulated: state.accumulated,
            }
        };
        self.sync_dragging();

        log::debug!(
            "dragend at ({}, {}), accumulated ({}, {})",
            ended.client.x,
            ended.client.y,
            ended.accumulated.x,
            ended.accumulated.y
        );
        self.bus.dispatch(&DragEvent::End(ended));
    }

    fn force_drag_end(&self) {
        self.detach_document_listeners();
        let cancelled = {
            let state = self.state.borrow();
            DragCancelEvent {
                drag_start: state.drag_start,
                accumulated: state.accumulated,
            }
        };
        self.sync_dragging();

        log::debug!("dragcancel");
        self.bus.dispatch(&DragEvent::Cancel(cancelled));
    }
}

impl Drop for Inner {
    fn drop(&mut self) {
        self.detach_press_listeners();
    }
}

// =============================================================================
// TESTS
// =============================================================================
