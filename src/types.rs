//! Core types for drag-events.
//!
//! Raw pointer input flows in as [`InputEvent`]s, gets normalized into drag
//! events, and everything in between speaks in [`Point`]s.

use std::cell::Cell;
use std::fmt;

// =============================================================================
// Geometry
// =============================================================================

/// A position or displacement in client coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl std::ops::Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl std::ops::AddAssign for Point {
    fn add_assign(&mut self, rhs: Point) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl std::ops::Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

/// Axis-aligned rectangle, used to hit-test elements.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Half-open containment: the right and bottom edges are outside.
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.y >= self.y
            && point.x < self.x + self.width
            && point.y < self.y + self.height
    }
}

// =============================================================================
// Input kinds
// =============================================================================

/// Mouse button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
    #[default]
    None,
}

/// The six raw input kinds the drag normalizer listens to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputKind {
    MouseDown,
    MouseMove,
    MouseUp,
    TouchStart,
    TouchMove,
    TouchEnd,
}

impl InputKind {
    /// DOM-style event name.
    pub fn as_str(&self) -> &'static str {
        match self {
            InputKind::MouseDown => "mousedown",
            InputKind::MouseMove => "mousemove",
            InputKind::MouseUp => "mouseup",
            InputKind::TouchStart => "touchstart",
            InputKind::TouchMove => "touchmove",
            InputKind::TouchEnd => "touchend",
        }
    }

    pub fn is_touch(&self) -> bool {
        matches!(
            self,
            InputKind::TouchStart | InputKind::TouchMove | InputKind::TouchEnd
        )
    }
}

impl fmt::Display for InputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Listener flags (bitflags)
// =============================================================================

bitflags::bitflags! {
    /// Options for an input listener registration.
    ///
    /// A `PASSIVE` listener promises not to suppress the default action;
    /// `InputEvent::prevent_default` is ignored while it runs.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ListenerFlags: u8 {
        const NONE = 0;
        const PASSIVE = 1 << 0;
    }
}

// =============================================================================
// Input event
// =============================================================================

/// Device-specific part of an input event.
#[derive(Debug, Clone, PartialEq)]
pub enum PointerData {
    Mouse {
        client: Point,
        button: MouseButton,
    },
    Touch {
        /// Touch points currently on the surface.
        touches: Vec<Point>,
        /// Touch points that changed in this event.
        changed_touches: Vec<Point>,
    },
}

/// A raw mouse or touch event, as delivered to input listeners.
#[derive(Debug)]
pub struct InputEvent {
    kind: InputKind,
    pointer: PointerData,
    default_prevented: Cell<bool>,
    in_passive_listener: Cell<bool>,
}

impl InputEvent {
    fn new(kind: InputKind, pointer: PointerData) -> Self {
        Self {
            kind,
            pointer,
            default_prevented: Cell::new(false),
            in_passive_listener: Cell::new(false),
        }
    }

    fn mouse(kind: InputKind, button: MouseButton, x: f64, y: f64) -> Self {
        Self::new(
            kind,
            PointerData::Mouse {
                client: Point::new(x, y),
                button,
            },
        )
    }

    /// Create a mouse down event
    pub fn mouse_down(button: MouseButton, x: f64, y: f64) -> Self {
        Self::mouse(InputKind::MouseDown, button, x, y)
    }

    /// Create a mouse move event
    pub fn mouse_move(x: f64, y: f64) -> Self {
        Self::mouse(InputKind::MouseMove, MouseButton::None, x, y)
    }

    /// Create a mouse move event with a button held (a terminal "drag" report)
    pub fn mouse_drag(button: MouseButton, x: f64, y: f64) -> Self {
        Self::mouse(InputKind::MouseMove, button, x, y)
    }

    /// Create a mouse up event
    pub fn mouse_up(button: MouseButton, x: f64, y: f64) -> Self {
        Self::mouse(InputKind::MouseUp, button, x, y)
    }

    /// Touch start. Every point in `touches` also counts as changed.
    pub fn touch_start(touches: &[Point]) -> Self {
        Self::new(
            InputKind::TouchStart,
            PointerData::Touch {
                touches: touches.to_vec(),
                changed_touches: touches.to_vec(),
            },
        )
    }

    /// Touch move. Every point in `touches` also counts as changed.
    pub fn touch_move(touches: &[Point]) -> Self {
        Self::new(
            InputKind::TouchMove,
            PointerData::Touch {
                touches: touches.to_vec(),
                changed_touches: touches.to_vec(),
            },
        )
    }

    /// Touch end. `remaining` are the points still down, `lifted` the ones
    /// that just left the surface.
    pub fn touch_end(remaining: &[Point], lifted: &[Point]) -> Self {
        Self::new(
            InputKind::TouchEnd,
            PointerData::Touch {
                touches: remaining.to_vec(),
                changed_touches: lifted.to_vec(),
            },
        )
    }

    pub fn kind(&self) -> InputKind {
        self.kind
    }

    pub fn pointer(&self) -> &PointerData {
        &self.pointer
    }

    /// Representative position of the event, used for hit-testing.
    pub fn position(&self) -> Option<Point> {
        match &self.pointer {
            PointerData::Mouse { client, .. } => Some(*client),
            PointerData::Touch {
                touches,
                changed_touches,
            } => touches.first().or(changed_touches.first()).copied(),
        }
    }

    /// Suppress the default action (text selection, native scrolling).
    /// Ignored while a passive listener is running.
    pub fn prevent_default(&self) {
        if !self.in_passive_listener.get() {
            self.default_prevented.set(true);
        }
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented.get()
    }

    pub(crate) fn set_passive(&self, passive: bool) {
        self.in_passive_listener.set(passive);
    }
}
