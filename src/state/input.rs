//! Input Module - Terminal mouse input
//!
//! Bridges crossterm's mouse events into the document model, so a drag
//! dispatcher attached to an element with bounds works in a terminal.
//! Terminals have no touch input; use [`Document::without_touch`].
//!
//! # API
//!
//! - `convert_mouse_event` - Convert crossterm MouseEvent to our InputEvent
//! - `poll_event` - Non-blocking event check with timeout
//! - `read_event` - Blocking event read
//! - `route_event` - Dispatch a converted event into a document
//! - `enable_mouse` / `disable_mouse` - Control mouse capture
//!
//! # Example
//!
//! ```ignore
//! use drag_events::state::input::{enable_mouse, poll_event, route_event};
//! use std::time::Duration;
//!
//! enable_mouse()?;
//! loop {
//!     if let Some(event) = poll_event(Duration::from_millis(16))? {
//!         route_event(&document, &event);
//!     }
//! }
//! ```

use crossterm::event::{
    poll, read, DisableMouseCapture, EnableMouseCapture, Event as CrosstermEvent,
    MouseButton as CrosstermMouseButton, MouseEvent as CrosstermMouseEvent, MouseEventKind,
};
use crossterm::execute;
use std::io::stdout;
use std::time::Duration;

use crate::target::Document;
use crate::types::{InputEvent, MouseButton};

// =============================================================================
// MOUSE EVENT CONVERSION
// =============================================================================

/// Convert a crossterm mouse event. Scroll events have no drag meaning and
/// convert to `None`.
pub fn convert_mouse_event(event: CrosstermMouseEvent) -> Option<InputEvent> {
    let x = f64::from(event.column);
    let y = f64::from(event.row);

    match event.kind {
        MouseEventKind::Down(btn) => Some(InputEvent::mouse_down(convert_mouse_button(btn), x, y)),
        MouseEventKind::Up(btn) => Some(InputEvent::mouse_up(convert_mouse_button(btn), x, y)),
        MouseEventKind::Drag(btn) => Some(InputEvent::mouse_drag(convert_mouse_button(btn), x, y)),
        MouseEventKind::Moved => Some(InputEvent::mouse_move(x, y)),
        MouseEventKind::ScrollUp
        | MouseEventKind::ScrollDown
        | MouseEventKind::ScrollLeft
        | MouseEventKind::ScrollRight => None,
    }
}

/// Convert crossterm MouseButton to our MouseButton
fn convert_mouse_button(btn: CrosstermMouseButton) -> MouseButton {
    match btn {
        CrosstermMouseButton::Left => MouseButton::Left,
        CrosstermMouseButton::Right => MouseButton::Right,
        CrosstermMouseButton::Middle => MouseButton::Middle,
    }
}

// =============================================================================
// EVENT POLLING
// =============================================================================

/// Poll for a mouse event with timeout.
/// Returns None if nothing arrived, or if what arrived was not pointer input.
pub fn poll_event(timeout: Duration) -> std::io::Result<Option<InputEvent>> {
    if poll(timeout)? {
        read_event()
    } else {
        Ok(None)
    }
}

/// Read the next terminal event (blocking) and convert it if it is
/// pointer input.
pub fn read_event() -> std::io::Result<Option<InputEvent>> {
    match read()? {
        CrosstermEvent::Mouse(mouse) => Ok(convert_mouse_event(mouse)),
        _ => Ok(None),
    }
}

// =============================================================================
// EVENT ROUTING
// =============================================================================

/// Deliver an event to the element under the pointer, bubbling to the
/// document. Returns false if the document dropped it.
pub fn route_event(document: &Document, event: &InputEvent) -> bool {
    document.dispatch_at(event)
}

// =============================================================================
// MOUSE CAPTURE
// =============================================================================

/// Enable mouse capture.
pub fn enable_mouse() -> std::io::Result<()> {
    execute!(stdout(), EnableMouseCapture)
}

/// Disable mouse capture.
pub fn disable_mouse() -> std::io::Result<()> {
    execute!(stdout(), DisableMouseCapture)
}

// =============================================================================
// TESTS
// =============================================================================
