//! Pointer Module - Mouse/touch unification
//!
//! The one place that tells mouse input from touch input. Everything past
//! this point only sees a client coordinate.

use crate::types::{InputEvent, Point, PointerData};

/// Which touch list to read for touch input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchList {
    /// Points currently on the surface (press and move).
    Active,
    /// Points that changed in this event (release).
    Changed,
}

/// True if the event came from a touch device and this environment has
/// touch input at all.
pub fn is_touch_event(event: &InputEvent, touch_supported: bool) -> bool {
    touch_supported && matches!(event.pointer(), PointerData::Touch { .. })
}

/// Resolve the effective pointer coordinate of an input event.
///
/// Touch input only ever consults the first entry of the requested list;
/// further fingers are ignored. Returns `None` when there is nothing to
/// read: an empty touch list, or a touch event in an environment without
/// touch support.
pub fn resolve_pointer(event: &InputEvent, list: TouchList, touch_supported: bool) -> Option<Point> {
    match event.pointer() {
        PointerData::Mouse { client, .. } => Some(*client),
        PointerData::Touch {
            touches,
            changed_touches,
        } if is_touch_event(event, touch_supported) => match list {
            TouchList::Active => touches.first().copied(),
            TouchList::Changed => changed_touches.first().copied(),
        },
        PointerData::Touch { .. } => None,
    }
}
