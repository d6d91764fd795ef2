//! # drag-events
//!
//! Mouse and touch input on one element, normalized into a single drag
//! gesture stream.
//!
//! ## Architecture
//!
//! Raw input is delivered to [`EventTarget`]s through a [`Document`], much like
//! the DOM: press listeners live on the dragged element, move and release
//! listeners on the document. A [`DragEventDispatcher`] owns those listeners
//! and republishes the gesture through an [`EventBus`]:
//!
//! ```text
//! mousedown/touchstart ─┐
//! mousemove/touchmove  ─┼─► DragEventDispatcher ─► EventBus ─► dragstart / dragmove /
//! mouseup/touchend     ─┘                                     dragend / dragcancel
//! ```
//!
//! Multi-touch is reduced to the first touch point.
//!
//! ## Modules
//!
//! - [`types`] - Points, raw input events, listener flags
//! - [`event_bus`] - Typed publish/subscribe
//! - [`target`] - Event targets and the document
//! - [`state`] - Drag session state machine, pointer unification, terminal input
//! - [`config`] - Dispatcher options
//! - [`error`] - Error types

pub mod config;
pub mod error;
pub mod event_bus;
pub mod state;
pub mod target;
pub mod types;

// Re-export commonly used items
pub use types::*;

pub use config::{DragOptions, InputSources};
pub use error::DragError;
pub use event_bus::{BusEvent, EventBus, Listener};
pub use target::{Document, EventTarget, InputListener};

pub use state::{
    // Drag
    DragCancelEvent, DragEndEvent, DragEvent, DragEventDispatcher, DragEventKind,
    DragListener, DragMoveEvent, DragStartEvent,
    // Pointer
    is_touch_event, resolve_pointer, TouchList,
};
