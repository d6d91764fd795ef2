//! State Module - Drag session state and the input that drives it
//!
//! - **Drag** - Session state machine, drag events, listener lifecycle
//! - **Pointer** - Mouse/touch coordinate unification
//! - **Input** - crossterm mouse bridge for terminal hosts

pub mod drag;
pub mod input;
pub mod pointer;

pub use drag::*;
pub use pointer::{is_touch_event, resolve_pointer, TouchList};
