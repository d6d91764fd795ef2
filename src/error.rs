//! Error types for drag-events.
//!
//! The normalizer itself never fails: unsubscribing an unknown listener,
//! force-ending twice or pressing while already dragging are all absorbed.
//! What remains fallible is the edge where names come in from outside.

use thiserror::Error;

/// Errors produced by drag-events.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DragError {
    /// A drag event name that is not one of the four known kinds.
    #[error("unknown drag event kind: {0:?}")]
    UnknownEventKind(String),
}
