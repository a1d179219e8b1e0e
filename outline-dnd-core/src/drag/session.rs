//! Per-drag state.

use crate::geometry::{DragDirection, DropTarget};
use crate::models::Locator;

/// State of the active drag.
///
/// Owned exclusively by the [`crate::drag::DragController`]; created at
/// drag start, mutated on every move, consumed at drag end. Never shared
/// across drags.
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    /// The block being dragged.
    pub dragged: Locator,
    /// The destination resolved by the most recent move, if any.
    pub destination: Option<DropTarget>,
    /// Vertical drag displacement at the last move event.
    pub last_pointer_y: f64,
    /// Direction of the last observed vertical movement.
    pub direction: Option<DragDirection>,
    /// Whether the dragged block was auto-collapsed at drag start and must
    /// be re-expanded when the drag ends.
    pub expand_on_drop: bool,
}

impl DragSession {
    /// Creates the empty session for a freshly started drag.
    #[must_use]
    pub const fn new(dragged: Locator) -> Self {
        Self {
            dragged,
            destination: None,
            last_pointer_y: 0.0,
            direction: None,
            expand_on_drop: false,
        }
    }
}

/// Phase of the drag state machine.
///
/// The commit/revert work happens synchronously inside the drag-end
/// transition, so between events the controller is always either idle or
/// dragging.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum DragPhase {
    /// No drag in progress.
    #[default]
    Idle,
    /// A drag is in progress, with its session state.
    Dragging(DragSession),
}
