//! Drag state machine
//!
//! [`DragController`] drives the start/move/end pointer events of a drag:
//! each move it snapshots the candidate geometry, asks the resolver for the
//! implied destination, and keeps the single active drop-target marker in
//! sync; on release it performs the optimistic re-parent and hands a
//! [`crate::persist::ReorderPlan`] to the caller for persistence.
//!
//! The controller owns the per-drag [`DragSession`] exclusively and resets
//! it between drags. Everything it touches in the outside world goes
//! through the [`OutlineView`] and [`Viewport`] collaborator traits.

mod controller;
mod session;
mod view;

pub use controller::{DragController, DragOutcome};
pub use session::{DragPhase, DragSession};
pub use view::{DragPointer, OutlineView, Viewport};
