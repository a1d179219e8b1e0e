//! Collaborator interfaces consumed by the drag controller.

use crate::geometry::{AttachMode, BoundingBox};
use crate::models::{Locator, OutlineError};

/// Accessor for the rendered outline tree.
///
/// The tree structure is owned by the rendering layer; the engine only
/// reads geometry and structure through this trait and requests mutations
/// (re-parenting, collapse toggles, transient visual flags) back through
/// it. [`crate::models::OutlineTree`] is the in-memory implementation used
/// in tests and headless callers.
pub trait OutlineView {
    /// Layout bounds of a block, or `None` if the block is unknown.
    fn bounds(&self, block: Locator) -> Option<BoundingBox>;

    /// Candidate drop containers for the dragged block, in priority order.
    fn drop_containers(&self, dragged: Locator) -> Vec<Locator>;

    /// A container's reorderable children in display order, decorative
    /// children excluded.
    fn reorderable_children(&self, container: Locator) -> Vec<Locator>;

    /// Whether a block is collapsed.
    fn is_collapsed(&self, block: Locator) -> bool;

    /// Collapses or expands a block.
    fn set_collapsed(&mut self, block: Locator, collapsed: bool);

    /// A block's current parent.
    fn parent_of(&self, block: Locator) -> Option<Locator>;

    /// The parent locator last confirmed to persistence for this block.
    fn recorded_parent(&self, block: Locator) -> Option<Locator>;

    /// Moves a block relative to a target.
    ///
    /// # Errors
    ///
    /// Implementations reject structurally invalid moves (unknown blocks,
    /// non-container prepend targets, moves into the block's own subtree).
    fn reparent(
        &mut self,
        block: Locator,
        target: Locator,
        attach: AttachMode,
    ) -> Result<(), OutlineError>;

    /// Marks a block as the active drop target. At most one block is marked
    /// at a time; implementations replace any previous marking.
    fn mark_drop_target(&mut self, block: Locator, attach: AttachMode);

    /// Clears the drop-target marking from a block, if it holds it.
    fn clear_drop_target(&mut self, block: Locator);

    /// Sets or clears the valid-drop flag on the dragged block.
    fn set_drop_valid(&mut self, block: Locator, valid: bool);

    /// Flags a block as reverting to its origin after a failed drag,
    /// taking the flag over from any previously reverted block.
    fn flag_reverted(&mut self, block: Locator);

    /// Drops any absolute-positioning override left on the dragged block.
    fn reset_drag_position(&mut self, block: Locator);
}

/// The scrollable viewport the outline is rendered in.
pub trait Viewport {
    /// Visible height of the viewport, in layout units.
    fn height(&self) -> f64;

    /// Scrolls the viewport by the given deltas.
    fn scroll_by(&mut self, dx: f64, dy: f64);
}

/// One pointer sample delivered with a drag event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragPointer {
    /// Pointer x in viewport coordinates.
    pub client_x: f64,
    /// Pointer y in viewport coordinates.
    pub client_y: f64,
    /// Cumulative vertical drag displacement since the drag started.
    pub drag_y: f64,
}

impl DragPointer {
    /// Creates a pointer sample.
    #[must_use]
    pub const fn new(client_x: f64, client_y: f64, drag_y: f64) -> Self {
        Self {
            client_x,
            client_y,
            drag_y,
        }
    }
}
