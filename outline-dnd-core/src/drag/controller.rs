//! The drag controller state machine.

use crate::config::DragConfig;
use crate::geometry::{find_destination, CandidateContainer, DragDirection, SiblingBounds};
use crate::models::Locator;
use crate::persist::ReorderPlan;

use super::session::{DragPhase, DragSession};
use super::view::{DragPointer, OutlineView, Viewport};

/// Result of a drag-end transition.
#[derive(Debug, Clone, PartialEq)]
pub enum DragOutcome {
    /// The drop landed; the tree was re-parented optimistically and the
    /// plan must be handed to the persister exactly once.
    Committed(ReorderPlan),
    /// The drop failed; the block was flagged to animate back to its
    /// origin and nothing was mutated.
    Reverted,
}

impl DragOutcome {
    /// Whether the drag committed.
    #[must_use]
    pub const fn is_committed(&self) -> bool {
        matches!(self, Self::Committed(_))
    }

    /// The reorder plan of a committed drag.
    #[must_use]
    pub const fn plan(&self) -> Option<&ReorderPlan> {
        match self {
            Self::Committed(plan) => Some(plan),
            Self::Reverted => None,
        }
    }
}

/// Drives one drag at a time through start/move/end pointer events.
///
/// All tree access goes through the [`OutlineView`] passed to each event;
/// the controller itself owns only the configuration and the per-drag
/// session, which it resets between drags.
#[derive(Debug, Default)]
pub struct DragController {
    config: DragConfig,
    phase: DragPhase,
}

impl DragController {
    /// Creates a controller with the given tolerances.
    #[must_use]
    pub const fn new(config: DragConfig) -> Self {
        Self {
            config,
            phase: DragPhase::Idle,
        }
    }

    /// The controller's configuration.
    #[must_use]
    pub const fn config(&self) -> &DragConfig {
        &self.config
    }

    /// Whether a drag is currently in progress.
    #[must_use]
    pub const fn is_dragging(&self) -> bool {
        matches!(self.phase, DragPhase::Dragging(_))
    }

    /// The active drag session, if a drag is in progress.
    #[must_use]
    pub const fn session(&self) -> Option<&DragSession> {
        match &self.phase {
            DragPhase::Dragging(session) => Some(session),
            DragPhase::Idle => None,
        }
    }

    /// Starts a drag of `block`.
    ///
    /// An expanded block is collapsed for the duration of the drag to keep
    /// its visual footprint small while it moves; the session remembers to
    /// re-expand it at drag end.
    pub fn on_drag_start<V: OutlineView>(&mut self, view: &mut V, block: Locator) {
        if self.is_dragging() {
            tracing::warn!(%block, "drag start while a drag was active, restarting");
        }
        let mut session = DragSession::new(block);
        if !view.is_collapsed(block) {
            view.set_collapsed(block, true);
            session.expand_on_drop = true;
        }
        tracing::debug!(%block, "drag started");
        self.phase = DragPhase::Dragging(session);
    }

    /// Processes one pointer move while dragging.
    ///
    /// A pointer near the viewport's top or bottom edge scrolls the
    /// viewport instead; scrolling and target resolution are mutually
    /// exclusive per event. Otherwise the destination implied by the
    /// current geometry is resolved and the visual target marker updated,
    /// with the pointer required to stay within the dragged block's
    /// horizontal span for the target to count.
    pub fn on_drag_move<V: OutlineView, P: Viewport>(
        &mut self,
        view: &mut V,
        viewport: &mut P,
        pointer: &DragPointer,
    ) {
        let DragPhase::Dragging(session) = &mut self.phase else {
            return;
        };

        let margin = self.config.edge_scroll_margin;
        let scroll = if viewport.height() - margin < pointer.client_y {
            margin
        } else if margin > pointer.client_y {
            -margin
        } else {
            0.0
        };
        if scroll != 0.0 {
            viewport.scroll_by(0.0, scroll);
            return;
        }

        let delta = pointer.drag_y - session.last_pointer_y;
        if delta > 0.0 {
            session.direction = Some(DragDirection::Down);
        } else if delta < 0.0 {
            session.direction = Some(DragDirection::Up);
        }
        session.last_pointer_y = pointer.drag_y;

        let dragged = session.dragged;
        if let Some(previous) = session.destination.take() {
            view.clear_drop_target(previous.target);
        }

        let Some(dragged_bounds) = view.bounds(dragged) else {
            view.set_drop_valid(dragged, false);
            return;
        };
        let candidates = snapshot_candidates(view, dragged);
        let resolved =
            find_destination(&dragged_bounds, session.direction, &candidates, &self.config);

        match resolved {
            Some(destination) if dragged_bounds.contains_x(pointer.client_x) => {
                view.set_drop_valid(dragged, true);
                view.mark_drop_target(destination.target, destination.attach);
                session.destination = Some(destination);
            }
            _ => {
                view.set_drop_valid(dragged, false);
            }
        }
    }

    /// Ends the drag.
    ///
    /// With a resolved destination and the pointer still inside the dragged
    /// block's horizontal span, the block is re-parented (expanding a
    /// collapsed target container first) and the resulting
    /// [`ReorderPlan`] returned for persistence. Otherwise the block is
    /// flagged to animate back to its origin. In both cases the dragged
    /// block is re-expanded if it was auto-collapsed at drag start, its
    /// positioning overrides are reset, and the session is cleared.
    pub fn on_drag_end<V: OutlineView>(
        &mut self,
        view: &mut V,
        pointer: &DragPointer,
    ) -> DragOutcome {
        let DragPhase::Dragging(session) = std::mem::take(&mut self.phase) else {
            tracing::warn!("drag end received while idle");
            return DragOutcome::Reverted;
        };
        let dragged = session.dragged;

        if let Some(destination) = &session.destination {
            view.clear_drop_target(destination.target);
        }
        view.set_drop_valid(dragged, false);

        let in_bounds = view
            .bounds(dragged)
            .is_some_and(|bounds| bounds.contains_x(pointer.client_x));

        let outcome = match session.destination {
            Some(destination) if in_bounds => {
                // Never drop into a collapsed container; open it first.
                if let Some(ancestor) = destination.expand_ancestor {
                    view.set_collapsed(ancestor, false);
                }
                match view.reparent(dragged, destination.target, destination.attach) {
                    Ok(()) => match ReorderPlan::compute(view, dragged) {
                        Some(plan) => DragOutcome::Committed(plan),
                        None => {
                            tracing::warn!(%dragged, "no parent after re-parent, reverting");
                            view.flag_reverted(dragged);
                            DragOutcome::Reverted
                        }
                    },
                    Err(error) => {
                        tracing::error!(%dragged, %error, "re-parent rejected, reverting drop");
                        view.flag_reverted(dragged);
                        DragOutcome::Reverted
                    }
                }
            }
            _ => {
                view.flag_reverted(dragged);
                DragOutcome::Reverted
            }
        };

        if session.expand_on_drop {
            view.set_collapsed(dragged, false);
        }
        view.reset_drag_position(dragged);
        tracing::debug!(%dragged, committed = outcome.is_committed(), "drag ended");
        outcome
    }
}

/// Builds the geometry snapshot the resolver runs against.
///
/// Candidates come back in the accessor's priority order; each carries its
/// collapsed flag and its reorderable children, excluding the dragged block
/// itself. Blocks without layout bounds (no longer rendered) are skipped.
fn snapshot_candidates<V: OutlineView>(view: &V, dragged: Locator) -> Vec<CandidateContainer> {
    view.drop_containers(dragged)
        .into_iter()
        .filter_map(|container| {
            let bounds = view.bounds(container)?;
            let siblings = view
                .reorderable_children(container)
                .into_iter()
                .filter(|sibling| *sibling != dragged)
                .filter_map(|sibling| {
                    view.bounds(sibling).map(|bounds| SiblingBounds {
                        locator: sibling,
                        bounds,
                    })
                })
                .collect();
            Some(CandidateContainer {
                locator: container,
                bounds,
                collapsed: view.is_collapsed(container),
                siblings,
            })
        })
        .collect()
}
