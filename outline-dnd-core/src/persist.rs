//! Reorder persistence
//!
//! A committed drop mutates the tree first and persists second. The
//! [`ReorderPlan`] is the snapshot taken between those two steps: the
//! affected parents with their post-move child orders. The
//! [`ReorderPersister`] executes a plan exactly once, with a hard ordering
//! contract when the drop moved the block between parents: the old parent's
//! shortened list is sent before the new parent's list, because the update
//! endpoint is a full replacement and racing the two writes could drop the
//! block from both. The block's recorded-parent bookkeeping advances only
//! after the old parent's list has been durably sent.
//!
//! Persistence is fire-and-forget from the drag controller's point of view:
//! commits are not serialized across drags, and a failed call leaves the
//! optimistic tree state in place. Failures surface as a typed
//! [`PersistError`] naming the phase and parent so callers can offer a
//! retry.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::DragConfig;
use crate::drag::OutlineView;
use crate::models::Locator;

/// User-facing message shown while a reorder is being saved.
pub const SAVING_MESSAGE: &str = "Saving…";

/// Wire body of a child-order update: a full replacement of the parent's
/// ordered child locators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChildrenUpdate {
    /// The parent's children, in order.
    pub children: Vec<Locator>,
}

impl ChildrenUpdate {
    /// Creates an update body from an ordered child list.
    #[must_use]
    pub fn new(children: impl Into<Vec<Locator>>) -> Self {
        Self {
            children: children.into(),
        }
    }
}

/// Errors a [`ChildOrderStore`] implementation can report.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The endpoint rejected the update.
    #[error("update rejected by the endpoint: {reason}")]
    Rejected {
        /// Reason given by the endpoint.
        reason: String,
    },

    /// The endpoint could not be reached.
    #[error("endpoint unreachable: {0}")]
    Unreachable(String),
}

/// The persistence endpoint for child-order updates.
///
/// `update_children` has full-replace semantics: the given list becomes the
/// parent's complete ordered child set. There is no partial update.
#[async_trait]
pub trait ChildOrderStore: Send + Sync {
    /// Replaces `parent`'s ordered child-locator list.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] when the endpoint rejects the update or
    /// cannot be reached.
    async fn update_children(
        &self,
        parent: &Locator,
        children: &[Locator],
    ) -> Result<(), StoreError>;
}

/// Transient notification widget shown while a save is in flight.
pub trait SavingIndicator: Send + Sync {
    /// Shows the indicator with a short user-facing message.
    fn show(&self, message: &str);

    /// Hides the indicator.
    fn hide(&self);
}

/// Callbacks the persister raises while executing a plan.
pub trait ReorderFeedback: Send + Sync {
    /// The old parent's list was durably sent; the block's recorded parent
    /// may now advance to `new_parent`.
    fn parent_recorded(&self, block: Locator, new_parent: Locator);

    /// The transient was-dropped flag was set on the block.
    fn drop_flag_set(&self, block: Locator);

    /// The was-dropped flag expired.
    fn drop_flag_cleared(&self, block: Locator);
}

/// Indicator that displays nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpIndicator;

impl SavingIndicator for NoOpIndicator {
    fn show(&self, _message: &str) {}
    fn hide(&self) {}
}

/// Feedback sink that ignores every callback.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpFeedback;

impl ReorderFeedback for NoOpFeedback {
    fn parent_recorded(&self, _block: Locator, _new_parent: Locator) {}
    fn drop_flag_set(&self, _block: Locator) {}
    fn drop_flag_cleared(&self, _block: Locator) {}
}

/// One parent whose child order must be persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParentUpdate {
    /// The parent block.
    pub parent: Locator,
    /// Its reorderable children, in current tree order.
    pub children: Vec<Locator>,
}

/// Snapshot of the parents affected by one committed drop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReorderPlan {
    /// The block that was moved.
    pub block: Locator,
    /// The previous parent and its shortened child list; present only when
    /// the drop moved the block between parents.
    pub old_parent: Option<ParentUpdate>,
    /// The parent the block now lives under, with its new child list.
    pub new_parent: ParentUpdate,
}

impl ReorderPlan {
    /// Snapshots the affected parents for `block`, which must already sit
    /// at its post-drop position in the tree.
    ///
    /// The previous parent comes from the block's recorded-parent
    /// bookkeeping; its child list is queried from the tree, where the
    /// moved block no longer appears. Returns `None` if the block has no
    /// parent (nothing to persist against).
    #[must_use]
    pub fn compute<V: OutlineView + ?Sized>(view: &V, block: Locator) -> Option<Self> {
        let new_parent = view.parent_of(block)?;
        let old_parent = match view.recorded_parent(block) {
            Some(old) if old != new_parent => Some(ParentUpdate {
                parent: old,
                children: view.reorderable_children(old),
            }),
            _ => None,
        };
        Some(Self {
            block,
            old_parent,
            new_parent: ParentUpdate {
                parent: new_parent,
                children: view.reorderable_children(new_parent),
            },
        })
    }

    /// Whether the drop moved the block to a different parent.
    #[must_use]
    pub const fn parent_changed(&self) -> bool {
        self.old_parent.is_some()
    }
}

/// Errors raised while persisting a [`ReorderPlan`].
///
/// Either way the in-memory tree has already advanced optimistically; the
/// error names the phase and parent so the caller can surface a retry
/// affordance instead of silently diverging from the server.
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    /// The old parent's shortened child list could not be saved. The new
    /// parent was not contacted.
    #[error("failed to save previous parent {parent}: {source}")]
    OldParent {
        /// The parent whose update failed.
        parent: Locator,
        /// The underlying store error.
        source: StoreError,
    },

    /// The new parent's child list could not be saved. The saving indicator
    /// is intentionally left visible.
    #[error("failed to save new parent {parent}: {source}")]
    NewParent {
        /// The parent whose update failed.
        parent: Locator,
        /// The underlying store error.
        source: StoreError,
    },
}

impl PersistError {
    /// The parent whose update failed.
    #[must_use]
    pub const fn parent(&self) -> Locator {
        match self {
            Self::OldParent { parent, .. } | Self::NewParent { parent, .. } => *parent,
        }
    }
}

/// Receipt for a successfully persisted reorder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitReceipt {
    /// The block that was moved.
    pub block: Locator,
    /// Whether the move crossed parents.
    pub parent_changed: bool,
    /// When the final save completed.
    pub committed_at: DateTime<Utc>,
}

/// Executes reorder plans against a [`ChildOrderStore`].
#[derive(Debug)]
pub struct ReorderPersister<S, N, F> {
    store: S,
    indicator: N,
    feedback: F,
    config: DragConfig,
}

impl<S, N, F> ReorderPersister<S, N, F>
where
    S: ChildOrderStore,
    N: SavingIndicator,
    F: ReorderFeedback,
{
    /// Creates a persister over the given collaborators.
    pub const fn new(store: S, indicator: N, feedback: F, config: DragConfig) -> Self {
        Self {
            store,
            indicator,
            feedback,
            config,
        }
    }

    /// Persists one committed drop.
    ///
    /// When the plan crosses parents the old parent is saved first, the
    /// recorded-parent bookkeeping advances, and only then is the new
    /// parent saved. The saving indicator spans the new-parent call and is
    /// hidden only on its success; the was-dropped flag is cleared on its
    /// own timer concurrently with that call.
    ///
    /// # Errors
    ///
    /// Returns a [`PersistError`] naming the phase that failed. The
    /// in-memory tree keeps its optimistic state either way.
    pub async fn commit(&self, plan: ReorderPlan) -> Result<CommitReceipt, PersistError> {
        let parent_changed = plan.parent_changed();
        if let Some(old) = &plan.old_parent {
            tracing::debug!(parent = %old.parent, children = old.children.len(), "saving previous parent");
            self.store
                .update_children(&old.parent, &old.children)
                .await
                .map_err(|source| {
                    tracing::warn!(parent = %old.parent, error = %source, "previous parent save failed");
                    PersistError::OldParent {
                        parent: old.parent,
                        source,
                    }
                })?;
            // Bookkeeping may only advance once the old list is durably
            // sent.
            self.feedback.parent_recorded(plan.block, plan.new_parent.parent);
        }

        self.indicator.show(SAVING_MESSAGE);
        self.feedback.drop_flag_set(plan.block);

        let save = self
            .store
            .update_children(&plan.new_parent.parent, &plan.new_parent.children);
        let flag_timer = async {
            tokio::time::sleep(self.config.drop_flag_duration()).await;
            self.feedback.drop_flag_cleared(plan.block);
        };
        let (saved, ()) = tokio::join!(save, flag_timer);
        saved.map_err(|source| {
            tracing::warn!(parent = %plan.new_parent.parent, error = %source, "save failed, indicator left visible");
            PersistError::NewParent {
                parent: plan.new_parent.parent,
                source,
            }
        })?;
        self.indicator.hide();

        tracing::debug!(block = %plan.block, parent_changed, "reorder persisted");
        Ok(CommitReceipt {
            block: plan.block,
            parent_changed,
            committed_at: Utc::now(),
        })
    }
}
