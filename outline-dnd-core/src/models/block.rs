//! Blocks, locators, and the outline tree.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::drag::OutlineView;
use crate::geometry::{AttachMode, BoundingBox};

/// Opaque stable identifier for a block.
///
/// Locators are the persistence keys: child-order updates are expressed as
/// ordered lists of locators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Locator(pub Uuid);

impl Locator {
    /// Creates a new random locator.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for Locator {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Block({})", self.0)
    }
}

/// Classification of a block, used to filter candidate containers.
///
/// A container names the kind it accepts; only blocks of that kind resolve
/// against it during a drag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockKind(pub u8);

impl BlockKind {
    /// Creates a kind with the given tag.
    #[must_use]
    pub const fn new(tag: u8) -> Self {
        Self(tag)
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Kind({})", self.0)
    }
}

/// A node in the outline tree.
///
/// Built with the `BlockNode::new` builder and handed to
/// [`OutlineTree::insert`]; after insertion the tree owns all structural
/// fields (parent, children, bookkeeping).
#[derive(Debug, Clone)]
pub struct BlockNode {
    locator: Locator,
    kind: BlockKind,
    accepts: Option<BlockKind>,
    parent: Option<Locator>,
    children: Vec<Locator>,
    collapsed: bool,
    reorderable: bool,
    recorded_parent: Option<Locator>,
    bounds: BoundingBox,
    drop_valid: bool,
    was_dropped: bool,
}

impl BlockNode {
    /// Creates a block of the given kind with a fresh locator.
    #[must_use]
    pub fn new(kind: BlockKind) -> Self {
        Self {
            locator: Locator::new(),
            kind,
            accepts: None,
            parent: None,
            children: Vec::new(),
            collapsed: false,
            reorderable: true,
            recorded_parent: None,
            bounds: BoundingBox::default(),
            drop_valid: false,
            was_dropped: false,
        }
    }

    /// Uses a caller-chosen locator instead of a random one.
    #[must_use]
    pub const fn with_locator(mut self, locator: Locator) -> Self {
        self.locator = locator;
        self
    }

    /// Makes the block a drop container for blocks of `kind`.
    #[must_use]
    pub const fn accepts(mut self, kind: BlockKind) -> Self {
        self.accepts = Some(kind);
        self
    }

    /// Sets the initial collapsed state.
    #[must_use]
    pub const fn collapsed(mut self, collapsed: bool) -> Self {
        self.collapsed = collapsed;
        self
    }

    /// Marks the block as decorative: rendered among a container's children
    /// but never part of the reorderable sibling set.
    #[must_use]
    pub const fn decorative(mut self) -> Self {
        self.reorderable = false;
        self
    }

    /// Sets the initial layout bounds.
    #[must_use]
    pub const fn bounds(mut self, bounds: BoundingBox) -> Self {
        self.bounds = bounds;
        self
    }

    /// The block's locator.
    #[must_use]
    pub const fn locator(&self) -> Locator {
        self.locator
    }

    /// The block's kind.
    #[must_use]
    pub const fn kind(&self) -> BlockKind {
        self.kind
    }

    /// The kind this block accepts as reorderable children, if any.
    #[must_use]
    pub const fn accepted_kind(&self) -> Option<BlockKind> {
        self.accepts
    }

    /// Current parent, if any.
    #[must_use]
    pub const fn parent(&self) -> Option<Locator> {
        self.parent
    }

    /// Ordered children, decorative ones included.
    #[must_use]
    pub fn children(&self) -> &[Locator] {
        &self.children
    }

    /// Whether the block is collapsed.
    #[must_use]
    pub const fn is_collapsed(&self) -> bool {
        self.collapsed
    }

    /// Whether the block participates in reordering.
    #[must_use]
    pub const fn is_reorderable(&self) -> bool {
        self.reorderable
    }

    /// The parent locator last confirmed to persistence.
    #[must_use]
    pub const fn recorded_parent(&self) -> Option<Locator> {
        self.recorded_parent
    }

    /// Current layout bounds.
    #[must_use]
    pub const fn layout_bounds(&self) -> BoundingBox {
        self.bounds
    }
}

/// Errors raised by structural operations on an [`OutlineTree`].
#[derive(Debug, thiserror::Error)]
pub enum OutlineError {
    /// The referenced block is not in the tree.
    #[error("block not found: {0}")]
    BlockNotFound(Locator),

    /// A block with the same locator is already in the tree.
    #[error("duplicate block: {0}")]
    DuplicateBlock(Locator),

    /// The prepend target does not accept the dragged block's kind.
    #[error("block {0} does not accept this block as a child")]
    NotAContainer(Locator),

    /// A before/after target has no parent to attach next to.
    #[error("block {0} has no parent")]
    NoParent(Locator),

    /// The move would place a block inside its own subtree.
    #[error("cannot move {block} into its own subtree")]
    CycleDetected {
        /// The block being moved.
        block: Locator,
    },

    /// A block cannot be attached relative to itself.
    #[error("a block cannot be moved relative to itself")]
    SelfTarget,
}

/// In-memory outline tree.
///
/// Holds the block nodes, the container priority order, and the transient
/// visual flags the drag controller drives. At most one block carries the
/// active drop-target mark, and at most one carries the reverted flag;
/// setting either clears the previous holder.
#[derive(Debug, Default)]
pub struct OutlineTree {
    nodes: HashMap<Locator, BlockNode>,
    containers: Vec<Locator>,
    active_target: Option<(Locator, AttachMode)>,
    reverted: Option<Locator>,
}

impl OutlineTree {
    /// Creates an empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a block under `parent` (appended after existing children),
    /// or as a root when `parent` is `None`.
    ///
    /// The block's recorded parent is seeded with `parent`, mirroring a tree
    /// freshly rendered from persisted state.
    ///
    /// # Errors
    ///
    /// Returns [`OutlineError::DuplicateBlock`] if the locator is already
    /// present and [`OutlineError::BlockNotFound`] if `parent` is not.
    pub fn insert(
        &mut self,
        node: BlockNode,
        parent: Option<Locator>,
    ) -> Result<Locator, OutlineError> {
        let locator = node.locator;
        if self.nodes.contains_key(&locator) {
            return Err(OutlineError::DuplicateBlock(locator));
        }
        if let Some(parent) = parent {
            self.node(parent)?;
        }

        let mut node = node;
        node.parent = parent;
        node.recorded_parent = parent;
        if node.accepts.is_some() {
            self.containers.push(locator);
        }
        if let Some(parent) = parent
            && let Some(parent_node) = self.nodes.get_mut(&parent)
        {
            parent_node.children.push(locator);
        }
        self.nodes.insert(locator, node);
        Ok(locator)
    }

    /// Looks up a block.
    ///
    /// # Errors
    ///
    /// Returns [`OutlineError::BlockNotFound`] if the block is not in the
    /// tree.
    pub fn node(&self, block: Locator) -> Result<&BlockNode, OutlineError> {
        self.nodes
            .get(&block)
            .ok_or(OutlineError::BlockNotFound(block))
    }

    /// Whether the tree contains `block`.
    #[must_use]
    pub fn contains(&self, block: Locator) -> bool {
        self.nodes.contains_key(&block)
    }

    /// Number of blocks in the tree.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Updates a block's layout bounds.
    ///
    /// # Errors
    ///
    /// Returns [`OutlineError::BlockNotFound`] if the block is not in the
    /// tree.
    pub fn set_bounds(&mut self, block: Locator, bounds: BoundingBox) -> Result<(), OutlineError> {
        let node = self
            .nodes
            .get_mut(&block)
            .ok_or(OutlineError::BlockNotFound(block))?;
        node.bounds = bounds;
        Ok(())
    }

    /// Records the parent locator last confirmed to persistence.
    ///
    /// # Errors
    ///
    /// Returns [`OutlineError::BlockNotFound`] if the block is not in the
    /// tree.
    pub fn set_recorded_parent(
        &mut self,
        block: Locator,
        parent: Option<Locator>,
    ) -> Result<(), OutlineError> {
        let node = self
            .nodes
            .get_mut(&block)
            .ok_or(OutlineError::BlockNotFound(block))?;
        node.recorded_parent = parent;
        Ok(())
    }

    /// Sets or clears the transient was-dropped flag.
    ///
    /// # Errors
    ///
    /// Returns [`OutlineError::BlockNotFound`] if the block is not in the
    /// tree.
    pub fn set_was_dropped(&mut self, block: Locator, dropped: bool) -> Result<(), OutlineError> {
        let node = self
            .nodes
            .get_mut(&block)
            .ok_or(OutlineError::BlockNotFound(block))?;
        node.was_dropped = dropped;
        Ok(())
    }

    /// Whether the block currently carries the was-dropped flag.
    #[must_use]
    pub fn was_dropped(&self, block: Locator) -> bool {
        self.nodes.get(&block).is_some_and(|node| node.was_dropped)
    }

    /// Whether the block currently carries the valid-drop flag.
    #[must_use]
    pub fn is_drop_valid(&self, block: Locator) -> bool {
        self.nodes.get(&block).is_some_and(|node| node.drop_valid)
    }

    /// The block currently marked as the active drop target, with its
    /// attach mode.
    #[must_use]
    pub const fn active_drop_target(&self) -> Option<(Locator, AttachMode)> {
        self.active_target
    }

    /// The block currently flagged as reverted (animating back to its
    /// origin after a failed drag).
    #[must_use]
    pub const fn reverted_block(&self) -> Option<Locator> {
        self.reverted
    }

    /// Moves `block` relative to `target`.
    ///
    /// # Errors
    ///
    /// Rejects unknown blocks, self-targets, prepend targets that do not
    /// accept the block's kind, before/after targets without a parent, and
    /// moves that would place a block inside its own subtree.
    pub fn reparent(
        &mut self,
        block: Locator,
        target: Locator,
        attach: AttachMode,
    ) -> Result<(), OutlineError> {
        if block == target {
            return Err(OutlineError::SelfTarget);
        }
        let kind = self.node(block)?.kind;
        let new_parent = match attach {
            AttachMode::Prepend => {
                let target_node = self.node(target)?;
                if target_node.accepts != Some(kind) {
                    return Err(OutlineError::NotAContainer(target));
                }
                target
            }
            AttachMode::Before | AttachMode::After => self
                .node(target)?
                .parent
                .ok_or(OutlineError::NoParent(target))?,
        };

        // Walking up from the destination must never reach the moved block.
        let mut cursor = Some(new_parent);
        while let Some(current) = cursor {
            if current == block {
                return Err(OutlineError::CycleDetected { block });
            }
            cursor = self.node(current)?.parent;
        }

        let old_parent = self.node(block)?.parent;
        if let Some(old_parent) = old_parent
            && let Some(old_node) = self.nodes.get_mut(&old_parent)
        {
            old_node.children.retain(|child| *child != block);
        }

        let index = match attach {
            AttachMode::Prepend => 0,
            AttachMode::Before | AttachMode::After => {
                let position = self
                    .node(new_parent)?
                    .children
                    .iter()
                    .position(|child| *child == target)
                    .ok_or(OutlineError::BlockNotFound(target))?;
                if attach == AttachMode::After {
                    position + 1
                } else {
                    position
                }
            }
        };

        if let Some(parent_node) = self.nodes.get_mut(&new_parent) {
            let index = index.min(parent_node.children.len());
            parent_node.children.insert(index, block);
        }
        if let Some(node) = self.nodes.get_mut(&block) {
            node.parent = Some(new_parent);
        }
        Ok(())
    }
}

impl OutlineView for OutlineTree {
    fn bounds(&self, block: Locator) -> Option<BoundingBox> {
        self.nodes.get(&block).map(|node| node.bounds)
    }

    fn drop_containers(&self, dragged: Locator) -> Vec<Locator> {
        let Some(kind) = self.nodes.get(&dragged).map(|node| node.kind) else {
            return Vec::new();
        };
        self.containers
            .iter()
            .copied()
            .filter(|container| {
                self.nodes
                    .get(container)
                    .is_some_and(|node| node.accepts == Some(kind))
            })
            .collect()
    }

    fn reorderable_children(&self, container: Locator) -> Vec<Locator> {
        let Some(node) = self.nodes.get(&container) else {
            return Vec::new();
        };
        node.children
            .iter()
            .copied()
            .filter(|child| {
                self.nodes
                    .get(child)
                    .is_some_and(BlockNode::is_reorderable)
            })
            .collect()
    }

    fn is_collapsed(&self, block: Locator) -> bool {
        self.nodes.get(&block).is_some_and(|node| node.collapsed)
    }

    fn set_collapsed(&mut self, block: Locator, collapsed: bool) {
        if let Some(node) = self.nodes.get_mut(&block) {
            node.collapsed = collapsed;
        }
    }

    fn parent_of(&self, block: Locator) -> Option<Locator> {
        self.nodes.get(&block).and_then(|node| node.parent)
    }

    fn recorded_parent(&self, block: Locator) -> Option<Locator> {
        self.nodes.get(&block).and_then(|node| node.recorded_parent)
    }

    fn reparent(
        &mut self,
        block: Locator,
        target: Locator,
        attach: AttachMode,
    ) -> Result<(), OutlineError> {
        Self::reparent(self, block, target, attach)
    }

    fn mark_drop_target(&mut self, block: Locator, attach: AttachMode) {
        // Marking is idempotent: replacing the tuple clears the old holder.
        self.active_target = Some((block, attach));
    }

    fn clear_drop_target(&mut self, block: Locator) {
        if self.active_target.map(|(holder, _)| holder) == Some(block) {
            self.active_target = None;
        }
    }

    fn set_drop_valid(&mut self, block: Locator, valid: bool) {
        if let Some(node) = self.nodes.get_mut(&block) {
            node.drop_valid = valid;
        }
    }

    fn flag_reverted(&mut self, block: Locator) {
        // Only one block animates back at a time; a new failed drag takes
        // the flag over from the previous one.
        self.reverted = Some(block);
    }

    fn reset_drag_position(&mut self, _block: Locator) {
        // The in-memory model keeps no transient drag offset; a rendering
        // layer would drop its absolute-positioning overrides here.
    }
}
