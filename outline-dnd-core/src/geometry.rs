//! Drop-target resolution
//!
//! [`find_destination`] is the heart of the engine: given the dragged
//! block's bounding box, the drag direction, and a snapshot of the candidate
//! containers, it decides which block the pointer implies as a drop target
//! and how to attach to it. It is a pure function of the snapshot, so it can
//! be exercised with entirely synthetic geometry.
//!
//! Exact pixel alignment between a floating dragged element and the static
//! list is never achievable, so every decision goes through a fudge
//! tolerance, and the first/last siblings of a list get asymmetric special
//! cases that a naive midpoint comparison would get wrong.

use std::fmt;

use crate::config::DragConfig;
use crate::models::Locator;

/// Read-only geometric snapshot of a block's rendered representation.
///
/// Derived from the layout at query time and never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BoundingBox {
    /// Top edge, in layout units.
    pub top: f64,
    /// Left edge, in layout units.
    pub left: f64,
    /// Horizontal extent.
    pub width: f64,
    /// Vertical extent.
    pub height: f64,
}

impl BoundingBox {
    /// Creates a box from its top-left corner and extents.
    #[must_use]
    pub const fn new(top: f64, left: f64, width: f64, height: f64) -> Self {
        Self {
            top,
            left,
            width,
            height,
        }
    }

    /// Bottom edge of the box.
    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// Right edge of the box.
    #[must_use]
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    /// Whether `x` falls within the half-open horizontal span
    /// `[left, left + width)`.
    #[must_use]
    pub fn contains_x(&self, x: f64) -> bool {
        x >= self.left && x < self.right()
    }
}

/// Vertical direction of the drag, derived from successive pointer samples.
///
/// `None` (absence of a direction) means no vertical movement has been
/// observed yet in the current drag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragDirection {
    /// The pointer last moved toward smaller `y`.
    Up,
    /// The pointer last moved toward larger `y`.
    Down,
}

/// How a dragged block is inserted relative to a drop target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachMode {
    /// Insert as the target container's first child.
    Prepend,
    /// Insert as the sibling immediately before the target.
    Before,
    /// Insert as the sibling immediately after the target.
    After,
}

impl fmt::Display for AttachMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Prepend => write!(f, "prepend"),
            Self::Before => write!(f, "before"),
            Self::After => write!(f, "after"),
        }
    }
}

/// A resolved drop destination.
///
/// Resolution that finds no destination yields `Option::<DropTarget>::None`
/// rather than a sentinel value, so "no target" and "no attach mode" cannot
/// disagree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DropTarget {
    /// The block to attach to.
    pub target: Locator,
    /// How to attach to it.
    pub attach: AttachMode,
    /// A collapsed container that must be expanded before the drop lands.
    pub expand_ancestor: Option<Locator>,
}

/// A reorderable child of a candidate container, with its layout bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SiblingBounds {
    /// The sibling block.
    pub locator: Locator,
    /// Its bounds at snapshot time.
    pub bounds: BoundingBox,
}

/// Snapshot of one candidate container, taken at the start of a resolution
/// pass.
///
/// Candidates are examined in the order given; the first match wins. The
/// sibling list excludes the dragged block itself and any decorative
/// children that cannot be reordered.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateContainer {
    /// The container block.
    pub locator: Locator,
    /// Its bounds at snapshot time.
    pub bounds: BoundingBox,
    /// Whether the container is currently collapsed. A collapsed
    /// container's children are hidden from layout, so its own bounds stand
    /// in for theirs.
    pub collapsed: bool,
    /// Eligible children, in display order.
    pub siblings: Vec<SiblingBounds>,
}

impl CandidateContainer {
    /// Creates an expanded candidate with no siblings.
    #[must_use]
    pub const fn new(locator: Locator, bounds: BoundingBox) -> Self {
        Self {
            locator,
            bounds,
            collapsed: false,
            siblings: Vec::new(),
        }
    }

    /// Marks the candidate as collapsed.
    #[must_use]
    pub const fn collapsed(mut self) -> Self {
        self.collapsed = true;
        self
    }

    /// Appends a sibling to the candidate.
    #[must_use]
    pub fn sibling(mut self, locator: Locator, bounds: BoundingBox) -> Self {
        self.siblings.push(SiblingBounds { locator, bounds });
        self
    }
}

/// Resolves the drop destination implied by the dragged box.
///
/// Candidates are tried in priority order and the first match wins:
///
/// 1. A collapsed candidate matches when the dragged top is within
///    `collapse_proximity` of its top, or when the dragged box sits below
///    the candidate's top with its bottom inside the candidate. The result
///    prepends into the candidate and names it for expansion, so a drop
///    onto a collapsed section works without opening it first.
/// 2. A candidate with no eligible children matches when its top is within
///    `empty_container_proximity` of the dragged top. Exact top equality is
///    rejected: that is the container the block was just lifted out of.
/// 3. Otherwise each sibling is tried with a fudge tolerance of half its
///    height, capped at `sibling_fudge_cap`. A single sibling may be the
///    same size as the dragged box, so full containment is disambiguated by
///    drag direction; edge proximity decides the rest. With several
///    siblings, the last one is special-cased for both drag directions (the
///    dragged box may be taller than the target, so the downward case keys
///    off the dragged bottom edge), the first one matches near its top
///    regardless of direction, and anything else falls back to a midpoint
///    comparison.
///
/// Returns `None` when no candidate matches; callers treat that as a revert,
/// never as an error.
#[must_use]
pub fn find_destination(
    dragged: &BoundingBox,
    direction: Option<DragDirection>,
    candidates: &[CandidateContainer],
    config: &DragConfig,
) -> Option<DropTarget> {
    let top = dragged.top;
    let bottom = dragged.bottom();

    for candidate in candidates {
        if candidate.collapsed {
            let near_top = (top - candidate.bounds.top).abs() < config.collapse_proximity;
            let inside = top > candidate.bounds.top
                && bottom - config.collapse_proximity <= candidate.bounds.bottom();
            if near_top || inside {
                return Some(DropTarget {
                    target: candidate.locator,
                    attach: AttachMode::Prepend,
                    expand_ancestor: Some(candidate.locator),
                });
            }
            continue;
        }

        if candidate.siblings.is_empty() {
            // Exact equality means the candidate is the dragged block's own
            // emptied container; allowing it would trap the block there.
            if candidate.bounds.top != top
                && (top - candidate.bounds.top).abs() < config.empty_container_proximity
            {
                return Some(DropTarget {
                    target: candidate.locator,
                    attach: AttachMode::Prepend,
                    expand_ancestor: None,
                });
            }
            continue;
        }

        let last = candidate.siblings.len() - 1;
        for (index, sibling) in candidate.siblings.iter().enumerate() {
            let sib_top = sibling.bounds.top;
            let sib_height = sibling.bounds.height;
            let sib_bottom = sibling.bounds.bottom();
            let fudge = (sib_height / 2.0).ceil().min(config.sibling_fudge_cap);

            let attach = if candidate.siblings.len() == 1 {
                if top + fudge >= sib_top && bottom - fudge <= sib_bottom {
                    // Dragged box sits on top of the only sibling; only the
                    // drag direction can break the tie.
                    Some(match direction {
                        Some(DragDirection::Down) => AttachMode::After,
                        _ => AttachMode::Before,
                    })
                } else if (bottom - sib_top).abs() <= fudge {
                    Some(AttachMode::Before)
                } else if (top - sib_bottom).abs() <= fudge {
                    Some(AttachMode::After)
                } else {
                    None
                }
            } else if index == last
                && direction == Some(DragDirection::Up)
                && (top - sib_bottom).abs() <= fudge
            {
                Some(AttachMode::After)
            } else if index == 0 && (top - sib_top).abs() <= fudge {
                Some(AttachMode::Before)
            } else if index == last
                && direction == Some(DragDirection::Down)
                && (bottom - sib_bottom).abs() <= fudge
            {
                Some(AttachMode::After)
            } else if top >= sib_top && top <= sib_bottom {
                if top - sib_top <= sib_height / 2.0 {
                    Some(AttachMode::Before)
                } else {
                    Some(AttachMode::After)
                }
            } else {
                None
            };

            if let Some(attach) = attach {
                return Some(DropTarget {
                    target: sibling.locator,
                    attach,
                    expand_ancestor: None,
                });
            }
        }
    }

    None
}
