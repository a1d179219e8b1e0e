//! Block tree model
//!
//! The outline is a tree of [`BlockNode`]s keyed by [`Locator`]. The tree
//! structure is owned by whatever layer renders it; [`OutlineTree`] is the
//! in-memory model of that structure, and it implements the accessor trait
//! the drag controller works against, so the whole engine can run on
//! synthetic geometry.

mod block;

pub use block::{BlockKind, BlockNode, Locator, OutlineError, OutlineTree};
