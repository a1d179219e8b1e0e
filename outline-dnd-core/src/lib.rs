//! Outline drag-and-drop core library
//!
//! This crate is the client-side reordering engine for hierarchical outline
//! editors: grab a block, drag it over a nested tree of containers, resolve
//! which container and insertion point the pointer implies, and on release
//! commit the move to the tree and persist the affected child orders.
//!
//! Rendering, templating, and the update endpoint are external
//! collaborators reached through narrow traits, so the entire engine runs
//! against synthetic geometry in tests.
//!
//! # Crate Structure
//!
//! - [`geometry`] - Pure drop-target resolution over bounding-box snapshots
//! - [`drag`] - The drag state machine and its collaborator traits
//! - [`models`] - Locators, block nodes, and the in-memory outline tree
//! - [`persist`] - The reorder persister and its ordering contract
//! - [`config`] - Tolerances and timer durations, with TOML overrides
//! - [`trace`] - Tracing subscriber setup for embedding binaries

#![warn(missing_docs)]

pub mod config;
pub mod drag;
pub mod geometry;
pub mod models;
pub mod persist;
pub mod trace;

pub use config::{
    ConfigError, DragConfig, DEFAULT_COLLAPSE_PROXIMITY, DEFAULT_DROP_FLAG_MS,
    DEFAULT_EDGE_SCROLL_MARGIN, DEFAULT_EMPTY_CONTAINER_PROXIMITY, DEFAULT_SIBLING_FUDGE_CAP,
};
pub use drag::{
    DragController, DragOutcome, DragPhase, DragPointer, DragSession, OutlineView, Viewport,
};
pub use geometry::{
    find_destination, AttachMode, BoundingBox, CandidateContainer, DragDirection, DropTarget,
    SiblingBounds,
};
pub use models::{BlockKind, BlockNode, Locator, OutlineError, OutlineTree};
pub use persist::{
    ChildOrderStore, ChildrenUpdate, CommitReceipt, NoOpFeedback, NoOpIndicator, ParentUpdate,
    PersistError, ReorderFeedback, ReorderPersister, ReorderPlan, SavingIndicator, StoreError,
    SAVING_MESSAGE,
};
pub use trace::{init_tracing, is_tracing_initialized, TraceError, TraceLevel};
