//! End-to-end drag flows: pointer events through the controller, optimistic
//! tree mutation, and the persistence hand-off, all over synthetic
//! geometry.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use outline_dnd_core::{
    BlockKind, BlockNode, BoundingBox, ChildOrderStore, DragConfig, DragController, DragOutcome,
    DragPointer, Locator, NoOpFeedback, NoOpIndicator, OutlineTree, OutlineView, ReorderPersister,
    StoreError, Viewport,
};

const SECTION: BlockKind = BlockKind::new(0);
const UNIT: BlockKind = BlockKind::new(1);

struct TestViewport {
    height: f64,
    scrolled: Vec<(f64, f64)>,
}

impl Viewport for TestViewport {
    fn height(&self) -> f64 {
        self.height
    }

    fn scroll_by(&mut self, dx: f64, dy: f64) {
        self.scrolled.push((dx, dy));
    }
}

/// Store that records every update call in order.
#[derive(Default)]
struct RecordingStore {
    calls: Arc<Mutex<Vec<(Locator, Vec<Locator>)>>>,
}

#[async_trait]
impl ChildOrderStore for RecordingStore {
    async fn update_children(
        &self,
        parent: &Locator,
        children: &[Locator],
    ) -> Result<(), StoreError> {
        self.calls
            .lock()
            .unwrap()
            .push((*parent, children.to_vec()));
        Ok(())
    }
}

fn bb(top: f64, height: f64) -> BoundingBox {
    BoundingBox::new(top, 0.0, 100.0, height)
}

/// A course outline: one populated section (three units at tops 0/40/80)
/// and one empty section at top 200.
fn outline() -> (OutlineTree, Locator, Locator, Vec<Locator>) {
    let mut tree = OutlineTree::new();
    let filled = tree
        .insert(
            BlockNode::new(SECTION).accepts(UNIT).bounds(bb(0.0, 120.0)),
            None,
        )
        .unwrap();
    let empty = tree
        .insert(
            BlockNode::new(SECTION).accepts(UNIT).bounds(bb(200.0, 40.0)),
            None,
        )
        .unwrap();
    let units = (0..3)
        .map(|slot| {
            #[allow(clippy::cast_precision_loss)]
            let top = 40.0 * slot as f64;
            tree.insert(BlockNode::new(UNIT).bounds(bb(top, 40.0)), Some(filled))
                .unwrap()
        })
        .collect();
    (tree, filled, empty, units)
}

fn viewport() -> TestViewport {
    TestViewport {
        height: 800.0,
        scrolled: Vec::new(),
    }
}

fn pointer(client_y: f64, drag_y: f64) -> DragPointer {
    DragPointer::new(50.0, client_y, drag_y)
}

fn persister(store: RecordingStore) -> ReorderPersister<RecordingStore, NoOpIndicator, NoOpFeedback>
{
    ReorderPersister::new(
        store,
        NoOpIndicator,
        NoOpFeedback,
        DragConfig::default().with_drop_flag_ms(1),
    )
}

#[tokio::test]
async fn reorder_within_a_section_persists_one_parent() {
    let (mut tree, filled, _, units) = outline();
    let mut viewport = viewport();
    let mut controller = DragController::default();

    // Drag the first unit below the others, with a couple of intermediate
    // samples on the way down.
    controller.on_drag_start(&mut tree, units[0]);
    for (top, drag_y) in [(30.0, 30.0), (60.0, 60.0), (82.0, 82.0)] {
        tree.set_bounds(units[0], bb(top, 40.0)).unwrap();
        controller.on_drag_move(&mut tree, &mut viewport, &pointer(300.0, drag_y));
    }
    let outcome = controller.on_drag_end(&mut tree, &pointer(300.0, 82.0));

    let DragOutcome::Committed(plan) = outcome else {
        panic!("expected a committed drop");
    };
    assert_eq!(
        tree.node(filled).unwrap().children(),
        &[units[1], units[2], units[0]]
    );

    let store = RecordingStore::default();
    let calls = Arc::clone(&store.calls);
    let receipt = persister(store).commit(plan).await.unwrap();

    assert!(!receipt.parent_changed);
    let calls = calls.lock().unwrap().clone();
    assert_eq!(calls, vec![(filled, vec![units[1], units[2], units[0]])]);
}

#[tokio::test]
async fn cross_section_drop_issues_two_ordered_updates() {
    let (mut tree, filled, empty, units) = outline();
    let mut viewport = viewport();
    let mut controller = DragController::default();

    // Carry the first unit down onto the empty section.
    controller.on_drag_start(&mut tree, units[0]);
    tree.set_bounds(units[0], bb(210.0, 40.0)).unwrap();
    controller.on_drag_move(&mut tree, &mut viewport, &pointer(300.0, 210.0));
    let outcome = controller.on_drag_end(&mut tree, &pointer(300.0, 210.0));

    let DragOutcome::Committed(plan) = outcome else {
        panic!("expected a committed drop");
    };
    assert!(plan.parent_changed());

    let store = RecordingStore::default();
    let calls = Arc::clone(&store.calls);
    let receipt = persister(store).commit(plan).await.unwrap();
    assert!(receipt.parent_changed);

    // Exactly two calls: the shortened old list first, then the new list.
    let calls = calls.lock().unwrap().clone();
    assert_eq!(
        calls,
        vec![
            (filled, vec![units[1], units[2]]),
            (empty, vec![units[0]]),
        ]
    );
}

#[test]
fn drop_onto_a_collapsed_section_expands_it_first() {
    let (mut tree, _, empty, units) = outline();
    tree.set_collapsed(empty, true);
    let mut viewport = viewport();
    let mut controller = DragController::default();

    controller.on_drag_start(&mut tree, units[1]);
    tree.set_bounds(units[1], bb(204.0, 40.0)).unwrap();
    controller.on_drag_move(&mut tree, &mut viewport, &pointer(300.0, 164.0));
    let outcome = controller.on_drag_end(&mut tree, &pointer(300.0, 164.0));

    assert!(outcome.is_committed());
    assert!(!tree.is_collapsed(empty));
    assert_eq!(tree.node(empty).unwrap().children(), &[units[1]]);
}

#[test]
fn release_outside_the_block_column_reverts_without_mutation() {
    let (mut tree, filled, _, units) = outline();
    let mut viewport = viewport();
    let mut controller = DragController::default();

    controller.on_drag_start(&mut tree, units[0]);
    tree.set_bounds(units[0], bb(82.0, 40.0)).unwrap();
    controller.on_drag_move(&mut tree, &mut viewport, &pointer(300.0, 82.0));
    assert!(tree.is_drop_valid(units[0]));

    // The pointer drifts out of the column before release.
    let sideways = DragPointer::new(250.0, 300.0, 82.0);
    let outcome = controller.on_drag_end(&mut tree, &sideways);

    assert_eq!(outcome, DragOutcome::Reverted);
    assert_eq!(tree.node(filled).unwrap().children(), units.as_slice());
    assert_eq!(tree.reverted_block(), Some(units[0]));
    assert!(!tree.is_drop_valid(units[0]));
}

#[test]
fn edge_scrolling_suppresses_target_resolution_for_the_event() {
    let (mut tree, _, _, units) = outline();
    let mut viewport = viewport();
    let mut controller = DragController::default();

    controller.on_drag_start(&mut tree, units[0]);
    // Geometry that would resolve, but the pointer is pinned to the bottom
    // edge of the viewport.
    tree.set_bounds(units[0], bb(82.0, 40.0)).unwrap();
    controller.on_drag_move(&mut tree, &mut viewport, &pointer(795.0, 82.0));

    assert_eq!(viewport.scrolled, vec![(0.0, 10.0)]);
    assert!(tree.active_drop_target().is_none());
}

#[test]
fn a_new_drag_takes_over_the_reverted_flag() {
    let (mut tree, _, _, units) = outline();
    let mut controller = DragController::default();

    // Two failed drags in a row; only the most recent block animates back.
    controller.on_drag_start(&mut tree, units[0]);
    controller.on_drag_end(&mut tree, &pointer(300.0, 0.0));
    assert_eq!(tree.reverted_block(), Some(units[0]));

    controller.on_drag_start(&mut tree, units[2]);
    controller.on_drag_end(&mut tree, &pointer(300.0, 0.0));
    assert_eq!(tree.reverted_block(), Some(units[2]));
}

#[tokio::test]
async fn rapid_successive_drags_commit_independently() {
    let (mut tree, filled, empty, units) = outline();
    let mut viewport = viewport();
    let mut controller = DragController::default();

    // First drag: move the first unit onto the empty section.
    controller.on_drag_start(&mut tree, units[0]);
    tree.set_bounds(units[0], bb(210.0, 40.0)).unwrap();
    controller.on_drag_move(&mut tree, &mut viewport, &pointer(300.0, 210.0));
    let first = controller.on_drag_end(&mut tree, &pointer(300.0, 210.0));

    // Second drag starts before the first commit is persisted.
    controller.on_drag_start(&mut tree, units[2]);
    tree.set_bounds(units[2], bb(38.0, 40.0)).unwrap();
    controller.on_drag_move(&mut tree, &mut viewport, &pointer(300.0, -42.0));
    let second = controller.on_drag_end(&mut tree, &pointer(300.0, -42.0));

    assert_eq!(tree.node(empty).unwrap().children(), &[units[0]]);
    assert_eq!(tree.node(filled).unwrap().children(), &[units[2], units[1]]);

    let store = RecordingStore::default();
    let calls = Arc::clone(&store.calls);
    let persister = persister(store);
    let (first_plan, second_plan) = match (first, second) {
        (DragOutcome::Committed(a), DragOutcome::Committed(b)) => (a, b),
        other => panic!("expected two committed drops, got {other:?}"),
    };
    persister.commit(first_plan).await.unwrap();
    persister.commit(second_plan).await.unwrap();

    // Three updates overall: old + new for the cross-section move, then one
    // for the in-place reorder.
    assert_eq!(calls.lock().unwrap().len(), 3);
}
