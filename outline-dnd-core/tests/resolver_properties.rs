//! Property-based tests for drop-target resolution
//!
//! These tests verify that the resolver behaves like a pure function and
//! that its tolerance zones land on the documented attach modes across the
//! whole input space, not just at hand-picked coordinates.

use proptest::prelude::*;

use outline_dnd_core::{
    find_destination, AttachMode, BoundingBox, CandidateContainer, DragConfig, DragDirection,
    Locator,
};

fn boxed(top: f64, height: f64) -> BoundingBox {
    BoundingBox::new(top, 0.0, 100.0, height)
}

/// Strategy for generating drag directions, including "not yet known".
fn direction_strategy() -> impl Strategy<Value = Option<DragDirection>> {
    prop_oneof![
        Just(None),
        Just(Some(DragDirection::Up)),
        Just(Some(DragDirection::Down)),
    ]
}

/// Strategy for a stack of equal-height siblings starting at `first_top`.
fn sibling_stack(
    first_top: f64,
    height: f64,
    count: usize,
) -> (CandidateContainer, Vec<Locator>) {
    let container = Locator::new();
    let mut candidate = CandidateContainer::new(
        container,
        boxed(first_top, height * count as f64),
    );
    let mut siblings = Vec::with_capacity(count);
    for slot in 0..count {
        let locator = Locator::new();
        candidate = candidate.sibling(locator, boxed(first_top + height * slot as f64, height));
        siblings.push(locator);
    }
    (candidate, siblings)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Identical geometry and direction always resolve to the identical
    /// destination: resolution reads nothing but its arguments.
    #[test]
    fn prop_resolution_is_pure(
        dragged_top in -50.0..250.0f64,
        dragged_height in 20.0..80.0f64,
        direction in direction_strategy(),
        sibling_count in 0usize..4,
    ) {
        let (candidate, _) = sibling_stack(0.0, 40.0, sibling_count);
        let dragged = boxed(dragged_top, dragged_height);
        let config = DragConfig::default();

        let first = find_destination(&dragged, direction, std::slice::from_ref(&candidate), &config);
        let second = find_destination(&dragged, direction, &[candidate], &config);

        prop_assert_eq!(first, second);
    }

    /// A childless container whose top is strictly within the empty
    /// tolerance of the dragged top (but not exactly equal) resolves to a
    /// prepend into that container, whatever the drag direction.
    #[test]
    fn prop_empty_container_within_tolerance_prepends(
        container_top in 0.0..500.0f64,
        offset in 0.5..49.5f64,
        above in proptest::bool::ANY,
        direction in direction_strategy(),
    ) {
        let container = Locator::new();
        let candidate = CandidateContainer::new(container, boxed(container_top, 30.0));
        let dragged_top = if above { container_top - offset } else { container_top + offset };

        let found = find_destination(
            &boxed(dragged_top, 40.0),
            direction,
            &[candidate],
            &DragConfig::default(),
        );

        let found = found.expect("within tolerance must resolve");
        prop_assert_eq!(found.target, container);
        prop_assert_eq!(found.attach, AttachMode::Prepend);
        prop_assert_eq!(found.expand_ancestor, None);
    }

    /// Beyond the empty-container tolerance nothing resolves.
    #[test]
    fn prop_empty_container_beyond_tolerance_is_ignored(
        container_top in 0.0..500.0f64,
        offset in 50.0..400.0f64,
        direction in direction_strategy(),
    ) {
        let candidate = CandidateContainer::new(Locator::new(), boxed(container_top, 30.0));

        let found = find_destination(
            &boxed(container_top + offset, 40.0),
            direction,
            &[candidate],
            &DragConfig::default(),
        );

        prop_assert!(found.is_none());
    }

    /// A collapsed container matched near its top edge always yields a
    /// prepend and names itself for expansion.
    #[test]
    fn prop_collapsed_container_near_top_prepends_and_expands(
        container_top in 0.0..500.0f64,
        offset in -9.5..9.5f64,
        direction in direction_strategy(),
    ) {
        let container = Locator::new();
        let candidate = CandidateContainer::new(container, boxed(container_top, 60.0)).collapsed();

        let found = find_destination(
            &boxed(container_top + offset, 40.0),
            direction,
            &[candidate],
            &DragConfig::default(),
        );

        let found = found.expect("within collapse tolerance must resolve");
        prop_assert_eq!(found.target, container);
        prop_assert_eq!(found.attach, AttachMode::Prepend);
        prop_assert_eq!(found.expand_ancestor, Some(container));
    }

    /// In a multi-sibling list, landing within the fudge of the first
    /// sibling's top resolves to before it regardless of drag direction.
    #[test]
    fn prop_first_sibling_near_top_is_before_for_any_direction(
        first_top in 0.0..300.0f64,
        offset in -19.0..19.0f64,
        direction in direction_strategy(),
    ) {
        // 40-unit siblings give the capped 20-unit fudge.
        let (candidate, siblings) = sibling_stack(first_top, 40.0, 3);

        let found = find_destination(
            &boxed(first_top + offset, 40.0),
            direction,
            &[candidate],
            &DragConfig::default(),
        );

        let found = found.expect("within the first-sibling fudge must resolve");
        prop_assert_eq!(found.target, siblings[0]);
        prop_assert_eq!(found.attach, AttachMode::Before);
    }

    /// With a single sibling, crossing its bottom edge downward (dragged
    /// top within the fudge of that edge) attaches after it, and crossing
    /// its top edge upward (dragged bottom within the fudge) attaches
    /// before it.
    #[test]
    fn prop_single_sibling_edge_crossings(
        sib_top in 0.0..300.0f64,
        sib_height in 30.0..60.0f64,
        offset in 0.0..15.0f64,
    ) {
        let container = Locator::new();
        let sibling = Locator::new();
        let candidate = CandidateContainer::new(container, boxed(sib_top, sib_height))
            .sibling(sibling, boxed(sib_top, sib_height));
        let config = DragConfig::default();

        // Downward past the bottom edge. The dragged box is tall enough
        // that the containment branch cannot swallow the case.
        let below = boxed(sib_top + sib_height + offset, 40.0);
        let after = find_destination(&below, Some(DragDirection::Down), &[candidate.clone()], &config);
        let after = after.expect("edge crossing must resolve");
        prop_assert_eq!(after.target, sibling);
        prop_assert_eq!(after.attach, AttachMode::After);

        // Upward past the top edge.
        let above = boxed(sib_top - offset - 40.0, 40.0);
        let before = find_destination(&above, Some(DragDirection::Up), &[candidate], &config);
        let before = before.expect("edge crossing must resolve");
        prop_assert_eq!(before.target, sibling);
        prop_assert_eq!(before.attach, AttachMode::Before);
    }

    /// In a multi-sibling list the last sibling catches an upward drag near
    /// its bottom edge as an after-attachment, keeping drops at the end of
    /// a list reliable.
    #[test]
    fn prop_last_sibling_catches_upward_drags(
        first_top in 0.0..300.0f64,
        offset in 0.0..19.0f64,
    ) {
        let (candidate, siblings) = sibling_stack(first_top, 40.0, 3);
        let list_bottom = first_top + 120.0;

        let found = find_destination(
            &boxed(list_bottom + offset, 40.0),
            Some(DragDirection::Up),
            &[candidate],
            &DragConfig::default(),
        );

        let found = found.expect("within the last-sibling fudge must resolve");
        prop_assert_eq!(found.target, siblings[2]);
        prop_assert_eq!(found.attach, AttachMode::After);
    }
}
