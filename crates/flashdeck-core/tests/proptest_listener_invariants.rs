//! Property-based invariant tests for the listener registry.
//!
//! 1. After `reconcile(owner, desired)` the owner holds exactly `desired`.
//! 2. The diff applied to the previous set yields the new set.
//! 3. After `release(owner)` nothing held by that owner remains attached.

use std::collections::BTreeSet;

use flashdeck_core::listener::{ListenerKind, ListenerRegistry};
use proptest::prelude::*;

fn kind_strategy() -> impl Strategy<Value = ListenerKind> {
    prop_oneof![
        Just(ListenerKind::PointerMove),
        Just(ListenerKind::PointerUp),
        Just(ListenerKind::KeyDown),
    ]
}

proptest! {
    #[test]
    fn reconcile_holds_exactly_desired(
        rounds in prop::collection::vec(prop::collection::vec(kind_strategy(), 0..4), 1..20)
    ) {
        let mut reg = ListenerRegistry::new();
        let owner = reg.register_owner();
        let mut previous: BTreeSet<ListenerKind> = BTreeSet::new();

        for desired in rounds {
            let diff = reg.reconcile(owner, &desired);
            let expected: BTreeSet<ListenerKind> = desired.iter().copied().collect();

            let mut applied = previous.clone();
            for k in &diff.detached {
                prop_assert!(applied.remove(k), "detached {:?} was not attached", k);
            }
            for k in &diff.attached {
                prop_assert!(applied.insert(*k), "attached {:?} twice", k);
            }
            prop_assert_eq!(&applied, &expected);

            let held: BTreeSet<ListenerKind> = reg.held_by(owner).into_iter().collect();
            prop_assert_eq!(&held, &expected);
            previous = expected;
        }

        let released = reg.release(owner);
        prop_assert_eq!(released.detached.len(), previous.len());
        prop_assert_eq!(reg.total(), 0);
    }
}
