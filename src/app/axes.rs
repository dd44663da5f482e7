use rand::Rng;
use rand::seq::SliceRandom;

use crate::dataset::{MetricKey, MetricStore};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) enum Axis {
    X,
    Y,
}

impl Axis {
    pub(crate) fn label(self) -> &'static str {
        match self {
            Self::X => "X",
            Self::Y => "Y",
        }
    }
}

/// Pair of metric keys mapped to screen X and Y. The two keys always differ.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct AxisSelection {
    x: MetricKey,
    y: MetricKey,
}

impl AxisSelection {
    pub(crate) fn new(x: MetricKey, y: MetricKey) -> Option<Self> {
        (x != y).then_some(Self { x, y })
    }

    /// (density, skeleton_length) when the dataset has both, otherwise the
    /// first two keys in display order.
    pub(crate) fn initial(store: &MetricStore) -> Self {
        if let (Some(x), Some(y)) = (store.find_key("density"), store.find_key("skeleton_length")) {
            return Self { x, y };
        }
        Self {
            x: store.key_at(0),
            y: store.key_at(1),
        }
    }

    pub(crate) fn x(self) -> MetricKey {
        self.x
    }

    pub(crate) fn y(self) -> MetricKey {
        self.y
    }

    pub(crate) fn get(self, axis: Axis) -> MetricKey {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
        }
    }

    fn other(self, axis: Axis) -> MetricKey {
        match axis {
            Axis::X => self.y,
            Axis::Y => self.x,
        }
    }

    fn with(self, axis: Axis, key: MetricKey) -> Option<Self> {
        match axis {
            Axis::X => Self::new(key, self.y),
            Axis::Y => Self::new(self.x, key),
        }
    }
}

/// Owns the active [`AxisSelection`]. Callers must retarget every symbol
/// after any method here reports a change.
#[derive(Clone, Debug)]
pub(crate) struct AxisController {
    selection: AxisSelection,
}

impl AxisController {
    pub(crate) fn new(selection: AxisSelection) -> Self {
        Self { selection }
    }

    pub(crate) fn selection(&self) -> AxisSelection {
        self.selection
    }

    /// Moves `axis` to the next key in display order, skipping the key held
    /// by the other axis. Returns whether the selection changed.
    pub(crate) fn cycle_axis(&mut self, axis: Axis, store: &MetricStore) -> bool {
        let current = self.selection.get(axis);
        let other = self.selection.other(axis);

        let mut candidate = current;
        for _ in 0..store.key_count() {
            candidate = store.key_at(candidate.index() + 1);
            if candidate != other {
                break;
            }
        }

        match self.selection.with(axis, candidate) {
            Some(next) if next != self.selection => {
                self.selection = next;
                true
            }
            _ => false,
        }
    }

    /// Picks an axis at random and moves it to a uniformly random key held
    /// by neither axis. Needs at least three keys; with two there is nothing
    /// to switch to and `None` is returned.
    pub(crate) fn random_switch<R: Rng>(
        &mut self,
        store: &MetricStore,
        rng: &mut R,
    ) -> Option<Axis> {
        let axis = if rng.gen_bool(0.5) { Axis::X } else { Axis::Y };
        let candidates = store
            .keys()
            .filter(|key| *key != self.selection.x && *key != self.selection.y)
            .collect::<Vec<_>>();
        let key = *candidates.choose(rng)?;

        self.selection = self.selection.with(axis, key)?;
        Some(axis)
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::dataset::sample_store;

    #[test]
    fn initial_prefers_density_and_skeleton_length() {
        let store = sample_store();
        let selection = AxisSelection::initial(&store);
        assert_eq!(store.key_name(selection.x()), "density");
        assert_eq!(store.key_name(selection.y()), "skeleton_length");
    }

    #[test]
    fn equal_keys_are_rejected() {
        let store = sample_store();
        let key = store.key_at(0);
        assert!(AxisSelection::new(key, key).is_none());
    }

    #[test]
    fn cycle_skips_the_other_axis() {
        // Key order: density, skeleton_length, holes.
        let store = sample_store();
        let mut controller = AxisController::new(AxisSelection::initial(&store));

        assert!(controller.cycle_axis(Axis::X, &store));
        assert_eq!(store.key_name(controller.selection().x()), "holes");

        assert!(controller.cycle_axis(Axis::X, &store));
        assert_eq!(store.key_name(controller.selection().x()), "density");
    }

    #[test]
    fn cycle_wraps_past_the_last_key() {
        let store = sample_store();
        let mut controller = AxisController::new(AxisSelection::initial(&store));

        assert!(controller.cycle_axis(Axis::Y, &store));
        assert_eq!(store.key_name(controller.selection().y()), "holes");
        assert!(controller.cycle_axis(Axis::Y, &store));
        assert_eq!(store.key_name(controller.selection().y()), "skeleton_length");
    }

    #[test]
    fn random_switch_picks_a_fresh_key() {
        let store = sample_store();
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..50 {
            let mut controller = AxisController::new(AxisSelection::initial(&store));
            let axis = controller.random_switch(&store, &mut rng).unwrap();
            let selection = controller.selection();
            assert_eq!(store.key_name(selection.get(axis)), "holes");
            assert_ne!(selection.x(), selection.y());
        }
    }

    proptest! {
        #[test]
        fn cycling_never_collides(
            start_x in 0usize..3,
            start_offset in 1usize..3,
            moves in proptest::collection::vec(any::<bool>(), 0..40),
        ) {
            let store = sample_store();
            let selection = AxisSelection::new(
                store.key_at(start_x),
                store.key_at(start_x + start_offset),
            ).unwrap();
            let mut controller = AxisController::new(selection);

            for move_x in moves {
                let axis = if move_x { Axis::X } else { Axis::Y };
                controller.cycle_axis(axis, &store);
                let selection = controller.selection();
                prop_assert_ne!(selection.x(), selection.y());
            }
        }

        #[test]
        fn random_switching_never_collides(seed in any::<u64>(), switches in 1usize..30) {
            let store = sample_store();
            let mut rng = StdRng::seed_from_u64(seed);
            let mut controller = AxisController::new(AxisSelection::initial(&store));

            for _ in 0..switches {
                prop_assert!(controller.random_switch(&store, &mut rng).is_some());
                let selection = controller.selection();
                prop_assert_ne!(selection.x(), selection.y());
            }
        }
    }
}
