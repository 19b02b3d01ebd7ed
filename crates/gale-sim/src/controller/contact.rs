use std::collections::BTreeMap;

use crate::api::types::{FixtureId, ObjectId};

/// Reference-counted set. A key stays present until it has been ended as
/// many times as it was begun, so overlapping begin/end pairs never flicker.
#[derive(Debug, Clone)]
pub struct ContactSet<K: Ord + Copy> {
    counts: BTreeMap<K, u32>,
}

impl<K: Ord + Copy> Default for ContactSet<K> {
    fn default() -> Self {
        Self {
            counts: BTreeMap::new(),
        }
    }
}

impl<K: Ord + Copy> ContactSet<K> {
    /// Returns `true` when `key` was not present before.
    pub fn begin(&mut self, key: K) -> bool {
        let count = self.counts.entry(key).or_insert(0);
        *count += 1;
        *count == 1
    }

    /// Returns `true` when the last reference to `key` went away. Ending an
    /// absent key is a no-op.
    pub fn end(&mut self, key: K) -> bool {
        match self.counts.get_mut(&key) {
            Some(count) if *count > 1 => {
                *count -= 1;
                false
            }
            Some(_) => {
                self.counts.remove(&key);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, key: &K) -> bool {
        self.counts.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Distinct keys in order.
    pub fn keys(&self) -> impl Iterator<Item = K> + '_ {
        self.counts.keys().copied()
    }

    pub fn retain(&mut self, mut keep: impl FnMut(&K) -> bool) {
        self.counts.retain(|key, _| keep(key));
    }

    pub fn clear(&mut self) {
        self.counts.clear();
    }
}

/// Everything the controller tracks about ongoing overlaps. Only the contact
/// handlers and object eviction mutate it.
#[derive(Debug, Clone, Default)]
pub struct ContactTracker {
    /// Solid fixtures under the player's feet.
    pub ground: ContactSet<FixtureId>,
    /// Wind fields touching the umbrella canopy.
    pub winds: ContactSet<ObjectId>,
    /// Hazards touching the player or umbrella.
    pub hazards: ContactSet<ObjectId>,
    /// Birds whose sight sensor currently contains the player.
    pub sight: ContactSet<ObjectId>,
}

impl ContactTracker {
    pub fn is_grounded(&self) -> bool {
        !self.ground.is_empty()
    }

    /// Drop every entry that mentions `object`. Removed bodies never report
    /// their end events.
    pub fn forget_object(&mut self, object: ObjectId) {
        self.ground.retain(|fixture| fixture.object != object);
        self.winds.retain(|id| *id != object);
        self.hazards.retain(|id| *id != object);
        self.sight.retain(|id| *id != object);
    }

    pub fn clear(&mut self) {
        self.ground.clear();
        self.winds.clear();
        self.hazards.clear();
        self.sight.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::FixtureRole;
    use proptest::prelude::*;

    fn fixture(object: u32, index: u16) -> FixtureId {
        FixtureId {
            object: ObjectId::new(object, 0),
            role: FixtureRole::Body,
            index,
        }
    }

    #[test]
    fn double_begin_needs_double_end() {
        let mut set = ContactSet::default();
        assert!(set.begin(1));
        assert!(!set.begin(1));
        assert!(!set.end(1));
        assert!(set.contains(&1));
        assert!(set.end(1));
        assert!(set.is_empty());
        assert!(!set.end(1));
    }

    #[test]
    fn standing_across_two_platforms() {
        let mut tracker = ContactTracker::default();
        tracker.ground.begin(fixture(1, 0));
        tracker.ground.begin(fixture(2, 0));
        tracker.ground.end(fixture(1, 0));
        assert!(tracker.is_grounded());
        tracker.ground.end(fixture(2, 0));
        assert!(!tracker.is_grounded());
    }

    #[test]
    fn forgetting_an_object_clears_all_sets() {
        let mut tracker = ContactTracker::default();
        let bird = ObjectId::new(4, 1);
        tracker.ground.begin(fixture(4, 0));
        tracker.hazards.begin(bird);
        tracker.sight.begin(bird);
        tracker.winds.begin(ObjectId::new(5, 0));
        tracker.forget_object(ObjectId::new(4, 0));
        tracker.forget_object(bird);
        assert!(!tracker.is_grounded());
        assert!(tracker.hazards.is_empty());
        assert!(tracker.sight.is_empty());
        assert_eq!(tracker.winds.len(), 1);
    }

    proptest! {
        /// Grounded exactly when some fixture has more begins than ends.
        #[test]
        fn grounded_matches_outstanding_contacts(
            ops in proptest::collection::vec((0u32..4, any::<bool>()), 0..64)
        ) {
            let mut tracker = ContactTracker::default();
            let mut outstanding = [0i32; 4];
            for (object, begin) in ops {
                let key = fixture(object, 0);
                if begin {
                    tracker.ground.begin(key);
                    outstanding[object as usize] += 1;
                } else {
                    tracker.ground.end(key);
                    outstanding[object as usize] = (outstanding[object as usize] - 1).max(0);
                }
                prop_assert_eq!(tracker.is_grounded(), outstanding.iter().any(|&n| n > 0));
            }
        }
    }
}
