use log::debug;
use log::trace;

use super::StoredBool;
use super::StoredInt;
use super::StoredLong;
use super::TrailedChange;
use super::TrailedInteger;
use crate::basic_types::Trail;
use crate::containers::KeyedVec;
use crate::containers::StorageKey;
use crate::create_statistics_struct;
use crate::marrow_assert_moderate;
use crate::marrow_assert_simple;
use crate::statistics::Statistic;
use crate::statistics::StatisticLogger;

create_statistics_struct!(
    /// Statistics about the backtrackable store.
    TrailStatistics {
        /// The number of entries pushed onto the trail.
        num_trail_entries: u64,
        /// The number of worlds which were pushed.
        num_worlds_pushed: u64,
        /// The number of worlds which were committed into their parent.
        num_commits: u64,
        /// The number of trail entries which became redundant during a commit.
        num_entries_merged_away: u64,
});

/// The backtrackable store: integer cells whose values are restored when a world is popped.
///
/// Every cell carries the stamp of the world in which it was last saved. Stamps are unique per
/// pushed world (rather than equal to the depth) so that a world which is popped and pushed again
/// never mistakes a stale stamp for its own. The first write to a cell in a world records the
/// previous value and stamp on the trail; later writes in the same world overwrite in place.
#[derive(Debug, Clone)]
pub struct TrailedValues {
    trail: Trail<TrailedChange>,
    values: KeyedVec<TrailedInteger, i64>,
    stamps: KeyedVec<TrailedInteger, u64>,
    /// The stamp of each world on the stack; index 0 is the root.
    world_stamps: Vec<u64>,
    next_stamp: u64,
    statistics: TrailStatistics,
}

impl Default for TrailedValues {
    fn default() -> Self {
        TrailedValues::with_capacity(0)
    }
}

impl TrailedValues {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        TrailedValues {
            trail: Trail::with_capacity(capacity),
            values: KeyedVec::with_capacity(capacity),
            stamps: KeyedVec::with_capacity(capacity),
            world_stamps: vec![0],
            next_stamp: 1,
            statistics: TrailStatistics::default(),
        }
    }

    pub(crate) fn grow(&mut self, initial_value: i64) -> TrailedInteger {
        let _ = self.stamps.push(self.current_stamp());
        self.values.push(initial_value)
    }

    pub(crate) fn new_stored_int(&mut self, initial_value: i32) -> StoredInt {
        StoredInt(self.grow(initial_value as i64))
    }

    pub(crate) fn new_stored_long(&mut self, initial_value: i64) -> StoredLong {
        StoredLong(self.grow(initial_value))
    }

    pub(crate) fn new_stored_bool(&mut self, initial_value: bool) -> StoredBool {
        StoredBool(self.grow(initial_value as i64))
    }

    pub fn read(&self, trailed_integer: TrailedInteger) -> i64 {
        self.values[trailed_integer]
    }

    pub(crate) fn assign(&mut self, trailed_integer: TrailedInteger, value: i64) {
        let old_value = self.values[trailed_integer];
        if old_value == value {
            return;
        }

        let current_stamp = self.current_stamp();
        let old_stamp = self.stamps[trailed_integer];
        if old_stamp != current_stamp {
            self.trail.push(TrailedChange {
                reference: trailed_integer,
                old_value,
                old_stamp,
            });
            self.stamps[trailed_integer] = current_stamp;
            self.statistics.num_trail_entries += 1;
        }

        self.values[trailed_integer] = value;
    }

    pub(crate) fn add_assign(&mut self, trailed_integer: TrailedInteger, addition: i64) {
        self.assign(trailed_integer, self.values[trailed_integer] + addition);
    }

    pub(crate) fn num_cells(&self) -> usize {
        self.values.len()
    }

    /// The depth of the current world; the root world has index 0.
    pub fn world_index(&self) -> usize {
        self.trail.world_index()
    }

    /// Opens a new world and returns its index.
    pub(crate) fn world_push(&mut self) -> usize {
        self.world_stamps.push(self.next_stamp);
        self.next_stamp += 1;
        self.trail.push_world();
        self.statistics.num_worlds_pushed += 1;

        trace!("pushed world {}", self.world_index());
        self.world_index()
    }

    /// Restores every cell to its value at the time the current world was pushed.
    pub(crate) fn world_pop(&mut self) {
        marrow_assert_simple!(self.world_index() > 0, "cannot pop the root world");
        self.world_pop_until(self.world_index() - 1)
    }

    /// Pops worlds until `world` is the current world.
    pub(crate) fn world_pop_until(&mut self, world: usize) {
        if world == self.world_index() {
            return;
        }

        trace!("popping from world {} to world {world}", self.world_index());
        for change in self.trail.pop_until(world) {
            self.values[change.reference] = change.old_value;
            self.stamps[change.reference] = change.old_stamp;
        }
        self.world_stamps.truncate(world + 1);
    }

    /// Merges the current world into its parent without changing any value.
    ///
    /// Afterwards, popping the parent restores the state from before the parent was pushed, as if
    /// the modifications of both worlds had been made in the parent.
    pub(crate) fn world_commit(&mut self) {
        marrow_assert_simple!(self.world_index() > 0, "cannot commit the root world");

        let parent_stamp = self.world_stamps[self.world_index() - 1];
        self.world_stamps.truncate(self.world_index());
        let stamps = &mut self.stamps;

        // Cells already saved in the parent keep the parent's entry.
        let num_removed = self.trail.merge_into_parent(|change| {
            stamps[change.reference] = parent_stamp;
            change.old_stamp != parent_stamp
        });

        self.statistics.num_commits += 1;
        self.statistics.num_entries_merged_away += num_removed as u64;
        debug!(
            "committed into world {} ({num_removed} redundant entries dropped)",
            self.world_index()
        );

        marrow_assert_moderate!(self.is_consistent_with_current_world());
    }

    fn current_stamp(&self) -> u64 {
        self.world_stamps[self.world_index()]
    }

    /// The number of trail entries recorded in the given world.
    pub(crate) fn num_entries_in_world(&self, world: usize) -> usize {
        self.trail.values_in_world(world).len()
    }

    fn is_consistent_with_current_world(&self) -> bool {
        let current = self.world_index();
        if current == 0 {
            return true;
        }
        let mut seen = vec![false; self.values.len()];
        self.trail
            .values_in_world(current)
            .iter()
            .all(|change| !std::mem::replace(&mut seen[change.reference.index()], true))
    }

    pub(crate) fn log_statistics(&self, statistic_logger: StatisticLogger) {
        self.statistics.log(statistic_logger)
    }

    pub(crate) fn statistics(&self) -> &TrailStatistics {
        &self.statistics
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_are_undone_by_popping() {
        let mut values = TrailedValues::default();
        let cell = values.grow(0);

        assert_eq!(values.read(cell), 0);

        let _ = values.world_push();
        values.add_assign(cell, 5);
        assert_eq!(values.read(cell), 5);

        values.add_assign(cell, 5);
        assert_eq!(values.read(cell), 10);

        let _ = values.world_push();
        values.add_assign(cell, 1);
        assert_eq!(values.read(cell), 11);

        values.world_pop_until(1);
        assert_eq!(values.read(cell), 10);

        values.world_pop_until(0);
        assert_eq!(values.read(cell), 0);
    }

    #[test]
    fn only_the_first_write_in_a_world_is_trailed() {
        let mut values = TrailedValues::default();
        let cell = values.grow(0);

        let world = values.world_push();
        values.assign(cell, 1);
        values.assign(cell, 2);
        values.assign(cell, 3);

        assert_eq!(1, values.num_entries_in_world(world));
    }

    #[test]
    fn writing_the_current_value_is_not_trailed() {
        let mut values = TrailedValues::default();
        let cell = values.grow(4);

        let world = values.world_push();
        values.assign(cell, 4);

        assert_eq!(0, values.num_entries_in_world(world));
    }

    #[test]
    fn cell_declared_in_a_world_is_trailed_after_that_world_is_reopened() {
        let mut values = TrailedValues::default();
        let _ = values.world_push();
        let cell = values.grow(1);
        values.world_pop();

        let _ = values.world_push();
        values.assign(cell, 7);
        values.world_pop();

        assert_eq!(1, values.read(cell));
    }

    #[test]
    fn commit_then_pop_equals_popping_both_worlds() {
        let mut values = TrailedValues::default();
        let a = values.grow(0);
        let b = values.grow(0);

        let _ = values.world_push();
        values.assign(a, 1);
        let _ = values.world_push();
        values.assign(a, 2);
        values.assign(b, 3);

        values.world_commit();
        assert_eq!(1, values.world_index());
        assert_eq!(2, values.read(a));
        assert_eq!(3, values.read(b));
        assert_eq!(2, values.num_entries_in_world(1));

        // The merged world behaves like a single world.
        values.assign(b, 4);
        assert_eq!(2, values.num_entries_in_world(1));

        values.world_pop();
        assert_eq!(0, values.read(a));
        assert_eq!(0, values.read(b));
    }
}
