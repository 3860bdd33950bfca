use super::TrailedInteger;
use super::TrailedValues;
use crate::containers::StorageKey;
use crate::marrow_assert_moderate;

const WORD_SIZE: usize = 64;

/// A backtrackable set of indices in `0..capacity`, stored as 64-bit words in the
/// [`TrailedValues`].
///
/// Only words which actually change are written, so clearing a range costs at most one trail
/// entry per touched word per world.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StoredBitSet {
    first_word: TrailedInteger,
    num_words: usize,
    capacity: usize,
}

impl StoredBitSet {
    /// Creates a set over `0..capacity`, either full or empty.
    pub(crate) fn new(store: &mut TrailedValues, capacity: usize, full: bool) -> StoredBitSet {
        let num_words = capacity.div_ceil(WORD_SIZE);
        let first_word = TrailedInteger::create_from_index(store.num_cells());

        for word_index in 0..num_words {
            let word = if !full {
                0
            } else if word_index + 1 < num_words || capacity % WORD_SIZE == 0 {
                u64::MAX
            } else {
                u64::MAX >> (WORD_SIZE - capacity % WORD_SIZE)
            };
            let _ = store.grow(word as i64);
        }

        StoredBitSet {
            first_word,
            num_words,
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn word(&self, store: &TrailedValues, word_index: usize) -> u64 {
        store.read(self.first_word.offset(word_index)) as u64
    }

    fn set_word(&self, store: &mut TrailedValues, word_index: usize, word: u64) {
        store.assign(self.first_word.offset(word_index), word as i64)
    }

    pub fn contains(&self, store: &TrailedValues, index: usize) -> bool {
        index < self.capacity
            && self.word(store, index / WORD_SIZE) & (1 << (index % WORD_SIZE)) != 0
    }

    pub(crate) fn insert(&self, store: &mut TrailedValues, index: usize) {
        marrow_assert_moderate!(index < self.capacity);
        let word = self.word(store, index / WORD_SIZE);
        self.set_word(store, index / WORD_SIZE, word | (1 << (index % WORD_SIZE)));
    }

    /// Removes `index`; returns whether it was present.
    pub(crate) fn remove(&self, store: &mut TrailedValues, index: usize) -> bool {
        if !self.contains(store, index) {
            return false;
        }
        let word = self.word(store, index / WORD_SIZE);
        self.set_word(store, index / WORD_SIZE, word & !(1 << (index % WORD_SIZE)));
        true
    }

    /// Removes every index in `from..=to`; returns how many were present.
    pub(crate) fn remove_range(&self, store: &mut TrailedValues, from: usize, to: usize) -> usize {
        if from > to || from >= self.capacity {
            return 0;
        }
        let to = to.min(self.capacity - 1);

        let first_word = from / WORD_SIZE;
        let last_word = to / WORD_SIZE;
        let mut num_removed = 0;

        for word_index in first_word..=last_word {
            let low = if word_index == first_word {
                from % WORD_SIZE
            } else {
                0
            };
            let high = if word_index == last_word {
                to % WORD_SIZE
            } else {
                WORD_SIZE - 1
            };
            let mask = (u64::MAX << low) & (u64::MAX >> (WORD_SIZE - 1 - high));

            let word = self.word(store, word_index);
            if word & mask != 0 {
                num_removed += (word & mask).count_ones() as usize;
                self.set_word(store, word_index, word & !mask);
            }
        }

        num_removed
    }

    /// The smallest present index which is at least `from`.
    pub fn next_set_bit(&self, store: &TrailedValues, from: usize) -> Option<usize> {
        if from >= self.capacity {
            return None;
        }

        let mut word_index = from / WORD_SIZE;
        let mut word = self.word(store, word_index) & (u64::MAX << (from % WORD_SIZE));
        loop {
            if word != 0 {
                return Some(word_index * WORD_SIZE + word.trailing_zeros() as usize);
            }
            word_index += 1;
            if word_index >= self.num_words {
                return None;
            }
            word = self.word(store, word_index);
        }
    }

    /// The largest present index which is at most `from`.
    pub fn previous_set_bit(&self, store: &TrailedValues, from: usize) -> Option<usize> {
        if self.capacity == 0 {
            return None;
        }
        let from = from.min(self.capacity - 1);

        let mut word_index = from / WORD_SIZE;
        let mut word =
            self.word(store, word_index) & (u64::MAX >> (WORD_SIZE - 1 - from % WORD_SIZE));
        loop {
            if word != 0 {
                return Some(
                    word_index * WORD_SIZE + (WORD_SIZE - 1 - word.leading_zeros() as usize),
                );
            }
            if word_index == 0 {
                return None;
            }
            word_index -= 1;
            word = self.word(store, word_index);
        }
    }

    pub fn cardinality(&self, store: &TrailedValues) -> usize {
        (0..self.num_words)
            .map(|word_index| self.word(store, word_index).count_ones() as usize)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_set_contains_exactly_its_capacity() {
        let mut store = TrailedValues::default();
        let set = StoredBitSet::new(&mut store, 70, true);

        assert_eq!(70, set.cardinality(&store));
        assert!(set.contains(&store, 69));
        assert!(!set.contains(&store, 70));
        assert_eq!(Some(69), set.previous_set_bit(&store, 1000));
    }

    #[test]
    fn range_removal_crosses_words() {
        let mut store = TrailedValues::default();
        let set = StoredBitSet::new(&mut store, 200, true);

        let removed = set.remove_range(&mut store, 10, 140);

        assert_eq!(131, removed);
        assert_eq!(Some(141), set.next_set_bit(&store, 10));
        assert_eq!(Some(9), set.previous_set_bit(&store, 140));
        assert_eq!(0, set.remove_range(&mut store, 10, 140));
    }

    #[test]
    fn removals_are_undone_by_popping() {
        let mut store = TrailedValues::default();
        let set = StoredBitSet::new(&mut store, 10, false);
        set.insert(&mut store, 3);
        set.insert(&mut store, 7);

        let _ = store.world_push();
        assert!(set.remove(&mut store, 3));
        assert!(!set.remove(&mut store, 3));
        assert_eq!(Some(7), set.next_set_bit(&store, 0));

        store.world_pop();
        assert_eq!(Some(3), set.next_set_bit(&store, 0));
        assert_eq!(None, set.next_set_bit(&store, 8));
    }
}
