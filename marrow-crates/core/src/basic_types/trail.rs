use std::iter::Rev;
use std::ops::Deref;
use std::vec::Drain;

use crate::marrow_assert_simple;

/// A journal partitioned into worlds.
///
/// World 0 is the root; every [`Trail::push_world`] opens a new world whose entries can later be
/// drained in reverse order with [`Trail::pop_until`], or merged into the enclosing world with
/// [`Trail::merge_into_parent`].
#[derive(Clone, Debug)]
pub(crate) struct Trail<T> {
    current_world: usize,
    /// At index i is the position on the trail where world i + 1 starts.
    world_delimiter: Vec<usize>,
    trail: Vec<T>,
}

// Implemented by hand to avoid imposing Default on T.
impl<T> Default for Trail<T> {
    fn default() -> Self {
        Trail {
            current_world: Default::default(),
            world_delimiter: Default::default(),
            trail: Default::default(),
        }
    }
}

impl<T> Trail<T> {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Trail {
            current_world: 0,
            world_delimiter: Vec::new(),
            trail: Vec::with_capacity(capacity),
        }
    }

    pub(crate) fn push_world(&mut self) {
        self.current_world += 1;
        self.world_delimiter.push(self.trail.len());
    }

    pub(crate) fn world_index(&self) -> usize {
        self.current_world
    }

    pub(crate) fn values_in_world(&self, world: usize) -> &[T] {
        marrow_assert_simple!(world <= self.current_world);

        let start = if world == 0 {
            0
        } else {
            self.world_delimiter[world - 1]
        };

        let end = if world == self.current_world {
            self.trail.len()
        } else {
            self.world_delimiter[world]
        };

        &self.trail[start..end]
    }

    /// Removes every entry recorded after `new_world` was the current world, most recent first.
    pub(crate) fn pop_until(&mut self, new_world: usize) -> Rev<Drain<'_, T>> {
        marrow_assert_simple!(
            new_world < self.current_world,
            "cannot pop to world {new_world} from world {}",
            self.current_world
        );

        let new_trail_len = self.world_delimiter[new_world];

        self.current_world = new_world;
        self.world_delimiter.truncate(new_world);
        self.trail.drain(new_trail_len..).rev()
    }

    /// Closes the current world and makes its entries part of the parent world.
    ///
    /// Entries for which `keep` returns false are removed; the relative order of the others is
    /// preserved. Returns the number of removed entries.
    pub(crate) fn merge_into_parent(&mut self, mut keep: impl FnMut(&T) -> bool) -> usize {
        marrow_assert_simple!(self.current_world > 0, "cannot commit the root world");

        let start = self.world_delimiter.pop().unwrap_or(0);
        self.current_world -= 1;

        let mut write_index = start;
        for read_index in start..self.trail.len() {
            if keep(&self.trail[read_index]) {
                self.trail.swap(write_index, read_index);
                write_index += 1;
            }
        }

        let num_removed = self.trail.len() - write_index;
        self.trail.truncate(write_index);
        num_removed
    }

    pub(crate) fn push(&mut self, elem: T) {
        self.trail.push(elem)
    }
}

impl<T> Deref for Trail<T> {
    type Target = [T];

    fn deref(&self) -> &Self::Target {
        &self.trail
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pushed_values_are_observed_through_indexing() {
        let mut trail = Trail::default();

        let expected = [1, 2, 3, 4];
        for &elem in expected.iter() {
            trail.push(elem);
        }

        assert_eq!(&expected, trail.deref());
    }

    #[test]
    fn popping_removes_elements_beyond_world() {
        let mut trail = Trail::default();

        trail.push_world();
        trail.push(1);
        let _ = trail.pop_until(0);

        assert!(trail.is_empty());
        assert_eq!(0, trail.world_index());
    }

    #[test]
    fn popping_can_skip_worlds() {
        let mut trail = Trail::default();
        trail.push(1);

        trail.push_world();
        trail.push(2);
        trail.push_world();
        trail.push(3);
        trail.push_world();
        trail.push(4);

        let _ = trail.pop_until(1);

        assert_eq!(&[1, 2], trail.deref());
    }

    #[test]
    fn popped_elements_are_given_in_reverse_order() {
        let mut trail = Trail::default();
        trail.push(1);

        trail.push_world();
        trail.push(2);
        trail.push_world();
        trail.push(3);
        trail.push_world();
        trail.push(4);

        let popped = trail.pop_until(0).collect::<Vec<_>>();
        assert_eq!(vec![4, 3, 2], popped);
    }

    #[test]
    fn elements_in_world() {
        let mut trail = Trail::default();
        trail.push(1);
        trail.push(2);

        trail.push_world();
        trail.push(3);
        trail.push_world();
        trail.push(4);
        trail.push(5);

        assert_eq!(&[1, 2], trail.values_in_world(0));
        assert_eq!(&[3], trail.values_in_world(1));
        assert_eq!(&[4, 5], trail.values_in_world(2));
    }

    #[test]
    fn merging_keeps_order_and_drops_rejected_entries() {
        let mut trail = Trail::default();
        trail.push_world();
        trail.push(1);
        trail.push_world();
        trail.push(2);
        trail.push(3);
        trail.push(4);

        let removed = trail.merge_into_parent(|&entry| entry != 3);

        assert_eq!(1, removed);
        assert_eq!(1, trail.world_index());
        assert_eq!(&[1, 2, 4], trail.values_in_world(1));

        let popped = trail.pop_until(0).collect::<Vec<_>>();
        assert_eq!(vec![4, 2, 1], popped);
    }
}
