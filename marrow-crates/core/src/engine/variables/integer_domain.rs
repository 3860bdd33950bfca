use crate::basic_types::messages;
use crate::engine::IntEventKind;
use crate::marrow_assert_extreme;
use crate::marrow_assert_simple;
use crate::trailing::StoredBitSet;
use crate::trailing::StoredInt;
use crate::trailing::StoredPrimitive;
use crate::trailing::TrailedValues;

/// A modification which would have emptied the domain.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct EmptyDomain(pub(crate) &'static str);

/// The result of a domain modification: the kind of event it caused, or `None` when nothing
/// changed.
pub(crate) type DomainUpdate = Result<Option<IntEventKind>, EmptyDomain>;

/// Value sets which are at most this many times wider than their number of values use a bitset.
const MAX_BITSET_SPREAD: i64 = 32;

/// The widest range an enumerated domain may span; its size has to fit in a [`StoredInt`].
pub const MAX_ENUMERATED_RANGE: i64 = 1 << 24;

/// The representation of a domain, fixed when the variable is created.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DomainKind {
    /// Only the bounds are stored; interior removals are ignored.
    Interval,
    /// A bitset over the initial range.
    Bitset,
    /// A bitset over a sorted array of the initial values.
    Array,
    /// The domain `{0, 1}`.
    Boolean,
}

/// The backtrackable value set of one variable.
///
/// Every field lives in the [`TrailedValues`], so popping a world restores the domain. The
/// mutators check for emptiness before anything is written, and report the strongest event kind
/// the modification caused.
#[derive(Clone, Debug)]
pub(crate) enum IntegerDomain {
    Interval {
        lower_bound: StoredInt,
        upper_bound: StoredInt,
    },
    Bitset {
        offset: i32,
        values: StoredBitSet,
        lower_bound: StoredInt,
        upper_bound: StoredInt,
        size: StoredInt,
    },
    Array {
        /// Sorted and without duplicates.
        values: Box<[i32]>,
        present: StoredBitSet,
        lower_bound_index: StoredInt,
        upper_bound_index: StoredInt,
        size: StoredInt,
    },
    Boolean {
        /// Bit 0 is set when 0 is in the domain, bit 1 when 1 is.
        state: StoredInt,
    },
}

impl IntegerDomain {
    pub(crate) fn interval(store: &mut TrailedValues, lower_bound: i32, upper_bound: i32) -> Self {
        IntegerDomain::Interval {
            lower_bound: store.new_stored_int(lower_bound),
            upper_bound: store.new_stored_int(upper_bound),
        }
    }

    pub(crate) fn bitset(store: &mut TrailedValues, lower_bound: i32, upper_bound: i32) -> Self {
        let range = upper_bound as i64 - lower_bound as i64 + 1;
        marrow_assert_simple!(
            range <= MAX_ENUMERATED_RANGE,
            "an enumerated domain spans at most {MAX_ENUMERATED_RANGE} values, \
             use an interval variable for [{lower_bound}, {upper_bound}]"
        );
        let capacity = range as usize;
        IntegerDomain::Bitset {
            offset: lower_bound,
            values: StoredBitSet::new(store, capacity, true),
            lower_bound: store.new_stored_int(lower_bound),
            upper_bound: store.new_stored_int(upper_bound),
            size: store.new_stored_int(capacity as i32),
        }
    }

    /// A domain holding exactly `values`, which must be sorted and free of duplicates.
    pub(crate) fn from_sorted_values(store: &mut TrailedValues, values: &[i32]) -> Self {
        marrow_assert_simple!(!values.is_empty());
        marrow_assert_simple!(values.windows(2).all(|pair| pair[0] < pair[1]));

        let lower_bound = values[0];
        let upper_bound = values[values.len() - 1];
        let spread = upper_bound as i64 - lower_bound as i64 + 1;

        if spread <= MAX_ENUMERATED_RANGE && spread <= MAX_BITSET_SPREAD * values.len() as i64 {
            let domain_values = StoredBitSet::new(store, spread as usize, false);
            for &value in values {
                domain_values.insert(store, (value as i64 - lower_bound as i64) as usize);
            }
            IntegerDomain::Bitset {
                offset: lower_bound,
                values: domain_values,
                lower_bound: store.new_stored_int(lower_bound),
                upper_bound: store.new_stored_int(upper_bound),
                size: store.new_stored_int(values.len() as i32),
            }
        } else {
            IntegerDomain::Array {
                values: values.into(),
                present: StoredBitSet::new(store, values.len(), true),
                lower_bound_index: store.new_stored_int(0),
                upper_bound_index: store.new_stored_int(values.len() as i32 - 1),
                size: store.new_stored_int(values.len() as i32),
            }
        }
    }

    pub(crate) fn boolean(store: &mut TrailedValues) -> Self {
        IntegerDomain::Boolean {
            state: store.new_stored_int(0b11),
        }
    }

    pub(crate) fn kind(&self) -> DomainKind {
        match self {
            IntegerDomain::Interval { .. } => DomainKind::Interval,
            IntegerDomain::Bitset { .. } => DomainKind::Bitset,
            IntegerDomain::Array { .. } => DomainKind::Array,
            IntegerDomain::Boolean { .. } => DomainKind::Boolean,
        }
    }

    pub(crate) fn lower_bound(&self, store: &TrailedValues) -> i32 {
        match self {
            IntegerDomain::Interval { lower_bound, .. }
            | IntegerDomain::Bitset { lower_bound, .. } => lower_bound.read(store),
            IntegerDomain::Array {
                values,
                lower_bound_index,
                ..
            } => values[lower_bound_index.read(store) as usize],
            IntegerDomain::Boolean { state } => {
                if state.read(store) & 0b01 != 0 {
                    0
                } else {
                    1
                }
            }
        }
    }

    pub(crate) fn upper_bound(&self, store: &TrailedValues) -> i32 {
        match self {
            IntegerDomain::Interval { upper_bound, .. }
            | IntegerDomain::Bitset { upper_bound, .. } => upper_bound.read(store),
            IntegerDomain::Array {
                values,
                upper_bound_index,
                ..
            } => values[upper_bound_index.read(store) as usize],
            IntegerDomain::Boolean { state } => {
                if state.read(store) & 0b10 != 0 {
                    1
                } else {
                    0
                }
            }
        }
    }

    pub(crate) fn size(&self, store: &TrailedValues) -> usize {
        match self {
            IntegerDomain::Interval {
                lower_bound,
                upper_bound,
            } => (upper_bound.read(store) as i64 - lower_bound.read(store) as i64 + 1) as usize,
            IntegerDomain::Bitset { size, .. } | IntegerDomain::Array { size, .. } => {
                size.read(store) as usize
            }
            IntegerDomain::Boolean { state } => state.read(store).count_ones() as usize,
        }
    }

    pub(crate) fn contains(&self, store: &TrailedValues, value: i32) -> bool {
        if value < self.lower_bound(store) || value > self.upper_bound(store) {
            return false;
        }
        match self {
            IntegerDomain::Interval { .. } | IntegerDomain::Boolean { .. } => true,
            IntegerDomain::Bitset {
                offset, values, ..
            } => values.contains(store, Self::bit_index(*offset, value)),
            IntegerDomain::Array {
                values, present, ..
            } => values
                .binary_search(&value)
                .is_ok_and(|index| present.contains(store, index)),
        }
    }

    /// The smallest value in the domain which is strictly greater than `value`.
    pub(crate) fn next_value(&self, store: &TrailedValues, value: i32) -> Option<i32> {
        let upper_bound = self.upper_bound(store);
        if value >= upper_bound {
            return None;
        }
        let lower_bound = self.lower_bound(store);
        if value < lower_bound {
            return Some(lower_bound);
        }
        match self {
            IntegerDomain::Interval { .. } | IntegerDomain::Boolean { .. } => Some(value + 1),
            IntegerDomain::Bitset {
                offset, values, ..
            } => values
                .next_set_bit(store, Self::bit_index(*offset, value) + 1)
                .map(|index| Self::value_at(*offset, index)),
            IntegerDomain::Array {
                values, present, ..
            } => {
                let start = values.partition_point(|&candidate| candidate <= value);
                present
                    .next_set_bit(store, start)
                    .map(|index| values[index])
            }
        }
    }

    /// The largest value in the domain which is strictly smaller than `value`.
    pub(crate) fn previous_value(&self, store: &TrailedValues, value: i32) -> Option<i32> {
        let lower_bound = self.lower_bound(store);
        if value <= lower_bound {
            return None;
        }
        let upper_bound = self.upper_bound(store);
        if value > upper_bound {
            return Some(upper_bound);
        }
        match self {
            IntegerDomain::Interval { .. } | IntegerDomain::Boolean { .. } => Some(value - 1),
            IntegerDomain::Bitset {
                offset, values, ..
            } => values
                .previous_set_bit(store, Self::bit_index(*offset, value) - 1)
                .map(|index| Self::value_at(*offset, index)),
            IntegerDomain::Array {
                values, present, ..
            } => {
                let end = values.partition_point(|&candidate| candidate < value);
                present
                    .previous_set_bit(store, end - 1)
                    .map(|index| values[index])
            }
        }
    }

    pub(crate) fn iter<'a>(&'a self, store: &'a TrailedValues) -> impl Iterator<Item = i32> + 'a {
        std::iter::successors(Some(self.lower_bound(store)), move |&value| {
            self.next_value(store, value)
        })
    }

    pub(crate) fn update_lower_bound(&self, store: &mut TrailedValues, value: i32) -> DomainUpdate {
        let old_lower_bound = self.lower_bound(store);
        let upper_bound = self.upper_bound(store);
        if value <= old_lower_bound {
            return Ok(None);
        }
        if value > upper_bound {
            return Err(EmptyDomain(messages::EMPTY_LOWER_BOUND));
        }

        let new_lower_bound = match self {
            IntegerDomain::Interval { lower_bound, .. } => {
                lower_bound.write(store, value);
                value
            }
            IntegerDomain::Bitset {
                offset,
                values,
                lower_bound,
                size,
                ..
            } => {
                let new_index = values
                    .next_set_bit(store, Self::bit_index(*offset, value))
                    .unwrap_or_else(|| Self::bit_index(*offset, upper_bound));
                let removed = values.remove_range(
                    store,
                    Self::bit_index(*offset, old_lower_bound),
                    new_index - 1,
                );
                let new_lower_bound = Self::value_at(*offset, new_index);
                lower_bound.write(store, new_lower_bound);
                size.write(store, size.read(store) - removed as i32);
                new_lower_bound
            }
            IntegerDomain::Array {
                values,
                present,
                lower_bound_index,
                upper_bound_index,
                size,
            } => {
                let start = values.partition_point(|&candidate| candidate < value);
                let new_index = present
                    .next_set_bit(store, start)
                    .unwrap_or(upper_bound_index.read(store) as usize);
                let removed =
                    present.remove_range(store, lower_bound_index.read(store) as usize, new_index - 1);
                lower_bound_index.write(store, new_index as i32);
                size.write(store, size.read(store) - removed as i32);
                values[new_index]
            }
            IntegerDomain::Boolean { state } => {
                state.write(store, 0b10);
                1
            }
        };

        self.debug_check_consistency(store);
        if new_lower_bound == upper_bound {
            Ok(Some(IntEventKind::Instantiate))
        } else {
            Ok(Some(IntEventKind::IncLow))
        }
    }

    pub(crate) fn update_upper_bound(&self, store: &mut TrailedValues, value: i32) -> DomainUpdate {
        let lower_bound = self.lower_bound(store);
        let old_upper_bound = self.upper_bound(store);
        if value >= old_upper_bound {
            return Ok(None);
        }
        if value < lower_bound {
            return Err(EmptyDomain(messages::EMPTY_UPPER_BOUND));
        }

        let new_upper_bound = match self {
            IntegerDomain::Interval { upper_bound, .. } => {
                upper_bound.write(store, value);
                value
            }
            IntegerDomain::Bitset {
                offset,
                values,
                upper_bound,
                size,
                ..
            } => {
                let new_index = values
                    .previous_set_bit(store, Self::bit_index(*offset, value))
                    .unwrap_or_else(|| Self::bit_index(*offset, lower_bound));
                let removed = values.remove_range(
                    store,
                    new_index + 1,
                    Self::bit_index(*offset, old_upper_bound),
                );
                let new_upper_bound = Self::value_at(*offset, new_index);
                upper_bound.write(store, new_upper_bound);
                size.write(store, size.read(store) - removed as i32);
                new_upper_bound
            }
            IntegerDomain::Array {
                values,
                present,
                lower_bound_index,
                upper_bound_index,
                size,
            } => {
                let end = values.partition_point(|&candidate| candidate <= value);
                let new_index = present
                    .previous_set_bit(store, end - 1)
                    .unwrap_or(lower_bound_index.read(store) as usize);
                let removed = present.remove_range(
                    store,
                    new_index + 1,
                    upper_bound_index.read(store) as usize,
                );
                upper_bound_index.write(store, new_index as i32);
                size.write(store, size.read(store) - removed as i32);
                values[new_index]
            }
            IntegerDomain::Boolean { state } => {
                state.write(store, 0b01);
                0
            }
        };

        self.debug_check_consistency(store);
        if new_upper_bound == lower_bound {
            Ok(Some(IntEventKind::Instantiate))
        } else {
            Ok(Some(IntEventKind::DecUpp))
        }
    }

    pub(crate) fn instantiate_to(&self, store: &mut TrailedValues, value: i32) -> DomainUpdate {
        if !self.contains(store, value) {
            return Err(EmptyDomain(messages::VALUE_NOT_IN_DOMAIN));
        }
        let lower_bound = self.lower_bound(store);
        let upper_bound = self.upper_bound(store);
        if lower_bound == upper_bound {
            return Ok(None);
        }

        match self {
            IntegerDomain::Interval {
                lower_bound,
                upper_bound,
            } => {
                lower_bound.write(store, value);
                upper_bound.write(store, value);
            }
            IntegerDomain::Bitset {
                offset,
                values,
                lower_bound: stored_lower_bound,
                upper_bound: stored_upper_bound,
                size,
            } => {
                let index = Self::bit_index(*offset, value);
                if value > lower_bound {
                    let _ = values.remove_range(
                        store,
                        Self::bit_index(*offset, lower_bound),
                        index - 1,
                    );
                }
                if value < upper_bound {
                    let _ = values.remove_range(
                        store,
                        index + 1,
                        Self::bit_index(*offset, upper_bound),
                    );
                }
                stored_lower_bound.write(store, value);
                stored_upper_bound.write(store, value);
                size.write(store, 1);
            }
            IntegerDomain::Array {
                values,
                present,
                lower_bound_index,
                upper_bound_index,
                size,
            } => {
                let index = values.partition_point(|&candidate| candidate < value);
                let old_lower_index = lower_bound_index.read(store) as usize;
                let old_upper_index = upper_bound_index.read(store) as usize;
                if index > old_lower_index {
                    let _ = present.remove_range(store, old_lower_index, index - 1);
                }
                let _ = present.remove_range(store, index + 1, old_upper_index);
                lower_bound_index.write(store, index as i32);
                upper_bound_index.write(store, index as i32);
                size.write(store, 1);
            }
            IntegerDomain::Boolean { state } => state.write(store, 1 << value),
        }

        self.debug_check_consistency(store);
        Ok(Some(IntEventKind::Instantiate))
    }

    pub(crate) fn remove_value(&self, store: &mut TrailedValues, value: i32) -> DomainUpdate {
        if !self.contains(store, value) {
            return Ok(None);
        }
        let lower_bound = self.lower_bound(store);
        let upper_bound = self.upper_bound(store);
        if lower_bound == upper_bound {
            return Err(EmptyDomain(messages::LAST_VALUE_REMOVED));
        }
        if value == lower_bound {
            return self.update_lower_bound(store, value + 1);
        }
        if value == upper_bound {
            return self.update_upper_bound(store, value - 1);
        }

        match self {
            IntegerDomain::Interval { .. } | IntegerDomain::Boolean { .. } => return Ok(None),
            IntegerDomain::Bitset {
                offset,
                values,
                size,
                ..
            } => {
                let _ = values.remove(store, Self::bit_index(*offset, value));
                size.write(store, size.read(store) - 1);
            }
            IntegerDomain::Array {
                values,
                present,
                size,
                ..
            } => {
                let index = values.partition_point(|&candidate| candidate < value);
                let _ = present.remove(store, index);
                size.write(store, size.read(store) - 1);
            }
        }

        self.debug_check_consistency(store);
        Ok(Some(IntEventKind::Remove))
    }

    /// Removes every value in `from..=to`.
    pub(crate) fn remove_interval(&self, store: &mut TrailedValues, from: i32, to: i32) -> DomainUpdate {
        if from > to {
            return Ok(None);
        }
        let lower_bound = self.lower_bound(store);
        let upper_bound = self.upper_bound(store);
        if from <= lower_bound && to >= upper_bound {
            return Err(EmptyDomain(messages::LAST_VALUE_REMOVED));
        }
        if from <= lower_bound {
            return self.update_lower_bound(store, to + 1);
        }
        if to >= upper_bound {
            return self.update_upper_bound(store, from - 1);
        }

        let removed = match self {
            IntegerDomain::Interval { .. } | IntegerDomain::Boolean { .. } => 0,
            IntegerDomain::Bitset {
                offset,
                values,
                size,
                ..
            } => {
                let removed = values.remove_range(
                    store,
                    Self::bit_index(*offset, from),
                    Self::bit_index(*offset, to),
                );
                size.write(store, size.read(store) - removed as i32);
                removed
            }
            IntegerDomain::Array {
                values,
                present,
                size,
                ..
            } => {
                let first = values.partition_point(|&candidate| candidate < from);
                let end = values.partition_point(|&candidate| candidate <= to);
                if first >= end {
                    return Ok(None);
                }
                let removed = present.remove_range(store, first, end - 1);
                size.write(store, size.read(store) - removed as i32);
                removed
            }
        };

        self.debug_check_consistency(store);
        if removed == 0 {
            Ok(None)
        } else {
            Ok(Some(IntEventKind::Remove))
        }
    }

    fn bit_index(offset: i32, value: i32) -> usize {
        (value as i64 - offset as i64) as usize
    }

    fn value_at(offset: i32, index: usize) -> i32 {
        (offset as i64 + index as i64) as i32
    }

    fn debug_check_consistency(&self, store: &TrailedValues) {
        marrow_assert_extreme!(
            self.iter(store).count() == self.size(store),
            "the stored size does not match the domain"
        );
        marrow_assert_extreme!(self.contains(store, self.lower_bound(store)));
        marrow_assert_extreme!(self.contains(store, self.upper_bound(store)));
    }
}
