use super::TrailedInteger;
use super::TrailedValues;

/// A value living in the [`TrailedValues`]; it is restored when the world it was changed in is
/// popped.
pub trait StoredPrimitive: Copy {
    type Value;

    fn read(self, store: &TrailedValues) -> Self::Value;

    fn write(self, store: &mut TrailedValues, value: Self::Value);
}

/// A [`StoredPrimitive`] which supports incremental updates.
pub trait StoredNumber: StoredPrimitive {
    fn add(self, store: &mut TrailedValues, addition: Self::Value);
}

/// A backtrackable `i32`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct StoredInt(pub(crate) TrailedInteger);

/// A backtrackable `i64`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct StoredLong(pub(crate) TrailedInteger);

/// A backtrackable `bool`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct StoredBool(pub(crate) TrailedInteger);

impl StoredPrimitive for StoredInt {
    type Value = i32;

    fn read(self, store: &TrailedValues) -> i32 {
        store.read(self.0) as i32
    }

    fn write(self, store: &mut TrailedValues, value: i32) {
        store.assign(self.0, value as i64)
    }
}

impl StoredNumber for StoredInt {
    fn add(self, store: &mut TrailedValues, addition: i32) {
        store.add_assign(self.0, addition as i64)
    }
}

impl StoredPrimitive for StoredLong {
    type Value = i64;

    fn read(self, store: &TrailedValues) -> i64 {
        store.read(self.0)
    }

    fn write(self, store: &mut TrailedValues, value: i64) {
        store.assign(self.0, value)
    }
}

impl StoredNumber for StoredLong {
    fn add(self, store: &mut TrailedValues, addition: i64) {
        store.add_assign(self.0, addition)
    }
}

impl StoredPrimitive for StoredBool {
    type Value = bool;

    fn read(self, store: &TrailedValues) -> bool {
        store.read(self.0) != 0
    }

    fn write(self, store: &mut TrailedValues, value: bool) {
        store.assign(self.0, value as i64)
    }
}

/// Read access to stored primitives, implemented by the model and the propagation contexts.
pub trait ReadStoredValues {
    fn stored_values(&self) -> &TrailedValues;

    fn read_stored<S: StoredPrimitive>(&self, stored: S) -> S::Value {
        stored.read(self.stored_values())
    }
}

/// Write access to stored primitives.
pub trait ManipulateStoredValues: ReadStoredValues {
    fn stored_values_mut(&mut self) -> &mut TrailedValues;

    fn write_stored<S: StoredPrimitive>(&mut self, stored: S, value: S::Value) {
        stored.write(self.stored_values_mut(), value)
    }

    fn add_to_stored<S: StoredNumber>(&mut self, stored: S, addition: S::Value) {
        stored.add(self.stored_values_mut(), addition)
    }
}
