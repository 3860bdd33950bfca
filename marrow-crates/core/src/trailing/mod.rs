//! The backtrackable store.
//!
//! Every piece of search state which must be undone on backtracking lives in the
//! [`TrailedValues`]: domain bounds, domain bitsets, propagator activity flags and the incremental
//! state of propagators.
mod stored;
mod stored_bitset;
mod trailed_change;
mod trailed_integer;
mod trailed_values;

pub use stored::ManipulateStoredValues;
pub use stored::ReadStoredValues;
pub use stored::StoredBool;
pub use stored::StoredInt;
pub use stored::StoredLong;
pub use stored::StoredNumber;
pub use stored::StoredPrimitive;
pub use stored_bitset::StoredBitSet;
pub(crate) use trailed_change::TrailedChange;
pub use trailed_integer::TrailedInteger;
pub use trailed_values::TrailStatistics;
pub use trailed_values::TrailedValues;
