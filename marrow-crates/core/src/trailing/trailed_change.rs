use super::TrailedInteger;

/// The state of a cell before its first write in a world.
#[derive(Clone, Copy, Debug)]
pub(crate) struct TrailedChange {
    pub(crate) reference: TrailedInteger,
    pub(crate) old_value: i64,
    pub(crate) old_stamp: u64,
}
