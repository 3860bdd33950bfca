use crate::containers::StorageKey;

/// Identifies one cell of the [`super::TrailedValues`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TrailedInteger {
    id: u32,
}

impl TrailedInteger {
    /// The cell `offset` positions after this one.
    pub(crate) fn offset(self, offset: usize) -> TrailedInteger {
        TrailedInteger::create_from_index(self.index() + offset)
    }
}

impl StorageKey for TrailedInteger {
    fn index(&self) -> usize {
        self.id as usize
    }

    fn create_from_index(index: usize) -> Self {
        Self { id: index as u32 }
    }
}
