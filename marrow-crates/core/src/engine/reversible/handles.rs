use crate::containers::StorageKey;

/// A reversible integer cell of a [`ReversibleStore`](super::ReversibleStore).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReversibleInt {
    id: u32,
}

impl StorageKey for ReversibleInt {
    fn index(&self) -> usize {
        self.id as usize
    }

    fn create_from_index(index: usize) -> Self {
        Self { id: index as u32 }
    }
}

/// A reversible set of bits `0..capacity` of a [`ReversibleStore`](super::ReversibleStore).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReversibleBitSet {
    id: u32,
}

impl StorageKey for ReversibleBitSet {
    fn index(&self) -> usize {
        self.id as usize
    }

    fn create_from_index(index: usize) -> Self {
        Self { id: index as u32 }
    }
}
