/// Maps the bits of an indexed bit-set domain to the values they stand for.
///
/// Indices are ordered like the values they map to.
pub(crate) trait ValueIndex {
    /// Whether consecutive indices always map to consecutive values.
    const CONTIGUOUS: bool;

    fn len(&self) -> usize;

    fn value(&self, index: usize) -> i32;

    fn index_of(&self, value: i32) -> Option<usize>;

    /// The first index mapping to a value at or above `value`, `len()` if there is none.
    fn first_index_at_or_above(&self, value: i32) -> usize;
}

/// Index `i` stands for `offset + i`.
#[derive(Debug, Clone, Copy)]
pub(crate) struct OffsetIndex {
    offset: i32,
    len: usize,
}

impl OffsetIndex {
    pub(crate) fn new(first_value: i32, last_value: i32) -> OffsetIndex {
        OffsetIndex {
            offset: first_value,
            len: (i64::from(last_value) - i64::from(first_value) + 1) as usize,
        }
    }
}

impl ValueIndex for OffsetIndex {
    const CONTIGUOUS: bool = true;

    fn len(&self) -> usize {
        self.len
    }

    fn value(&self, index: usize) -> i32 {
        self.offset + index as i32
    }

    fn index_of(&self, value: i32) -> Option<usize> {
        let index = i64::from(value) - i64::from(self.offset);
        (0..self.len as i64)
            .contains(&index)
            .then_some(index as usize)
    }

    fn first_index_at_or_above(&self, value: i32) -> usize {
        (i64::from(value) - i64::from(self.offset)).clamp(0, self.len as i64) as usize
    }
}

/// Index `i` stands for the `i`-th smallest value of an immutable table.
#[derive(Debug, Clone)]
pub(crate) struct ValueTable {
    values: Box<[i32]>,
}

impl ValueTable {
    /// Takes the values in strictly increasing order.
    pub(crate) fn new(values: Box<[i32]>) -> ValueTable {
        ValueTable { values }
    }
}

impl ValueIndex for ValueTable {
    const CONTIGUOUS: bool = false;

    fn len(&self) -> usize {
        self.values.len()
    }

    fn value(&self, index: usize) -> i32 {
        self.values[index]
    }

    fn index_of(&self, value: i32) -> Option<usize> {
        self.values.binary_search(&value).ok()
    }

    fn first_index_at_or_above(&self, value: i32) -> usize {
        self.values.partition_point(|&candidate| candidate < value)
    }
}
