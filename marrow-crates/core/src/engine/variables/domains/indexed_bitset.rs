use super::value_index::ValueIndex;
use super::IntegerDomain;
use super::OffsetIndex;
use super::ValueTable;
use crate::engine::delta::DeltaRecorder;
use crate::engine::reversible::ReversibleBitSet;
use crate::engine::reversible::ReversibleInt;
use crate::engine::reversible::ReversibleStore;
use crate::marrow_assert_moderate;

/// A domain stored as one reversible bit per candidate value.
///
/// The bounds are kept as bit indices, the values they stand for are looked up in the
/// [`ValueIndex`]. The index is fixed at creation, so the domain can only shrink.
#[derive(Debug, Clone)]
pub(crate) struct IndexedBitsetDomain<Index> {
    index: Index,
    present: ReversibleBitSet,
    lower_bound: ReversibleInt,
    upper_bound: ReversibleInt,
    size: ReversibleInt,
}

impl IndexedBitsetDomain<OffsetIndex> {
    /// Every value of `[lower_bound, upper_bound]` is present.
    pub(crate) fn interval(
        store: &mut ReversibleStore,
        lower_bound: i32,
        upper_bound: i32,
    ) -> Self {
        let index = OffsetIndex::new(lower_bound, upper_bound);
        let present = store.new_bit_set(index.len(), true);
        Self::with_present(store, index, present)
    }

    /// Takes non-empty values in strictly increasing order.
    pub(crate) fn from_sorted_values(store: &mut ReversibleStore, values: &[i32]) -> Self {
        let first = values[0];
        let index = OffsetIndex::new(first, values[values.len() - 1]);
        let present = store.new_bit_set_with(
            index.len(),
            values.iter().map(|&value| (value - first) as usize),
        );
        Self::with_present(store, index, present)
    }
}

impl IndexedBitsetDomain<ValueTable> {
    /// Takes non-empty values in strictly increasing order.
    pub(crate) fn from_sorted_values(store: &mut ReversibleStore, values: &[i32]) -> Self {
        let index = ValueTable::new(values.into());
        let present = store.new_bit_set(index.len(), true);
        Self::with_present(store, index, present)
    }
}

impl<Index: ValueIndex> IndexedBitsetDomain<Index> {
    fn with_present(store: &mut ReversibleStore, index: Index, present: ReversibleBitSet) -> Self {
        let size = store.cardinality(present);
        marrow_assert_moderate!(size > 0);
        let first = store.next_set_bit(present, 0).unwrap_or(0);
        let last = store.previous_set_bit(present, index.len() - 1).unwrap_or(0);

        IndexedBitsetDomain {
            index,
            present,
            lower_bound: store.new_int(first as i64),
            upper_bound: store.new_int(last as i64),
            size: store.new_int(size as i64),
        }
    }

    fn lower_index(&self, store: &ReversibleStore) -> usize {
        store.read(self.lower_bound) as usize
    }

    fn upper_index(&self, store: &ReversibleStore) -> usize {
        store.read(self.upper_bound) as usize
    }

    fn for_each_present(
        &self,
        store: &ReversibleStore,
        from: usize,
        to: usize,
        mut action: impl FnMut(usize),
    ) {
        let mut next = store.next_set_bit(self.present, from);
        while let Some(index) = next.filter(|&index| index < to) {
            action(index);
            next = store.next_set_bit(self.present, index + 1);
        }
    }
}

impl<Index: ValueIndex> IntegerDomain for IndexedBitsetDomain<Index> {
    fn lower_bound(&self, store: &ReversibleStore) -> i32 {
        self.index.value(self.lower_index(store))
    }

    fn upper_bound(&self, store: &ReversibleStore) -> i32 {
        self.index.value(self.upper_index(store))
    }

    fn size(&self, store: &ReversibleStore) -> usize {
        store.read(self.size) as usize
    }

    fn contains(&self, store: &ReversibleStore, value: i32) -> bool {
        self.index.index_of(value).is_some_and(|index| {
            self.lower_index(store) <= index
                && index <= self.upper_index(store)
                && store.bit(self.present, index)
        })
    }

    fn next_value(&self, store: &ReversibleStore, value: i32) -> i32 {
        let lower_bound = self.lower_bound(store);
        if value < lower_bound {
            return lower_bound;
        }
        if value >= self.upper_bound(store) {
            return i32::MAX;
        }
        let from = self.index.first_index_at_or_above(value + 1);
        store
            .next_set_bit(self.present, from)
            .map_or(i32::MAX, |index| self.index.value(index))
    }

    fn previous_value(&self, store: &ReversibleStore, value: i32) -> i32 {
        let upper_bound = self.upper_bound(store);
        if value > upper_bound {
            return upper_bound;
        }
        if value <= self.lower_bound(store) {
            return i32::MIN;
        }
        // The lower bound lies below `value`, so its index does too.
        let before = self.index.first_index_at_or_above(value) - 1;
        store
            .previous_set_bit(self.present, before)
            .map_or(i32::MIN, |index| self.index.value(index))
    }

    fn next_value_out(&self, store: &ReversibleStore, value: i32) -> i32 {
        if value < self.lower_bound(store) - 1 || value > self.upper_bound(store) {
            return value + 1;
        }
        let mut index = self.index.first_index_at_or_above(value + 1);
        if Index::CONTIGUOUS {
            return self.index.value(0) + store.next_clear_bit(self.present, index) as i32;
        }

        let mut current = value;
        while index < self.index.len()
            && self.index.value(index) == current + 1
            && store.bit(self.present, index)
        {
            current += 1;
            index += 1;
        }
        current + 1
    }

    fn previous_value_out(&self, store: &ReversibleStore, value: i32) -> i32 {
        if value < self.lower_bound(store) || value > self.upper_bound(store) + 1 {
            return value - 1;
        }
        let mut index = self.index.first_index_at_or_above(value);
        if Index::CONTIGUOUS {
            if index == 0 {
                return value - 1;
            }
            return match store.previous_clear_bit(self.present, index - 1) {
                Some(clear) => self.index.value(clear),
                None => self.index.value(0) - 1,
            };
        }

        let mut current = value;
        while index > 0
            && self.index.value(index - 1) == current - 1
            && store.bit(self.present, index - 1)
        {
            current -= 1;
            index -= 1;
        }
        current - 1
    }

    fn has_enumerated_domain(&self) -> bool {
        true
    }

    fn remove_present(
        &self,
        store: &mut ReversibleStore,
        value: i32,
        delta: &mut DeltaRecorder<'_>,
    ) -> bool {
        let Some(index) = self.index.index_of(value) else {
            return false;
        };
        store.clear_bit(self.present, index);
        store.add_assign(self.size, -1);
        delta.record(value);

        if index == self.lower_index(store) {
            if let Some(next) = store.next_set_bit(self.present, index + 1) {
                store.assign(self.lower_bound, next as i64);
            }
        } else if index == self.upper_index(store) {
            if let Some(previous) = store.previous_set_bit(self.present, index - 1) {
                store.assign(self.upper_bound, previous as i64);
            }
        }
        true
    }

    fn raise_lower_bound(
        &self,
        store: &mut ReversibleStore,
        value: i32,
        delta: &mut DeltaRecorder<'_>,
    ) {
        let lower_index = self.lower_index(store);
        let target = store
            .next_set_bit(self.present, self.index.first_index_at_or_above(value))
            .unwrap_or_else(|| self.upper_index(store));

        if delta.is_active() {
            self.for_each_present(store, lower_index, target, |index| {
                delta.record(self.index.value(index))
            });
        }
        let removed = store.count_bits(self.present, lower_index, target);
        store.clear_bits(self.present, lower_index, target);
        store.assign(self.lower_bound, target as i64);
        store.add_assign(self.size, -(removed as i64));
    }

    fn lower_upper_bound(
        &self,
        store: &mut ReversibleStore,
        value: i32,
        delta: &mut DeltaRecorder<'_>,
    ) {
        let upper_index = self.upper_index(store);
        // The lower bound lies at or below `value`, so the search starts at a valid index.
        let target = store
            .previous_set_bit(
                self.present,
                self.index.first_index_at_or_above(value.saturating_add(1)) - 1,
            )
            .unwrap_or_else(|| self.lower_index(store));

        if delta.is_active() {
            let mut next = store.previous_set_bit(self.present, upper_index);
            while let Some(index) = next.filter(|&index| index > target) {
                delta.record(self.index.value(index));
                next = store.previous_set_bit(self.present, index - 1);
            }
        }
        let removed = store.count_bits(self.present, target + 1, upper_index + 1);
        store.clear_bits(self.present, target + 1, upper_index + 1);
        store.assign(self.upper_bound, target as i64);
        store.add_assign(self.size, -(removed as i64));
    }

    fn collapse_to(&self, store: &mut ReversibleStore, value: i32, delta: &mut DeltaRecorder<'_>) {
        let Some(index) = self.index.index_of(value) else {
            return;
        };
        let lower_index = self.lower_index(store);
        let upper_index = self.upper_index(store);

        if delta.is_active() {
            self.for_each_present(store, lower_index, upper_index + 1, |present| {
                if present != index {
                    delta.record(self.index.value(present));
                }
            });
        }
        store.clear_bits(self.present, lower_index, index);
        store.clear_bits(self.present, index + 1, upper_index + 1);
        store.assign(self.lower_bound, index as i64);
        store.assign(self.upper_bound, index as i64);
        store.assign(self.size, 1);
    }
}
