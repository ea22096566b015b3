use super::IntegerDomain;
use crate::engine::delta::DeltaRecorder;
use crate::engine::reversible::ReversibleInt;
use crate::engine::reversible::ReversibleStore;

/// A domain without holes, stored as its two bounds.
#[derive(Debug, Clone, Copy)]
pub(crate) struct IntervalDomain {
    lower_bound: ReversibleInt,
    upper_bound: ReversibleInt,
}

impl IntervalDomain {
    pub(crate) fn new(store: &mut ReversibleStore, lower_bound: i32, upper_bound: i32) -> Self {
        IntervalDomain {
            lower_bound: store.new_int(lower_bound.into()),
            upper_bound: store.new_int(upper_bound.into()),
        }
    }
}

impl IntegerDomain for IntervalDomain {
    fn lower_bound(&self, store: &ReversibleStore) -> i32 {
        store.read(self.lower_bound) as i32
    }

    fn upper_bound(&self, store: &ReversibleStore) -> i32 {
        store.read(self.upper_bound) as i32
    }

    fn size(&self, store: &ReversibleStore) -> usize {
        (store.read(self.upper_bound) - store.read(self.lower_bound) + 1) as usize
    }

    fn contains(&self, store: &ReversibleStore, value: i32) -> bool {
        self.lower_bound(store) <= value && value <= self.upper_bound(store)
    }

    fn next_value(&self, store: &ReversibleStore, value: i32) -> i32 {
        let lower_bound = self.lower_bound(store);
        if value < lower_bound {
            lower_bound
        } else if value < self.upper_bound(store) {
            value + 1
        } else {
            i32::MAX
        }
    }

    fn previous_value(&self, store: &ReversibleStore, value: i32) -> i32 {
        let upper_bound = self.upper_bound(store);
        if value > upper_bound {
            upper_bound
        } else if value > self.lower_bound(store) {
            value - 1
        } else {
            i32::MIN
        }
    }

    fn next_value_out(&self, store: &ReversibleStore, value: i32) -> i32 {
        let upper_bound = self.upper_bound(store);
        if self.lower_bound(store) - 1 <= value && value <= upper_bound {
            upper_bound + 1
        } else {
            value + 1
        }
    }

    fn previous_value_out(&self, store: &ReversibleStore, value: i32) -> i32 {
        let lower_bound = self.lower_bound(store);
        if lower_bound <= value && value <= self.upper_bound(store) + 1 {
            lower_bound - 1
        } else {
            value - 1
        }
    }

    fn has_enumerated_domain(&self) -> bool {
        false
    }

    fn remove_present(
        &self,
        store: &mut ReversibleStore,
        value: i32,
        delta: &mut DeltaRecorder<'_>,
    ) -> bool {
        if value == self.lower_bound(store) {
            delta.record(value);
            store.assign(self.lower_bound, i64::from(value) + 1);
            true
        } else if value == self.upper_bound(store) {
            delta.record(value);
            store.assign(self.upper_bound, i64::from(value) - 1);
            true
        } else {
            false
        }
    }

    fn raise_lower_bound(
        &self,
        store: &mut ReversibleStore,
        value: i32,
        delta: &mut DeltaRecorder<'_>,
    ) {
        if delta.is_active() {
            (self.lower_bound(store)..value).for_each(|removed| delta.record(removed));
        }
        store.assign(self.lower_bound, value.into());
    }

    fn lower_upper_bound(
        &self,
        store: &mut ReversibleStore,
        value: i32,
        delta: &mut DeltaRecorder<'_>,
    ) {
        if delta.is_active() {
            (value + 1..=self.upper_bound(store))
                .rev()
                .for_each(|removed| delta.record(removed));
        }
        store.assign(self.upper_bound, value.into());
    }

    fn collapse_to(&self, store: &mut ReversibleStore, value: i32, delta: &mut DeltaRecorder<'_>) {
        if delta.is_active() {
            (self.lower_bound(store)..=self.upper_bound(store))
                .filter(|&removed| removed != value)
                .for_each(|removed| delta.record(removed));
        }
        store.assign(self.lower_bound, value.into());
        store.assign(self.upper_bound, value.into());
    }
}
