//! The encodings of integer domains.
//!
//! All encodings implement [`IntegerDomain`]. They only perform the raw storage updates; checking
//! the preconditions, classifying the resulting event and notifying subscribers is left to
//! [`IntVariable`](super::IntVariable), so the semantics of a mutation do not depend on the
//! encoding.
mod indexed_bitset;
mod interval;
mod value_index;

pub(crate) use indexed_bitset::IndexedBitsetDomain;
pub(crate) use interval::IntervalDomain;
pub(crate) use value_index::OffsetIndex;
pub(crate) use value_index::ValueTable;

use crate::engine::delta::DeltaRecorder;
use crate::engine::reversible::ReversibleStore;

/// Offset bit-set encoding, one bit per value between the initial bounds.
pub(crate) type BitsetDomain = IndexedBitsetDomain<OffsetIndex>;
/// Sparse encoding, one bit per value of an immutable sorted value table.
pub(crate) type SparseBitsetDomain = IndexedBitsetDomain<ValueTable>;

/// The storage contract shared by the domain encodings.
///
/// Mutating methods state their preconditions; they are only called by
/// [`IntVariable`](super::IntVariable) once those hold. Every value they drop is passed to the
/// delta recorder.
pub(crate) trait IntegerDomain {
    fn lower_bound(&self, store: &ReversibleStore) -> i32;

    fn upper_bound(&self, store: &ReversibleStore) -> i32;

    fn size(&self, store: &ReversibleStore) -> usize;

    fn contains(&self, store: &ReversibleStore, value: i32) -> bool;

    /// The smallest present value strictly greater than `value`, `i32::MAX` if there is none.
    fn next_value(&self, store: &ReversibleStore, value: i32) -> i32;

    /// The largest present value strictly smaller than `value`, `i32::MIN` if there is none.
    fn previous_value(&self, store: &ReversibleStore, value: i32) -> i32;

    /// The smallest absent value strictly greater than `value`.
    fn next_value_out(&self, store: &ReversibleStore, value: i32) -> i32;

    /// The largest absent value strictly smaller than `value`.
    fn previous_value_out(&self, store: &ReversibleStore, value: i32) -> i32;

    /// Whether the encoding can represent holes.
    fn has_enumerated_domain(&self) -> bool;

    /// Removes `value`, which is present and not the only value of the domain.
    ///
    /// Returns false if the encoding cannot represent the resulting domain, in which case
    /// nothing changed.
    fn remove_present(
        &self,
        store: &mut ReversibleStore,
        value: i32,
        delta: &mut DeltaRecorder<'_>,
    ) -> bool;

    /// Moves the lower bound to the first present value at or above `value`, with
    /// `lower_bound < value <= upper_bound`.
    fn raise_lower_bound(
        &self,
        store: &mut ReversibleStore,
        value: i32,
        delta: &mut DeltaRecorder<'_>,
    );

    /// Moves the upper bound to the last present value at or below `value`, with
    /// `lower_bound <= value < upper_bound`.
    fn lower_upper_bound(
        &self,
        store: &mut ReversibleStore,
        value: i32,
        delta: &mut DeltaRecorder<'_>,
    );

    /// Reduces the domain to the present `value`.
    fn collapse_to(&self, store: &mut ReversibleStore, value: i32, delta: &mut DeltaRecorder<'_>);
}

/// One of the three encodings, chosen when the variable is created.
#[derive(Debug, Clone)]
pub(crate) enum Domain {
    Interval(IntervalDomain),
    Bitset(BitsetDomain),
    SparseBitset(SparseBitsetDomain),
}

macro_rules! dispatch {
    ($domain:expr, $inner:ident => $call:expr) => {
        match $domain {
            Domain::Interval($inner) => $call,
            Domain::Bitset($inner) => $call,
            Domain::SparseBitset($inner) => $call,
        }
    };
}

impl IntegerDomain for Domain {
    fn lower_bound(&self, store: &ReversibleStore) -> i32 {
        dispatch!(self, domain => domain.lower_bound(store))
    }

    fn upper_bound(&self, store: &ReversibleStore) -> i32 {
        dispatch!(self, domain => domain.upper_bound(store))
    }

    fn size(&self, store: &ReversibleStore) -> usize {
        dispatch!(self, domain => domain.size(store))
    }

    fn contains(&self, store: &ReversibleStore, value: i32) -> bool {
        dispatch!(self, domain => domain.contains(store, value))
    }

    fn next_value(&self, store: &ReversibleStore, value: i32) -> i32 {
        dispatch!(self, domain => domain.next_value(store, value))
    }

    fn previous_value(&self, store: &ReversibleStore, value: i32) -> i32 {
        dispatch!(self, domain => domain.previous_value(store, value))
    }

    fn next_value_out(&self, store: &ReversibleStore, value: i32) -> i32 {
        dispatch!(self, domain => domain.next_value_out(store, value))
    }

    fn previous_value_out(&self, store: &ReversibleStore, value: i32) -> i32 {
        dispatch!(self, domain => domain.previous_value_out(store, value))
    }

    fn has_enumerated_domain(&self) -> bool {
        dispatch!(self, domain => domain.has_enumerated_domain())
    }

    fn remove_present(
        &self,
        store: &mut ReversibleStore,
        value: i32,
        delta: &mut DeltaRecorder<'_>,
    ) -> bool {
        dispatch!(self, domain => domain.remove_present(store, value, delta))
    }

    fn raise_lower_bound(
        &self,
        store: &mut ReversibleStore,
        value: i32,
        delta: &mut DeltaRecorder<'_>,
    ) {
        dispatch!(self, domain => domain.raise_lower_bound(store, value, delta))
    }

    fn lower_upper_bound(
        &self,
        store: &mut ReversibleStore,
        value: i32,
        delta: &mut DeltaRecorder<'_>,
    ) {
        dispatch!(self, domain => domain.lower_upper_bound(store, value, delta))
    }

    fn collapse_to(&self, store: &mut ReversibleStore, value: i32, delta: &mut DeltaRecorder<'_>) {
        dispatch!(self, domain => domain.collapse_to(store, value, delta))
    }
}
