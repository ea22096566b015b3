use super::domains::Domain;
use super::domains::IntegerDomain;
use crate::basic_types::Cause;
use crate::basic_types::ContradictionReason;
use crate::containers::RangeSet;
use crate::engine::delta::DeltaLog;
use crate::engine::delta::DeltaRecorder;
use crate::engine::events::IntEventType;
use crate::engine::reversible::ReversibleStore;

/// The outcome of a mutation which changed the domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Modification {
    pub(crate) event: IntEventType,
    /// The cause the event is dispatched under, see [`Cause::promote`].
    pub(crate) cause: Option<Cause>,
    pub(crate) num_removed: usize,
}

/// The result of a mutation: `None` when the domain did not change.
pub(crate) type MutationResult = Result<Option<Modification>, ContradictionReason>;

/// An integer variable: its domain, its name and its optional delta log.
///
/// Every mutation first checks its preconditions, so a contradiction is reported before anything
/// is written. The encoding then performs the raw update, after which the event is classified
/// from the edges which moved.
#[derive(Debug, Clone)]
pub(crate) struct IntVariable {
    name: String,
    domain: Domain,
    delta: Option<DeltaLog>,
}

impl IntVariable {
    pub(crate) fn new(name: String, domain: Domain) -> IntVariable {
        IntVariable {
            name,
            domain,
            delta: None,
        }
    }

    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn domain(&self) -> &Domain {
        &self.domain
    }

    pub(crate) fn delta(&self) -> Option<&DeltaLog> {
        self.delta.as_ref()
    }

    /// Starts recording removals; a no-op when the log already exists.
    pub(crate) fn create_delta(&mut self, timestamp: u64) {
        if self.delta.is_none() {
            self.delta = Some(DeltaLog::new(timestamp));
        }
    }

    pub(crate) fn clear_delta(&mut self) {
        if let Some(delta) = self.delta.as_mut() {
            delta.clear();
        }
    }

    pub(crate) fn stash_delta(&mut self) -> Option<DeltaLog> {
        self.delta.as_mut().map(DeltaLog::stash)
    }

    pub(crate) fn restore_delta(&mut self, stashed: DeltaLog, stashed_at: u64, timestamp: u64) {
        if let Some(delta) = self.delta.as_mut() {
            delta.restore(stashed, stashed_at, timestamp);
        }
    }

    fn first_present_at_or_above(&self, store: &ReversibleStore, value: i32) -> i32 {
        if self.domain.contains(store, value) {
            value
        } else {
            self.domain.next_value(store, value)
        }
    }

    fn last_present_at_or_below(&self, store: &ReversibleStore, value: i32) -> i32 {
        if self.domain.contains(store, value) {
            value
        } else {
            self.domain.previous_value(store, value)
        }
    }

    /// Runs a raw update of the domain and classifies what it did.
    ///
    /// `update` returns whether it changed anything. The delta records the cause as given, the
    /// event is dispatched under the promoted cause when it is stronger than `requested`.
    fn apply(
        &mut self,
        store: &mut ReversibleStore,
        cause: Option<Cause>,
        requested: IntEventType,
        update: impl FnOnce(&Domain, &mut ReversibleStore, &mut DeltaRecorder<'_>) -> bool,
    ) -> Option<Modification> {
        let lower_bound = self.domain.lower_bound(store);
        let upper_bound = self.domain.upper_bound(store);
        let size = self.domain.size(store);

        let timestamp = store.timestamp();
        let mut recorder = DeltaRecorder::new(self.delta.as_mut(), cause, timestamp);
        if !update(&self.domain, store, &mut recorder) {
            return None;
        }

        let new_size = self.domain.size(store);
        let event = IntEventType::classify(
            self.domain.lower_bound(store) != lower_bound,
            self.domain.upper_bound(store) != upper_bound,
            new_size == 1,
        );
        let cause = if event.is_promotion_of(requested) {
            Cause::promote(cause)
        } else {
            cause
        };
        Some(Modification {
            event,
            cause,
            num_removed: size - new_size,
        })
    }

    pub(crate) fn remove_value(
        &mut self,
        store: &mut ReversibleStore,
        cause: Option<Cause>,
        value: i32,
    ) -> MutationResult {
        if !self.domain.contains(store, value) {
            return Ok(None);
        }
        if self.domain.size(store) == 1 {
            return Err(ContradictionReason::RemoveLastValue);
        }
        Ok(self.apply(store, cause, IntEventType::Remove, |domain, store, delta| {
            domain.remove_present(store, value, delta)
        }))
    }

    /// Removes `[from, to]`; an interval reaching a bound moves that bound instead.
    pub(crate) fn remove_interval(
        &mut self,
        store: &mut ReversibleStore,
        cause: Option<Cause>,
        from: i32,
        to: i32,
    ) -> MutationResult {
        if from > to {
            return Ok(None);
        }
        let lower_bound = self.domain.lower_bound(store);
        let upper_bound = self.domain.upper_bound(store);
        if from <= lower_bound {
            return self.update_lower_bound(store, cause, to.saturating_add(1));
        }
        if upper_bound <= to {
            return self.update_upper_bound(store, cause, from.saturating_sub(1));
        }
        if !self.domain.has_enumerated_domain() {
            return Ok(None);
        }

        // Both bounds survive, so every removal is an interior one.
        Ok(self.apply(store, cause, IntEventType::Remove, |domain, store, delta| {
            let mut changed = false;
            let mut value = domain.next_value(store, from - 1);
            while value <= to {
                let next = domain.next_value(store, value);
                changed |= domain.remove_present(store, value, delta);
                value = next;
            }
            changed
        }))
    }

    pub(crate) fn update_lower_bound(
        &mut self,
        store: &mut ReversibleStore,
        cause: Option<Cause>,
        value: i32,
    ) -> MutationResult {
        if value <= self.domain.lower_bound(store) {
            return Ok(None);
        }
        if value > self.domain.upper_bound(store) {
            return Err(ContradictionReason::LowerBoundAboveUpperBound);
        }
        Ok(self.apply(store, cause, IntEventType::IncLow, |domain, store, delta| {
            domain.raise_lower_bound(store, value, delta);
            true
        }))
    }

    pub(crate) fn update_upper_bound(
        &mut self,
        store: &mut ReversibleStore,
        cause: Option<Cause>,
        value: i32,
    ) -> MutationResult {
        if value >= self.domain.upper_bound(store) {
            return Ok(None);
        }
        if value < self.domain.lower_bound(store) {
            return Err(ContradictionReason::UpperBoundBelowLowerBound);
        }
        Ok(self.apply(store, cause, IntEventType::DecUpp, |domain, store, delta| {
            domain.lower_upper_bound(store, value, delta);
            true
        }))
    }

    /// Tightens both bounds in one mutation, which fires a single event.
    pub(crate) fn update_bounds(
        &mut self,
        store: &mut ReversibleStore,
        cause: Option<Cause>,
        lower: i32,
        upper: i32,
    ) -> MutationResult {
        let lower_bound = self.domain.lower_bound(store);
        let upper_bound = self.domain.upper_bound(store);
        let lower = lower.max(lower_bound);
        let upper = upper.min(upper_bound);
        if lower == lower_bound && upper == upper_bound {
            return Ok(None);
        }
        if lower > upper {
            return Err(ContradictionReason::IncorrectBounds);
        }

        let first = self.first_present_at_or_above(store, lower);
        let last = self.last_present_at_or_below(store, upper);
        if first > last {
            return Err(ContradictionReason::IncorrectBounds);
        }

        let requested = IntEventType::classify(first > lower_bound, last < upper_bound, false);
        Ok(self.apply(store, cause, requested, |domain, store, delta| {
            if first > lower_bound {
                domain.raise_lower_bound(store, first, delta);
            }
            if last < upper_bound {
                domain.lower_upper_bound(store, last, delta);
            }
            true
        }))
    }

    pub(crate) fn instantiate_to(
        &mut self,
        store: &mut ReversibleStore,
        cause: Option<Cause>,
        value: i32,
    ) -> MutationResult {
        let size = self.domain.size(store);
        if !self.domain.contains(store, value) {
            return Err(if size == 1 {
                ContradictionReason::InstantiatedToAnotherValue
            } else {
                ContradictionReason::ValueNotInDomain
            });
        }
        if size == 1 {
            return Ok(None);
        }
        Ok(self.apply(store, cause, IntEventType::Instantiate, |domain, store, delta| {
            domain.collapse_to(store, value, delta);
            true
        }))
    }

    /// Removes every member of `values` from the domain.
    pub(crate) fn remove_values(
        &mut self,
        store: &mut ReversibleStore,
        cause: Option<Cause>,
        values: &RangeSet,
    ) -> MutationResult {
        if values.is_empty() {
            return Ok(None);
        }
        let lower_bound = self.domain.lower_bound(store);
        let upper_bound = self.domain.upper_bound(store);

        let mut first = lower_bound;
        while first <= upper_bound && values.contains(first) {
            first = self.first_present_at_or_above(store, values.next_value_out(first));
        }
        if first > upper_bound {
            return Err(ContradictionReason::WipeOut);
        }
        // `first` survives, so the downward walk stops at the latest there.
        let mut last = upper_bound;
        while values.contains(last) {
            last = self.last_present_at_or_below(store, values.previous_value_out(last));
        }

        Ok(self.apply(store, cause, IntEventType::Remove, |domain, store, delta| {
            let mut changed = first > lower_bound || last < upper_bound;
            if first > lower_bound {
                domain.raise_lower_bound(store, first, delta);
            }
            if last < upper_bound {
                domain.lower_upper_bound(store, last, delta);
            }
            if !domain.has_enumerated_domain() {
                return changed;
            }

            for (lo, hi) in values.ranges() {
                if hi <= first || lo >= last {
                    continue;
                }
                let end = hi.min(last - 1);
                let mut value = domain.next_value(store, first.max(lo - 1));
                while value <= end {
                    let next = domain.next_value(store, value);
                    changed |= domain.remove_present(store, value, delta);
                    value = next;
                }
            }
            changed
        }))
    }

    /// Removes every value which is not a member of `values`.
    pub(crate) fn remove_all_values_but(
        &mut self,
        store: &mut ReversibleStore,
        cause: Option<Cause>,
        values: &RangeSet,
    ) -> MutationResult {
        let lower_bound = self.domain.lower_bound(store);
        let upper_bound = self.domain.upper_bound(store);

        let mut first = lower_bound;
        while first <= upper_bound && !values.contains(first) {
            first = self.first_present_at_or_above(store, values.next_value(first));
        }
        if first > upper_bound {
            return Err(ContradictionReason::WipeOut);
        }
        let mut last = upper_bound;
        while !values.contains(last) {
            last = self.last_present_at_or_below(store, values.previous_value(last));
        }

        Ok(self.apply(store, cause, IntEventType::Remove, |domain, store, delta| {
            let mut changed = first > lower_bound || last < upper_bound;
            if first > lower_bound {
                domain.raise_lower_bound(store, first, delta);
            }
            if last < upper_bound {
                domain.lower_upper_bound(store, last, delta);
            }
            if !domain.has_enumerated_domain() {
                return changed;
            }

            let mut value = domain.next_value(store, first);
            while value < last {
                if values.contains(value) {
                    value = domain.next_value(store, values.next_value_out(value) - 1);
                } else {
                    let next = domain.next_value(store, value);
                    changed |= domain.remove_present(store, value, delta);
                    value = next;
                }
            }
            changed
        }))
    }

    /// Empties the domain, which is always a contradiction.
    pub(crate) fn wipe_out(&self) -> MutationResult {
        Err(ContradictionReason::WipeOut)
    }
}
