use std::fmt::Debug;

use super::IntegerDomain;
use super::RangeIterator;
use super::ValueIterator;
use super::VarId;
use super::VariableRef;
use super::VariableStore;
use super::ViewId;
use crate::basic_types::Contradiction;
use crate::basic_types::PropagationStatus;
use crate::containers::RangeSet;
use crate::engine::propagation::PropagationContext;

/// A trait specifying the required behaviour of an integer variable, implemented by the variables
/// of a [`Model`](crate::engine::model::Model) and by the views over them.
///
/// Reads only need the [`VariableStore`]. Writes go through a [`PropagationContext`], which
/// carries the cause of the mutation and dispatches the resulting event; they return whether the
/// domain changed, or the [`Contradiction`] which the mutation would have caused. A failed
/// mutation leaves the domain untouched.
///
/// Propagators usually call the forwarding methods of the context, e.g.
/// [`PropagationContext::update_lower_bound`].
pub trait IntegerVariable: Copy + Debug + Into<VariableRef> {
    /// Get the lower bound of the variable.
    fn lower_bound(&self, variables: &VariableStore) -> i32;

    /// Get the upper bound of the variable.
    fn upper_bound(&self, variables: &VariableStore) -> i32;

    /// The number of values in the domain.
    fn size(&self, variables: &VariableStore) -> usize;

    /// Determine whether the value is in the domain of this variable.
    fn contains(&self, variables: &VariableStore, value: i32) -> bool;

    /// The smallest value of the domain strictly greater than `value`, `i32::MAX` if there is
    /// none.
    fn next_value(&self, variables: &VariableStore, value: i32) -> i32;

    /// The largest value of the domain strictly smaller than `value`, `i32::MIN` if there is none.
    fn previous_value(&self, variables: &VariableStore, value: i32) -> i32;

    /// The smallest value strictly greater than `value` which is not in the domain.
    fn next_value_out(&self, variables: &VariableStore, value: i32) -> i32;

    /// The largest value strictly smaller than `value` which is not in the domain.
    fn previous_value_out(&self, variables: &VariableStore, value: i32) -> i32;

    /// Whether the domain can have holes.
    fn has_enumerated_domain(&self, variables: &VariableStore) -> bool;

    fn is_instantiated(&self, variables: &VariableStore) -> bool {
        self.size(variables) == 1
    }

    fn is_instantiated_to(&self, variables: &VariableStore, value: i32) -> bool {
        self.is_instantiated(variables) && self.lower_bound(variables) == value
    }

    /// The value of an instantiated variable.
    fn value(&self, variables: &VariableStore) -> Option<i32> {
        self.is_instantiated(variables)
            .then(|| self.lower_bound(variables))
    }

    /// The width of the hull of the domain, `upper_bound - lower_bound + 1`.
    fn range(&self, variables: &VariableStore) -> usize {
        (i64::from(self.upper_bound(variables)) - i64::from(self.lower_bound(variables)) + 1)
            as usize
    }

    /// Iterate over the values of the domain, from the lower bound when `bottom_up`.
    fn values<'a>(&self, variables: &'a VariableStore, bottom_up: bool) -> ValueIterator<'a, Self> {
        ValueIterator::new(variables, *self, bottom_up)
    }

    /// Iterate over the maximal intervals of the domain, from the lower bound when `bottom_up`.
    fn ranges<'a>(&self, variables: &'a VariableStore, bottom_up: bool) -> RangeIterator<'a, Self> {
        RangeIterator::new(variables, *self, bottom_up)
    }

    /// Removes `value`; removing the last value is a contradiction.
    fn remove_value(
        &self,
        context: &mut PropagationContext<'_>,
        value: i32,
    ) -> Result<bool, Contradiction>;

    /// Removes the values in `[from, to]`.
    fn remove_interval(
        &self,
        context: &mut PropagationContext<'_>,
        from: i32,
        to: i32,
    ) -> Result<bool, Contradiction>;

    fn update_lower_bound(
        &self,
        context: &mut PropagationContext<'_>,
        value: i32,
    ) -> Result<bool, Contradiction>;

    fn update_upper_bound(
        &self,
        context: &mut PropagationContext<'_>,
        value: i32,
    ) -> Result<bool, Contradiction>;

    /// Tightens both bounds at once.
    fn update_bounds(
        &self,
        context: &mut PropagationContext<'_>,
        lower: i32,
        upper: i32,
    ) -> Result<bool, Contradiction>;

    fn instantiate_to(
        &self,
        context: &mut PropagationContext<'_>,
        value: i32,
    ) -> Result<bool, Contradiction>;

    /// Removes every member of `values`.
    fn remove_values(
        &self,
        context: &mut PropagationContext<'_>,
        values: &RangeSet,
    ) -> Result<bool, Contradiction>;

    /// Removes every value which is not a member of `values`.
    fn remove_all_values_but(
        &self,
        context: &mut PropagationContext<'_>,
        values: &RangeSet,
    ) -> Result<bool, Contradiction>;

    /// Empties the domain, which always fails.
    fn wipe_out(&self, context: &mut PropagationContext<'_>) -> PropagationStatus;
}

impl IntegerVariable for VarId {
    fn lower_bound(&self, variables: &VariableStore) -> i32 {
        variables.read(*self, |domain, store| domain.lower_bound(store))
    }

    fn upper_bound(&self, variables: &VariableStore) -> i32 {
        variables.read(*self, |domain, store| domain.upper_bound(store))
    }

    fn size(&self, variables: &VariableStore) -> usize {
        variables.read(*self, |domain, store| domain.size(store))
    }

    fn contains(&self, variables: &VariableStore, value: i32) -> bool {
        variables.read(*self, |domain, store| domain.contains(store, value))
    }

    fn next_value(&self, variables: &VariableStore, value: i32) -> i32 {
        variables.read(*self, |domain, store| domain.next_value(store, value))
    }

    fn previous_value(&self, variables: &VariableStore, value: i32) -> i32 {
        variables.read(*self, |domain, store| domain.previous_value(store, value))
    }

    fn next_value_out(&self, variables: &VariableStore, value: i32) -> i32 {
        variables.read(*self, |domain, store| domain.next_value_out(store, value))
    }

    fn previous_value_out(&self, variables: &VariableStore, value: i32) -> i32 {
        variables.read(*self, |domain, store| {
            domain.previous_value_out(store, value)
        })
    }

    fn has_enumerated_domain(&self, variables: &VariableStore) -> bool {
        variables.read(*self, |domain, _| domain.has_enumerated_domain())
    }

    fn remove_value(
        &self,
        context: &mut PropagationContext<'_>,
        value: i32,
    ) -> Result<bool, Contradiction> {
        context.apply(*self, |variable, store, cause| {
            variable.remove_value(store, cause, value)
        })
    }

    fn remove_interval(
        &self,
        context: &mut PropagationContext<'_>,
        from: i32,
        to: i32,
    ) -> Result<bool, Contradiction> {
        context.apply(*self, |variable, store, cause| {
            variable.remove_interval(store, cause, from, to)
        })
    }

    fn update_lower_bound(
        &self,
        context: &mut PropagationContext<'_>,
        value: i32,
    ) -> Result<bool, Contradiction> {
        context.apply(*self, |variable, store, cause| {
            variable.update_lower_bound(store, cause, value)
        })
    }

    fn update_upper_bound(
        &self,
        context: &mut PropagationContext<'_>,
        value: i32,
    ) -> Result<bool, Contradiction> {
        context.apply(*self, |variable, store, cause| {
            variable.update_upper_bound(store, cause, value)
        })
    }

    fn update_bounds(
        &self,
        context: &mut PropagationContext<'_>,
        lower: i32,
        upper: i32,
    ) -> Result<bool, Contradiction> {
        context.apply(*self, |variable, store, cause| {
            variable.update_bounds(store, cause, lower, upper)
        })
    }

    fn instantiate_to(
        &self,
        context: &mut PropagationContext<'_>,
        value: i32,
    ) -> Result<bool, Contradiction> {
        context.apply(*self, |variable, store, cause| {
            variable.instantiate_to(store, cause, value)
        })
    }

    fn remove_values(
        &self,
        context: &mut PropagationContext<'_>,
        values: &RangeSet,
    ) -> Result<bool, Contradiction> {
        context.apply(*self, |variable, store, cause| {
            variable.remove_values(store, cause, values)
        })
    }

    fn remove_all_values_but(
        &self,
        context: &mut PropagationContext<'_>,
        values: &RangeSet,
    ) -> Result<bool, Contradiction> {
        context.apply(*self, |variable, store, cause| {
            variable.remove_all_values_but(store, cause, values)
        })
    }

    fn wipe_out(&self, context: &mut PropagationContext<'_>) -> PropagationStatus {
        context
            .apply(*self, |variable, _, _| variable.wipe_out())
            .map(|_| ())
    }
}

impl IntegerVariable for ViewId {
    fn lower_bound(&self, variables: &VariableStore) -> i32 {
        variables.view(*self).lower_bound(variables)
    }

    fn upper_bound(&self, variables: &VariableStore) -> i32 {
        variables.view(*self).upper_bound(variables)
    }

    fn size(&self, variables: &VariableStore) -> usize {
        variables.view(*self).size(variables)
    }

    fn contains(&self, variables: &VariableStore, value: i32) -> bool {
        variables.view(*self).contains(variables, value)
    }

    fn next_value(&self, variables: &VariableStore, value: i32) -> i32 {
        variables.view(*self).next_value(variables, value)
    }

    fn previous_value(&self, variables: &VariableStore, value: i32) -> i32 {
        variables.view(*self).previous_value(variables, value)
    }

    fn next_value_out(&self, variables: &VariableStore, value: i32) -> i32 {
        variables.view(*self).next_value_out(variables, value)
    }

    fn previous_value_out(&self, variables: &VariableStore, value: i32) -> i32 {
        variables.view(*self).previous_value_out(variables, value)
    }

    fn has_enumerated_domain(&self, variables: &VariableStore) -> bool {
        variables.view(*self).has_enumerated_domain(variables)
    }

    fn remove_value(
        &self,
        context: &mut PropagationContext<'_>,
        value: i32,
    ) -> Result<bool, Contradiction> {
        let view = *context.variables().view(*self);
        view.remove_value(context, value)
    }

    fn remove_interval(
        &self,
        context: &mut PropagationContext<'_>,
        from: i32,
        to: i32,
    ) -> Result<bool, Contradiction> {
        let view = *context.variables().view(*self);
        view.remove_interval(context, from, to)
    }

    fn update_lower_bound(
        &self,
        context: &mut PropagationContext<'_>,
        value: i32,
    ) -> Result<bool, Contradiction> {
        let view = *context.variables().view(*self);
        view.update_lower_bound(context, value)
    }

    fn update_upper_bound(
        &self,
        context: &mut PropagationContext<'_>,
        value: i32,
    ) -> Result<bool, Contradiction> {
        let view = *context.variables().view(*self);
        view.update_upper_bound(context, value)
    }

    fn update_bounds(
        &self,
        context: &mut PropagationContext<'_>,
        lower: i32,
        upper: i32,
    ) -> Result<bool, Contradiction> {
        let view = *context.variables().view(*self);
        view.update_bounds(context, lower, upper)
    }

    fn instantiate_to(
        &self,
        context: &mut PropagationContext<'_>,
        value: i32,
    ) -> Result<bool, Contradiction> {
        let view = *context.variables().view(*self);
        view.instantiate_to(context, value)
    }

    fn remove_values(
        &self,
        context: &mut PropagationContext<'_>,
        values: &RangeSet,
    ) -> Result<bool, Contradiction> {
        let view = *context.variables().view(*self);
        view.remove_values(context, values)
    }

    fn remove_all_values_but(
        &self,
        context: &mut PropagationContext<'_>,
        values: &RangeSet,
    ) -> Result<bool, Contradiction> {
        let view = *context.variables().view(*self);
        view.remove_all_values_but(context, values)
    }

    fn wipe_out(&self, context: &mut PropagationContext<'_>) -> PropagationStatus {
        let view = *context.variables().view(*self);
        view.wipe_out(context)
    }
}
