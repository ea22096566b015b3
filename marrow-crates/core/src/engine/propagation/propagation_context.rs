use log::debug;
use log::trace;

use crate::basic_types::Cause;
use crate::basic_types::Contradiction;
use crate::basic_types::ContradictionReason;
use crate::basic_types::PropagationStatus;
use crate::containers::RangeSet;
use crate::engine::notifications::NotificationEngine;
use crate::engine::reversible::ReversibleStore;
use crate::engine::variables::IntVariable;
use crate::engine::variables::IntegerVariable;
use crate::engine::variables::MutationResult;
use crate::engine::variables::VarId;
use crate::engine::variables::VariableStore;

/// Provided to [`Propagator::notify`](super::Propagator::notify); domains can be read but not
/// modified.
#[derive(Debug, Clone, Copy)]
pub struct NotificationContext<'a> {
    variables: &'a VariableStore,
}

impl<'a> NotificationContext<'a> {
    pub(crate) fn new(variables: &'a VariableStore) -> Self {
        NotificationContext { variables }
    }

    pub fn variables(&self) -> &'a VariableStore {
        self.variables
    }
}

/// The access point to the domains during propagation.
///
/// Every mutation made through a context is attributed to its cause: the propagator being run,
/// or no one for the contexts handed out by the [`Model`](crate::engine::model::Model). A
/// mutation which changes a domain dispatches its event before returning; the subscribed
/// monitors are called immediately, propagators are scheduled once the current propagator
/// returns.
#[derive(Debug)]
pub struct PropagationContext<'a> {
    variables: &'a mut VariableStore,
    notifications: &'a mut NotificationEngine,
    cause: Option<Cause>,
}

impl<'a> PropagationContext<'a> {
    pub(crate) fn new(
        variables: &'a mut VariableStore,
        notifications: &'a mut NotificationEngine,
        cause: Option<Cause>,
    ) -> Self {
        PropagationContext {
            variables,
            notifications,
            cause,
        }
    }

    /// A context with a shorter lifetime, for passing it on while still needing it afterwards.
    pub fn reborrow(&mut self) -> PropagationContext<'_> {
        PropagationContext {
            variables: self.variables,
            notifications: self.notifications,
            cause: self.cause,
        }
    }

    pub fn variables(&self) -> &VariableStore {
        self.variables
    }

    /// The cause every mutation of this context is attributed to.
    pub fn cause(&self) -> Option<Cause> {
        self.cause
    }

    /// The store holding the reversible state of propagators.
    pub fn reversible_mut(&mut self) -> &mut ReversibleStore {
        self.variables.reversible_mut()
    }

    /// A contradiction declared by the propagator itself, with a human readable reason.
    pub fn fail(&self, message: impl Into<String>) -> Contradiction {
        let contradiction = Contradiction::from_propagator(self.cause, message);
        debug!("{contradiction}");
        contradiction
    }

    pub(crate) fn parts(&mut self) -> (&mut VariableStore, &mut NotificationEngine) {
        (&mut *self.variables, &mut *self.notifications)
    }

    /// Runs a mutation on `variable` and dispatches its event.
    pub(crate) fn apply(
        &mut self,
        variable: VarId,
        mutation: impl FnOnce(
            &mut IntVariable,
            &mut ReversibleStore,
            Option<Cause>,
        ) -> MutationResult,
    ) -> Result<bool, Contradiction> {
        let cause = self.cause;
        match self
            .variables
            .modify(variable, |int_variable, store| mutation(int_variable, store, cause))
        {
            Ok(None) => Ok(false),
            Ok(Some(modification)) => {
                trace!(
                    "{} after {} by {cause:?}",
                    self.variables.display(variable),
                    modification.event,
                );
                self.notifications
                    .dispatch(self.variables, variable, modification);
                Ok(true)
            }
            Err(reason) => Err(self.contradiction_on(variable, reason)),
        }
    }

    pub(crate) fn contradiction_on(
        &self,
        variable: VarId,
        reason: ContradictionReason,
    ) -> Contradiction {
        debug!(
            "contradiction on {} by {:?}: {reason}",
            self.variables.name(variable),
            self.cause
        );
        Contradiction::on_variable(variable, self.cause, reason)
    }

    pub fn lower_bound<Var: IntegerVariable>(&self, var: &Var) -> i32 {
        var.lower_bound(self.variables)
    }

    pub fn upper_bound<Var: IntegerVariable>(&self, var: &Var) -> i32 {
        var.upper_bound(self.variables)
    }

    pub fn size<Var: IntegerVariable>(&self, var: &Var) -> usize {
        var.size(self.variables)
    }

    pub fn contains<Var: IntegerVariable>(&self, var: &Var, value: i32) -> bool {
        var.contains(self.variables, value)
    }

    pub fn is_instantiated<Var: IntegerVariable>(&self, var: &Var) -> bool {
        var.is_instantiated(self.variables)
    }

    pub fn remove_value<Var: IntegerVariable>(
        &mut self,
        var: &Var,
        value: i32,
    ) -> Result<bool, Contradiction> {
        var.remove_value(self, value)
    }

    pub fn remove_interval<Var: IntegerVariable>(
        &mut self,
        var: &Var,
        from: i32,
        to: i32,
    ) -> Result<bool, Contradiction> {
        var.remove_interval(self, from, to)
    }

    pub fn update_lower_bound<Var: IntegerVariable>(
        &mut self,
        var: &Var,
        value: i32,
    ) -> Result<bool, Contradiction> {
        var.update_lower_bound(self, value)
    }

    pub fn update_upper_bound<Var: IntegerVariable>(
        &mut self,
        var: &Var,
        value: i32,
    ) -> Result<bool, Contradiction> {
        var.update_upper_bound(self, value)
    }

    pub fn update_bounds<Var: IntegerVariable>(
        &mut self,
        var: &Var,
        lower: i32,
        upper: i32,
    ) -> Result<bool, Contradiction> {
        var.update_bounds(self, lower, upper)
    }

    pub fn instantiate_to<Var: IntegerVariable>(
        &mut self,
        var: &Var,
        value: i32,
    ) -> Result<bool, Contradiction> {
        var.instantiate_to(self, value)
    }

    pub fn remove_values<Var: IntegerVariable>(
        &mut self,
        var: &Var,
        values: &RangeSet,
    ) -> Result<bool, Contradiction> {
        var.remove_values(self, values)
    }

    pub fn remove_all_values_but<Var: IntegerVariable>(
        &mut self,
        var: &Var,
        values: &RangeSet,
    ) -> Result<bool, Contradiction> {
        var.remove_all_values_but(self, values)
    }

    pub fn wipe_out<Var: IntegerVariable>(&mut self, var: &Var) -> PropagationStatus {
        var.wipe_out(self)
    }
}
