use super::LocalId;
use super::Propagator;
use super::PropagatorId;
use super::PropagatorVarId;
use crate::engine::delta::DeltaMonitor;
use crate::engine::events::DomainEvents;
use crate::engine::notifications::NotificationEngine;
use crate::engine::reversible::ReversibleStore;
use crate::engine::variables::IntegerVariable;
use crate::engine::variables::VarId;
use crate::engine::variables::VariableStore;

/// Creates a fully initialised [`Propagator`].
///
/// The constructor declares the events on which the propagator is scheduled, and can read the
/// domains or allocate reversible state while doing so.
pub trait PropagatorConstructor {
    /// The propagator produced by this constructor.
    type PropagatorImpl: Propagator;

    fn create(self, context: PropagatorConstructorContext<'_>) -> Self::PropagatorImpl;
}

/// Handed to a [`PropagatorConstructor`] by
/// [`Model::post`](crate::engine::model::Model::post).
#[derive(Debug)]
pub struct PropagatorConstructorContext<'a> {
    variables: &'a mut VariableStore,
    notifications: &'a mut NotificationEngine,
    propagator_id: PropagatorId,
}

impl<'a> PropagatorConstructorContext<'a> {
    pub(crate) fn new(
        variables: &'a mut VariableStore,
        notifications: &'a mut NotificationEngine,
        propagator_id: PropagatorId,
    ) -> Self {
        PropagatorConstructorContext {
            variables,
            notifications,
            propagator_id,
        }
    }

    pub fn variables(&self) -> &VariableStore {
        self.variables
    }

    /// The id the propagator will be stored under.
    pub fn propagator_id(&self) -> PropagatorId {
        self.propagator_id
    }

    /// Subscribes the propagator to the given [`DomainEvents`] of `var`.
    ///
    /// [`Propagator::notify`] receives `local_id` to identify the variable; each variable of a
    /// propagator should have its own [`LocalId`].
    pub fn register(
        &mut self,
        var: impl IntegerVariable,
        domain_events: DomainEvents,
        local_id: LocalId,
    ) {
        let propagator_var = PropagatorVarId {
            propagator: self.propagator_id,
            variable: local_id,
        };
        self.notifications
            .subscribe(var.into(), propagator_var, domain_events);
    }

    /// Starts recording the removals of `var` and returns a cursor over them which skips the
    /// removals of this propagator.
    pub fn create_delta_monitor(&mut self, var: VarId) -> DeltaMonitor {
        self.variables.create_delta(var);
        DeltaMonitor::new(var, Some(self.propagator_id))
    }

    /// The store in which the propagator can allocate state that is undone on backtracking.
    pub fn reversible_mut(&mut self) -> &mut ReversibleStore {
        self.variables.reversible_mut()
    }
}
