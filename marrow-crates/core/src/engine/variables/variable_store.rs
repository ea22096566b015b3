use std::fmt;
use std::fmt::Display;

use log::debug;

use super::domains::Domain;
use super::AffineView;
use super::IntVariable;
use super::IntegerVariable;
use super::VarId;
use super::VariableRef;
use super::ViewId;
use crate::containers::KeyedVec;
use crate::engine::delta::DeltaLog;
use crate::engine::reversible::ReversibleStore;

/// Number of values printed before a domain is abbreviated.
const DISPLAYED_VALUES: usize = 6;

/// Owns the reversible store together with every variable and view allocated in it.
///
/// This is the read-only face of the model handed to propagators, delta monitors and variable
/// monitors: every read of an [`IntegerVariable`] takes it.
#[derive(Debug, Default)]
pub struct VariableStore {
    store: ReversibleStore,
    variables: KeyedVec<VarId, IntVariable>,
    views: KeyedVec<ViewId, AffineView>,
}

impl VariableStore {
    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    pub fn num_views(&self) -> usize {
        self.views.len()
    }

    pub fn variables(&self) -> impl Iterator<Item = VarId> {
        self.variables.keys()
    }

    pub fn name(&self, variable: VarId) -> &str {
        self.variables[variable].name()
    }

    /// The source variable of a view.
    pub fn source(&self, view: ViewId) -> VarId {
        self.views[view].source()
    }

    /// Displays the domain of a variable or a view, e.g. `x = {1,4,5}`.
    pub fn display<Var: IntegerVariable>(&self, variable: Var) -> DomainDisplay<'_, Var> {
        DomainDisplay {
            variables: self,
            variable,
        }
    }

    /// The reversible store the domains live in.
    pub fn reversible(&self) -> &ReversibleStore {
        &self.store
    }

    pub(crate) fn reversible_mut(&mut self) -> &mut ReversibleStore {
        &mut self.store
    }

    pub(crate) fn new_variable(
        &mut self,
        name: String,
        create_domain: impl FnOnce(&mut ReversibleStore) -> Domain,
    ) -> VarId {
        let domain = create_domain(&mut self.store);
        self.variables.push(IntVariable::new(name, domain))
    }

    pub(crate) fn new_view(&mut self, view: AffineView) -> ViewId {
        self.views.push(view)
    }

    pub(crate) fn view(&self, view: ViewId) -> &AffineView {
        &self.views[view]
    }

    pub(crate) fn read<T>(
        &self,
        variable: VarId,
        read: impl FnOnce(&Domain, &ReversibleStore) -> T,
    ) -> T {
        read(self.variables[variable].domain(), &self.store)
    }

    pub(crate) fn modify<T>(
        &mut self,
        variable: VarId,
        modify: impl FnOnce(&mut IntVariable, &mut ReversibleStore) -> T,
    ) -> T {
        modify(&mut self.variables[variable], &mut self.store)
    }

    pub(crate) fn timestamp(&self) -> u64 {
        self.store.timestamp()
    }

    pub(crate) fn delta_log(&self, variable: VarId) -> Option<&DeltaLog> {
        self.variables[variable].delta()
    }

    pub(crate) fn create_delta(&mut self, variable: VarId) {
        let timestamp = self.store.timestamp();
        self.variables[variable].create_delta(timestamp);
    }

    pub(crate) fn clear_deltas(&mut self) {
        self.variables
            .iter_mut()
            .for_each(|variable| variable.clear_delta());
    }

    /// Sets the delta logs aside, leaving empty ones in their place.
    pub(crate) fn stash_deltas(&mut self) -> StashedDeltas {
        StashedDeltas {
            timestamp: self.store.timestamp(),
            logs: self
                .variables
                .iter_mut()
                .map(IntVariable::stash_delta)
                .collect(),
        }
    }

    /// Puts back the delta logs set aside by [`VariableStore::stash_deltas`], dropping whatever
    /// was recorded in the meantime.
    pub(crate) fn restore_deltas(&mut self, stashed: StashedDeltas) {
        let timestamp = self.store.timestamp();
        for (variable, log) in self.variables.iter_mut().zip(stashed.logs) {
            if let Some(log) = log {
                variable.restore_delta(log, stashed.timestamp, timestamp);
            }
        }
    }

    pub(crate) fn world_index(&self) -> usize {
        self.store.world_index()
    }

    pub(crate) fn push_world(&mut self) {
        self.store.push_world();
        debug!("pushed world {}", self.store.world_index());
    }

    pub(crate) fn pop_to_world(&mut self, world: usize) {
        debug!("popping world {} to {world}", self.store.world_index());
        self.store.pop_to_world(world);
    }
}

/// Delta logs set aside by [`VariableStore::stash_deltas`].
#[derive(Debug)]
pub(crate) struct StashedDeltas {
    timestamp: u64,
    logs: Vec<Option<DeltaLog>>,
}

/// See [`VariableStore::display`].
#[derive(Debug)]
pub struct DomainDisplay<'a, Var> {
    variables: &'a VariableStore,
    variable: Var,
}

impl<Var: IntegerVariable> Display for DomainDisplay<'_, Var> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let variables = self.variables;
        match self.variable.into() {
            VariableRef::Variable(variable) => write!(f, "{} = ", variables.name(variable))?,
            VariableRef::View(view) => write!(f, "{:?} = ", variables.view(view))?,
        }

        let lower_bound = self.variable.lower_bound(variables);
        let upper_bound = self.variable.upper_bound(variables);
        if lower_bound == upper_bound {
            return write!(f, "{lower_bound}");
        }
        if !self.variable.has_enumerated_domain(variables) {
            return write!(f, "[{lower_bound},{upper_bound}]");
        }

        write!(f, "{{{lower_bound}")?;
        let mut value = self.variable.next_value(variables, lower_bound);
        let mut written = 1;
        while value <= upper_bound && written < DISPLAYED_VALUES {
            write!(f, ",{value}")?;
            written += 1;
            value = self.variable.next_value(variables, value);
        }
        if value <= upper_bound {
            write!(f, "...,{upper_bound}")?;
        }
        write!(f, "}}")
    }
}
