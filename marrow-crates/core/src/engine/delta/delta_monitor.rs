use super::Removal;
use crate::engine::propagation::PropagatorId;
use crate::engine::variables::VarId;
use crate::engine::variables::VariableStore;

/// A read cursor over the delta log of one variable.
///
/// Reading happens in three steps: [`DeltaMonitor::freeze`] fixes the window of removals that
/// are read, [`DeltaMonitor::for_each_removed`] visits the window, and
/// [`DeltaMonitor::unfreeze`] moves the cursor past it. Removals caused by the owner of the
/// monitor are skipped, the owner already knows about them.
///
/// Monitors never modify the log, so any number of them can follow the same variable.
#[derive(Debug, Clone)]
pub struct DeltaMonitor {
    variable: VarId,
    owner: Option<PropagatorId>,
    generation: u64,
    first: usize,
    last: usize,
}

impl DeltaMonitor {
    pub(crate) fn new(variable: VarId, owner: Option<PropagatorId>) -> DeltaMonitor {
        DeltaMonitor {
            variable,
            owner,
            generation: 0,
            first: 0,
            last: 0,
        }
    }

    pub fn variable(&self) -> VarId {
        self.variable
    }

    fn visible<'a>(&self, variables: &'a VariableStore) -> (u64, &'a [Removal]) {
        variables
            .delta_log(self.variable)
            .map(|log| log.visible(variables.timestamp()))
            .unwrap_or((self.generation, &[]))
    }

    /// Fixes the end of the window to the current end of the log.
    pub fn freeze(&mut self, variables: &VariableStore) {
        let (generation, removals) = self.visible(variables);
        if generation != self.generation {
            self.generation = generation;
            self.first = 0;
        }
        self.last = removals.len();
    }

    /// Moves the cursor past the frozen window.
    pub fn unfreeze(&mut self) {
        self.first = self.last;
    }

    /// Visits the values removed inside the frozen window, except those removed by the owner.
    pub fn for_each_removed(&self, variables: &VariableStore, action: impl FnMut(i32)) {
        self.removed_values(variables).for_each(action)
    }

    /// The values removed inside the frozen window, except those removed by the owner.
    pub fn removed_values<'a>(
        &self,
        variables: &'a VariableStore,
    ) -> impl Iterator<Item = i32> + 'a {
        let (generation, removals) = self.visible(variables);
        let window = if generation == self.generation {
            &removals[self.first.min(removals.len())..self.last.min(removals.len())]
        } else {
            &[]
        };
        let owner = self.owner;
        window
            .iter()
            .filter(move |removal| {
                owner.is_none() || removal.cause.map(|cause| cause.propagator()) != owner
            })
            .map(|removal| removal.value)
    }
}
