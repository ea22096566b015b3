use crate::containers::HashSet;
use crate::engine::events::IntEventType;
use crate::engine::propagation::PropagatorVarId;
use crate::engine::variables::VarId;

/// The state of one level of dispatching: the propagator notifications which still have to be
/// delivered, and optionally the set of variables modified so far.
///
/// A hypothesis swaps in a fresh context, which isolates its notifications from those of the
/// surrounding propagation.
#[derive(Debug, Default)]
pub(crate) struct DispatchContext {
    pending: Vec<(PropagatorVarId, IntEventType)>,
    modified: Option<HashSet<VarId>>,
}

impl DispatchContext {
    /// A context which records every modified variable.
    pub(crate) fn recording() -> DispatchContext {
        DispatchContext {
            pending: Vec::new(),
            modified: Some(HashSet::default()),
        }
    }

    pub(crate) fn push_pending(&mut self, propagator_var: PropagatorVarId, event: IntEventType) {
        self.pending.push((propagator_var, event));
    }

    pub(crate) fn record_modified(&mut self, variable: VarId) {
        if let Some(modified) = self.modified.as_mut() {
            let _ = modified.insert(variable);
        }
    }

    pub(crate) fn take_pending(&mut self) -> Vec<(PropagatorVarId, IntEventType)> {
        std::mem::take(&mut self.pending)
    }

    pub(crate) fn clear_pending(&mut self) {
        self.pending.clear();
    }

    pub(crate) fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    pub(crate) fn into_modified(self) -> HashSet<VarId> {
        self.modified.unwrap_or_default()
    }
}
