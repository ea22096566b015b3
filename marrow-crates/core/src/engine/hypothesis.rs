//! Tentative propagation under a scoped inner dispatch context.
//!
//! A hypothesis sets the delta logs aside, opens a world and a fresh [`DispatchContext`] which
//! records every modified variable, runs the hypothesis, and then restores the outer context,
//! pops the world and puts the delta logs back. The restoration happens when the scope is
//! dropped, so it also takes place when the hypothesis fails or panics.
use super::model::Model;
use super::notifications::DispatchContext;
use super::notifications::NotificationEngine;
use super::propagation::PropagationContext;
use super::propagation::PropagationEngine;
use super::propagation::PropagatorQueue;
use super::variables::StashedDeltas;
use super::variables::VarId;
use super::variables::VariableStore;
use super::EngineStatistics;
use crate::basic_types::Cause;
use crate::basic_types::Contradiction;
use crate::basic_types::PropagationStatus;
use crate::containers::HashSet;

/// The outcome of a hypothesis together with the variables it modified.
///
/// The modifications themselves are undone by the time the result is returned.
#[derive(Debug)]
pub struct HypothesisResult<R> {
    pub outcome: Result<R, Contradiction>,
    pub modified: HashSet<VarId>,
}

impl<R> HypothesisResult<R> {
    pub fn is_contradiction(&self) -> bool {
        self.outcome.is_err()
    }
}

/// Holds the outer dispatch context and delta logs, and the outer queue when propagators run,
/// while the inner ones are installed.
struct Scope<'a> {
    variables: &'a mut VariableStore,
    notifications: &'a mut NotificationEngine,
    engine: Option<&'a mut PropagationEngine>,
    world: usize,
    outer: Option<(DispatchContext, PropagatorQueue, StashedDeltas)>,
}

impl<'a> Scope<'a> {
    fn enter(
        variables: &'a mut VariableStore,
        notifications: &'a mut NotificationEngine,
        mut engine: Option<&'a mut PropagationEngine>,
    ) -> Self {
        let world = variables.world_index();
        let outer_deltas = variables.stash_deltas();
        variables.push_world();
        let outer_context = notifications.swap_context(DispatchContext::recording());
        let outer_queue = engine
            .as_deref_mut()
            .map(|engine| engine.swap_queue(PropagatorQueue::default()))
            .unwrap_or_default();
        Scope {
            variables,
            notifications,
            engine,
            world,
            outer: Some((outer_context, outer_queue, outer_deltas)),
        }
    }

    fn context(&mut self, cause: Option<Cause>) -> PropagationContext<'_> {
        PropagationContext::new(self.variables, self.notifications, cause)
    }

    fn propagate(&mut self, statistics: &mut EngineStatistics) -> PropagationStatus {
        match self.engine.as_deref_mut() {
            Some(engine) => engine.propagate(self.variables, self.notifications, statistics),
            None => Ok(()),
        }
    }

    /// Restores the outer context and returns what the inner one recorded; only the first call
    /// does anything.
    fn leave(&mut self) -> HashSet<VarId> {
        let Some((outer_context, outer_queue, outer_deltas)) = self.outer.take() else {
            return HashSet::default();
        };
        let inner_context = self.notifications.swap_context(outer_context);
        if let Some(engine) = self.engine.as_deref_mut() {
            let _ = engine.swap_queue(outer_queue);
        }
        self.variables.pop_to_world(self.world);
        self.variables.restore_deltas(outer_deltas);
        inner_context.into_modified()
    }
}

impl Drop for Scope<'_> {
    fn drop(&mut self) {
        let _ = self.leave();
    }
}

impl Model {
    /// Tries `hypothesis` followed by a fix-point of the propagators it triggers, and undoes
    /// both.
    ///
    /// The propagators scheduled before the call stay scheduled, and the notifications and delta
    /// removals of the outer context are neither delivered nor lost.
    pub fn try_hypothesis<R>(
        &mut self,
        hypothesis: impl FnOnce(&mut PropagationContext<'_>) -> Result<R, Contradiction>,
    ) -> HypothesisResult<R> {
        let (variables, notifications, engine, statistics) = self.parts();
        let mut scope = Scope::enter(variables, notifications, Some(engine));

        let outcome = hypothesis(&mut scope.context(None));
        let outcome = match outcome {
            Ok(value) => scope.propagate(statistics).map(|_| value),
            Err(contradiction) => Err(contradiction),
        };
        HypothesisResult {
            outcome,
            modified: scope.leave(),
        }
    }
}

impl PropagationContext<'_> {
    /// Tries `hypothesis` under the cause of this context and undoes it, reporting which
    /// variables it modified.
    ///
    /// Only the hypothesis itself runs; no propagator is called. This lets a propagator explore
    /// the consequences of a choice, e.g. each alternative of a disjunction.
    pub fn try_hypothesis<R>(
        &mut self,
        hypothesis: impl FnOnce(&mut PropagationContext<'_>) -> Result<R, Contradiction>,
    ) -> HypothesisResult<R> {
        let cause = self.cause();
        let (variables, notifications) = self.parts();
        let mut scope = Scope::enter(variables, notifications, None);

        let outcome = hypothesis(&mut scope.context(cause));
        HypothesisResult {
            outcome,
            modified: scope.leave(),
        }
    }
}
