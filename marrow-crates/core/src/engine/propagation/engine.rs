use log::debug;
use log::trace;

use super::EnqueueDecision;
use super::NotificationContext;
use super::PropagationContext;
use super::Propagator;
use super::PropagatorHandle;
use super::PropagatorId;
use super::PropagatorQueue;
use super::PropagatorStore;
use crate::basic_types::Cause;
use crate::basic_types::PropagationStatus;
use crate::engine::notifications::NotificationEngine;
use crate::engine::variables::VariableStore;
use crate::engine::EngineStatistics;

/// Runs the scheduled propagators until none is left or one of them fails.
#[derive(Debug, Default)]
pub(crate) struct PropagationEngine {
    propagators: PropagatorStore,
    queue: PropagatorQueue,
}

impl PropagationEngine {
    pub(crate) fn propagators(&self) -> &PropagatorStore {
        &self.propagators
    }

    pub(crate) fn propagators_mut(&mut self) -> &mut PropagatorStore {
        &mut self.propagators
    }

    pub(crate) fn next_id(&self) -> PropagatorId {
        self.propagators.next_id()
    }

    /// Stores the propagator and schedules its first call.
    pub(crate) fn add<P: Propagator>(&mut self, propagator: P) -> PropagatorHandle<P> {
        let priority = propagator.priority();
        let handle = self.propagators.add(propagator);
        self.queue.enqueue_propagator(handle.id(), priority);
        handle
    }

    pub(crate) fn is_scheduled(&self, propagator: PropagatorId) -> bool {
        self.queue.is_propagator_enqueued(propagator)
    }

    pub(crate) fn clear_queue(&mut self) {
        self.queue.clear();
    }

    /// Installs `queue` and returns the one it replaces.
    pub(crate) fn swap_queue(&mut self, queue: PropagatorQueue) -> PropagatorQueue {
        std::mem::replace(&mut self.queue, queue)
    }

    /// Delivers the pending notifications and schedules the propagators which ask for it.
    fn flush(&mut self, variables: &VariableStore, notifications: &mut NotificationEngine) {
        if !notifications.has_pending() {
            return;
        }
        for (propagator_var, event) in notifications.take_pending() {
            let propagator = &mut self.propagators[propagator_var.propagator];
            let decision = propagator.notify(
                NotificationContext::new(variables),
                propagator_var.variable,
                event,
            );
            if decision == EnqueueDecision::Enqueue {
                let priority = propagator.priority();
                self.queue
                    .enqueue_propagator(propagator_var.propagator, priority);
            }
        }
    }

    /// Propagates to a fix-point.
    ///
    /// On a contradiction the queue and the undelivered notifications are dropped; the domains
    /// keep the state reached so far until the enclosing world is popped.
    pub(crate) fn propagate(
        &mut self,
        variables: &mut VariableStore,
        notifications: &mut NotificationEngine,
        statistics: &mut EngineStatistics,
    ) -> PropagationStatus {
        self.flush(variables, notifications);

        while let Some(propagator_id) = self.queue.pop() {
            statistics.num_propagator_calls += 1;

            let propagator = &mut self.propagators[propagator_id];
            trace!("propagating {} ({propagator_id})", propagator.name());
            let cause = Cause::new(propagator_id, propagator.react_on_promotion());
            let context = PropagationContext::new(variables, notifications, Some(cause));

            if let Err(contradiction) = propagator.propagate(context) {
                statistics.num_contradictions += 1;
                debug!("{} failed: {contradiction}", propagator.name());
                notifications.clear_pending();
                self.queue.clear();
                return Err(contradiction);
            }

            self.flush(variables, notifications);
        }

        Ok(())
    }
}
