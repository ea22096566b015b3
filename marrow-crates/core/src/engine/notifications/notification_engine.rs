use std::fmt::Debug;

use super::DispatchContext;
use super::MonitorId;
use super::VariableMonitor;
use crate::basic_types::Cause;
use crate::containers::KeyedVec;
use crate::engine::events::DomainEvents;
use crate::engine::events::IntEventType;
use crate::engine::propagation::PropagatorVarId;
use crate::engine::variables::Modification;
use crate::engine::variables::VarId;
use crate::engine::variables::VariableRef;
use crate::engine::variables::VariableStore;
use crate::engine::variables::ViewId;

/// The subscribers of one variable or view.
#[derive(Debug, Clone, Default)]
struct Subscriptions {
    monitors: Vec<MonitorId>,
    propagators: Vec<(PropagatorVarId, DomainEvents)>,
}

impl Subscriptions {
    /// Calls the monitors, then queues a notification for every propagator whose conditions
    /// are met, except the one which caused the event.
    fn notify(
        &self,
        monitors: &mut KeyedVec<MonitorId, Box<dyn VariableMonitor>>,
        context: &mut DispatchContext,
        variables: &VariableStore,
        variable: VariableRef,
        event: IntEventType,
        cause: Option<Cause>,
    ) {
        for &monitor in &self.monitors {
            monitors[monitor].on_update(variables, variable, event, cause);
        }

        let causing_propagator = cause.map(|cause| cause.propagator());
        self.propagators
            .iter()
            .filter(|(propagator_var, conditions)| {
                conditions.is_triggered_by(event)
                    && causing_propagator != Some(propagator_var.propagator)
            })
            .for_each(|&(propagator_var, _)| context.push_pending(propagator_var, event));
    }
}

/// Delivers the events of domain mutations to the subscribers.
///
/// The subscribers of a variable are served in a fixed order: its monitors, its propagators,
/// then every view over it with the event translated by the view. Propagator notifications are
/// kept in the [`DispatchContext`] until the
/// [`PropagationEngine`](crate::engine::propagation::PropagationEngine) delivers them, since the
/// propagator which caused the event is still running.
#[derive(Default)]
pub(crate) struct NotificationEngine {
    variable_subscriptions: KeyedVec<VarId, Subscriptions>,
    view_subscriptions: KeyedVec<ViewId, Subscriptions>,
    views_of: KeyedVec<VarId, Vec<ViewId>>,
    monitors: KeyedVec<MonitorId, Box<dyn VariableMonitor>>,
    context: DispatchContext,
    last_event: Option<(VariableRef, IntEventType)>,
    num_values_pruned: u64,
}

impl NotificationEngine {
    pub(crate) fn add_view(&mut self, view: ViewId, source: VarId) {
        self.views_of.accommodate(source, Vec::new());
        self.views_of[source].push(view);
    }

    pub(crate) fn subscribe(
        &mut self,
        variable: VariableRef,
        propagator_var: PropagatorVarId,
        conditions: DomainEvents,
    ) {
        self.subscriptions_mut(variable)
            .propagators
            .push((propagator_var, conditions));
    }

    pub(crate) fn add_monitor(
        &mut self,
        variable: VariableRef,
        monitor: Box<dyn VariableMonitor>,
    ) -> MonitorId {
        let monitor_id = self.monitors.push(monitor);
        self.subscriptions_mut(variable).monitors.push(monitor_id);
        monitor_id
    }

    pub(crate) fn monitor(&self, monitor: MonitorId) -> &dyn VariableMonitor {
        self.monitors[monitor].as_ref()
    }

    pub(crate) fn monitor_mut(&mut self, monitor: MonitorId) -> &mut dyn VariableMonitor {
        self.monitors[monitor].as_mut()
    }

    fn subscriptions_mut(&mut self, variable: VariableRef) -> &mut Subscriptions {
        match variable {
            VariableRef::Variable(variable) => {
                self.variable_subscriptions
                    .accommodate(variable, Subscriptions::default());
                &mut self.variable_subscriptions[variable]
            }
            VariableRef::View(view) => {
                self.view_subscriptions
                    .accommodate(view, Subscriptions::default());
                &mut self.view_subscriptions[view]
            }
        }
    }

    /// Notifies the subscribers of `variable` and of the views over it of a modification.
    pub(crate) fn dispatch(
        &mut self,
        variables: &VariableStore,
        variable: VarId,
        modification: Modification,
    ) {
        let Modification {
            event,
            cause,
            num_removed,
        } = modification;
        self.num_values_pruned += num_removed as u64;
        self.context.record_modified(variable);
        self.last_event = Some((variable.into(), event));

        if let Some(subscriptions) = self.variable_subscriptions.get(variable) {
            subscriptions.notify(
                &mut self.monitors,
                &mut self.context,
                variables,
                variable.into(),
                event,
                cause,
            );
        }

        let Some(views) = self.views_of.get(variable) else {
            return;
        };
        for &view in views {
            if let Some(subscriptions) = self.view_subscriptions.get(view) {
                subscriptions.notify(
                    &mut self.monitors,
                    &mut self.context,
                    variables,
                    view.into(),
                    variables.view(view).translate(event),
                    cause,
                );
            }
        }
    }

    pub(crate) fn take_pending(&mut self) -> Vec<(PropagatorVarId, IntEventType)> {
        self.context.take_pending()
    }

    pub(crate) fn has_pending(&self) -> bool {
        self.context.has_pending()
    }

    pub(crate) fn clear_pending(&mut self) {
        self.context.clear_pending();
    }

    /// Installs `context` and returns the one it replaces.
    pub(crate) fn swap_context(&mut self, context: DispatchContext) -> DispatchContext {
        std::mem::replace(&mut self.context, context)
    }

    /// The variable and event of the most recent modification.
    pub(crate) fn last_event(&self) -> Option<(VariableRef, IntEventType)> {
        self.last_event
    }

    pub(crate) fn num_values_pruned(&self) -> u64 {
        self.num_values_pruned
    }
}

impl Debug for NotificationEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationEngine")
            .field("variable_subscriptions", &self.variable_subscriptions)
            .field("view_subscriptions", &self.view_subscriptions)
            .field("num_monitors", &self.monitors.len())
            .field("context", &self.context)
            .field("last_event", &self.last_event)
            .finish_non_exhaustive()
    }
}
