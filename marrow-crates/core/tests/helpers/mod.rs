#![allow(dead_code, reason = "every test binary uses its own part of the helpers")]

use std::cell::RefCell;
use std::rc::Rc;

use marrow_core::engine::delta::DeltaMonitor;
use marrow_core::engine::events::DomainEvents;
use marrow_core::engine::events::IntEventType;
use marrow_core::engine::notifications::VariableMonitor;
use marrow_core::engine::propagation::EnqueueDecision;
use marrow_core::engine::propagation::LocalId;
use marrow_core::engine::propagation::NotificationContext;
use marrow_core::engine::propagation::Priority;
use marrow_core::engine::propagation::PropagationContext;
use marrow_core::engine::propagation::Propagator;
use marrow_core::engine::propagation::PropagatorConstructor;
use marrow_core::engine::propagation::PropagatorConstructorContext;
use marrow_core::engine::variables::VariableRef;
use marrow_core::engine::variables::VariableStore;
use marrow_core::Cause;
use marrow_core::IntegerVariable;
use marrow_core::PropagationStatus;
use marrow_core::VarId;

pub(crate) fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A log shared between monitors and propagators, to observe the order in which they are called.
pub(crate) type EventLog = Rc<RefCell<Vec<String>>>;

pub(crate) fn event_log() -> EventLog {
    Rc::new(RefCell::new(Vec::new()))
}

pub(crate) fn entries(log: &EventLog) -> Vec<String> {
    log.borrow().clone()
}

/// Writes `"{label} {event}"` for every update it hears.
#[derive(Debug)]
pub(crate) struct RecordingMonitor {
    pub(crate) label: &'static str,
    pub(crate) log: EventLog,
    pub(crate) causes: Vec<Option<Cause>>,
}

impl RecordingMonitor {
    pub(crate) fn new(label: &'static str, log: &EventLog) -> RecordingMonitor {
        RecordingMonitor {
            label,
            log: Rc::clone(log),
            causes: Vec::new(),
        }
    }
}

impl VariableMonitor for RecordingMonitor {
    fn on_update(
        &mut self,
        _variables: &VariableStore,
        _variable: VariableRef,
        event: IntEventType,
        cause: Option<Cause>,
    ) {
        self.log.borrow_mut().push(format!("{} {event}", self.label));
        self.causes.push(cause);
    }
}

/// `x <= y`, on bounds only.
#[derive(Debug, Clone, Copy)]
pub(crate) struct LessOrEqualConstructor<A, B> {
    pub(crate) x: A,
    pub(crate) y: B,
}

#[derive(Debug)]
pub(crate) struct LessOrEqual<A, B> {
    x: A,
    y: B,
    pub(crate) num_calls: usize,
}

impl<A, B> PropagatorConstructor for LessOrEqualConstructor<A, B>
where
    A: IntegerVariable + 'static,
    B: IntegerVariable + 'static,
{
    type PropagatorImpl = LessOrEqual<A, B>;

    fn create(self, mut context: PropagatorConstructorContext<'_>) -> LessOrEqual<A, B> {
        context.register(self.x, DomainEvents::LOWER_BOUND, LocalId::from(0));
        context.register(self.y, DomainEvents::UPPER_BOUND, LocalId::from(1));
        LessOrEqual {
            x: self.x,
            y: self.y,
            num_calls: 0,
        }
    }
}

impl<A, B> Propagator for LessOrEqual<A, B>
where
    A: IntegerVariable + 'static,
    B: IntegerVariable + 'static,
{
    fn name(&self) -> &str {
        "LessOrEqual"
    }

    fn priority(&self) -> Priority {
        Priority::High
    }

    fn propagate(&mut self, mut context: PropagationContext<'_>) -> PropagationStatus {
        self.num_calls += 1;
        let lower_bound = context.lower_bound(&self.x);
        let _ = context.update_lower_bound(&self.y, lower_bound)?;
        let upper_bound = context.upper_bound(&self.y);
        let _ = context.update_upper_bound(&self.x, upper_bound)?;
        Ok(())
    }
}

/// Watches a single variable and records the notifications it receives. On its first call it can
/// remove a value of the watched variable itself.
#[derive(Debug)]
pub(crate) struct WatcherConstructor<Var> {
    pub(crate) var: Var,
    pub(crate) events: DomainEvents,
    pub(crate) react_on_promotion: bool,
    pub(crate) remove_on_first_call: Option<i32>,
    pub(crate) label: &'static str,
    pub(crate) log: EventLog,
}

impl<Var> WatcherConstructor<Var> {
    pub(crate) fn new(var: Var, label: &'static str, log: &EventLog) -> Self {
        WatcherConstructor {
            var,
            events: DomainEvents::ANY_INT,
            react_on_promotion: false,
            remove_on_first_call: None,
            label,
            log: Rc::clone(log),
        }
    }
}

#[derive(Debug)]
pub(crate) struct Watcher<Var> {
    var: Var,
    react_on_promotion: bool,
    remove_on_first_call: Option<i32>,
    label: &'static str,
    log: EventLog,
    pub(crate) notifications: Vec<(LocalId, IntEventType)>,
    pub(crate) num_calls: usize,
}

impl<Var: IntegerVariable + 'static> PropagatorConstructor for WatcherConstructor<Var> {
    type PropagatorImpl = Watcher<Var>;

    fn create(self, mut context: PropagatorConstructorContext<'_>) -> Watcher<Var> {
        context.register(self.var, self.events, LocalId::from(0));
        Watcher {
            var: self.var,
            react_on_promotion: self.react_on_promotion,
            remove_on_first_call: self.remove_on_first_call,
            label: self.label,
            log: self.log,
            notifications: Vec::new(),
            num_calls: 0,
        }
    }
}

impl<Var: IntegerVariable + 'static> Propagator for Watcher<Var> {
    fn name(&self) -> &str {
        "Watcher"
    }

    fn propagate(&mut self, mut context: PropagationContext<'_>) -> PropagationStatus {
        self.num_calls += 1;
        if let Some(value) = self.remove_on_first_call.take() {
            let _ = context.remove_value(&self.var, value)?;
        }
        Ok(())
    }

    fn notify(
        &mut self,
        _context: NotificationContext<'_>,
        local_id: LocalId,
        event: IntEventType,
    ) -> EnqueueDecision {
        self.log
            .borrow_mut()
            .push(format!("{} {event}", self.label));
        self.notifications.push((local_id, event));
        EnqueueDecision::Enqueue
    }

    fn react_on_promotion(&self) -> bool {
        self.react_on_promotion
    }
}

/// Reads the removals of a variable through a delta monitor, and removes values itself when asked
/// to.
#[derive(Debug, Clone, Copy)]
pub(crate) struct RemovalCollectorConstructor {
    pub(crate) var: VarId,
}

#[derive(Debug)]
pub(crate) struct RemovalCollector {
    var: VarId,
    delta: DeltaMonitor,
    pub(crate) seen: Vec<i32>,
    pub(crate) to_remove: Vec<i32>,
}

impl PropagatorConstructor for RemovalCollectorConstructor {
    type PropagatorImpl = RemovalCollector;

    fn create(self, mut context: PropagatorConstructorContext<'_>) -> RemovalCollector {
        context.register(self.var, DomainEvents::ANY_INT, LocalId::from(0));
        RemovalCollector {
            var: self.var,
            delta: context.create_delta_monitor(self.var),
            seen: Vec::new(),
            to_remove: Vec::new(),
        }
    }
}

impl Propagator for RemovalCollector {
    fn name(&self) -> &str {
        "RemovalCollector"
    }

    fn propagate(&mut self, mut context: PropagationContext<'_>) -> PropagationStatus {
        self.delta.freeze(context.variables());
        self.seen
            .extend(self.delta.removed_values(context.variables()));
        self.delta.unfreeze();

        for value in std::mem::take(&mut self.to_remove) {
            let _ = context.remove_value(&self.var, value)?;
        }
        Ok(())
    }
}
