use log::debug;
use log::info;
use log::trace;
use log::warn;

use super::delta::DeltaMonitor;
use super::events::IntEventType;
use super::notifications::MonitorId;
use super::notifications::NotificationEngine;
use super::notifications::VariableMonitor;
use super::propagation::PropagationContext;
use super::propagation::PropagationEngine;
use super::propagation::Propagator;
use super::propagation::PropagatorConstructor;
use super::propagation::PropagatorConstructorContext;
use super::propagation::PropagatorHandle;
use super::variables::AffineView;
use super::variables::BitsetDomain;
use super::variables::Domain;
use super::variables::IntegerVariable;
use super::variables::IntervalDomain;
use super::variables::SparseBitsetDomain;
use super::variables::VarId;
use super::variables::VariableRef;
use super::variables::VariableStore;
use super::variables::ViewId;
use super::EngineStatistics;
use crate::basic_types::ModelError;
use crate::basic_types::PropagationStatus;
use crate::containers::RangeSet;
use crate::marrow_assert_eq_simple;
use crate::marrow_assert_simple;
use crate::options::DomainRepresentation;
use crate::options::ModelOptions;
use crate::statistics::configure_statistic_logging;
use crate::statistics::log_statistic_postfix;
use crate::statistics::should_log_statistics;
use crate::statistics::Statistic;
use crate::statistics::StatisticLogger;

/// The owner of the reversible store and of everything living in it: variables, views,
/// propagators and monitors.
///
/// A model is driven by a search loop: it takes decisions through [`Model::context`], computes
/// the fix-point with [`Model::propagate`], and brackets every decision with
/// [`Model::push_world`] and [`Model::pop_world`].
///
/// # Example
/// ```rust
/// # use marrow_core::engine::model::Model;
/// # use marrow_core::engine::variables::IntegerVariable;
/// let mut model = Model::default();
/// let x = model.new_int_var(0, 9, "x").unwrap();
///
/// model.push_world();
/// let _ = x.remove_value(&mut model.context(), 9).unwrap();
/// assert_eq!(8, x.upper_bound(model.variables()));
///
/// model.pop_world();
/// assert_eq!(9, x.upper_bound(model.variables()));
/// ```
#[derive(Debug, Default)]
pub struct Model {
    options: ModelOptions,
    variables: VariableStore,
    notifications: NotificationEngine,
    engine: PropagationEngine,
    statistics: EngineStatistics,
}

/// Checks that `value` can be stored by every domain encoding.
fn check_value(value: i32) -> Result<i32, ModelError> {
    if (RangeSet::UNIVERSE_MIN..=RangeSet::UNIVERSE_MAX).contains(&value) {
        Ok(value)
    } else {
        Err(ModelError::ValueOutOfRange(value))
    }
}

/// The number of integers in `[lower_bound, upper_bound]`.
fn span(lower_bound: i32, upper_bound: i32) -> usize {
    (i64::from(upper_bound) - i64::from(lower_bound) + 1) as usize
}

impl Model {
    pub fn new(options: ModelOptions) -> Model {
        Model {
            options,
            ..Default::default()
        }
    }

    pub fn options(&self) -> &ModelOptions {
        &self.options
    }

    /// Read access to every variable and view.
    pub fn variables(&self) -> &VariableStore {
        &self.variables
    }

    /// A context for mutations without a responsible propagator, such as decisions.
    pub fn context(&mut self) -> PropagationContext<'_> {
        PropagationContext::new(&mut self.variables, &mut self.notifications, None)
    }

    /// Creates a variable with the domain `[lower_bound, upper_bound]`, in the encoding chosen by
    /// [`ModelOptions::representation_for_interval`].
    pub fn new_int_var(
        &mut self,
        lower_bound: i32,
        upper_bound: i32,
        name: impl Into<String>,
    ) -> Result<VarId, ModelError> {
        let lower_bound = check_value(lower_bound)?;
        let upper_bound = check_value(upper_bound)?;
        if lower_bound > upper_bound {
            return Err(ModelError::IncorrectBounds(lower_bound, upper_bound));
        }

        let representation = self
            .options
            .representation_for_interval(span(lower_bound, upper_bound));
        let variable = self.variables.new_variable(name.into(), |store| {
            match representation {
                DomainRepresentation::Interval => {
                    Domain::Interval(IntervalDomain::new(store, lower_bound, upper_bound))
                }
                _ => Domain::Bitset(BitsetDomain::interval(store, lower_bound, upper_bound)),
            }
        });
        trace!("created {}", self.variables.display(variable));
        Ok(variable)
    }

    /// Creates a variable whose domain is the given values, in the encoding chosen by
    /// [`ModelOptions::representation_for`]. The values may be unsorted and repeated.
    pub fn new_int_var_from_values(
        &mut self,
        values: &[i32],
        name: impl Into<String>,
    ) -> Result<VarId, ModelError> {
        let values = Model::sorted_values(values)?;
        let (first, last) = (values[0], values[values.len() - 1]);
        let representation = self
            .options
            .representation_for(span(first, last), values.len());
        Ok(self.create_variable(name.into(), &values, representation))
    }

    /// Creates a variable whose domain is the given values in the given encoding.
    ///
    /// The interval encoding cannot hold holes, it receives the smallest interval containing the
    /// values.
    pub fn new_int_var_with(
        &mut self,
        values: &[i32],
        representation: DomainRepresentation,
        name: impl Into<String>,
    ) -> Result<VarId, ModelError> {
        let values = Model::sorted_values(values)?;
        Ok(self.create_variable(name.into(), &values, representation))
    }

    fn sorted_values(values: &[i32]) -> Result<Vec<i32>, ModelError> {
        if values.is_empty() {
            return Err(ModelError::EmptyDomain);
        }
        let mut values = values
            .iter()
            .map(|&value| check_value(value))
            .collect::<Result<Vec<_>, _>>()?;
        values.sort_unstable();
        values.dedup();
        Ok(values)
    }

    fn create_variable(
        &mut self,
        name: String,
        values: &[i32],
        representation: DomainRepresentation,
    ) -> VarId {
        let (first, last) = (values[0], values[values.len() - 1]);
        let contiguous = span(first, last) == values.len();
        match representation {
            DomainRepresentation::Interval if !contiguous => {
                warn!("{name} is stored as [{first},{last}], its holes are lost");
            }
            DomainRepresentation::SparseBitset if contiguous => {
                warn!("{name} is stored sparsely although its values are contiguous");
            }
            _ => {}
        }

        let variable = self
            .variables
            .new_variable(name, |store| match representation {
                DomainRepresentation::Interval => {
                    Domain::Interval(IntervalDomain::new(store, first, last))
                }
                DomainRepresentation::Bitset => {
                    Domain::Bitset(BitsetDomain::from_sorted_values(store, values))
                }
                DomainRepresentation::SparseBitset => {
                    Domain::SparseBitset(SparseBitsetDomain::from_sorted_values(store, values))
                }
            });
        trace!("created {}", self.variables.display(variable));
        variable
    }

    /// Creates the view `scale * source + offset`.
    pub fn new_view(
        &mut self,
        source: VarId,
        scale: i32,
        offset: i32,
    ) -> Result<ViewId, ModelError> {
        if scale == 0 {
            return Err(ModelError::ZeroScale);
        }
        let image_in_range = |value: i32| {
            let image = i64::from(scale) * i64::from(value) + i64::from(offset);
            (i64::from(RangeSet::UNIVERSE_MIN)..=i64::from(RangeSet::UNIVERSE_MAX))
                .contains(&image)
        };
        for bound in [
            source.lower_bound(&self.variables),
            source.upper_bound(&self.variables),
        ] {
            if !image_in_range(bound) {
                return Err(ModelError::ValueOutOfRange(bound));
            }
        }

        let view = self
            .variables
            .new_view(AffineView::new(source, scale, offset));
        self.notifications.add_view(view, source);
        Ok(view)
    }

    /// Creates the view `-source`.
    pub fn new_negated_view(&mut self, source: VarId) -> Result<ViewId, ModelError> {
        self.new_view(source, -1, 0)
    }

    /// Constructs a propagator, records its subscriptions and schedules it for the next call to
    /// [`Model::propagate`].
    pub fn post<Constructor: PropagatorConstructor>(
        &mut self,
        constructor: Constructor,
    ) -> PropagatorHandle<Constructor::PropagatorImpl> {
        let propagator_id = self.engine.next_id();
        let context = PropagatorConstructorContext::new(
            &mut self.variables,
            &mut self.notifications,
            propagator_id,
        );
        let propagator = constructor.create(context);
        debug!("posted {} as {propagator_id}", propagator.name());

        let handle = self.engine.add(propagator);
        marrow_assert_eq_simple!(propagator_id, handle.id());
        handle
    }

    pub fn num_propagators(&self) -> usize {
        self.engine.propagators().num_propagators()
    }

    /// The propagator behind `handle`.
    pub fn propagator<P: Propagator>(&self, handle: PropagatorHandle<P>) -> Option<&P> {
        self.engine.propagators().get_propagator(handle)
    }

    pub fn propagator_mut<P: Propagator>(
        &mut self,
        handle: PropagatorHandle<P>,
    ) -> Option<&mut P> {
        self.engine.propagators_mut().get_propagator_mut(handle)
    }

    /// Whether the propagator will be called by the next [`Model::propagate`].
    pub fn is_scheduled<P>(&self, handle: PropagatorHandle<P>) -> bool {
        self.engine.is_scheduled(handle.id())
    }

    /// Calls the scheduled propagators until none is left.
    ///
    /// A contradiction ends the fix-point and is returned unchanged. The domains are then left as
    /// they were when it was raised; popping the current world restores them.
    pub fn propagate(&mut self) -> PropagationStatus {
        self.engine.propagate(
            &mut self.variables,
            &mut self.notifications,
            &mut self.statistics,
        )
    }

    /// Opens a new world. The delta logs are emptied, the removals made from here on are visible
    /// to the next fix-point.
    pub fn push_world(&mut self) {
        self.variables.clear_deltas();
        self.variables.push_world();
        self.statistics.num_worlds_pushed += 1;
    }

    /// Undoes every change of the current world.
    pub fn pop_world(&mut self) {
        let world = self.world_index();
        marrow_assert_simple!(world > 0, "the root world cannot be popped");
        self.pop_to_world(world - 1);
    }

    /// Undoes every change made since `world` was the current world. Scheduled propagators and
    /// undelivered notifications are dropped.
    pub fn pop_to_world(&mut self, world: usize) {
        self.statistics.num_worlds_popped += (self.world_index() - world) as u64;
        self.notifications.clear_pending();
        self.engine.clear_queue();
        self.variables.pop_to_world(world);
    }

    /// The number of worlds pushed and not yet popped.
    pub fn world_index(&self) -> usize {
        self.variables.world_index()
    }

    /// Adds a monitor which is called on every change of `variable`.
    pub fn add_monitor(
        &mut self,
        variable: impl Into<VariableRef>,
        monitor: impl VariableMonitor,
    ) -> MonitorId {
        self.notifications
            .add_monitor(variable.into(), Box::new(monitor))
    }

    pub fn monitor<M: VariableMonitor>(&self, monitor: MonitorId) -> Option<&M> {
        self.notifications.monitor(monitor).downcast_ref()
    }

    pub fn monitor_mut<M: VariableMonitor>(&mut self, monitor: MonitorId) -> Option<&mut M> {
        self.notifications.monitor_mut(monitor).downcast_mut()
    }

    /// Starts recording the removals of `variable` and returns a cursor over all of them.
    pub fn create_delta_monitor(&mut self, variable: VarId) -> DeltaMonitor {
        self.variables.create_delta(variable);
        DeltaMonitor::new(variable, None)
    }

    /// Empties every delta log.
    pub fn clear_deltas(&mut self) {
        self.variables.clear_deltas();
    }

    /// The variable and event of the most recent domain change.
    pub fn last_event(&self) -> Option<(VariableRef, IntEventType)> {
        self.notifications.last_event()
    }

    pub fn statistics(&self) -> EngineStatistics {
        EngineStatistics {
            num_values_pruned: self.notifications.num_values_pruned(),
            ..self.statistics
        }
    }

    /// Writes the statistics of the engine and of every propagator, if
    /// [`ModelOptions::log_statistics`] is set.
    ///
    /// Without a prior call to [`configure_statistic_logging`] they are written to stdout.
    pub fn log_statistics(&self) {
        if !self.options.log_statistics {
            return;
        }
        if !should_log_statistics() {
            configure_statistic_logging("marrow", None, None, None);
        }

        info!("logging statistics");
        self.statistics().log(StatisticLogger::new(["engine"]));
        for (propagator_id, propagator) in self.engine.propagators().iter_propagators() {
            propagator.log_statistics(StatisticLogger::new([
                propagator.name().to_owned(),
                propagator_id.0.to_string(),
            ]));
        }
        log_statistic_postfix();
    }

    pub(crate) fn parts(
        &mut self,
    ) -> (
        &mut VariableStore,
        &mut NotificationEngine,
        &mut PropagationEngine,
        &mut EngineStatistics,
    ) {
        (
            &mut self.variables,
            &mut self.notifications,
            &mut self.engine,
            &mut self.statistics,
        )
    }
}
