use downcast_rs::impl_downcast;
use downcast_rs::Downcast;
use enum_map::Enum;

use super::LocalId;
use super::NotificationContext;
use super::PropagationContext;
use crate::basic_types::PropagationStatus;
#[cfg(doc)]
use crate::create_statistics_struct;
#[cfg(doc)]
use crate::engine::events::DomainEvents;
use crate::engine::events::IntEventType;
#[cfg(doc)]
use crate::engine::propagation::PropagatorConstructorContext;
use crate::statistics::StatisticLogger;

// Allows retrieving the concrete propagator behind a `Box<dyn Propagator>`, see
// `Model::propagator`.
impl_downcast!(Propagator);

/// A propagator removes values from domains which cannot be part of any solution, or reports a
/// contradiction.
///
/// Only [`Propagator::name`] and [`Propagator::propagate`] are required. A propagator is
/// scheduled when one of the variables it registered to through
/// [`PropagatorConstructorContext::register`] changes in a way its [`DomainEvents`] select,
/// unless the change was made by the propagator itself.
pub trait Propagator: Downcast {
    /// The name of the propagator, used for printing and statistics.
    fn name(&self) -> &str;

    /// Removes values which cannot be part of a solution given the current domains.
    ///
    /// Every mutation through the context is attributed to this propagator. A contradiction
    /// returned by a mutation should be returned with `?`; it ends the fix-point and is reported
    /// by [`Model::propagate`](crate::engine::model::Model::propagate).
    ///
    /// Propagators are not required to reach a fix-point themselves. If one of their own
    /// mutations should schedule them again, see [`Propagator::react_on_promotion`].
    fn propagate(&mut self, context: PropagationContext<'_>) -> PropagationStatus;

    /// Decides whether the propagator is scheduled after `event` happened on the variable it
    /// registered as `local_id`.
    ///
    /// Meant for cheap incremental bookkeeping; the actual filtering belongs in
    /// [`Propagator::propagate`]. By default the propagator is always scheduled.
    fn notify(
        &mut self,
        _context: NotificationContext<'_>,
        _local_id: LocalId,
        _event: IntEventType,
    ) -> EnqueueDecision {
        EnqueueDecision::Enqueue
    }

    /// Whether the propagator is notified of its own mutations which turn out stronger than
    /// requested, e.g. a removal which moved a bound.
    fn react_on_promotion(&self) -> bool {
        false
    }

    /// The [`Priority`] of the propagator; [`Priority::VeryLow`] by default.
    fn priority(&self) -> Priority {
        Priority::VeryLow
    }

    /// Logs statistics of the propagator using the provided [`StatisticLogger`].
    ///
    /// The [`create_statistics_struct!`] macro creates a struct of statistics.
    fn log_statistics(&self, _statistic_logger: StatisticLogger) {}
}

/// Indicator of what to do when a propagator is notified.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnqueueDecision {
    Enqueue,
    Skip,
}

/// Propagators with a higher priority are called first; propagators with the same priority are
/// called in the order in which they were scheduled.
///
/// Cheap propagators should be given a high priority.
#[derive(Default, Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Enum)]
pub enum Priority {
    High,
    Medium,
    Low,
    #[default]
    VeryLow,
}
