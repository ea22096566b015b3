use crate::create_statistics_struct;

create_statistics_struct!(
    /// Counters of the propagation engine.
    EngineStatistics {
        /// The number of calls to [`Propagator::propagate`](crate::engine::propagation::Propagator::propagate).
        num_propagator_calls: u64,
        /// The number of fix-points which ended in a contradiction.
        num_contradictions: u64,
        num_worlds_pushed: u64,
        num_worlds_popped: u64,
        /// The number of values removed from domains.
        num_values_pruned: u64,
    }
);
