#![cfg(test)] // workaround for https://github.com/rust-lang/rust-clippy/issues/11024

mod helpers;

use helpers::entries;
use helpers::event_log;
use helpers::init_logging;
use helpers::LessOrEqual;
use helpers::LessOrEqualConstructor;
use helpers::RecordingMonitor;
use helpers::RemovalCollector;
use helpers::RemovalCollectorConstructor;
use helpers::Watcher;
use helpers::WatcherConstructor;
use marrow_core::containers::RangeSet;
use marrow_core::engine::events::DomainEvents;
use marrow_core::engine::events::IntEventType;
use marrow_core::engine::propagation::LocalId;
use marrow_core::ContradictionReason;
use marrow_core::IntegerVariable;
use marrow_core::Model;
use marrow_core::VarId;

fn bounds(model: &Model, var: impl IntegerVariable) -> (i32, i32) {
    (
        var.lower_bound(model.variables()),
        var.upper_bound(model.variables()),
    )
}

#[test]
fn a_chain_of_inequalities_reaches_its_fix_point() {
    init_logging();
    let mut model = Model::default();
    let x = model.new_int_var(0, 10, "x").expect("valid bounds");
    let y = model.new_int_var(0, 10, "y").expect("valid bounds");
    let z = model.new_int_var(0, 10, "z").expect("valid bounds");
    let xy = model.post(LessOrEqualConstructor { x, y });
    let yz = model.post(LessOrEqualConstructor { x: y, y: z });

    assert_eq!(2, model.num_propagators());
    assert!(model.is_scheduled(xy));
    assert!(model.is_scheduled(yz));
    model.propagate().expect("consistent");
    assert!(!model.is_scheduled(xy));

    model.push_world();
    let _ = x
        .update_lower_bound(&mut model.context(), 4)
        .expect("no contradiction");
    model.propagate().expect("consistent");
    assert_eq!((4, 10), bounds(&model, y));
    assert_eq!((4, 10), bounds(&model, z));

    let _ = z
        .update_upper_bound(&mut model.context(), 6)
        .expect("no contradiction");
    model.propagate().expect("consistent");
    assert_eq!((4, 6), bounds(&model, x));
    assert_eq!((4, 6), bounds(&model, y));

    model.pop_world();
    assert_eq!((0, 10), bounds(&model, x));
    assert_eq!((0, 10), bounds(&model, y));
    assert_eq!((0, 10), bounds(&model, z));

    let statistics = model.statistics();
    assert!(statistics.num_propagator_calls >= 4);
    assert_eq!(0, statistics.num_contradictions);
}

#[test]
fn a_contradiction_names_the_propagator_and_the_variable() {
    init_logging();
    let mut model = Model::default();
    let x = model.new_int_var(5, 9, "x").expect("valid bounds");
    let y = model.new_int_var(0, 3, "y").expect("valid bounds");
    let handle = model.post(LessOrEqualConstructor { x, y });

    let contradiction = model.propagate().expect_err("x <= y cannot hold");

    assert_eq!(
        &ContradictionReason::LowerBoundAboveUpperBound,
        contradiction.reason()
    );
    assert_eq!(Some(y), contradiction.variable());
    assert_eq!(
        Some(handle.id()),
        contradiction.cause().map(|cause| cause.propagator())
    );
    assert_eq!((0, 3), bounds(&model, y));
    assert!(!model.is_scheduled(handle));
    assert_eq!(1, model.statistics().num_contradictions);
}

#[test]
fn monitors_hear_of_a_change_before_propagators_and_variables_before_views() {
    init_logging();
    let log = event_log();
    let mut model = Model::default();
    let x = model.new_int_var(0, 9, "x").expect("valid bounds");
    let negated = model.new_negated_view(x).expect("valid view");

    let _ = model.post(WatcherConstructor::new(negated, "propagator view", &log));
    let _ = model.post(WatcherConstructor::new(x, "propagator x", &log));
    let _ = model.add_monitor(negated, RecordingMonitor::new("monitor view", &log));
    let _ = model.add_monitor(x, RecordingMonitor::new("monitor x", &log));
    model.propagate().expect("consistent");
    assert!(entries(&log).is_empty());

    let _ = x
        .update_lower_bound(&mut model.context(), 2)
        .expect("no contradiction");
    assert_eq!(vec!["monitor x INCLOW", "monitor view DECUPP"], entries(&log));

    model.propagate().expect("consistent");
    assert_eq!(
        vec![
            "monitor x INCLOW",
            "monitor view DECUPP",
            "propagator x INCLOW",
            "propagator view DECUPP",
        ],
        entries(&log)
    );
}

#[test]
fn propagators_only_hear_the_events_they_registered_for() {
    let log = event_log();
    let mut model = Model::default();
    let x = model.new_int_var(0, 9, "x").expect("valid bounds");
    let handle = model.post(WatcherConstructor {
        events: DomainEvents::ASSIGN,
        ..WatcherConstructor::new(x, "watcher", &log)
    });
    model.propagate().expect("consistent");

    let _ = x.remove_value(&mut model.context(), 5).expect("no contradiction");
    let _ = x
        .update_bounds(&mut model.context(), 2, 7)
        .expect("no contradiction");
    model.propagate().expect("consistent");
    let watcher: &Watcher<VarId> = model.propagator(handle).expect("posted");
    assert!(watcher.notifications.is_empty());
    assert_eq!(1, watcher.num_calls);

    let _ = x.instantiate_to(&mut model.context(), 3).expect("no contradiction");
    model.propagate().expect("consistent");
    let watcher = model.propagator(handle).expect("posted");
    assert_eq!(
        vec![(LocalId::from(0), IntEventType::Instantiate)],
        watcher.notifications
    );
    assert_eq!(2, watcher.num_calls);
}

#[test]
fn a_propagator_does_not_hear_its_own_changes() {
    let log = event_log();
    let mut model = Model::default();
    let x = model.new_int_var(0, 9, "x").expect("valid bounds");
    let handle = model.post(WatcherConstructor {
        remove_on_first_call: Some(0),
        ..WatcherConstructor::new(x, "watcher", &log)
    });
    let monitor = model.add_monitor(x, RecordingMonitor::new("monitor", &log));

    model.propagate().expect("consistent");

    assert_eq!(1, x.lower_bound(model.variables()));
    let watcher = model.propagator(handle).expect("posted");
    assert!(watcher.notifications.is_empty());
    assert_eq!(1, watcher.num_calls);

    let monitor = model
        .monitor::<RecordingMonitor>(monitor)
        .expect("a recording monitor");
    assert_eq!(
        vec![Some(handle.id())],
        monitor
            .causes
            .iter()
            .map(|cause| cause.map(|cause| cause.propagator()))
            .collect::<Vec<_>>()
    );
}

#[test]
fn a_promoted_change_reaches_a_propagator_reacting_on_promotion() {
    let log = event_log();
    let mut model = Model::default();
    let x = model.new_int_var(0, 9, "x").expect("valid bounds");
    let handle = model.post(WatcherConstructor {
        react_on_promotion: true,
        remove_on_first_call: Some(0),
        ..WatcherConstructor::new(x, "watcher", &log)
    });
    let monitor = model.add_monitor(x, RecordingMonitor::new("monitor", &log));

    model.propagate().expect("consistent");

    let watcher = model.propagator(handle).expect("posted");
    assert_eq!(
        vec![(LocalId::from(0), IntEventType::IncLow)],
        watcher.notifications
    );
    assert_eq!(2, watcher.num_calls);
    let monitor = model
        .monitor::<RecordingMonitor>(monitor)
        .expect("a recording monitor");
    assert_eq!(vec![None], monitor.causes);
}

#[test]
fn an_interior_removal_is_not_a_promotion() {
    let log = event_log();
    let mut model = Model::default();
    let x = model.new_int_var(0, 9, "x").expect("valid bounds");
    let handle = model.post(WatcherConstructor {
        react_on_promotion: true,
        remove_on_first_call: Some(5),
        ..WatcherConstructor::new(x, "watcher", &log)
    });

    model.propagate().expect("consistent");

    let watcher = model.propagator(handle).expect("posted");
    assert!(watcher.notifications.is_empty());
    assert_eq!(1, watcher.num_calls);
    assert!(!x.contains(model.variables(), 5));
}

#[test]
fn delta_monitors_skip_the_removals_of_their_owner() {
    init_logging();
    let mut model = Model::default();
    let x = model.new_int_var(0, 9, "x").expect("valid bounds");
    let mut all_removals = model.create_delta_monitor(x);
    let handle = model.post(RemovalCollectorConstructor { var: x });
    model.propagate().expect("consistent");

    model.push_world();
    let _ = x.remove_value(&mut model.context(), 3).expect("no contradiction");
    let _ = x.remove_value(&mut model.context(), 5).expect("no contradiction");
    model
        .propagator_mut(handle)
        .expect("posted")
        .to_remove
        .push(7);
    model.propagate().expect("consistent");

    let collector: &RemovalCollector = model.propagator(handle).expect("posted");
    assert_eq!(vec![3, 5], collector.seen);
    assert!(!x.contains(model.variables(), 7));

    let _ = x.remove_value(&mut model.context(), 1).expect("no contradiction");
    model.propagate().expect("consistent");
    let collector = model.propagator(handle).expect("posted");
    assert_eq!(vec![3, 5, 1], collector.seen);

    all_removals.freeze(model.variables());
    assert_eq!(
        vec![3, 5, 7, 1],
        all_removals
            .removed_values(model.variables())
            .collect::<Vec<_>>()
    );
    all_removals.unfreeze();
    all_removals.freeze(model.variables());
    assert_eq!(0, all_removals.removed_values(model.variables()).count());
}

#[test]
fn removals_through_a_bound_update_are_logged_one_by_one() {
    let mut model = Model::default();
    let x = model
        .new_int_var_from_values(&[0, 2, 3, 6, 8], "x")
        .expect("valid domain");
    let mut delta = model.create_delta_monitor(x);

    model.push_world();
    let _ = x
        .update_lower_bound(&mut model.context(), 4)
        .expect("no contradiction");

    delta.freeze(model.variables());
    let mut removed = Vec::new();
    delta.for_each_removed(model.variables(), |value| removed.push(value));
    assert_eq!(vec![0, 2, 3], removed);
}

#[test]
fn instantiating_twice_logs_no_removals() {
    let mut model = Model::default();
    let x = model.new_int_var(0, 4, "x").expect("valid bounds");
    let mut delta = model.create_delta_monitor(x);

    model.push_world();
    let _ = x.instantiate_to(&mut model.context(), 2).expect("no contradiction");
    delta.freeze(model.variables());
    assert_eq!(4, delta.removed_values(model.variables()).count());
    delta.unfreeze();

    assert!(!x.instantiate_to(&mut model.context(), 2).expect("no contradiction"));
    delta.freeze(model.variables());
    assert_eq!(0, delta.removed_values(model.variables()).count());
}

#[test]
fn propagators_over_views_are_scheduled_by_their_source() {
    init_logging();
    let mut model = Model::default();
    let x = model.new_int_var(0, 10, "x").expect("valid bounds");
    let doubled = model.new_view(x, 2, 1).expect("valid view");
    let z = model.new_int_var(0, 8, "z").expect("valid bounds");
    let handle = model.post(LessOrEqualConstructor { x: doubled, y: z });

    model.propagate().expect("consistent");
    assert_eq!((0, 3), bounds(&model, x));
    assert_eq!((1, 7), bounds(&model, doubled));
    assert_eq!((1, 8), bounds(&model, z));

    let _ = x
        .update_lower_bound(&mut model.context(), 2)
        .expect("no contradiction");
    model.propagate().expect("consistent");
    assert_eq!((5, 8), bounds(&model, z));

    let propagator: &LessOrEqual<_, VarId> = model.propagator(handle).expect("posted");
    assert_eq!(2, propagator.num_calls);
}

#[test]
fn a_negated_view_turns_upper_bound_changes_into_lower_bound_events() {
    let log = event_log();
    let mut model = Model::default();
    let x = model.new_int_var(0, 9, "x").expect("valid bounds");
    let negated = model.new_negated_view(x).expect("valid view");
    let handle = model.post(WatcherConstructor {
        events: DomainEvents::LOWER_BOUND,
        ..WatcherConstructor::new(negated, "watcher", &log)
    });
    model.propagate().expect("consistent");

    let _ = x
        .update_lower_bound(&mut model.context(), 1)
        .expect("no contradiction");
    model.propagate().expect("consistent");
    assert!(model
        .propagator(handle)
        .expect("posted")
        .notifications
        .is_empty());

    let _ = x
        .update_upper_bound(&mut model.context(), 4)
        .expect("no contradiction");
    model.propagate().expect("consistent");
    assert_eq!(
        vec![(LocalId::from(0), IntEventType::IncLow)],
        model.propagator(handle).expect("posted").notifications
    );
    assert_eq!((-4, -1), bounds(&model, negated));

    let _ = negated
        .update_upper_bound(&mut model.context(), -3)
        .expect("no contradiction");
    assert_eq!((3, 4), bounds(&model, x));
}

#[test]
fn a_hypothesis_is_propagated_and_undone() {
    init_logging();
    let mut model = Model::default();
    let x = model.new_int_var(0, 10, "x").expect("valid bounds");
    let y = model.new_int_var(0, 10, "y").expect("valid bounds");
    let z = model.new_int_var(0, 10, "z").expect("valid bounds");
    let _ = model.post(LessOrEqualConstructor { x, y });
    let _ = model.post(LessOrEqualConstructor { x: y, y: z });
    model.propagate().expect("consistent");

    let result = model.try_hypothesis(|context| context.update_lower_bound(&x, 4));
    assert!(matches!(result.outcome, Ok(true)));
    assert!(result.modified.contains(&x));
    assert!(result.modified.contains(&y));
    assert!(result.modified.contains(&z));
    assert_eq!((0, 10), bounds(&model, x));
    assert_eq!((0, 10), bounds(&model, z));

    let result = model.try_hypothesis(|context| {
        let _ = context.update_lower_bound(&x, 8)?;
        context.update_upper_bound(&z, 5)
    });
    assert!(result.is_contradiction());
    assert_eq!((0, 10), bounds(&model, x));
    assert_eq!((0, 10), bounds(&model, y));
    assert_eq!((0, 10), bounds(&model, z));

    assert_eq!(0, model.world_index());
    assert_eq!(0, model.statistics().num_worlds_pushed);
    model.propagate().expect("consistent");
}

#[test]
fn a_hypothesis_keeps_the_outer_schedule() {
    let mut model = Model::default();
    let x = model.new_int_var(0, 10, "x").expect("valid bounds");
    let y = model.new_int_var(0, 10, "y").expect("valid bounds");
    let handle = model.post(LessOrEqualConstructor { x, y });

    let result = model.try_hypothesis(|context| context.remove_value(&y, 10));
    assert!(!result.is_contradiction());
    assert!(model.is_scheduled(handle));

    let _ = y
        .update_upper_bound(&mut model.context(), 6)
        .expect("no contradiction");
    model.propagate().expect("consistent");
    assert_eq!((0, 6), bounds(&model, x));
}

#[test]
fn removals_made_before_a_hypothesis_reach_the_next_fix_point() {
    init_logging();
    let mut model = Model::default();
    let x = model.new_int_var(0, 9, "x").expect("valid bounds");
    let y = model.new_int_var(0, 9, "y").expect("valid bounds");
    let mut all_removals = model.create_delta_monitor(x);
    let handle = model.post(RemovalCollectorConstructor { var: x });
    model.propagate().expect("consistent");

    model.push_world();
    let _ = x.remove_value(&mut model.context(), 3).expect("no contradiction");

    let result = model.try_hypothesis(|context| context.remove_value(&y, 4));
    assert!(!result.is_contradiction());
    let result = model
        .context()
        .try_hypothesis(|context| context.remove_value(&x, 5));
    assert!(matches!(result.outcome, Ok(true)));
    assert!(x.contains(model.variables(), 5));

    model.propagate().expect("consistent");
    let collector = model.propagator(handle).expect("posted");
    assert_eq!(vec![3], collector.seen);

    all_removals.freeze(model.variables());
    assert_eq!(
        vec![3],
        all_removals
            .removed_values(model.variables())
            .collect::<Vec<_>>()
    );
}

#[test]
fn a_view_rejects_bounds_beyond_its_range() {
    let mut model = Model::default();
    let x = model
        .new_int_var(0, RangeSet::UNIVERSE_MAX, "x")
        .expect("valid bounds");
    let view = model.new_view(x, 1, 0).expect("in range");
    let negated = model.new_negated_view(x).expect("in range");

    let contradiction = view
        .update_lower_bound(&mut model.context(), RangeSet::UNIVERSE_MAX + 1)
        .expect_err("beyond the upper bound");
    assert_eq!(
        &ContradictionReason::LowerBoundAboveUpperBound,
        contradiction.reason()
    );

    let contradiction = negated
        .update_upper_bound(&mut model.context(), RangeSet::UNIVERSE_MIN - 1)
        .expect_err("beyond the lower bound");
    assert_eq!(
        &ContradictionReason::LowerBoundAboveUpperBound,
        contradiction.reason()
    );
    assert_eq!((0, RangeSet::UNIVERSE_MAX), bounds(&model, x));
}

#[test]
fn a_view_with_a_large_offset_inverts_without_overflow() {
    let mut model = Model::default();
    let x = model
        .new_int_var(-1_000_000_000, -999_999_990, "x")
        .expect("valid bounds");
    let view = model.new_view(x, 1, 2_000_000_000).expect("in range");
    assert_eq!((1_000_000_000, 1_000_000_010), bounds(&model, view));

    let _ = view
        .update_lower_bound(&mut model.context(), 1_000_000_005)
        .expect("no contradiction");
    assert_eq!((-999_999_995, -999_999_990), bounds(&model, x));

    let contradiction = view
        .update_upper_bound(&mut model.context(), -2_000_000_000)
        .expect_err("below the lower bound");
    assert_eq!(
        &ContradictionReason::UpperBoundBelowLowerBound,
        contradiction.reason()
    );
}

#[test]
fn a_hypothesis_from_a_context_runs_no_propagator() {
    let log = event_log();
    let mut model = Model::default();
    let x = model.new_int_var(0, 9, "x").expect("valid bounds");
    let handle = model.post(WatcherConstructor::new(x, "watcher", &log));
    model.propagate().expect("consistent");

    let mut context = model.context();
    let result = context.try_hypothesis(|context| context.remove_value(&x, 9));
    assert!(matches!(result.outcome, Ok(true)));
    assert_eq!(1, result.modified.len());
    assert_eq!(9, context.upper_bound(&x));

    model.propagate().expect("consistent");
    let watcher = model.propagator(handle).expect("posted");
    assert!(watcher.notifications.is_empty());
    assert_eq!(1, watcher.num_calls);
}

#[test]
fn pruned_values_are_counted() {
    let mut model = Model::default();
    let x = model.new_int_var(0, 9, "x").expect("valid bounds");

    let _ = x.remove_value(&mut model.context(), 5).expect("no contradiction");
    let _ = x
        .update_lower_bound(&mut model.context(), 3)
        .expect("no contradiction");

    assert_eq!(4, model.statistics().num_values_pruned);
}
