#![cfg(test)] // workaround for https://github.com/rust-lang/rust-clippy/issues/11024

use std::collections::BTreeSet;

use marrow_core::containers::algebra;
use marrow_core::containers::RangeSet;
use rand::rngs::SmallRng;
use rand::Rng;
use rand::SeedableRng;

fn random_set(rng: &mut SmallRng) -> RangeSet {
    let mut set = RangeSet::new();
    for _ in 0..rng.gen_range(0..5) {
        let from = rng.gen_range(-30..=30);
        let to = rng.gen_range(from..=from + 8);
        let _ = set.add_between(from, to);
    }
    set
}

fn members(set: &RangeSet) -> BTreeSet<i32> {
    set.iter().collect()
}

#[test]
fn adding_and_removing_intervals() {
    let mut set = RangeSet::from_ranges([(1, 3), (7, 9)]);

    assert!(set.add_between(4, 6));
    assert_eq!(vec![(1, 9)], set.ranges().collect::<Vec<_>>());
    assert_eq!(9, set.size());

    assert!(set.remove_between(2, 8));
    assert_eq!(vec![(1, 1), (9, 9)], set.ranges().collect::<Vec<_>>());
    assert_eq!(2, set.size());

    assert!(!set.remove_between(2, 8));
    assert!(!set.add_between(9, 9));
}

#[test]
fn union_then_intersection_gives_back_the_operand() {
    let mut rng = SmallRng::seed_from_u64(7);
    for _ in 0..200 {
        let a = random_set(&mut rng);
        let b = random_set(&mut rng);

        let union = algebra::union(&a, &b);
        assert_eq!(a, algebra::intersection(&union, &a));
        assert_eq!(
            members(&a).union(&members(&b)).copied().collect::<BTreeSet<_>>(),
            members(&union)
        );
        assert!(algebra::is_included_in(&b, &union));
    }
}

#[test]
fn operations_agree_with_ordered_sets() {
    let mut rng = SmallRng::seed_from_u64(11);
    for _ in 0..200 {
        let a = random_set(&mut rng);
        let b = random_set(&mut rng);
        let (left, right) = (members(&a), members(&b));

        assert_eq!(
            left.intersection(&right).copied().collect::<BTreeSet<_>>(),
            members(&algebra::intersection(&a, &b))
        );
        assert_eq!(
            left.difference(&right).copied().collect::<BTreeSet<_>>(),
            members(&algebra::difference(&a, &b))
        );
        assert_eq!(
            !left.is_disjoint(&right),
            algebra::intersects(&a, &b)
        );
        assert_eq!(
            left.iter().map(|value| value + 5).collect::<BTreeSet<_>>(),
            members(&algebra::plus(&a, 5))
        );
    }
}

#[test]
fn complementing_twice_within_bounds_is_the_identity() {
    let mut rng = SmallRng::seed_from_u64(13);
    for _ in 0..200 {
        let mut set = random_set(&mut rng);
        let _ = set.retain_between(-20, 20);

        let complement = algebra::complement(&set, -20, 20);
        assert_eq!(41, set.size() + complement.size());
        assert!(!algebra::intersects(&set, &complement));
        assert_eq!(set, algebra::complement(&complement, -20, 20));
    }
}

#[test]
fn the_cardinality_matches_the_members() {
    let mut rng = SmallRng::seed_from_u64(17);
    for _ in 0..200 {
        let mut set = random_set(&mut rng);
        let mut reference = members(&set);
        for _ in 0..20 {
            let value = rng.gen_range(-40..=40);
            if rng.gen_bool(0.5) {
                assert_eq!(reference.insert(value), set.add(value));
            } else {
                assert_eq!(reference.remove(&value), set.remove(value));
            }
            assert_eq!(reference.len(), set.size());
            assert_eq!(reference.len(), set.iter().count());
            assert_eq!(reference.first().copied(), set.min());
            assert_eq!(reference.last().copied(), set.max());
        }
    }
}

#[test]
fn sums_of_sets() {
    let left = RangeSet::from_values([0, 10]);
    let right = RangeSet::from_ranges([(1, 2), (5, 5)]);

    assert_eq!(
        vec![1, 2, 5, 11, 12, 15],
        algebra::plus_set(&left, &right).to_vec()
    );
    assert_eq!(
        vec![-5, -2, -1, 5, 8, 9],
        algebra::minus_set(&left, &right).to_vec()
    );
    assert_eq!(
        vec![(-2, 0), (8, 10)],
        algebra::minus_interval(&left, 0, 2).ranges().collect::<Vec<_>>()
    );
}

#[test]
fn neighbours_of_a_value() {
    let set = RangeSet::from_ranges([(1, 3), (7, 9)]);

    assert_eq!(7, set.next_value(3));
    assert_eq!(3, set.previous_value(7));
    assert_eq!(4, set.next_value_out(1));
    assert_eq!(6, set.previous_value_out(9));
    assert!(set.intersects_interval(4, 7));
    assert!(!set.intersects_interval(4, 6));
}
