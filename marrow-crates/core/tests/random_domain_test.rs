#![cfg(test)] // workaround for https://github.com/rust-lang/rust-clippy/issues/11024

//! Random mutations of every encoding, checked against a plain ordered set.
mod helpers;

use std::collections::BTreeSet;

use helpers::init_logging;
use marrow_core::containers::RangeSet;
use marrow_core::DomainRepresentation;
use marrow_core::IntegerVariable;
use marrow_core::Model;
use marrow_core::VarId;
use rand::rngs::SmallRng;
use rand::Rng;
use rand::SeedableRng;

const MIN_VALUE: i32 = -20;
const MAX_VALUE: i32 = 20;
const NUM_OPERATIONS: usize = 400;

/// What the domain should hold, along with what the encoding is able to represent.
#[derive(Clone, Debug)]
struct Reference {
    values: BTreeSet<i32>,
    enumerated: bool,
}

/// `Err(())` stands for the expected contradiction.
type Expected = Result<bool, ()>;

impl Reference {
    fn lower_bound(&self) -> i32 {
        *self.values.first().expect("a domain is never empty")
    }

    fn upper_bound(&self) -> i32 {
        *self.values.last().expect("a domain is never empty")
    }

    fn replace(&mut self, values: BTreeSet<i32>) -> Expected {
        if values.is_empty() {
            return Err(());
        }
        let changed = values != self.values;
        self.values = values;
        Ok(changed)
    }

    /// Keeps the values of `kept`; without holes only the hull of the kept values survives.
    fn keep(&mut self, kept: impl Fn(i32) -> bool) -> Expected {
        let survivors = self
            .values
            .iter()
            .copied()
            .filter(|&value| kept(value))
            .collect::<BTreeSet<_>>();
        if self.enumerated || survivors.is_empty() {
            return self.replace(survivors);
        }
        let first = *survivors.first().expect("not empty");
        let last = *survivors.last().expect("not empty");
        let hull = self
            .values
            .range(first..=last)
            .copied()
            .collect::<BTreeSet<_>>();
        self.replace(hull)
    }

    fn remove_value(&mut self, value: i32) -> Expected {
        if !self.values.contains(&value) {
            return Ok(false);
        }
        if self.values.len() == 1 {
            return Err(());
        }
        let is_bound = value == self.lower_bound() || value == self.upper_bound();
        if !self.enumerated && !is_bound {
            return Ok(false);
        }
        self.keep(|other| other != value)
    }

    fn remove_interval(&mut self, from: i32, to: i32) -> Expected {
        if from > to {
            return Ok(false);
        }
        if from <= self.lower_bound() {
            return self.update_lower_bound(to + 1);
        }
        if self.upper_bound() <= to {
            return self.update_upper_bound(from - 1);
        }
        if !self.enumerated {
            return Ok(false);
        }
        self.keep(|value| value < from || to < value)
    }

    fn update_lower_bound(&mut self, bound: i32) -> Expected {
        if bound <= self.lower_bound() {
            return Ok(false);
        }
        if bound > self.upper_bound() {
            return Err(());
        }
        self.keep(|value| value >= bound)
    }

    fn update_upper_bound(&mut self, bound: i32) -> Expected {
        if bound >= self.upper_bound() {
            return Ok(false);
        }
        if bound < self.lower_bound() {
            return Err(());
        }
        self.keep(|value| value <= bound)
    }

    fn update_bounds(&mut self, lower: i32, upper: i32) -> Expected {
        self.keep(|value| lower <= value && value <= upper)
    }

    fn instantiate_to(&mut self, value: i32) -> Expected {
        if !self.values.contains(&value) {
            return Err(());
        }
        self.keep(|other| other == value)
    }

    fn remove_values(&mut self, values: &RangeSet) -> Expected {
        self.keep(|value| !values.contains(value))
    }

    fn remove_all_values_but(&mut self, values: &RangeSet) -> Expected {
        self.keep(|value| values.contains(value))
    }
}

fn random_set(rng: &mut SmallRng) -> RangeSet {
    let mut set = RangeSet::new();
    for _ in 0..rng.gen_range(0..4) {
        let from = rng.gen_range(MIN_VALUE..=MAX_VALUE);
        let to = rng.gen_range(from..=(from + 6).min(MAX_VALUE));
        let _ = set.add_between(from, to);
    }
    set
}

fn assert_matches(model: &Model, x: VarId, reference: &Reference) {
    let variables = model.variables();
    let expected = reference.values.iter().copied().collect::<Vec<_>>();

    assert_eq!(reference.lower_bound(), x.lower_bound(variables));
    assert_eq!(reference.upper_bound(), x.upper_bound(variables));
    assert!(x.lower_bound(variables) <= x.upper_bound(variables));
    assert_eq!(expected.len(), x.size(variables));
    assert_eq!(expected.len() == 1, x.is_instantiated(variables));
    assert_eq!(expected, x.values(variables, true).collect::<Vec<_>>());
    assert_eq!(
        expected.iter().rev().copied().collect::<Vec<_>>(),
        x.values(variables, false).collect::<Vec<_>>()
    );
    assert_eq!(
        RangeSet::from_values(expected.iter().copied()),
        RangeSet::from_var(variables, x)
    );

    for value in MIN_VALUE - 5..=MAX_VALUE + 5 {
        assert_eq!(
            reference.values.contains(&value),
            x.contains(variables, value),
            "membership of {value}"
        );

        let next = reference
            .values
            .range(value + 1..)
            .next()
            .copied()
            .unwrap_or(i32::MAX);
        assert_eq!(next, x.next_value(variables, value), "next value of {value}");

        let previous = reference
            .values
            .range(..value)
            .next_back()
            .copied()
            .unwrap_or(i32::MIN);
        assert_eq!(
            previous,
            x.previous_value(variables, value),
            "previous value of {value}"
        );

        let next_out = (value + 1..)
            .find(|other| !reference.values.contains(other))
            .expect("the domain is finite");
        assert_eq!(
            next_out,
            x.next_value_out(variables, value),
            "next value out of {value}"
        );

        let previous_out = (i32::MIN..value)
            .rev()
            .find(|other| !reference.values.contains(other))
            .expect("the domain is finite");
        assert_eq!(
            previous_out,
            x.previous_value_out(variables, value),
            "previous value out of {value}"
        );
    }
}

fn run(seed: u64, representation: DomainRepresentation) {
    init_logging();
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut model = Model::default();

    let initial = match representation {
        DomainRepresentation::Interval => {
            let lower_bound = rng.gen_range(MIN_VALUE..=0);
            let upper_bound = rng.gen_range(0..=MAX_VALUE);
            (lower_bound..=upper_bound).collect::<Vec<_>>()
        }
        _ => {
            let mut values = (MIN_VALUE..=MAX_VALUE)
                .filter(|_| rng.gen_bool(0.6))
                .collect::<Vec<_>>();
            values.push(0);
            values
        }
    };
    let x = model
        .new_int_var_with(&initial, representation, "x")
        .expect("valid domain");
    let mut reference = Reference {
        values: initial.iter().copied().collect(),
        enumerated: representation != DomainRepresentation::Interval,
    };
    let mut saved = Vec::new();
    assert_matches(&model, x, &reference);

    for _ in 0..NUM_OPERATIONS {
        let value = rng.gen_range(MIN_VALUE - 2..=MAX_VALUE + 2);
        let other = rng.gen_range(MIN_VALUE - 2..=MAX_VALUE + 2);
        let mut context = model.context();

        let (expected, actual) = match rng.gen_range(0..11) {
            0 => {
                saved.push(reference.clone());
                model.push_world();
                continue;
            }
            1 => {
                let Some(restored) = saved.pop() else {
                    continue;
                };
                reference = restored;
                model.pop_world();
                assert_matches(&model, x, &reference);
                continue;
            }
            2 | 3 => (
                reference.remove_value(value),
                x.remove_value(&mut context, value),
            ),
            4 => (
                reference.remove_interval(value, other),
                x.remove_interval(&mut context, value, other),
            ),
            5 => (
                reference.update_lower_bound(value),
                x.update_lower_bound(&mut context, value),
            ),
            6 => (
                reference.update_upper_bound(value),
                x.update_upper_bound(&mut context, value),
            ),
            7 => (
                reference.update_bounds(value.min(other), value.max(other)),
                x.update_bounds(&mut context, value.min(other), value.max(other)),
            ),
            8 => (
                reference.instantiate_to(value),
                x.instantiate_to(&mut context, value),
            ),
            9 => {
                let values = random_set(&mut rng);
                (
                    reference.remove_values(&values),
                    x.remove_values(&mut context, &values),
                )
            }
            _ => {
                let values = random_set(&mut rng);
                (
                    reference.remove_all_values_but(&values),
                    x.remove_all_values_but(&mut context, &values),
                )
            }
        };

        assert_eq!(expected, actual.map_err(|_| ()));
        assert_matches(&model, x, &reference);
    }

    while let Some(restored) = saved.pop() {
        model.pop_world();
        reference = restored;
        assert_matches(&model, x, &reference);
    }
}

#[test]
fn interval_domains_follow_the_reference() {
    for seed in 0..8 {
        run(seed, DomainRepresentation::Interval);
    }
}

#[test]
fn bitset_domains_follow_the_reference() {
    for seed in 0..8 {
        run(seed, DomainRepresentation::Bitset);
    }
}

#[test]
fn sparse_domains_follow_the_reference() {
    for seed in 0..8 {
        run(seed, DomainRepresentation::SparseBitset);
    }
}
