//! Lazy traversals of a domain.
//!
//! Both iterators read the domain one step at a time and can be consumed from either end; the
//! end [`Iterator::next`] takes from is chosen at creation. They stop once the two ends meet, and
//! [`ValueIterator::restart`] and [`RangeIterator::restart`] rewind them to the current bounds.
use std::iter::FusedIterator;

use super::IntegerVariable;
use super::VariableStore;

/// The part of the hull which has not been visited yet, as exclusive limits.
#[derive(Debug, Clone, Copy)]
struct Window {
    below: i64,
    above: i64,
}

impl Window {
    fn of<Var: IntegerVariable>(variables: &VariableStore, variable: Var) -> Window {
        Window {
            below: i64::from(variable.lower_bound(variables)) - 1,
            above: i64::from(variable.upper_bound(variables)) + 1,
        }
    }

    fn admits(&self, value: i32) -> bool {
        self.below < i64::from(value) && i64::from(value) < self.above
    }

    /// The lower limit as a value to search from.
    fn lower(&self) -> i32 {
        self.below.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
    }

    fn upper(&self) -> i32 {
        self.above.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
    }
}

/// Iterates the values of a domain.
#[derive(Debug, Clone)]
pub struct ValueIterator<'a, Var> {
    variables: &'a VariableStore,
    variable: Var,
    bottom_up: bool,
    window: Window,
}

impl<'a, Var: IntegerVariable> ValueIterator<'a, Var> {
    pub fn new(variables: &'a VariableStore, variable: Var, bottom_up: bool) -> Self {
        ValueIterator {
            variables,
            variable,
            bottom_up,
            window: Window::of(variables, variable),
        }
    }

    /// Starts over from the bounds of the domain.
    pub fn restart(&mut self) {
        self.window = Window::of(self.variables, self.variable);
    }

    fn next_up(&mut self) -> Option<i32> {
        let value = self
            .variable
            .next_value(self.variables, self.window.lower());
        self.window.admits(value).then(|| {
            self.window.below = i64::from(value);
            value
        })
    }

    fn next_down(&mut self) -> Option<i32> {
        let value = self
            .variable
            .previous_value(self.variables, self.window.upper());
        self.window.admits(value).then(|| {
            self.window.above = i64::from(value);
            value
        })
    }
}

impl<Var: IntegerVariable> Iterator for ValueIterator<'_, Var> {
    type Item = i32;

    fn next(&mut self) -> Option<i32> {
        if self.bottom_up {
            self.next_up()
        } else {
            self.next_down()
        }
    }
}

impl<Var: IntegerVariable> DoubleEndedIterator for ValueIterator<'_, Var> {
    fn next_back(&mut self) -> Option<i32> {
        if self.bottom_up {
            self.next_down()
        } else {
            self.next_up()
        }
    }
}

impl<Var: IntegerVariable> FusedIterator for ValueIterator<'_, Var> {}

/// Iterates the maximal intervals `(lo, hi)` of a domain.
#[derive(Debug, Clone)]
pub struct RangeIterator<'a, Var> {
    variables: &'a VariableStore,
    variable: Var,
    bottom_up: bool,
    window: Window,
}

impl<'a, Var: IntegerVariable> RangeIterator<'a, Var> {
    pub fn new(variables: &'a VariableStore, variable: Var, bottom_up: bool) -> Self {
        RangeIterator {
            variables,
            variable,
            bottom_up,
            window: Window::of(variables, variable),
        }
    }

    /// Starts over from the bounds of the domain.
    pub fn restart(&mut self) {
        self.window = Window::of(self.variables, self.variable);
    }

    fn next_up(&mut self) -> Option<(i32, i32)> {
        let lo = self
            .variable
            .next_value(self.variables, self.window.lower());
        if !self.window.admits(lo) {
            return None;
        }
        let end = self.variable.next_value_out(self.variables, lo) - 1;
        let hi = end.min(self.window.upper() - 1);
        self.window.below = i64::from(hi);
        Some((lo, hi))
    }

    fn next_down(&mut self) -> Option<(i32, i32)> {
        let hi = self
            .variable
            .previous_value(self.variables, self.window.upper());
        if !self.window.admits(hi) {
            return None;
        }
        let start = self.variable.previous_value_out(self.variables, hi) + 1;
        let lo = start.max(self.window.lower() + 1);
        self.window.above = i64::from(lo);
        Some((lo, hi))
    }
}

impl<Var: IntegerVariable> Iterator for RangeIterator<'_, Var> {
    type Item = (i32, i32);

    fn next(&mut self) -> Option<(i32, i32)> {
        if self.bottom_up {
            self.next_up()
        } else {
            self.next_down()
        }
    }
}

impl<Var: IntegerVariable> DoubleEndedIterator for RangeIterator<'_, Var> {
    fn next_back(&mut self) -> Option<(i32, i32)> {
        if self.bottom_up {
            self.next_down()
        } else {
            self.next_up()
        }
    }
}

impl<Var: IntegerVariable> FusedIterator for RangeIterator<'_, Var> {}
