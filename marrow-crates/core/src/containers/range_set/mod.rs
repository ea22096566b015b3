//! Sets of integers stored as sorted lists of disjoint intervals.
pub mod algebra;

use std::cmp::max;
use std::cmp::min;
use std::fmt::Display;

use itertools::Itertools;

use crate::engine::variables::IntegerVariable;
use crate::engine::variables::VariableStore;
use crate::marrow_assert_simple;

/// Below this number of ranges, lookups scan linearly instead of bisecting.
const LINEAR_SCAN_RANGES: usize = 8;

/// A set of integers represented as a list of `[lo, hi]` ranges.
///
/// The ranges are sorted, and two consecutive ranges are always separated by at least one absent
/// value, i.e. the representation of a set is unique. The cardinality is maintained
/// incrementally by every mutation.
///
/// A set can be locked, after which any mutation is a programming error.
#[derive(Clone, Debug, Default)]
pub struct RangeSet {
    /// Consecutive `(lo, hi)` pairs.
    bounds: Vec<i32>,
    cardinality: usize,
    locked: bool,
}

impl PartialEq for RangeSet {
    fn eq(&self, other: &Self) -> bool {
        self.bounds == other.bounds
    }
}

impl Eq for RangeSet {}

/// The number of integers in `[lo, hi]`.
fn span(lo: i32, hi: i32) -> usize {
    (i64::from(hi) - i64::from(lo) + 1) as usize
}

/// Whether `value` lies within `[UNIVERSE_MIN, UNIVERSE_MAX]`.
fn in_universe(value: i64) -> bool {
    (i64::from(RangeSet::UNIVERSE_MIN)..=i64::from(RangeSet::UNIVERSE_MAX)).contains(&value)
}

impl RangeSet {
    /// Lower end of the universe used by [`RangeSet::flip`].
    pub const UNIVERSE_MIN: i32 = i32::MAX / -2;
    /// Upper end of the universe used by [`RangeSet::flip`].
    pub const UNIVERSE_MAX: i32 = i32::MAX / 2;

    pub fn new() -> RangeSet {
        RangeSet::default()
    }

    /// The set `{lo, ..., hi}`.
    pub fn interval(lo: i32, hi: i32) -> RangeSet {
        marrow_assert_simple!(lo <= hi, "the range [{lo},{hi}] is reversed");
        RangeSet {
            bounds: vec![lo, hi],
            cardinality: span(lo, hi),
            locked: false,
        }
    }

    pub fn singleton(value: i32) -> RangeSet {
        RangeSet::interval(value, value)
    }

    /// Builds a set from values given in any order, duplicates are ignored.
    pub fn from_values(values: impl IntoIterator<Item = i32>) -> RangeSet {
        let mut set = RangeSet::new();
        for value in values.into_iter().sorted_unstable().dedup() {
            set.push_range_merging(value, value);
        }
        set
    }

    /// Builds a set as the union of the given ranges, which may overlap and come in any order.
    pub fn from_ranges(ranges: impl IntoIterator<Item = (i32, i32)>) -> RangeSet {
        let mut set = RangeSet::new();
        for (lo, hi) in ranges.into_iter().sorted_unstable() {
            marrow_assert_simple!(lo <= hi, "the range [{lo},{hi}] is reversed");
            set.push_range_merging(lo, hi);
        }
        set
    }

    /// A copy of the current domain of `variable`.
    pub fn from_var<Var: IntegerVariable>(variables: &VariableStore, variable: Var) -> RangeSet {
        let mut set = RangeSet::new();
        for (lo, hi) in variable.ranges(variables, true) {
            set.push_range_merging(lo, hi);
        }
        set
    }

    /// The number of values in the set.
    pub fn size(&self) -> usize {
        self.cardinality
    }

    pub fn is_empty(&self) -> bool {
        self.bounds.is_empty()
    }

    pub fn min(&self) -> Option<i32> {
        self.bounds.first().copied()
    }

    pub fn max(&self) -> Option<i32> {
        self.bounds.last().copied()
    }

    pub fn num_ranges(&self) -> usize {
        self.bounds.len() / 2
    }

    /// The `index`-th range of the set, counting from the smallest one.
    pub fn range(&self, index: usize) -> (i32, i32) {
        (self.lo(index), self.hi(index))
    }

    /// Iterates over the ranges in increasing order.
    pub fn ranges(&self) -> impl DoubleEndedIterator<Item = (i32, i32)> + '_ {
        self.bounds.chunks_exact(2).map(|pair| (pair[0], pair[1]))
    }

    /// Iterates over the values in increasing order.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = i32> + '_ {
        self.ranges().flat_map(|(lo, hi)| lo..=hi)
    }

    pub fn to_vec(&self) -> Vec<i32> {
        self.iter().collect()
    }

    fn lo(&self, range: usize) -> i32 {
        self.bounds[2 * range]
    }

    fn hi(&self, range: usize) -> i32 {
        self.bounds[2 * range + 1]
    }

    /// The index of the first range satisfying `predicate`, which must be monotone over the
    /// ranges (false for a prefix, true afterwards).
    fn first_range_where(&self, predicate: impl Fn(i32, i32) -> bool) -> usize {
        let num_ranges = self.num_ranges();
        if num_ranges < LINEAR_SCAN_RANGES {
            return (0..num_ranges)
                .find(|&range| predicate(self.lo(range), self.hi(range)))
                .unwrap_or(num_ranges);
        }

        let (mut low, mut high) = (0, num_ranges);
        while low < high {
            let mid = low + (high - low) / 2;
            if predicate(self.lo(mid), self.hi(mid)) {
                high = mid;
            } else {
                low = mid + 1;
            }
        }
        low
    }

    /// Locates `value`: `Ok(range)` when the range contains it, otherwise `Err(range)` with the
    /// index of the first range lying above `value`.
    pub fn range_of(&self, value: i32) -> Result<usize, usize> {
        let range = self.first_range_where(|_, hi| hi >= value);
        if range < self.num_ranges() && self.lo(range) <= value {
            Ok(range)
        } else {
            Err(range)
        }
    }

    pub fn contains(&self, value: i32) -> bool {
        self.range_of(value).is_ok()
    }

    /// The smallest member strictly greater than `value`, or `i32::MAX` if there is none.
    pub fn next_value(&self, value: i32) -> i32 {
        if value == i32::MAX {
            return i32::MAX;
        }
        let target = value + 1;
        let range = self.first_range_where(|_, hi| hi >= target);
        if range < self.num_ranges() {
            max(self.lo(range), target)
        } else {
            i32::MAX
        }
    }

    /// The largest member strictly smaller than `value`, or `i32::MIN` if there is none.
    pub fn previous_value(&self, value: i32) -> i32 {
        if value == i32::MIN {
            return i32::MIN;
        }
        let target = value - 1;
        let range = self.first_range_where(|lo, _| lo > target);
        if range == 0 {
            i32::MIN
        } else {
            min(self.hi(range - 1), target)
        }
    }

    /// The smallest integer strictly greater than `value` which is not a member.
    pub fn next_value_out(&self, value: i32) -> i32 {
        let target = value.saturating_add(1);
        match self.range_of(target) {
            Ok(range) => self.hi(range).saturating_add(1),
            Err(_) => target,
        }
    }

    /// The largest integer strictly smaller than `value` which is not a member.
    pub fn previous_value_out(&self, value: i32) -> i32 {
        let target = value.saturating_sub(1);
        match self.range_of(target) {
            Ok(range) => self.lo(range).saturating_sub(1),
            Err(_) => target,
        }
    }

    pub fn lock(&mut self) {
        self.locked = true;
    }

    pub fn unlock(&mut self) {
        self.locked = false;
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    fn assert_unlocked(&self) {
        marrow_assert_simple!(!self.locked, "a locked set cannot be modified");
    }

    pub fn clear(&mut self) {
        self.assert_unlocked();
        self.bounds.clear();
        self.cardinality = 0;
    }

    /// Replaces the content of this set by the content of `other`, keeping the allocation.
    pub fn copy_from(&mut self, other: &RangeSet) {
        self.assert_unlocked();
        self.bounds.clone_from(&other.bounds);
        self.cardinality = other.cardinality;
    }

    /// Appends `[lo, hi]` which may not start before the last range, merging with it when they
    /// touch.
    pub(crate) fn push_range_merging(&mut self, lo: i32, hi: i32) {
        match self.bounds.last_mut() {
            Some(last_hi) if lo <= last_hi.saturating_add(1) => {
                if hi > *last_hi {
                    self.cardinality += span(*last_hi, hi) - 1;
                    *last_hi = hi;
                }
            }
            _ => {
                self.bounds.push(lo);
                self.bounds.push(hi);
                self.cardinality += span(lo, hi);
            }
        }
    }

    /// Adds `value`, returns whether the set changed.
    pub fn add(&mut self, value: i32) -> bool {
        self.assert_unlocked();
        let Err(range) = self.range_of(value) else {
            return false;
        };

        let extends_previous = range > 0 && self.hi(range - 1) == value - 1;
        let extends_next = range < self.num_ranges() && self.lo(range) == value + 1;
        match (extends_previous, extends_next) {
            (true, true) => {
                let _ = self.bounds.drain(2 * range - 1..2 * range + 1);
            }
            (true, false) => self.bounds[2 * range - 1] = value,
            (false, true) => self.bounds[2 * range] = value,
            (false, false) => {
                let _ = self.bounds.splice(2 * range..2 * range, [value, value]);
            }
        }
        self.cardinality += 1;
        true
    }

    /// Removes `value`, returns whether the set changed.
    pub fn remove(&mut self, value: i32) -> bool {
        self.assert_unlocked();
        let Ok(range) = self.range_of(value) else {
            return false;
        };

        match (self.lo(range) == value, self.hi(range) == value) {
            (true, true) => {
                let _ = self.bounds.drain(2 * range..2 * range + 2);
            }
            (true, false) => self.bounds[2 * range] = value + 1,
            (false, true) => self.bounds[2 * range + 1] = value - 1,
            (false, false) => {
                let _ = self
                    .bounds
                    .splice(2 * range + 1..2 * range + 1, [value - 1, value + 1]);
            }
        }
        self.cardinality -= 1;
        true
    }

    /// Adds every value of `[from, to]`, returns whether the set changed.
    pub fn add_between(&mut self, from: i32, to: i32) -> bool {
        self.assert_unlocked();
        marrow_assert_simple!(from <= to, "the range [{from},{to}] is reversed");

        // Ranges overlapping or touching [from, to] are merged into it.
        let first = self.first_range_where(|_, hi| hi >= from.saturating_sub(1));
        let end = self.first_range_where(|lo, _| lo > to.saturating_add(1));

        let mut lo = from;
        let mut hi = to;
        let mut merged = 0;
        for range in first..end {
            lo = min(lo, self.lo(range));
            hi = max(hi, self.hi(range));
            merged += span(self.lo(range), self.hi(range));
        }

        let _ = self.bounds.splice(2 * first..2 * end, [lo, hi]);
        let previous = self.cardinality;
        self.cardinality = self.cardinality - merged + span(lo, hi);
        self.cardinality != previous
    }

    /// Removes every value of `[from, to]`, returns whether the set changed.
    pub fn remove_between(&mut self, from: i32, to: i32) -> bool {
        self.assert_unlocked();
        marrow_assert_simple!(from <= to, "the range [{from},{to}] is reversed");

        let first = self.first_range_where(|_, hi| hi >= from);
        let end = self.first_range_where(|lo, _| lo > to);
        if first >= end {
            return false;
        }

        let mut remainders = Vec::with_capacity(4);
        if self.lo(first) < from {
            remainders.extend([self.lo(first), from - 1]);
        }
        if self.hi(end - 1) > to {
            remainders.extend([to + 1, self.hi(end - 1)]);
        }

        let removed: usize = (first..end)
            .map(|range| span(self.lo(range), self.hi(range)))
            .sum();
        let kept: usize = remainders
            .chunks_exact(2)
            .map(|pair| span(pair[0], pair[1]))
            .sum();

        let _ = self.bounds.splice(2 * first..2 * end, remainders);
        self.cardinality = self.cardinality - removed + kept;
        removed != kept
    }

    /// Removes every value outside of `[from, to]`, returns whether the set changed.
    pub fn retain_between(&mut self, from: i32, to: i32) -> bool {
        self.assert_unlocked();
        marrow_assert_simple!(from <= to, "the range [{from},{to}] is reversed");

        let first = self.first_range_where(|_, hi| hi >= from);
        let end = self.first_range_where(|lo, _| lo > to);
        let previous = self.cardinality;
        if first >= end {
            self.bounds.clear();
            self.cardinality = 0;
            return previous != 0;
        }

        self.bounds.truncate(2 * end);
        let _ = self.bounds.drain(..2 * first);
        let last = self.bounds.len() - 1;
        self.bounds[0] = max(self.bounds[0], from);
        self.bounds[last] = min(self.bounds[last], to);

        self.cardinality = self.ranges().map(|(lo, hi)| span(lo, hi)).sum();
        self.cardinality != previous
    }

    /// Adds every member of `other`, returns whether the set changed.
    pub fn add_all(&mut self, other: &RangeSet) -> bool {
        self.assert_unlocked();
        let result = algebra::union(self, other);
        self.replace_with(result)
    }

    /// Removes every member of `other`, returns whether the set changed.
    pub fn remove_all(&mut self, other: &RangeSet) -> bool {
        self.assert_unlocked();
        let result = algebra::difference(self, other);
        self.replace_with(result)
    }

    /// Removes every value which is not a member of `other`, returns whether the set changed.
    pub fn retain_all(&mut self, other: &RangeSet) -> bool {
        self.assert_unlocked();
        let result = algebra::intersection(self, other);
        self.replace_with(result)
    }

    fn replace_with(&mut self, result: RangeSet) -> bool {
        // The results of add_all, remove_all and retain_all are supersets or subsets of self.
        let changed = result.cardinality != self.cardinality;
        self.bounds = result.bounds;
        self.cardinality = result.cardinality;
        changed
    }

    /// Whether some member lies in `[from, to]`.
    pub fn intersects_interval(&self, from: i32, to: i32) -> bool {
        let range = self.first_range_where(|_, hi| hi >= from);
        range < self.num_ranges() && self.lo(range) <= to
    }

    /// Adds `offset` to every member.
    pub fn shift(&mut self, offset: i32) {
        self.assert_unlocked();
        if let (Some(min), Some(max)) = (self.min(), self.max()) {
            marrow_assert_simple!(
                in_universe(i64::from(min) + i64::from(offset))
                    && in_universe(i64::from(max) + i64::from(offset)),
                "shifting [{min},{max}] by {offset} leaves the universe"
            );
        }
        self.bounds.iter_mut().for_each(|bound| *bound += offset);
    }

    /// Multiplies every range by `factor`.
    ///
    /// Each range is mapped onto the interval between the images of its bounds, so the result is
    /// the interval hull of the image of every range. A negative factor mirrors the set.
    pub fn scale(&mut self, factor: i32) {
        self.assert_unlocked();
        if self.is_empty() {
            return;
        }
        if factor == 0 {
            self.bounds.clear();
            self.bounds.extend([0, 0]);
            self.cardinality = 1;
            return;
        }

        if let (Some(min), Some(max)) = (self.min(), self.max()) {
            marrow_assert_simple!(
                in_universe(i64::from(min) * i64::from(factor))
                    && in_universe(i64::from(max) * i64::from(factor)),
                "scaling [{min},{max}] by {factor} leaves the universe"
            );
        }
        self.bounds.iter_mut().for_each(|bound| *bound *= factor);
        if factor < 0 {
            self.bounds.reverse();
        }
        self.cardinality = self.ranges().map(|(lo, hi)| span(lo, hi)).sum();
    }

    /// Complements the set within `[UNIVERSE_MIN, UNIVERSE_MAX]`.
    pub fn flip(&mut self) {
        self.flip_within(RangeSet::UNIVERSE_MIN, RangeSet::UNIVERSE_MAX)
    }

    /// Complements the set within `[lb, ub]` in place; members outside of `[lb, ub]` are dropped.
    pub fn flip_within(&mut self, lb: i32, ub: i32) {
        self.assert_unlocked();
        marrow_assert_simple!(lb <= ub, "the range [{lb},{ub}] is reversed");
        let _ = self.retain_between(lb, ub);

        let covers_lb = self.min() == Some(lb);
        let covers_ub = self.max() == Some(ub);

        // Turns [lo_0, hi_0, lo_1, ...] into the gaps [lo_0 - 1, hi_0 + 1, lo_1 - 1, ...], the
        // pairs (hi_i + 1, lo_i+1 - 1) are then the interior holes of the original set.
        for (index, bound) in self.bounds.iter_mut().enumerate() {
            if index % 2 == 0 {
                *bound -= 1;
            } else {
                *bound += 1;
            }
        }
        if covers_lb {
            let _ = self.bounds.remove(0);
        } else {
            self.bounds.insert(0, lb);
        }
        if covers_ub {
            let _ = self.bounds.pop();
        } else {
            self.bounds.push(ub);
        }

        self.cardinality = span(lb, ub) - self.cardinality;
    }
}

impl Display for RangeSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() {
            return write!(f, "∅");
        }
        write!(
            f,
            "{}",
            self.ranges()
                .map(|(lo, hi)| format!("[{lo},{hi}]"))
                .join("∪")
        )
    }
}

impl FromIterator<i32> for RangeSet {
    fn from_iter<T: IntoIterator<Item = i32>>(iter: T) -> Self {
        RangeSet::from_values(iter)
    }
}
