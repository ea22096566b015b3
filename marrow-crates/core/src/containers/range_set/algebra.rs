//! Set operations over [`RangeSet`]s.
//!
//! Every operation walks the range lists of its operands once, the members themselves are never
//! enumerated.
use std::cmp::max;
use std::cmp::min;

use itertools::Itertools;

use super::RangeSet;
use crate::marrow_assert_simple;

pub fn union(left: &RangeSet, right: &RangeSet) -> RangeSet {
    let mut result = RangeSet::new();
    for (lo, hi) in left
        .ranges()
        .merge_by(right.ranges(), |first, second| first.0 <= second.0)
    {
        result.push_range_merging(lo, hi);
    }
    result
}

pub fn intersection(left: &RangeSet, right: &RangeSet) -> RangeSet {
    let mut result = RangeSet::new();
    let (mut i, mut j) = (0, 0);
    while i < left.num_ranges() && j < right.num_ranges() {
        let (left_lo, left_hi) = left.range(i);
        let (right_lo, right_hi) = right.range(j);

        let lo = max(left_lo, right_lo);
        let hi = min(left_hi, right_hi);
        if lo <= hi {
            result.push_range_merging(lo, hi);
        }

        if left_hi < right_hi {
            i += 1;
        } else {
            j += 1;
        }
    }
    result
}

/// The members of `left` which are not members of `right`.
pub fn difference(left: &RangeSet, right: &RangeSet) -> RangeSet {
    let mut result = RangeSet::new();
    let mut j = 0;
    for (lo, hi) in left.ranges() {
        let mut start = i64::from(lo);
        while j < right.num_ranges() && i64::from(right.range(j).1) < start {
            j += 1;
        }

        let mut k = j;
        while k < right.num_ranges() && start <= i64::from(hi) && right.range(k).0 <= hi {
            let (removed_lo, removed_hi) = right.range(k);
            if i64::from(removed_lo) > start {
                result.push_range_merging(start as i32, removed_lo - 1);
            }
            start = max(start, i64::from(removed_hi) + 1);
            k += 1;
        }

        if start <= i64::from(hi) {
            result.push_range_merging(start as i32, hi);
        }
    }
    result
}

/// The values of `[lb, ub]` which are not members of `set`.
pub fn complement(set: &RangeSet, lb: i32, ub: i32) -> RangeSet {
    let mut result = set.clone();
    result.unlock();
    result.flip_within(lb, ub);
    result
}

/// `{ v + offset | v in set }`
pub fn plus(set: &RangeSet, offset: i32) -> RangeSet {
    let mut result = set.clone();
    result.unlock();
    result.shift(offset);
    result
}

/// `{ v - offset | v in set }`
pub fn minus(set: &RangeSet, offset: i32) -> RangeSet {
    plus(set, -offset)
}

/// Scales every range of `set` by `factor`, see [`RangeSet::scale`].
pub fn times(set: &RangeSet, factor: i32) -> RangeSet {
    let mut result = set.clone();
    result.unlock();
    result.scale(factor);
    result
}

/// `{ a + b | a in set, l <= b <= u }`
pub fn plus_interval(set: &RangeSet, l: i32, u: i32) -> RangeSet {
    marrow_assert_simple!(l <= u, "the range [{l},{u}] is reversed");
    let mut result = RangeSet::new();
    for (lo, hi) in set.ranges() {
        result.push_range_merging(lo + l, hi + u);
    }
    result
}

/// `{ a - b | a in set, l <= b <= u }`
pub fn minus_interval(set: &RangeSet, l: i32, u: i32) -> RangeSet {
    plus_interval(set, -u, -l)
}

/// `{ a + b | a in left, b in right }`
pub fn plus_set(left: &RangeSet, right: &RangeSet) -> RangeSet {
    right
        .ranges()
        .map(|(lo, hi)| plus_interval(left, lo, hi))
        .fold(RangeSet::new(), |sum, part| union(&sum, &part))
}

/// `{ a - b | a in left, b in right }`
pub fn minus_set(left: &RangeSet, right: &RangeSet) -> RangeSet {
    plus_set(left, &times(right, -1))
}

/// Whether the two sets share a member.
pub fn intersects(left: &RangeSet, right: &RangeSet) -> bool {
    let (mut i, mut j) = (0, 0);
    while i < left.num_ranges() && j < right.num_ranges() {
        let (left_lo, left_hi) = left.range(i);
        let (right_lo, right_hi) = right.range(j);
        if max(left_lo, right_lo) <= min(left_hi, right_hi) {
            return true;
        }
        if left_hi < right_hi {
            i += 1;
        } else {
            j += 1;
        }
    }
    false
}

/// Whether every member of `subset` is a member of `superset`.
pub fn is_included_in(subset: &RangeSet, superset: &RangeSet) -> bool {
    let mut j = 0;
    subset.ranges().all(|(lo, hi)| {
        while j < superset.num_ranges() && superset.range(j).1 < lo {
            j += 1;
        }
        // Ranges are maximal, so a covered range lies within a single range of the superset.
        j < superset.num_ranges() && superset.range(j).0 <= lo && hi <= superset.range(j).1
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ranges_of(set: &RangeSet) -> Vec<(i32, i32)> {
        set.ranges().collect()
    }

    #[test]
    fn union_merges_touching_ranges() {
        let left = RangeSet::from_ranges([(1, 3), (10, 12)]);
        let right = RangeSet::from_ranges([(4, 5), (8, 8), (20, 21)]);

        let result = union(&left, &right);

        assert_eq!(vec![(1, 5), (8, 8), (10, 12), (20, 21)], ranges_of(&result));
        assert_eq!(11, result.size());
    }

    #[test]
    fn intersection_of_overlapping_ranges() {
        let left = RangeSet::from_ranges([(1, 5), (8, 12)]);
        let right = RangeSet::from_ranges([(3, 9), (11, 20)]);

        let result = intersection(&left, &right);

        assert_eq!(vec![(3, 5), (8, 9), (11, 12)], ranges_of(&result));
        assert_eq!(7, result.size());
    }

    #[test]
    fn difference_punches_holes() {
        let left = RangeSet::from_ranges([(0, 10), (20, 30)]);
        let right = RangeSet::from_ranges([(2, 3), (9, 22), (25, 25)]);

        let result = difference(&left, &right);

        assert_eq!(
            vec![(0, 1), (4, 8), (23, 24), (26, 30)],
            ranges_of(&result)
        );
        assert_eq!(result.to_vec().len(), result.size());
    }

    #[test]
    fn complement_within_bounds() {
        let set = RangeSet::from_ranges([(-5, -1), (3, 4), (50, 60)]);

        let result = complement(&set, 0, 10);

        assert_eq!(vec![(0, 2), (5, 10)], ranges_of(&result));
        assert_eq!(9, result.size());
    }

    #[test]
    fn minkowski_sum_with_an_interval() {
        let set = RangeSet::from_values([0, 5, 20]);

        let result = plus_interval(&set, 1, 4);

        assert_eq!(vec![(1, 4), (6, 9), (21, 24)], ranges_of(&result));
    }

    #[test]
    fn minkowski_sum_and_difference_of_sets() {
        let left = RangeSet::from_values([1, 10]);
        let right = RangeSet::from_values([0, 2]);

        assert_eq!(vec![1, 3, 10, 12], plus_set(&left, &right).to_vec());
        assert_eq!(vec![-1, 1, 8, 10], minus_set(&left, &right).to_vec());
        assert_eq!(
            vec![(-3, 0), (6, 9)],
            ranges_of(&minus_interval(&left, 1, 4))
        );
    }

    #[test]
    fn inclusion_and_intersection_tests() {
        let small = RangeSet::from_ranges([(2, 3), (8, 8)]);
        let large = RangeSet::from_ranges([(0, 4), (7, 9)]);
        let other = RangeSet::from_ranges([(5, 6), (10, 11)]);

        assert!(is_included_in(&small, &large));
        assert!(!is_included_in(&large, &small));
        assert!(intersects(&small, &large));
        assert!(!intersects(&large, &other));
        assert!(is_included_in(&RangeSet::new(), &other));
    }

    #[test]
    fn affine_transforms_leave_the_operand_untouched() {
        let set = RangeSet::from_ranges([(1, 2), (4, 4)]);

        assert_eq!(vec![(6, 7), (9, 9)], ranges_of(&plus(&set, 5)));
        assert_eq!(vec![(-1, 0), (2, 2)], ranges_of(&minus(&set, 2)));
        assert_eq!(vec![(-8, -8), (-4, -2)], ranges_of(&times(&set, -2)));
        assert_eq!(vec![(1, 2), (4, 4)], ranges_of(&set));
    }
}
