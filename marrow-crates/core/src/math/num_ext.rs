//! Rounded integer division, used to invert the scale of views.
use std::ops::Neg;

use num::Integer;

pub(crate) trait NumExt {
    /// Division rounding towards positive infinity.
    fn ceil_div(self, other: Self) -> Self;

    /// Division rounding towards negative infinity, which differs from the truncating `/` on
    /// negative quotients.
    fn floor_div(self, other: Self) -> Self;

    /// Whether `other` divides `self` without remainder.
    fn is_divisible_by(self, other: Self) -> bool;
}

impl<Int: Integer + Neg<Output = Int> + Copy> NumExt for Int {
    fn ceil_div(self, other: Self) -> Self {
        -Integer::div_floor(&-self, &other)
    }

    fn floor_div(self, other: Self) -> Self {
        Integer::div_floor(&self, &other)
    }

    fn is_divisible_by(self, other: Self) -> bool {
        Integer::is_multiple_of(&self, &other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounding_follows_the_sign_of_the_quotient() {
        assert_eq!(2, 7_i32.ceil_div(4));
        assert_eq!(1, 7_i32.floor_div(4));
        assert_eq!(-1, (-7_i32).ceil_div(4));
        assert_eq!(-2, (-7_i32).floor_div(4));
        assert_eq!(-1, 7_i32.ceil_div(-4));
        assert_eq!(-2, 7_i32.floor_div(-4));
        assert_eq!(3, 6_i32.ceil_div(2));
        assert_eq!(3, 6_i32.floor_div(2));
    }

    #[test]
    fn wide_integers_round_the_same_way() {
        assert_eq!(-1_i64, (-7_i64).ceil_div(4));
        assert_eq!(-2_i64, (-7_i64).floor_div(4));
        assert!((-6_i64).is_divisible_by(3));
    }

    #[test]
    fn divisibility() {
        assert!(6_i32.is_divisible_by(-3));
        assert!(!7_i32.is_divisible_by(3));
        assert!(0_i32.is_divisible_by(5));
    }
}
