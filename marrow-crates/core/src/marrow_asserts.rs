//! Leveled invariant checks.
//!
//! Checks above the configured level compile to a constant-false branch. Release builds only run
//! the simple checks, tests and the `debug-checks` feature additionally run the advanced ones.

#[cfg(all(not(test), not(feature = "debug-checks")))]
pub(crate) const MARROW_ASSERT_LEVEL_DEFINITION: u8 = MARROW_ASSERT_SIMPLE;

#[cfg(any(test, feature = "debug-checks"))]
pub(crate) const MARROW_ASSERT_LEVEL_DEFINITION: u8 = MARROW_ASSERT_ADVANCED;

pub(crate) const MARROW_ASSERT_SIMPLE: u8 = 1;
pub(crate) const MARROW_ASSERT_MODERATE: u8 = 2;
pub(crate) const MARROW_ASSERT_ADVANCED: u8 = 3;

#[macro_export]
#[doc(hidden)]
macro_rules! marrow_assert_simple {
    ($($arg:tt)*) => {
        if $crate::marrow_asserts::MARROW_ASSERT_LEVEL_DEFINITION
            >= $crate::marrow_asserts::MARROW_ASSERT_SIMPLE
        {
            assert!($($arg)*);
        }
    };
}

#[macro_export]
#[doc(hidden)]
macro_rules! marrow_assert_eq_simple {
    ($($arg:tt)*) => {
        if $crate::marrow_asserts::MARROW_ASSERT_LEVEL_DEFINITION
            >= $crate::marrow_asserts::MARROW_ASSERT_SIMPLE
        {
            assert_eq!($($arg)*);
        }
    };
}

#[macro_export]
#[doc(hidden)]
macro_rules! marrow_assert_moderate {
    ($($arg:tt)*) => {
        if $crate::marrow_asserts::MARROW_ASSERT_LEVEL_DEFINITION
            >= $crate::marrow_asserts::MARROW_ASSERT_MODERATE
        {
            assert!($($arg)*);
        }
    };
}

#[macro_export]
#[doc(hidden)]
macro_rules! marrow_assert_advanced {
    ($($arg:tt)*) => {
        if $crate::marrow_asserts::MARROW_ASSERT_LEVEL_DEFINITION
            >= $crate::marrow_asserts::MARROW_ASSERT_ADVANCED
        {
            assert!($($arg)*);
        }
    };
}
