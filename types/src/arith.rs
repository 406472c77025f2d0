//! Overflow/underflow-checked arithmetic over raw token units.
//!
//! Every balance, supply and vote mutation goes through these helpers.
//! Wraparound is never permitted; a violation is reported as an
//! [`ArithmeticError`] before anything is written.

use crate::error::ArithmeticError;
use serde::{Deserialize, Serialize};

/// `a + b`, failing with `Overflow` past `u128::MAX`.
pub fn checked_add(a: u128, b: u128) -> Result<u128, ArithmeticError> {
    a.checked_add(b).ok_or(ArithmeticError::Overflow)
}

/// `a - b`, failing with `Underflow` when `b > a`.
pub fn checked_sub(a: u128, b: u128) -> Result<u128, ArithmeticError> {
    a.checked_sub(b).ok_or(ArithmeticError::Underflow)
}

/// `a + b`, additionally failing with `CapExceeded` when the sum is above `cap`.
pub fn checked_add_capped(a: u128, b: u128, cap: u128) -> Result<u128, ArithmeticError> {
    let sum = checked_add(a, b)?;
    if sum > cap {
        return Err(ArithmeticError::CapExceeded { cap });
    }
    Ok(sum)
}

/// A signed change to an unsigned quantity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Delta {
    Increase(u128),
    Decrease(u128),
}

impl Delta {
    pub fn magnitude(&self) -> u128 {
        match self {
            Self::Increase(n) | Self::Decrease(n) => *n,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.magnitude() == 0
    }

    /// Apply this delta to `value` through the checked primitives.
    pub fn apply(self, value: u128) -> Result<u128, ArithmeticError> {
        match self {
            Self::Increase(n) => checked_add(value, n),
            Self::Decrease(n) => checked_sub(value, n),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_overflow() {
        assert_eq!(checked_add(u128::MAX, 1), Err(ArithmeticError::Overflow));
        assert_eq!(checked_add(1, 2), Ok(3));
    }

    #[test]
    fn sub_underflow() {
        assert_eq!(checked_sub(1, 2), Err(ArithmeticError::Underflow));
        assert_eq!(checked_sub(5, 5), Ok(0));
    }

    #[test]
    fn capped_add_at_the_cap_is_allowed() {
        assert_eq!(checked_add_capped(999_000, 1_000, 1_000_000), Ok(1_000_000));
    }

    #[test]
    fn capped_add_above_the_cap() {
        assert_eq!(
            checked_add_capped(999_000, 1_001, 1_000_000),
            Err(ArithmeticError::CapExceeded { cap: 1_000_000 })
        );
    }

    #[test]
    fn capped_add_reports_overflow_before_cap() {
        assert_eq!(
            checked_add_capped(u128::MAX, 1, u128::MAX),
            Err(ArithmeticError::Overflow)
        );
    }

    #[test]
    fn delta_apply() {
        assert_eq!(Delta::Increase(5).apply(10), Ok(15));
        assert_eq!(Delta::Decrease(5).apply(10), Ok(5));
        assert_eq!(Delta::Decrease(11).apply(10), Err(ArithmeticError::Underflow));
        assert!(Delta::Increase(0).is_zero());
        assert_eq!(Delta::Decrease(7).magnitude(), 7);
    }
}
