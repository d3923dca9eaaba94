//! Checked decimal arithmetic.
//!
//! Multi-decade compounding can in principle exceed `Decimal::MAX`, so the
//! projection loops go through [`SafeDecimal`] which turns overflow into a
//! [`TabungError::Overflow`] instead of a panic.

use rust_decimal::Decimal;
use std::ops::Deref;

use crate::types::TabungError;

#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct SafeDecimal(Decimal);

impl SafeDecimal {
    pub fn new(value: Decimal) -> Self {
        Self(value)
    }

    pub fn safe_add(self, rhs: Decimal) -> Result<Self, TabungError> {
        self.0
            .checked_add(rhs)
            .map(Self)
            .ok_or_else(|| TabungError::overflow(format!("{} + {}", self.0, rhs)))
    }

    pub fn safe_sub(self, rhs: Decimal) -> Result<Self, TabungError> {
        self.0
            .checked_sub(rhs)
            .map(Self)
            .ok_or_else(|| TabungError::overflow(format!("{} - {}", self.0, rhs)))
    }

    pub fn safe_mul(self, rhs: Decimal) -> Result<Self, TabungError> {
        self.0
            .checked_mul(rhs)
            .map(Self)
            .ok_or_else(|| TabungError::overflow(format!("{} * {}", self.0, rhs)))
    }

    /// Division; a zero divisor is a calculation error, not an overflow.
    pub fn safe_div(self, rhs: Decimal) -> Result<Self, TabungError> {
        if rhs.is_zero() {
            return Err(TabungError::CalculationError {
                reason: "division by zero".to_string(),
                source_label: None,
            });
        }
        self.0
            .checked_div(rhs)
            .map(Self)
            .ok_or_else(|| TabungError::overflow(format!("{} / {}", self.0, rhs)))
    }

    pub fn into_inner(self) -> Decimal {
        self.0
    }
}

impl Deref for SafeDecimal {
    type Target = Decimal;

    fn deref(&self) -> &Decimal {
        &self.0
    }
}

impl From<Decimal> for SafeDecimal {
    fn from(value: Decimal) -> Self {
        Self(value)
    }
}

/// Converts a percentage (5.75) into a fraction (0.0575).
pub fn percent_to_fraction(percent: Decimal) -> Decimal {
    percent / Decimal::ONE_HUNDRED
}

/// Integer ceiling of a non-negative decimal, saturating at `u32::MAX`.
pub fn ceil_to_u32(value: Decimal) -> u32 {
    use rust_decimal::prelude::ToPrimitive;
    if value <= Decimal::ZERO {
        return 0;
    }
    value.ceil().to_u32().unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_safe_ops() {
        let v = SafeDecimal::new(dec!(100))
            .safe_add(dec!(50))
            .unwrap()
            .safe_mul(dec!(2))
            .unwrap()
            .safe_sub(dec!(100))
            .unwrap();
        assert_eq!(*v, dec!(200));
    }

    #[test]
    fn test_overflow_is_error() {
        let res = SafeDecimal::new(Decimal::MAX).safe_add(Decimal::MAX);
        assert!(matches!(res, Err(TabungError::Overflow { .. })));
    }

    #[test]
    fn test_divide_by_zero_is_error() {
        let err = SafeDecimal::new(dec!(1)).safe_div(Decimal::ZERO).unwrap_err();
        match err {
            TabungError::CalculationError { reason, .. } => assert_eq!(reason, "division by zero"),
            other => panic!("expected calculation error, got {:?}", other),
        }
    }

    #[test]
    fn test_ceil_to_u32() {
        assert_eq!(ceil_to_u32(dec!(2.01)), 3);
        assert_eq!(ceil_to_u32(dec!(2)), 2);
        assert_eq!(ceil_to_u32(dec!(-4)), 0);
    }
}
