use rust_decimal::Decimal;
use std::str::FromStr;
use crate::types::TabungError;

/// Trait for converting various types into `Decimal` for savings calculations.
///
/// This trait allows users to pass `i32`, `f64`, `&str`, etc. directly into
/// setters without needing to wrap them in `dec!()` or `Decimal::from()`.
pub trait IntoTabungDecimal {
    fn into_tabung_decimal(self) -> Result<Decimal, TabungError>;
}

impl IntoTabungDecimal for Decimal {
    fn into_tabung_decimal(self) -> Result<Decimal, TabungError> {
        Ok(self)
    }
}

macro_rules! impl_into_tabung_decimal_int {
    ($($t:ty),*) => {
        $(
            impl IntoTabungDecimal for $t {
                fn into_tabung_decimal(self) -> Result<Decimal, TabungError> {
                    Ok(Decimal::from(self))
                }
            }
        )*
    };
}

impl_into_tabung_decimal_int!(i32, u32, i64, u64, isize, usize);

macro_rules! impl_into_tabung_decimal_float {
    ($($t:ty),*) => {
        $(
            impl IntoTabungDecimal for $t {
                fn into_tabung_decimal(self) -> Result<Decimal, TabungError> {
                    // Going through the shortest decimal string keeps 5.75 as 5.75
                    // instead of 5.7500000000000000000001.
                    if !self.is_finite() {
                        return Err(TabungError::invalid_input("amount", self, "Value must be a finite number"));
                    }
                    Decimal::from_str(&self.to_string())
                        .or_else(|_| Decimal::from_scientific(&format!("{:e}", self)))
                        .map_err(|e| TabungError::invalid_input("amount", self, format!("Invalid float value: {}", e)))
                }
            }
        )*
    };
}

impl_into_tabung_decimal_float!(f32, f64);

impl IntoTabungDecimal for &str {
    fn into_tabung_decimal(self) -> Result<Decimal, TabungError> {
        Decimal::from_str(self.trim())
            .map_err(|e| TabungError::invalid_input("amount", self, format!("Invalid string format: {}", e)))
    }
}

impl IntoTabungDecimal for String {
    fn into_tabung_decimal(self) -> Result<Decimal, TabungError> {
        self.as_str().into_tabung_decimal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_float_keeps_short_representation() {
        assert_eq!(5.75_f64.into_tabung_decimal().unwrap(), dec!(5.75));
        assert_eq!(0.1_f64.into_tabung_decimal().unwrap(), dec!(0.1));
    }

    #[test]
    fn test_nan_rejected() {
        assert!(f64::NAN.into_tabung_decimal().is_err());
        assert!(f64::INFINITY.into_tabung_decimal().is_err());
    }

    #[test]
    fn test_strings_and_ints() {
        assert_eq!(" 1200.50 ".into_tabung_decimal().unwrap(), dec!(1200.50));
        assert_eq!(500_u32.into_tabung_decimal().unwrap(), dec!(500));
        assert!("abc".into_tabung_decimal().is_err());
    }
}
