//! Opportunity value using decimal arithmetic.
//!
//! Form input is coerced when it is typed, not when it is submitted: anything
//! that does not parse as a number becomes zero, and the positive-value check
//! then rejects it.

use core::fmt;
use core::iter::Sum;
use core::ops::{Add, AddAssign};

use rust_decimal::Decimal;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use serde::{Deserialize, Serialize};

/// A money amount in the console's single (implicit) currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount(Decimal);

impl Amount {
    /// Zero.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Wrap a decimal value.
    #[must_use]
    pub const fn new(value: Decimal) -> Self {
        Self(value)
    }

    /// Coerce raw form input. Whitespace, a leading `$` and thousands
    /// separators are ignored; anything else that fails to parse is zero.
    #[must_use]
    pub fn from_input(raw: &str) -> Self {
        let cleaned: String = raw
            .trim()
            .trim_start_matches('$')
            .chars()
            .filter(|c| *c != ',')
            .collect();
        cleaned
            .parse::<Decimal>()
            .map_or(Self::ZERO, |d| Self(d.normalize()))
    }

    /// The underlying decimal.
    #[must_use]
    pub const fn value(&self) -> Decimal {
        self.0
    }

    /// Whether the amount is zero.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Whether the amount is greater than zero.
    #[must_use]
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// Format for display with a dollar sign and two decimals, e.g. `$5,000.00`.
    #[must_use]
    pub fn display(&self) -> String {
        let rounded = self.0.round_dp(2);
        let negative = rounded.is_sign_negative();
        let text = format!("{:.2}", rounded.abs());
        let (whole, cents) = text.split_once('.').unwrap_or((&text, "00"));

        let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
        for (i, ch) in whole.chars().enumerate() {
            if i > 0 && (whole.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }

        if negative {
            format!("-${grouped}.{cents}")
        } else {
            format!("${grouped}.{cents}")
        }
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.normalize())
    }
}

impl From<Decimal> for Amount {
    fn from(value: Decimal) -> Self {
        Self(value)
    }
}

impl From<i64> for Amount {
    fn from(value: i64) -> Self {
        Self(Decimal::from(value))
    }
}

/// Addition saturates at the bounds of `Decimal` instead of panicking, so a
/// report over absurd server values still renders.
impl Add for Amount {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Amount {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Self> for Amount {
    fn sum<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

impl Serialize for Amount {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.0.fract().is_zero()
            && let Some(whole) = self.0.to_i64()
        {
            return serializer.serialize_i64(whole);
        }
        match self.0.to_f64() {
            Some(f) => serializer.serialize_f64(f),
            None => serializer.serialize_str(&self.0.to_string()),
        }
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct AmountVisitor;

        impl serde::de::Visitor<'_> for AmountVisitor {
            type Value = Amount;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a number or numeric string")
            }

            fn visit_i64<E: serde::de::Error>(self, v: i64) -> Result<Amount, E> {
                Ok(Amount::from(v))
            }

            fn visit_u64<E: serde::de::Error>(self, v: u64) -> Result<Amount, E> {
                Ok(Amount(Decimal::from(v)))
            }

            fn visit_f64<E: serde::de::Error>(self, v: f64) -> Result<Amount, E> {
                Ok(Decimal::from_f64(v).map_or(Amount::ZERO, |d| Amount(d.normalize())))
            }

            fn visit_str<E: serde::de::Error>(self, v: &str) -> Result<Amount, E> {
                Ok(Amount::from_input(v))
            }

            fn visit_unit<E: serde::de::Error>(self) -> Result<Amount, E> {
                Ok(Amount::ZERO)
            }
        }

        deserializer.deserialize_any(AmountVisitor)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_from_input_coerces_garbage_to_zero() {
        assert_eq!(Amount::from_input("abc"), Amount::ZERO);
        assert_eq!(Amount::from_input(""), Amount::ZERO);
        assert_eq!(Amount::from_input("$1,250.50").to_string(), "1250.5");
        assert_eq!(Amount::from_input(" 5000 "), Amount::from(5000));
    }

    #[test]
    fn test_deserialize_number_or_string() {
        let a: Amount = serde_json::from_str("5000").unwrap();
        let b: Amount = serde_json::from_str("\"5000\"").unwrap();
        let c: Amount = serde_json::from_str("\"n/a\"").unwrap();
        assert_eq!(a, b);
        assert!(c.is_zero());
    }

    #[test]
    fn test_serialize_as_number() {
        assert_eq!(serde_json::to_string(&Amount::from(5000)).unwrap(), "5000");
        assert_eq!(
            serde_json::to_string(&Amount::from_input("12.5")).unwrap(),
            "12.5"
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(Amount::from(1_234_567).display(), "$1,234,567.00");
        assert_eq!(Amount::from_input("99.999").display(), "$100.00");
        assert_eq!(Amount::ZERO.display(), "$0.00");
        assert_eq!(Amount::from(-50).display(), "-$50.00");
    }

    #[test]
    fn test_sum() {
        let total: Amount = [Amount::from(100), Amount::from_input("50.25")]
            .iter()
            .sum();
        assert_eq!(total.to_string(), "150.25");
    }

    #[test]
    fn test_sum_saturates_near_decimal_max() {
        let huge: Amount = serde_json::from_str("5e28").unwrap();
        let total: Amount = [huge, huge].iter().sum();
        assert_eq!(total, Amount::new(Decimal::MAX));

        let mut debt = Amount::new(Decimal::MIN);
        debt += Amount::from(-1);
        assert_eq!(debt, Amount::new(Decimal::MIN));
    }
}
