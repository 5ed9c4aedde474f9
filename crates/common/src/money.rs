//! Exact money arithmetic for prices and payment totals.

use serde::{Deserialize, Serialize};

/// Money amount in cents, so line totals stay exact under summation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Creates an amount from cents (e.g. 1000 = $10.00).
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// Returns the amount in cents.
    pub fn cents(&self) -> i64 {
        self.0
    }

    /// Multiplies a unit price by a quantity, saturating at the bounds.
    pub fn multiply(&self, quantity: u32) -> Money {
        Money(self.0.saturating_mul(i64::from(quantity)))
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{sign}${}.{:02}", (self.0 / 100).abs(), self.0.abs() % 100)
    }
}

impl std::ops::Add for Money {
    type Output = Money;

    fn add(self, rhs: Self) -> Self::Output {
        Money(self.0.saturating_add(rhs.0))
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::from_cents(0), |acc, m| acc + m)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_from_cents() {
        let money = Money::from_cents(1234);
        assert_eq!(money.cents(), 1234);
    }

    #[test]
    fn test_display_formats_dollars_and_cents() {
        assert_eq!(Money::from_cents(1234).to_string(), "$12.34");
        assert_eq!(Money::from_cents(5).to_string(), "$0.05");
        assert_eq!(Money::from_cents(-1234).to_string(), "-$12.34");
    }

    #[test]
    fn test_multiply_by_quantity() {
        let a = Money::from_cents(1000);
        assert_eq!(a.multiply(3), Money::from_cents(3000));
        assert_eq!(a.multiply(0), Money::from_cents(0));
    }

    #[test]
    fn test_arithmetic_saturates_at_bounds() {
        let max = Money::from_cents(i64::MAX);
        assert_eq!(max.multiply(2), max);
        assert_eq!(max + Money::from_cents(1), max);
    }

    #[test]
    fn test_sum_of_line_totals() {
        let total: Money = [1000, 500, 4200].into_iter().map(Money::from_cents).sum();
        assert_eq!(total, Money::from_cents(5700));
    }

    #[test]
    fn test_serialization_roundtrip() {
        let money = Money::from_cents(4200);
        let json = serde_json::to_string(&money).unwrap();
        assert_eq!(json, "4200");
        let deserialized: Money = serde_json::from_str(&json).unwrap();
        assert_eq!(money, deserialized);
    }
}
